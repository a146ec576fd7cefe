//! Internal HTTP layer for Mapbox API communication.
//!
//! This module is `pub(crate)` - it contains implementation details
//! not exposed to library users, apart from [`RetryPolicy`] which is
//! re-exported at the crate root.

pub(crate) mod common;
pub(crate) mod error_helpers;
pub(crate) mod retry;
pub(crate) mod transport;

pub use retry::RetryPolicy;
