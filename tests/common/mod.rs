//! Common test utilities shared across all integration test files.
//!
//! Usage in test files:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

use mapbox_gateway::{Gateway, RetryPolicy};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "pk.test-token";

/// Retry policy with millisecond delays so retry tests stay fast.
#[allow(dead_code)]
pub fn fast_retry_policy() -> RetryPolicy {
    RetryPolicy::default()
        .with_min_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(5))
        .with_jitter(false)
}

/// Creates a gateway pointed at the mock server.
#[allow(dead_code)]
pub fn gateway_for(server: &MockServer) -> Gateway {
    Gateway::builder(TEST_TOKEN)
        .base_url(server.uri())
        .retry_policy(fast_retry_policy())
        .build()
        .expect("test gateway should build")
}

// =============================================================================
// Log Capture
// =============================================================================

/// One captured tracing event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: HashMap<String, String>,
}

/// A tracing layer that records every event it sees.
///
/// Install for the current thread with [`CapturedEvents::install`]; the
/// returned guard must stay alive for the duration of the test.
#[derive(Debug, Clone, Default)]
pub struct CapturedEvents(Arc<Mutex<Vec<CapturedEvent>>>);

#[allow(dead_code)]
impl CapturedEvents {
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let events = Self::default();
        let subscriber = tracing_subscriber::registry().with(events.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (events, guard)
    }

    pub fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.0
            .lock()
            .expect("capture lock poisoned")
            .iter()
            .filter(|event| event.message == message)
            .cloned()
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let message = visitor.fields.remove("message").unwrap_or_default();
        self.0
            .lock()
            .expect("capture lock poisoned")
            .push(CapturedEvent {
                level: *event.metadata().level(),
                message,
                fields: visitor.fields,
            });
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: HashMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}
