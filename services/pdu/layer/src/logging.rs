//! Logging helpers.
//!
//! Events from this crate carry a `component` field naming the part of the
//! stack that emitted them (`dispatch`, `chain`, `raw`). Applications embedding
//! the stack can install a subscriber with [`init`].

use tracing_subscriber::EnvFilter;

/// Emit a debug event tagged with a component
#[macro_export]
macro_rules! component_debug {
    ($component:expr, $($arg:tt)*) => {
        tracing::debug!(component = $component, $($arg)*)
    };
}

/// Emit a trace event tagged with a component
#[macro_export]
macro_rules! component_trace {
    ($component:expr, $($arg:tt)*) => {
        tracing::trace!(component = $component, $($arg)*)
    };
}

/// Emit a warning tagged with a component
#[macro_export]
macro_rules! component_warn {
    ($component:expr, $($arg:tt)*) => {
        tracing::warn!(component = $component, $($arg)*)
    };
}

/// Default filter when none is given
pub const DEFAULT_FILTER: &str = "info";

/// Install a global fmt subscriber filtered by `filter` (e.g. `"pdu_layer=trace"`).
///
/// An unparsable filter falls back to [`DEFAULT_FILTER`]. Returns `false` if
/// a global subscriber was already installed.
pub fn init(filter: &str) -> bool {
    let env_filter = match EnvFilter::try_new(filter) {
        Ok(env_filter) => env_filter,
        Err(e) => {
            eprintln!("invalid log filter {:?} ({}), using {:?}", filter, e, DEFAULT_FILTER);
            EnvFilter::new(DEFAULT_FILTER)
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

/// Install a subscriber that writes through the test harness capture
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("trace"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        init_for_tests();
        assert!(!init("debug"));
        assert!(!init("not a [valid filter"));
        component_warn!("logging", attempt = 2, "subscriber already installed");
    }
}
