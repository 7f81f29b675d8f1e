//! Observer that forwards published readings to stdout.

use gravmon_core::MotionObserver;
use std::sync::Arc;

/// Prints one line per published reading: fixed-point text, or a JSON
/// object in `--json` mode. Logs go to stderr, so stdout stays a clean
/// stream of readings either way.
pub struct StdoutPrinter {
    json: bool,
}

impl StdoutPrinter {
    pub fn new(json: bool) -> Arc<Self> {
        Arc::new(Self { json })
    }
}

impl MotionObserver for StdoutPrinter {
    fn on_vertical_acceleration(&self, value: f64) {
        if self.json {
            println!("{}", serde_json::json!({ "vertical_accel_g": value }));
        } else {
            println!("{value:+.2}");
        }
    }
}
