//! Default-configuration walkthrough: one line per level, an error argument
//! rendered through the graceful formatter.
//!
//! Run with: cargo run --example simple

use bellman::{LogArg, Logger, LoggerConfig};

fn main() {
    let mut log = Logger::new(LoggerConfig::default());

    log.reg()
        .info(&["info message".into()])
        .debug(&["debug message".into()])
        .warn(&["warning message".into()])
        .error(&[
            "error: %s".into(),
            LogArg::error(&std::io::Error::other("demo failure")),
        ]);
}
