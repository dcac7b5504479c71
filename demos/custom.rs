//! Custom configuration: own time/line templates, a custom level map whose
//! order defines severity, full stack rendering and a log-event listener.
//!
//! Run with: cargo run --example custom

use anyhow::anyhow;
use bellman::{LogArg, Logger, LoggerConfig};

fn main() {
    let config = LoggerConfig {
        time_tmp: Some("%H:%M".to_string()),
        line_tmp: Some(":level :time :caller :message".to_string()),
        colorize: Some(true),
        caller_color: Some("yellow.bold".to_string()),
        level_map: Some(vec![
            ("debug".to_string(), "blue".to_string()),
            ("info".to_string(), "green".to_string()),
            ("panic".to_string(), "red".to_string()),
        ]),
        level_min: Some("debug".to_string()),
        full_stack: Some(true),
        ..Default::default()
    };

    let mut log = Logger::new(config);
    log.on_log(|event| {
        eprintln!("listener saw a {} event from {}", event.level, event.caller);
    });

    log.reg()
        .info(&["info line".into()])
        .debug(&["debug line".into()])
        .log(
            "panic",
            &["panic line: %s".into(), anyhow!("wires crossed").into()],
        );
}
