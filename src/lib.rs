//! # bellman
//!
//! A console logger that formats leveled, colorized log lines, resolves the
//! calling source location from a captured backtrace, and publishes a
//! structured event for every emitted line.
//!
//! ## Overview
//!
//! A [`Logger`] owns its resolved [`LoggerOptions`] and a registered-callers
//! sequence. Each log call:
//!
//! 1. filters by level: severity is the *position* of a level in the
//!    configured `level_map`, so the map's order defines precedence;
//! 2. resolves the caller: the innermost frame of a captured backtrace that
//!    belongs to the consuming project (dependency, toolchain and bellman's
//!    own frames are skipped), falling back to the last [`Logger::reg`]istered
//!    label;
//! 3. stringifies the arguments (error-like values go through the graceful
//!    [`format_error`] chain, structured values through JSON inspection) and
//!    combines them printf-style;
//! 4. fills the line template (`:time :level :caller :message`), writes it to
//!    stdout (stderr for `error`), and delivers a [`LogEvent`] to listeners.
//!
//! Nothing in the public surface returns `Result`: a logging call degrades
//! gracefully rather than ever crashing the program it observes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bellman::{Logger, LoggerConfig, LogArg};
//!
//! let mut log = Logger::new(LoggerConfig::default());
//! log.reg()
//!     .info(&["listening on %s".into(), "0.0.0.0:8080".into()])
//!     .error(&[
//!         "startup failed: %s".into(),
//!         LogArg::error(&std::io::Error::other("bind refused")),
//!     ]);
//! ```
//!
//! ## Configuration
//!
//! Every [`LoggerConfig`] field is optional; see [`LoggerOptions::resolve`]
//! for the defaults. `level_map` is an *ordered* list of `(name, color path)`
//! pairs; supplying a custom map redefines both the palette and the severity
//! order. Color paths (`yellow.bold`) resolve against a fixed table at
//! construction; unknown paths degrade to unstyled text, as does
//! `colorize: false`. Full stack rendering can also be switched on from the
//! environment (`STACK=full` or `FULLSTACK=true`).

pub mod caller;
pub mod error_format;
pub mod logger;
pub mod message;
pub mod options;
pub mod stack_frame;
pub mod theme;

pub use error_format::{ErrorRecord, format_error};
pub use logger::{LogEvent, Logger};
pub use message::LogArg;
pub use options::{LoggerConfig, LoggerOptions};
pub use stack_frame::StackFrame;
pub use theme::{Dyer, uncolor};
