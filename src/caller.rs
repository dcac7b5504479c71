//! Caller resolution: capture a backtrace, parse it into ordered
//! [`StackFrame`]s and pick the first frame owned by the consuming project.

use crate::stack_frame::StackFrame;
use lazy_static::lazy_static;
use regex::Regex;
use std::backtrace::Backtrace;

lazy_static! {
    // "   3: app::run" symbol lines of the standard backtrace rendering
    static ref SYMBOL_RE: Regex = Regex::new(r"^\s*\d+:\s+(\S.*)$").unwrap();
}

/// capture a backtrace at the call site, rendered to text
pub fn capture() -> String {
    Backtrace::force_capture().to_string()
}

/// parse a trace into frames, innermost first
///
/// The standard rendering splits a frame over two lines (`N: symbol` followed
/// by an indented `at path:line:col`); those pairs are re-joined into the
/// canonical `at symbol (path:line:col)` form before parsing so frames keep
/// their function names. Lines that are not frames are dropped.
pub fn get_stack(trace: &str, project_root: &str) -> Vec<StackFrame> {
    let mut frames = Vec::new();
    let mut pending_symbol: Option<String> = None;

    for line in trace.lines() {
        if StackFrame::is_frame_line(line) {
            let canonical = match pending_symbol.take() {
                Some(symbol) if !line.contains('(') => {
                    let location = line.trim_start().trim_start_matches("at").trim_start();
                    format!("    at {symbol} ({location})")
                }
                _ => line.to_string(),
            };
            if let Some(frame) = StackFrame::parse(&canonical, project_root) {
                frames.push(frame);
            }
        } else if let Some(caps) = SYMBOL_RE.captures(line) {
            pending_symbol = Some(caps[1].trim_end().to_string());
        } else {
            pending_symbol = None;
        }
    }

    frames
}

/// innermost frame belonging to the consuming project, if any
pub fn get_caller(trace: &str, project_root: &str) -> Option<StackFrame> {
    get_stack(trace, project_root)
        .into_iter()
        .find(|frame| frame.is_part_of_project())
}
