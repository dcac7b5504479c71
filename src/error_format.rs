//! Error stringification: normalize heterogeneous error-like values into a
//! single display string, degrading gracefully instead of ever failing.

use crate::caller;
use crate::stack_frame::StackFrame;
use itertools::Itertools;
use serde_json::Value;
use std::error::Error;

/// marker glyph opening a formatted error block
const GLYPH: &str = "⬎";

/// continuation separator keeping a stack rendition inside one log argument
const CONT: &str = "\n    ";

/// normalized error-like value
///
/// Errors arrive from heterogeneous sources: native errors, `anyhow` chains,
/// deserialized objects mimicking errors. All of them reduce to an optional
/// display string, message, stack text and structured payload, which is enough
/// for [`format_error`] to pick the richest rendition available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorRecord {
    display: Option<String>,
    message: Option<String>,
    stack: Option<String>,
    payload: Option<Value>,
}

impl ErrorRecord {
    /// record with a plain message and a stack captured here
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            display: Some(format!("Error: {message}")),
            message: Some(message),
            stack: Some(caller::capture()),
            payload: None,
        }
    }

    /// record from a standard error; the stack is captured at this point,
    /// which is the closest Rust equivalent of an error that captured its
    /// trace at construction
    pub fn from_std<E: Error + ?Sized>(err: &E) -> Self {
        Self {
            display: Some(format!("Error: {err}")),
            message: Some(err.to_string()),
            stack: Some(caller::capture()),
            payload: None,
        }
    }

    /// record from a structured value, e.g. a serialized error that crossed a
    /// process boundary; `message` and `stack` string fields are lifted out
    pub fn from_value(value: Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self {
            display: None,
            message: field("message"),
            stack: field("stack"),
            payload: Some(value),
        }
    }

    /// override the stack text (useful for traces carried out-of-band)
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

impl From<anyhow::Error> for ErrorRecord {
    fn from(err: anyhow::Error) -> Self {
        let trace = err.backtrace().to_string();
        let stack = if trace.lines().any(StackFrame::is_frame_line) {
            trace
        } else {
            // anyhow only captures when RUST_BACKTRACE is set
            caller::capture()
        };
        Self {
            display: Some(format!("Error: {err:#}")),
            message: Some(err.to_string()),
            stack: Some(stack),
            payload: None,
        }
    }
}

/// render an error record as a multi-line display string
///
/// Never fails: when the record's stack yields no parseable frame the result
/// falls through a chain of progressively simpler renditions, ending at plain
/// JSON of the payload.
pub fn format_error(record: &ErrorRecord, project_root: &str, full_stack: bool) -> String {
    format_parsed(record, project_root, full_stack)
        .unwrap_or_else(|| format_fallback(record))
}

fn format_parsed(record: &ErrorRecord, project_root: &str, full_stack: bool) -> Option<String> {
    let frames = caller::get_stack(record.stack()?, project_root);
    let (first, rest) = frames.split_first()?;

    let render = |frame: &StackFrame| {
        if full_stack {
            frame.full()
        } else {
            frame.short()
        }
    };
    let head = render(first);
    let tail = rest
        .iter()
        .filter(|frame| full_stack || frame.is_part_of_project())
        .map(render);

    let message = format!("{GLYPH}\n{}", header(record)).replace('\n', CONT);
    Some(
        std::iter::once(message)
            .chain(std::iter::once(head))
            .chain(tail)
            .join(CONT),
    )
}

fn header(record: &ErrorRecord) -> String {
    match &record.display {
        // "[object ...]" is the generic tag of a value with no string form
        Some(display) if !display.contains("[object") => display.clone(),
        _ => match &record.message {
            Some(message) => format!("Error: {message}"),
            None => format!("Error: {}", payload_json(record)),
        },
    }
}

fn format_fallback(record: &ErrorRecord) -> String {
    let message = record.message().filter(|m| !m.is_empty());
    let stack = record.stack().filter(|s| !s.is_empty());

    match (message, stack) {
        (Some(message), Some(stack)) if stack.contains(message) => {
            format!("{GLYPH}\n{stack}").replace('\n', CONT)
        }
        (Some(message), Some(stack)) => {
            let stack = stack
                .split(['\n', '\r'])
                .filter(|line| !line.is_empty())
                .map(str::trim_start)
                .join(CONT);
            format!("{GLYPH}\nError: {message}\nStack: {stack}").replace('\n', CONT)
        }
        (Some(message), None) => format!("{GLYPH}\nError: {message}").replace('\n', CONT),
        (None, Some(stack)) => format!("{GLYPH}\nError: {stack}").replace('\n', CONT),
        (None, None) => payload_json(record),
    }
}

fn payload_json(record: &ErrorRecord) -> String {
    let payload = record.payload.clone().unwrap_or(Value::Null);
    serde_json::to_string(&payload).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROOT: &str = "/home/app";

    fn record_with_trace() -> ErrorRecord {
        let stack = [
            "    at save (/home/app/src/handlers.rs:88:13)",
            "    at serde::de (/home/u/.cargo/registry/src/x/serde/src/de.rs:1:1)",
            "    at main (/home/app/src/main.rs:12:5)",
        ]
        .join("\n");
        ErrorRecord::new("oops").with_stack(stack)
    }

    #[test]
    fn test_trimmed_stack_keeps_project_frames_only() {
        let out = format_error(&record_with_trace(), ROOT, false);
        assert!(out.contains("Error: oops"));
        assert!(out.contains("src/handlers.rs:88"));
        assert!(out.contains("src/main.rs:12"));
        assert!(!out.contains("cargo/registry"));
    }

    #[test]
    fn test_full_stack_keeps_every_frame() {
        let out = format_error(&record_with_trace(), ROOT, true);
        assert!(out.contains("/home/app/src/handlers.rs:88"));
        assert!(out.contains("cargo/registry"));
    }

    #[test]
    fn test_head_is_first_frame() {
        let out = format_error(&record_with_trace(), ROOT, false);
        let glyph_pos = out.find(GLYPH).unwrap();
        let head_pos = out.find("src/handlers.rs").unwrap();
        let tail_pos = out.find("src/main.rs").unwrap();
        assert!(glyph_pos < head_pos && head_pos < tail_pos);
    }

    #[test]
    fn test_fallback_stack_containing_message() {
        let record = ErrorRecord::from_value(json!({
            "message": "boom",
            "stack": "boom happened\nsomewhere deep",
        }));
        let out = format_error(&record, ROOT, false);
        assert!(out.starts_with(GLYPH));
        assert!(out.contains("boom happened"));
        assert!(out.contains("somewhere deep"));
        assert!(!out.contains("Stack:"));
    }

    #[test]
    fn test_fallback_disjoint_message_and_stack() {
        let record = ErrorRecord::from_value(json!({
            "message": "boom",
            "stack": "  frame one\n  frame two",
        }));
        let out = format_error(&record, ROOT, false);
        assert!(out.contains("Error: boom"));
        // leading whitespace of stack lines is trimmed before rejoining
        assert!(out.contains("Stack: frame one"));
        assert!(out.contains("frame two"));
    }

    #[test]
    fn test_fallback_message_only_and_stack_only() {
        let msg_only = ErrorRecord::from_value(json!({ "message": "just text" }));
        assert_eq!(
            format_error(&msg_only, ROOT, false),
            format!("{GLYPH}{CONT}Error: just text")
        );

        let stack_only = ErrorRecord::from_value(json!({ "stack": "trace text" }));
        assert_eq!(
            format_error(&stack_only, ROOT, false),
            format!("{GLYPH}{CONT}Error: trace text")
        );
    }

    #[test]
    fn test_fallback_prefers_message_over_stack() {
        let record = ErrorRecord {
            message: Some("msg".to_string()),
            stack: Some(String::new()),
            ..Default::default()
        };
        assert!(format_error(&record, ROOT, false).contains("Error: msg"));
    }

    #[test]
    fn test_shapeless_values_render_as_json() {
        let record = ErrorRecord::from_value(json!({ "code": 500 }));
        assert_eq!(format_error(&record, ROOT, false), r#"{"code":500}"#);

        let null = ErrorRecord::from_value(Value::Null);
        assert_eq!(format_error(&null, ROOT, false), "null");

        let empty = ErrorRecord::default();
        assert_eq!(format_error(&empty, ROOT, false), "null");
    }

    #[test]
    fn test_std_error_record_formats() {
        let err = std::io::Error::other("oops");
        let record = ErrorRecord::from_std(&err);
        let out = format_error(&record, ROOT, false);
        assert!(out.contains("Error: oops"));
    }

    #[test]
    fn test_anyhow_record_formats() {
        let record = ErrorRecord::from(anyhow::anyhow!("oops"));
        let out = format_error(&record, ROOT, false);
        assert!(out.contains("Error: oops"));
    }

    #[test]
    fn test_never_panics_on_garbage_stack_text() {
        let record = ErrorRecord::new("x").with_stack("no frames here at all");
        let out = format_error(&record, ROOT, false);
        assert!(out.contains("x"));
    }
}
