//! Log-argument stringification and printf-style interpolation.

use crate::error_format::{ErrorRecord, format_error};
use serde_json::Value;
use std::error::Error;

/// one positional log argument
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    Text(String),
    Error(ErrorRecord),
    Value(Value),
}

impl LogArg {
    pub fn error<E: Error + ?Sized>(err: &E) -> Self {
        Self::Error(ErrorRecord::from_std(err))
    }
}

impl From<&str> for LogArg {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for LogArg {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<ErrorRecord> for LogArg {
    fn from(record: ErrorRecord) -> Self {
        Self::Error(record)
    }
}

impl From<anyhow::Error> for LogArg {
    fn from(err: anyhow::Error) -> Self {
        Self::Error(err.into())
    }
}

impl From<Value> for LogArg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// render one argument as display text
///
/// Errors go through the error formatter; structured values carrying a string
/// `stack` field are treated as errors in disguise, anything else is
/// pretty-printed JSON. The result is flattened to one logical line.
pub fn format_value(arg: &LogArg, project_root: &str, full_stack: bool) -> String {
    let text = match arg {
        LogArg::Text(text) => text.clone(),
        LogArg::Error(record) => format_error(record, project_root, full_stack),
        LogArg::Value(value) => {
            if value.get("stack").map(Value::is_string).unwrap_or(false) {
                format_error(&ErrorRecord::from_value(value.clone()), project_root, full_stack)
            } else {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    };
    flatten(&text)
}

/// strip carriage returns and keep newlines on one logical output line
fn flatten(text: &str) -> String {
    text.replace('\r', "").replace('\n', "\r\x0b")
}

/// printf-style pass: the first argument is the template; `%s`, `%d` and `%j`
/// substitute following arguments, `%%` escapes, extras are appended
/// space-separated and unmatched directives render literally
pub fn interpolate(args: &[String]) -> String {
    let Some((template, rest)) = args.split_first() else {
        return String::new();
    };

    let mut out = String::with_capacity(template.len());
    let mut values = rest.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(&directive) if matches!(directive, 's' | 'd' | 'j') => {
                chars.next();
                match values.next() {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('%');
                        out.push(directive);
                    }
                }
            }
            _ => out.push('%'),
        }
    }

    for leftover in values {
        out.push(' ');
        out.push_str(leftover);
    }
    out
}
