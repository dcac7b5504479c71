//! Color-path resolution. A dotted path like `yellow.bold` is resolved once,
//! at configuration time, into an explicit string transform; anything the
//! table does not know degrades to the identity transform.

use crossterm::style::{Attribute, Color, Stylize, style};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ANSI_SGR_RE: Regex = Regex::new("\x1b\\[[0-9;]*m").unwrap();
}

// chalk's basic palette; gray maps to the bright-black ANSI slot
const COLORS: &[(&str, Color)] = &[
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("white", Color::White),
    ("gray", Color::DarkGrey),
    ("grey", Color::DarkGrey),
];

const MODIFIERS: &[(&str, Attribute)] = &[
    ("bold", Attribute::Bold),
    ("dim", Attribute::Dim),
    ("italic", Attribute::Italic),
    ("underline", Attribute::Underlined),
];

/// a resolved color path: either the identity transform or a styled one
#[derive(Debug, Clone, PartialEq)]
pub enum Dyer {
    Plain,
    Styled {
        color: Option<Color>,
        attrs: Vec<Attribute>,
    },
}

impl Dyer {
    /// resolve a dotted color path; any unrecognized segment (or a disabled
    /// colorize flag upstream) yields [`Dyer::Plain`]
    pub fn resolve(path: &str) -> Self {
        let mut color = None;
        let mut attrs = Vec::new();

        for segment in path.split('.') {
            if let Some((_, c)) = COLORS.iter().find(|(name, _)| *name == segment) {
                color = Some(*c);
            } else if let Some((_, a)) = MODIFIERS.iter().find(|(name, _)| *name == segment) {
                attrs.push(*a);
            } else {
                return Self::Plain;
            }
        }

        if color.is_none() && attrs.is_empty() {
            return Self::Plain;
        }
        Self::Styled { color, attrs }
    }

    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Plain => text.to_string(),
            Self::Styled { color, attrs } => {
                let mut styled = style(text);
                if let Some(color) = color {
                    styled = styled.with(*color);
                }
                for attr in attrs {
                    styled = styled.attribute(*attr);
                }
                styled.to_string()
            }
        }
    }
}

/// strip ANSI SGR sequences, leaving the plain text
pub fn uncolor(text: &str) -> String {
    ANSI_SGR_RE.replace_all(text, "").into_owned()
}
