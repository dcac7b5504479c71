use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref FRAME_RE: Regex = Regex::new(r"^\s+at\s").unwrap();
    static ref PAREN_RE: Regex = Regex::new(r"\((.+)\)").unwrap();
    static ref TAIL_RE: Regex = Regex::new(r"at\s(.+)").unwrap();
    static ref FUNC_RE: Regex = Regex::new(r"\s+at\s(.+)\s\(").unwrap();
    static ref LINE_RE: Regex = Regex::new(r":(\d+):").unwrap();
    static ref FILE_RE: Regex = Regex::new(r"^(.+?):").unwrap();
}

/// dependency locations that never count as project code
const DEP_MARKERS: &[&str] = &["cargo/registry", "/rustc/"];

/// directory holding this crate's own sources, as it appears in the path
/// strings of captured frames (relative in-tree, absolute when the crate is
/// consumed from the registry)
fn own_src_dir() -> &'static str {
    Path::new(file!())
        .parent()
        .and_then(|p| p.to_str())
        .unwrap_or("src")
}

/// parsed representation of one stack-trace entry
///
/// Built from lines of the form `at func (file:line:col)` or
/// `at file:line:col`. Lines not matching the frame pattern are rejected by
/// [`StackFrame::parse`]; immutable once constructed.
#[derive(Debug, Clone)]
pub struct StackFrame {
    raw: String,
    project_root: String,
    func: Option<String>,
    file: String,
    line: Option<String>,
}

impl StackFrame {
    /// whether a raw trace line looks like a frame at all
    pub fn is_frame_line(line: &str) -> bool {
        FRAME_RE.is_match(line)
    }

    /// parse one raw trace line; `None` when the line is not a frame
    pub fn parse(raw: &str, project_root: &str) -> Option<Self> {
        if !Self::is_frame_line(raw) {
            return None;
        }

        // location is the parenthesized group when the call carries a
        // function name, else everything after "at "
        let location = PAREN_RE
            .captures(raw)
            .or_else(|| TAIL_RE.captures(raw))
            .map(|caps| caps[1].to_string())?;

        let func = FUNC_RE.captures(raw).map(|caps| caps[1].to_string());
        let line = LINE_RE.captures(&location).map(|caps| caps[1].to_string());
        let file = match FILE_RE.captures(&location) {
            Some(caps) => normalize(&caps[1]),
            None => normalize(&location),
        };

        Some(Self {
            raw: raw.to_string(),
            project_root: normalize(project_root),
            func,
            file,
            line,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn func(&self) -> Option<&str> {
        self.func.as_deref()
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> Option<&str> {
        self.line.as_deref()
    }

    /// file path with the project root (and any leading separator) stripped
    pub fn short_file(&self) -> String {
        let stripped = self
            .file
            .strip_prefix(&self.project_root)
            .unwrap_or(&self.file);
        let stripped = stripped.strip_prefix('/').unwrap_or(stripped);
        let stripped = stripped.strip_prefix("./").unwrap_or(stripped);
        stripped.to_string()
    }

    /// absolute file path; relative frames are anchored at the project root
    pub fn full_file(&self) -> String {
        if self.file.starts_with(&self.project_root) && !self.project_root.is_empty() {
            self.file.clone()
        } else if is_relative(&self.file) {
            format!(
                "{}/{}",
                self.project_root.trim_end_matches('/'),
                self.short_file()
            )
        } else {
            self.file.clone()
        }
    }

    /// project-relative rendering of the frame
    pub fn short(&self) -> String {
        self.render(&self.short_file())
    }

    /// absolute-path rendering of the frame
    pub fn full(&self) -> String {
        self.render(&self.full_file())
    }

    fn render(&self, file: &str) -> String {
        let line = match &self.line {
            Some(l) => format!(":{l}"),
            None => String::new(),
        };
        match &self.func {
            Some(func) => format!("    at {func} ({file}{line})"),
            None => format!("    at {file}{line}"),
        }
    }

    /// whether this frame belongs to the consuming project, as opposed to a
    /// dependency, the toolchain, or this crate's own internals
    pub fn is_part_of_project(&self) -> bool {
        !self.is_dependency()
            && (self.file.contains(&self.project_root) || is_relative(&self.file))
    }

    fn is_dependency(&self) -> bool {
        DEP_MARKERS.iter().any(|m| self.file.contains(m)) || self.is_own_source()
    }

    // frames from this crate's own files must never win caller resolution:
    // the interesting frame is the one that called into the logger
    fn is_own_source(&self) -> bool {
        let own = own_src_dir();
        // workspace-local frames render with a "./" prefix
        let file = self.file.strip_prefix("./").unwrap_or(&self.file);
        file.starts_with(own) && file[own.len()..].starts_with('/')
    }
}

fn is_relative(file: &str) -> bool {
    !file.starts_with('/')
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/home/app";

    #[test]
    fn test_rejects_non_frame_lines() {
        assert!(StackFrame::parse("Error: boom", ROOT).is_none());
        assert!(StackFrame::parse("   0: app::main", ROOT).is_none());
        assert!(StackFrame::parse("", ROOT).is_none());
    }

    #[test]
    fn test_parses_parenthesized_frame() {
        let frame =
            StackFrame::parse("    at app::run (/home/app/src/run.rs:42:9)", ROOT).unwrap();
        assert_eq!(frame.func(), Some("app::run"));
        assert_eq!(frame.file(), "/home/app/src/run.rs");
        assert_eq!(frame.line(), Some("42"));
    }

    #[test]
    fn test_parses_bare_frame() {
        let frame = StackFrame::parse("    at /home/app/src/run.rs:7:1", ROOT).unwrap();
        assert_eq!(frame.func(), None);
        assert_eq!(frame.file(), "/home/app/src/run.rs");
        assert_eq!(frame.line(), Some("7"));
    }

    #[test]
    fn test_frame_without_line_number() {
        let frame = StackFrame::parse("    at native code", ROOT).unwrap();
        assert_eq!(frame.line(), None);
        assert_eq!(frame.file(), "native code");
    }

    #[test]
    fn test_round_trip_full_rendering() {
        let raw = "    at app::run (/home/app/src/run.rs:42:9)";
        let frame = StackFrame::parse(raw, ROOT).unwrap();
        let full = frame.full();
        assert!(full.contains("app::run"));
        assert!(full.contains("/home/app/src/run.rs"));
        assert!(full.contains(":42"));
    }

    #[test]
    fn test_short_strips_project_root() {
        let frame =
            StackFrame::parse("    at app::run (/home/app/src/run.rs:42:9)", ROOT).unwrap();
        assert_eq!(frame.short_file(), "src/run.rs");
        assert_eq!(frame.short(), "    at app::run (src/run.rs:42)");
    }

    #[test]
    fn test_relative_frame_anchors_at_root() {
        let frame = StackFrame::parse("    at ./tests/e2e.rs:10:5", ROOT).unwrap();
        assert_eq!(frame.short_file(), "tests/e2e.rs");
        assert_eq!(frame.full_file(), "/home/app/tests/e2e.rs");
    }

    #[test]
    fn test_membership() {
        let project =
            StackFrame::parse("    at app::run (/home/app/src/run.rs:42:9)", ROOT).unwrap();
        assert!(project.is_part_of_project());

        let registry = StackFrame::parse(
            "    at serde::de (/home/u/.cargo/registry/src/x/serde-1.0.0/src/de.rs:1:1)",
            ROOT,
        )
        .unwrap();
        assert!(!registry.is_part_of_project());

        let toolchain =
            StackFrame::parse("    at /rustc/abc123/library/std/src/rt.rs:1:1", ROOT).unwrap();
        assert!(!toolchain.is_part_of_project());

        let elsewhere =
            StackFrame::parse("    at /opt/other/src/lib.rs:1:1", ROOT).unwrap();
        assert!(!elsewhere.is_part_of_project());
    }

    #[test]
    fn test_own_sources_are_excluded() {
        let own = StackFrame::parse("    at bellman::logger::log (src/logger.rs:10:5)", ROOT)
            .unwrap();
        assert!(!own.is_part_of_project());

        // live backtraces render workspace-local frames with a "./" prefix
        let dotted =
            StackFrame::parse("    at bellman::caller::capture (./src/caller.rs:17:5)", ROOT)
                .unwrap();
        assert!(!dotted.is_part_of_project());

        // a consumer's src directory is not ours when paths are absolute
        let consumer =
            StackFrame::parse("    at app::main (/home/app/src/main.rs:3:1)", ROOT).unwrap();
        assert!(consumer.is_part_of_project());

        // other "./" project files stay project-owned
        let test_file = StackFrame::parse("    at e2e::case (./tests/e2e.rs:118:5)", ROOT)
            .unwrap();
        assert!(test_file.is_part_of_project());
    }

    #[test]
    fn test_backslash_paths_are_normalized() {
        let frame =
            StackFrame::parse(r"    at app::run (C\home\app\src\run.rs:42:9)", "C\\home\\app")
                .unwrap();
        assert_eq!(frame.short_file(), "src/run.rs");
    }
}
