use serde::Deserialize;
use std::env;

/// user-supplied configuration; every field is optional and falls back to a
/// built-in default on [`LoggerOptions::resolve`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// chrono strftime pattern for the `:time` field
    pub time_tmp: Option<String>,
    /// line template with `:time :level :caller :message` placeholders
    pub line_tmp: Option<String>,
    pub colorize: Option<bool>,
    /// dotted color path for the `:caller` field
    pub caller_color: Option<String>,
    /// ordered level → color-path pairs; the order defines severity
    pub level_map: Option<Vec<(String, String)>>,
    pub level_min: Option<String>,
    /// render full stack traces; when unset, the `STACK`/`FULLSTACK`
    /// environment variables decide
    pub full_stack: Option<bool>,
    /// root used for caller-membership tests; defaults to the working dir
    pub project_root: Option<String>,
}

/// resolved configuration, immutable for the lifetime of a logger
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub time_tmp: String,
    pub line_tmp: String,
    pub colorize: bool,
    pub caller_color: String,
    pub level_map: Vec<(String, String)>,
    pub level_min: String,
    pub full_stack: bool,
    pub project_root: String,
}

impl LoggerOptions {
    pub fn resolve(config: LoggerConfig) -> Self {
        Self {
            time_tmp: config
                .time_tmp
                .unwrap_or_else(|| "%d/%m %H:%M:%S (%:z)".to_string()),
            line_tmp: config
                .line_tmp
                .unwrap_or_else(|| ":time :level :caller :message".to_string()),
            colorize: config.colorize.unwrap_or(true),
            caller_color: config
                .caller_color
                .unwrap_or_else(|| "gray.bold".to_string()),
            level_map: config.level_map.unwrap_or_else(default_level_map),
            level_min: config.level_min.unwrap_or_else(|| "info".to_string()),
            full_stack: config.full_stack.unwrap_or_else(full_stack_from_env),
            project_root: config.project_root.unwrap_or_else(|| {
                env::current_dir()
                    .map(|dir| dir.to_string_lossy().into_owned())
                    .unwrap_or_else(|_| ".".to_string())
            }),
        }
    }

    pub fn levels(&self) -> impl Iterator<Item = &str> {
        self.level_map.iter().map(|(name, _)| name.as_str())
    }

    /// severity weight of a level = its position in the level sequence
    pub fn level_weight(&self, level: &str) -> Option<usize> {
        self.levels().position(|name| name == level)
    }

    pub fn level_color(&self, level: &str) -> Option<&str> {
        self.level_map
            .iter()
            .find(|(name, _)| name == level)
            .map(|(_, color)| color.as_str())
    }
}

fn default_level_map() -> Vec<(String, String)> {
    [
        ("debug", "blue"),
        ("info", "green"),
        ("warn", "yellow"),
        ("error", "red"),
    ]
    .iter()
    .map(|(level, color)| (level.to_string(), color.to_string()))
    .collect()
}

fn full_stack_from_env() -> bool {
    let has = |name: &str, needle: &str| {
        env::var(name)
            .map(|value| value.to_lowercase().contains(needle))
            .unwrap_or(false)
    };
    has("STACK", "full") || has("FULLSTACK", "true")
}
