use crate::caller;
use crate::message::{LogArg, format_value, interpolate};
use crate::options::{LoggerConfig, LoggerOptions};
use crate::theme::{Dyer, uncolor};
use chrono::Local;
use std::io::{self, Write};

/// label used when no caller was ever resolved or registered
const UNKNOWN_CALLER: &str = "<unknown>";

/// room reserved past the longest caller label for a `:NNN` line suffix
const LINE_SUFFIX_PAD: usize = 4;

/// payload delivered to [`Logger::on_log`] listeners after every emitted line
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: String,
    /// the positional arguments as they were passed to the log call
    pub args: Vec<LogArg>,
    pub time: String,
    pub caller: String,
    /// assembled message with ANSI codes stripped
    pub message: String,
}

type LogListener = Box<dyn FnMut(&LogEvent) + Send>;

/// console logger: leveled, colorized lines with a resolved caller field
///
/// All operations chain by returning `&mut Self`; none of them can fail,
/// since a logging call must never crash the program it observes.
pub struct Logger {
    opt: LoggerOptions,
    callers: Vec<String>,
    level_dyers: Vec<(String, Dyer)>,
    caller_dyer: Dyer,
    listeners: Vec<LogListener>,
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl Logger {
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_sinks(config, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// construct with explicit output and error sinks
    pub fn with_sinks(
        config: LoggerConfig,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        let opt = LoggerOptions::resolve(config);

        // color paths resolve once, here; unresolvable paths and disabled
        // colorizing both degrade to the identity transform
        let resolve = |path: &str| {
            if opt.colorize {
                Dyer::resolve(path)
            } else {
                Dyer::Plain
            }
        };
        let level_dyers = opt
            .level_map
            .iter()
            .map(|(level, color)| (level.clone(), resolve(color)))
            .collect();
        let caller_dyer = resolve(&opt.caller_color);

        Self {
            opt,
            callers: vec![UNKNOWN_CALLER.to_string()],
            level_dyers,
            caller_dyer,
            listeners: Vec::new(),
            out,
            err,
        }
    }

    pub fn options(&self) -> &LoggerOptions {
        &self.opt
    }

    /// register a synchronous listener for `log` events
    pub fn on_log(&mut self, listener: impl FnMut(&LogEvent) + Send + 'static) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// register the current call site: its relative file label joins the
    /// registered-callers sequence and becomes the fallback caller label
    pub fn reg(&mut self) -> &mut Self {
        let trace = caller::capture();
        self.reg_from_trace(&trace)
    }

    pub(crate) fn reg_from_trace(&mut self, trace: &str) -> &mut Self {
        if let Some(frame) = caller::get_caller(trace, &self.opt.project_root) {
            self.callers.push(frame.short_file());
        }
        self
    }

    pub fn debug(&mut self, args: &[LogArg]) -> &mut Self {
        self.log("debug", args)
    }

    pub fn info(&mut self, args: &[LogArg]) -> &mut Self {
        self.log("info", args)
    }

    pub fn warn(&mut self, args: &[LogArg]) -> &mut Self {
        self.log("warn", args)
    }

    pub fn error(&mut self, args: &[LogArg]) -> &mut Self {
        self.log("error", args)
    }

    /// emit one log line at the given level
    ///
    /// Unrecognized levels coerce to `info`; calls below the configured
    /// minimum are dropped without output or event.
    pub fn log(&mut self, level: &str, args: &[LogArg]) -> &mut Self {
        let trace = caller::capture();
        self.log_with_trace(level, args, &trace)
    }

    pub(crate) fn log_with_trace(
        &mut self,
        level: &str,
        args: &[LogArg],
        trace: &str,
    ) -> &mut Self {
        let level = if self.opt.level_weight(level).is_some() {
            level.to_string()
        } else {
            "info".to_string()
        };

        let weight = self.opt.level_weight(&level);
        let min_weight = self.opt.level_weight(&self.opt.level_min);
        if weight < min_weight {
            return self;
        }

        let str_args: Vec<String> = args
            .iter()
            .map(|arg| format_value(arg, &self.opt.project_root, self.opt.full_stack))
            .collect();
        let message = interpolate(&str_args);

        let caller_pos = caller::get_caller(trace, &self.opt.project_root)
            .map(|frame| match frame.line() {
                Some(line) => format!("{}:{}", frame.short_file(), line),
                None => frame.short_file(),
            })
            .unwrap_or_else(|| {
                self.callers
                    .last()
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_CALLER.to_string())
            });

        let timestamp = Local::now().format(&self.opt.time_tmp).to_string();

        let level_dyer = self
            .level_dyers
            .iter()
            .find(|(name, _)| *name == level)
            .map(|(_, dyer)| dyer.clone())
            .unwrap_or(Dyer::Plain);

        let line = self
            .opt
            .line_tmp
            .replacen(":time", &timestamp, 1)
            .replacen(
                ":level",
                &level_dyer.apply(&pad_end(&level, self.level_pad_size())),
                1,
            )
            .replacen(
                ":caller",
                &self.caller_dyer.apply(&pad_end(&caller_pos, self.caller_pad_size())),
                1,
            )
            .replacen(":message", &message, 1);

        // a logging call must never crash the program: sink errors vanish
        let sink = if level == "error" {
            &mut self.err
        } else {
            &mut self.out
        };
        let _ = writeln!(sink, "{line}");
        let _ = sink.flush();

        let event = LogEvent {
            level,
            args: args.to_vec(),
            time: timestamp,
            caller: caller_pos,
            message: uncolor(&message),
        };
        for listener in &mut self.listeners {
            listener(&event);
        }

        self
    }

    /// registered caller labels, sentinel first
    pub fn callers(&self) -> &[String] {
        &self.callers
    }

    /// pad width of the `:caller` field: longest label plus line-suffix room
    pub fn caller_pad_size(&self) -> usize {
        self.callers
            .iter()
            .map(|label| label.len() + LINE_SUFFIX_PAD)
            .max()
            .unwrap_or(LINE_SUFFIX_PAD)
    }

    /// pad width of the `:level` field: longest configured level name
    pub fn level_pad_size(&self) -> usize {
        self.opt.levels().map(str::len).max().unwrap_or(0)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

fn pad_end(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}
