use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Metadata, Record};
use std::env;

static LOGGER: Logger = Logger;

pub struct Logger;

/// Installs the logger. Level comes from `UNICONVERT_LOG`, default info.
pub fn init() {
    let level = env::var("UNICONVERT_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        match record.level() {
            Level::Info => println!("{}", record.args()),
            Level::Warn | Level::Error => {
                eprintln!("{} {}", label(record.level()), record.args());
            }
            Level::Debug | Level::Trace => {
                let location = match (record.file(), record.line()) {
                    (Some(file), Some(line)) => format!("[{}:{}]", file, line).dimmed(),
                    _ => "[unk]".dimmed(),
                };

                println!("{} {} {}", label(record.level()), location, record.args());
            }
        }
    }

    fn flush(&self) {}
}

fn label(level: Level) -> ColoredString {
    match level {
        Level::Debug => "[DEBUG]".bold().blue(),
        Level::Error => "[ERROR]".bold().red(),
        Level::Info => "[INFO]".bold().green(),
        Level::Trace => "[TRACE]".bold().purple(),
        Level::Warn => "[WARN]".bold().yellow(),
    }
}
