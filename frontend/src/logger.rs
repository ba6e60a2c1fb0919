//! `log` backend writing to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};

const PREFIX: &str = "[TranscriptNav]";

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error => zoon::eprintln!("{PREFIX} {}", record.args()),
            Level::Warn => {
                web_sys::console::warn_1(&format!("{PREFIX} {}", record.args()).into());
            }
            _ => zoon::println!("{PREFIX} {}", record.args()),
        }
    }

    fn flush(&self) {}
}

pub fn init() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
