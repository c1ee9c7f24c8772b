//! FILENAME: server/src/logging.rs
//! Process logger behind the `log` facade.
//!
//! Lines go to stderr with a global sequence number so interleaved
//! request logs can be ordered after the fact.

use std::sync::atomic::{AtomicU64, Ordering};

use log::{LevelFilter, Metadata, Record};

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let seq = LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1;
        eprintln!(
            "[{:06}] [{}] [{}] {}",
            seq,
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Installs the logger. Safe to call more than once; only the first
/// call takes effect.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
