//! Console logging for the driftfield binaries.
//!
//! The library only emits records through the `log` facade. Binaries call
//! [`setup`] once to install a `flexi_logger` backend.

use flexi_logger::{DeferredNow, FlexiLoggerError, Logger, LoggerHandle, Record};

/// Install console logging. Honors `RUST_LOG`, defaulting to `info`.
///
/// Keep the returned handle alive for as long as logging is needed.
pub fn setup() -> Result<LoggerHandle, FlexiLoggerError> {
    let handle = Logger::try_with_env_or_str("info")?
        .format(compact_format)
        .start()?;

    log::debug!("Adjust the log level by setting RUST_LOG. By default RUST_LOG=info");

    Ok(handle)
}

/// `LEVEL [HH:MM:SS.mmm] [file:line] message`
pub fn compact_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} [{}] [{}:{}] {}",
        record.level(),
        now.format("%H:%M:%S%.3f"),
        record.file().unwrap_or("<unnamed>"),
        record.line().unwrap_or(0),
        record.args()
    )
}
