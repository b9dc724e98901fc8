use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};

const FILE_TOKEN: &[FormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");
const DISPLAY: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Local wall-clock time. Falls back to UTC when the offset can't be read,
/// which happens on some platforms once the runtime has spawned threads.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// `YYYYMMDD_HHMMSS`, safe to embed in a file name.
pub fn file_token(at: OffsetDateTime) -> anyhow::Result<String> {
    Ok(at.format(FILE_TOKEN)?)
}

/// `YYYY-MM-DD HH:MM:SS`, the form stored in the log.
pub fn display(at: OffsetDateTime) -> anyhow::Result<String> {
    Ok(at.format(DISPLAY)?)
}
