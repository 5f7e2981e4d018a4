//! Export file naming.

use chrono::{DateTime, Local, TimeZone};

/// File name prefix for exported drawings.
pub const EXPORT_PREFIX: &str = "drawing";

/// `<prefix>_YYYY-MM-DD_HH-MM-SS.<extension>`, safe on every filesystem.
pub fn timestamped_file_name<Tz: TimeZone>(
    prefix: &str,
    extension: &str,
    when: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.{}", prefix, when.format("%Y-%m-%d_%H-%M-%S"), extension)
}

/// Name for a session JSON export made now.
pub fn json_export_name() -> String {
    timestamped_file_name(EXPORT_PREFIX, "json", &Local::now())
}

/// Name for a PNG snapshot made now.
pub fn png_export_name() -> String {
    timestamped_file_name(EXPORT_PREFIX, "png", &Local::now())
}
