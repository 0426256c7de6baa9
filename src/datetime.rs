//! Date/time utilities for Filebay.

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

/// Convert a filesystem timestamp to UTC.
pub fn from_system_time(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

/// Format a UTC datetime as RFC3339 with millisecond precision and a `Z` suffix.
///
/// This is the format browsers produce for `Date.prototype.toJSON`.
pub fn to_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde helper for `#[serde(serialize_with = ...)]` fields.
pub mod rfc3339_millis {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_rfc3339(dt))
    }
}
