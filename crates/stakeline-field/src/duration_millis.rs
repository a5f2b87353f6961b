//! Serde support for [`std::time::Duration`] as fractional milliseconds.
//!
//! `Duration`'s own serde representation is a `{secs, nanos}` struct;
//! milliseconds read better in reports and hand-written configuration.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize a `Duration` as fractional milliseconds (`f64`).
pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    (duration.as_secs_f64() * 1000.0).serialize(serializer)
}

/// Deserialize a `Duration` from fractional milliseconds (`f64`).
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let millis = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(millis / 1000.0)
        .map_err(|_| serde::de::Error::custom("duration must be finite, non-negative milliseconds"))
}
