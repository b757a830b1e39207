//! Ledger timestamp type.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidArgumentError};

/// A UTC instant at millisecond precision.
///
/// Sub-millisecond components are truncated at construction, so the textual
/// form is always `YYYY-MM-DDTHH:MM:SS.mmmZ` and parsing it back yields an
/// equal value.
///
/// # Example
///
/// ```
/// use ehr_core::Timestamp;
///
/// let ts = Timestamp::from_unix_millis(1_700_000_000_123).unwrap();
/// assert_eq!(ts.to_string(), "2023-11-14T22:13:20.123Z");
/// assert_eq!(ts.to_string().parse::<Timestamp>().unwrap(), ts);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Build a timestamp from a chrono instant, truncating to milliseconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(3))
    }

    /// Build a timestamp from milliseconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside chrono's representable range.
    pub fn from_unix_millis(millis: i64) -> Result<Self, Error> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| {
                InvalidArgumentError::Timestamp {
                    value: millis.to_string(),
                    reason: "out of range".to_string(),
                }
                .into()
            })
    }

    /// Parse an RFC 3339 timestamp in any offset.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| InvalidArgumentError::Timestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_datetime(dt.with_timezone(&Utc)))
    }

    /// Milliseconds since the Unix epoch.
    pub fn unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the underlying chrono instant.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(serde::de::Error::custom)
    }
}
