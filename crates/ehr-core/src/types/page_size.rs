//! Page size type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::{Error, InvalidArgumentError};

/// Maximum number of records a single paged scan may return.
///
/// Always positive. Textual input (from a command line or a transaction
/// argument) is parsed with [`FromStr`], which rejects non-numeric and
/// non-positive values.
///
/// # Example
///
/// ```
/// use ehr_core::PageSize;
///
/// let size: PageSize = "10".parse().unwrap();
/// assert_eq!(size.get(), 10);
/// assert!("0".parse::<PageSize>().is_err());
/// assert!("ten".parse::<PageSize>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageSize(NonZeroU32);

impl PageSize {
    /// Create a page size from an integer.
    pub fn new(size: u32) -> Result<Self, Error> {
        NonZeroU32::new(size).map(Self).ok_or_else(|| {
            InvalidArgumentError::PageSize {
                value: size.to_string(),
                reason: "must be a positive integer".to_string(),
            }
            .into()
        })
    }

    /// Returns the page size as an integer.
    pub fn get(&self) -> u32 {
        self.0.get()
    }

    /// Returns the page size as a row count.
    pub fn as_usize(&self) -> usize {
        self.0.get() as usize
    }

    fn invalid(value: &str, reason: &str) -> Error {
        InvalidArgumentError::PageSize {
            value: value.to_string(),
            reason: reason.to_string(),
        }
        .into()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i64 = s
            .trim()
            .parse()
            .map_err(|_| Self::invalid(s, "not a number"))?;

        if n <= 0 {
            return Err(Self::invalid(s, "must be a positive integer"));
        }

        let n = u32::try_from(n).map_err(|_| Self::invalid(s, "too large"))?;
        Self::new(n)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = Error;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.get())
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let n = u32::deserialize(deserializer)?;
        PageSize::new(n).map_err(serde::de::Error::custom)
    }
}
