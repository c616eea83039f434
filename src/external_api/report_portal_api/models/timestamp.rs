use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Textual layout accepted besides epoch milliseconds: `2006-01-02T15:04:05.999-0700`
const DATE_TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Timestamp format error: {0:?} is neither epoch milliseconds nor YYYY-MM-DDTHH:mm:ss.fff±HHMM")]
pub struct TimestampFormatError(pub String);

/// Instant on the wire.
///
/// Decodes from epoch milliseconds (JSON number or numeric string) or from the
/// fixed textual layout, always encodes as epoch milliseconds.
/// Precision below one millisecond is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Decode raw wire text, already stripped of surrounding quotes
    pub fn decode(raw: &str) -> Result<Self, TimestampFormatError> {
        let trimmed = raw.trim();
        if let Ok(millis) = trimmed.parse::<i64>() {
            return Self::from_millis(millis).ok_or_else(|| TimestampFormatError(raw.to_string()));
        }
        DateTime::parse_from_str(trimmed, DATE_TIME_LAYOUT)
            .map(|value| Self::from(value.with_timezone(&Utc)))
            .map_err(|_| TimestampFormatError(raw.to_string()))
    }

    pub fn encode(&self) -> String {
        self.millis().to_string()
    }

    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        // duration_trunc only fails for instants outside the i64 nanosecond range
        let truncated = value
            .duration_trunc(TimeDelta::milliseconds(1))
            .unwrap_or_else(|_| {
                DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or(value)
            });
        Self(truncated)
    }
}

impl FromStr for Timestamp {
    type Err = TimestampFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.millis())
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("epoch milliseconds or a YYYY-MM-DDTHH:mm:ss.fff±HHMM string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Timestamp::from_millis(value)
            .ok_or_else(|| E::custom(TimestampFormatError(value.to_string())))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        i64::try_from(value)
            .ok()
            .and_then(Timestamp::from_millis)
            .ok_or_else(|| E::custom(TimestampFormatError(value.to_string())))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse::<Timestamp>().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("0", 0)]
    #[case("1514764800000", 1_514_764_800_000)]
    #[case(" 1514764800123 ", 1_514_764_800_123)]
    #[case("-1500", -1_500)]
    fn test_decode_epoch_millis(#[case] raw: &str, #[case] millis: i64) {
        let timestamp = Timestamp::decode(raw).unwrap();
        let expected = Utc.timestamp_millis_opt(millis).unwrap();
        assert_eq!(timestamp.as_datetime(), expected);
        assert_eq!(timestamp.encode(), millis.to_string());
    }

    #[rstest]
    #[case("2018-01-01T03:00:00.123+0300", 1_514_764_800_123)]
    #[case("2018-01-01T00:00:00.5+0000", 1_514_764_800_500)]
    #[case("2017-12-31T17:00:00-0700", 1_514_764_800_000)]
    fn test_decode_layout(#[case] raw: &str, #[case] millis: i64) {
        let timestamp = Timestamp::decode(raw).unwrap();
        assert_eq!(timestamp.millis(), millis);
        assert_eq!(timestamp.encode(), millis.to_string(), "Ожидали epoch millis после нормализации");
    }

    #[rstest]
    #[case("not-a-timestamp")]
    #[case("")]
    #[case("2018-01-01 03:00:00")]
    #[case("12.5")]
    fn test_decode_invalid(#[case] raw: &str) {
        let err = Timestamp::decode(raw).unwrap_err();
        assert_eq!(err, TimestampFormatError(raw.to_string()));
    }

    #[test]
    fn test_encode_truncates_sub_millis() {
        let instant = Utc.timestamp_opt(1_514_764_800, 123_987_654).unwrap();
        let timestamp = Timestamp::from(instant);
        assert_eq!(timestamp.encode(), "1514764800123");
        assert_eq!(Timestamp::decode(&timestamp.encode()).unwrap(), timestamp);
    }

    #[test]
    fn test_encode_before_epoch_floors() {
        let instant = Utc.timestamp_opt(-1, 500_000_000).unwrap();
        assert_eq!(Timestamp::from(instant).encode(), "-500");
    }

    #[rstest]
    #[case("1514764800000")]
    #[case("\"1514764800000\"")]
    #[case("\"2018-01-01T03:00:00.000+0300\"")]
    fn test_deserialize_json(#[case] json: &str) {
        let timestamp: Timestamp = serde_json::from_str(json).unwrap();
        assert_eq!(timestamp.millis(), 1_514_764_800_000);
    }

    #[test]
    fn test_deserialize_invalid_json() {
        let err = serde_json::from_str::<Timestamp>("\"yesterday\"").unwrap_err();
        assert!(err.to_string().starts_with("Timestamp format error"));
    }

    #[test]
    fn test_serialize_as_number() {
        let timestamp = Timestamp::from_millis(1_514_764_800_123).unwrap();
        assert_eq!(serde_json::to_string(&timestamp).unwrap(), "1514764800123");
    }
}
