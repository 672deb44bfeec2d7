//! ISO-8601 タイムスタンプ（UTC・ミリ秒精度・`Z` サフィックス）の変換
//!
//! `2025-01-02T03:04:05.678Z` 形式で保存・送信する。

use crate::errors::DomainError;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// 現在時刻をミリ秒精度に丸めて取得
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// ISO-8601 文字列へ変換
pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// ISO-8601 文字列から復元
pub fn parse(value: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::InvalidTimestamp(format!("{value}: {e}")))
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_uses_millis_and_z_suffix() {
        let value = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(678);

        assert_eq!(format(&value), "2025-01-02T03:04:05.678Z");
    }

    #[test]
    fn test_parse_accepts_offsets() {
        let parsed = parse("2025-01-02T12:04:05.678+09:00").unwrap();
        assert_eq!(format(&parsed), "2025-01-02T03:04:05.678Z");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse("yesterday"),
            Err(DomainError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_now_is_truncated_to_millis() {
        let value = now();
        assert_eq!(value.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
