use chrono::{DateTime, NaiveDate, Utc};

/// 2001-01-01T00:00:00Z のUNIX秒（既存データの日時の基準点）
const REFERENCE_DATE_UNIX_SECONDS: i64 = 978_307_200;

/// 現在時刻をミリ秒精度で取得する
///
/// 保存形式がミリ秒までしか保持しないため、生成時点で丸めておく。
pub fn now() -> DateTime<Utc> {
    from_millis(Utc::now().timestamp_millis())
}

/// UNIXミリ秒から日時を作成する（範囲外はUNIXエポック）
pub fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

/// 日時を基準日からの経過秒に変換する
pub fn to_reference_seconds(date: &DateTime<Utc>) -> f64 {
    let millis = date.timestamp_millis() - REFERENCE_DATE_UNIX_SECONDS * 1000;
    millis as f64 / 1000.0
}

/// 基準日からの経過秒を日時に変換する（ミリ秒に丸める）
pub fn from_reference_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round() as i64 + REFERENCE_DATE_UNIX_SECONDS * 1000;
    DateTime::from_timestamp_millis(millis)
}

/// 日時の日付部分（UTC）を取得する
pub fn day_of(date: &DateTime<Utc>) -> NaiveDate {
    date.date_naive()
}

/// 既存データ互換の日時シリアライズ（基準日からの経過秒、浮動小数点）
pub mod reference_date {
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(super::to_reference_seconds(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = f64::deserialize(deserializer)?;
        super::from_reference_seconds(seconds)
            .ok_or_else(|| D::Error::custom(format!("日時に変換できません: {seconds}")))
    }
}
