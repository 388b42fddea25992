// 領収書機能のデータモデル

use crate::shared::utils::{self, reference_date};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 買い物の領収書データモデル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: Uuid,
    pub name: String,              // 店舗名
    #[serde(with = "reference_date")]
    pub date: DateTime<Utc>,       // 取引日（ユーザーが変更可能）
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub images: Vec<String>,       // 写真ファイルのパス
}

impl Receipt {
    /// 新しい領収書を作成する（日付は現在時刻）
    pub fn new(name: impl Into<String>) -> Self {
        Self::dated(name, utils::now())
    }

    /// 日付を指定して領収書を作成する
    pub fn dated(name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date,
            note: String::new(),
            images: Vec::new(),
        }
    }

    /// メモを設定する
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// 領収書が空のときに表示するサンプルデータ
pub fn sample_receipts() -> Vec<Receipt> {
    let now = utils::now();
    vec![
        Receipt::dated("Walmart", now - Duration::days(2)).with_note("Weekly grocery shopping"),
        Receipt::dated("Starbucks", now - Duration::days(1)).with_note("Coffee with friends"),
        Receipt::dated("Target", now).with_note("Home supplies"),
        Receipt::dated("Apple Store", now - Duration::days(5)).with_note("Phone case and charger"),
        Receipt::dated("McDonald's", now - Duration::days(3)).with_note("Lunch"),
    ]
}
