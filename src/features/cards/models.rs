// カード機能のデータモデル

use super::color::Rgba;
use crate::shared::utils::{self, reference_date};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 会員カード・ポイントカードのデータモデル
///
/// 保存形式は既存データと互換のキャメルケースJSON。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub name: String,
    pub card_number: String,           // バーコードとして表示する文字列
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_name: Option<String>,     // 同梱ロゴ画像の名前
    pub background_color: String,      // "#RRGGBB" または "#AARRGGBB"
    pub short_name: String,            // ロゴがない場合に表示する1文字
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub photos: Vec<CardPhoto>,
    #[serde(with = "reference_date")]
    pub created_at: DateTime<Utc>,
}

/// カードに添付された写真（ファイルパス参照）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPhoto {
    pub id: Uuid,
    pub image_path: String,
    #[serde(with = "reference_date")]
    pub created_at: DateTime<Utc>,
}

impl CardPhoto {
    /// 新しい写真参照を作成する
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_path: image_path.into(),
            created_at: utils::now(),
        }
    }
}

impl Card {
    /// 新しいカードを作成する
    ///
    /// # 引数
    /// * `name` - 店舗・発行元の表示名
    /// * `card_number` - カード番号
    /// * `background_color` - 背景色（16進文字列）
    ///
    /// # 戻り値
    /// IDと作成日時が割り当てられ、略称が名前から導出されたカード
    pub fn new(
        name: impl Into<String>,
        card_number: impl Into<String>,
        background_color: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let short_name = Self::derive_short_name(&name);
        Self {
            id: Uuid::new_v4(),
            name,
            card_number: card_number.into(),
            logo_name: None,
            background_color: background_color.into(),
            short_name,
            note: String::new(),
            photos: Vec::new(),
            created_at: utils::now(),
        }
    }

    /// ロゴ名を設定する
    pub fn with_logo(mut self, logo_name: impl Into<String>) -> Self {
        self.logo_name = Some(logo_name.into());
        self
    }

    /// メモを設定する
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// 名前の先頭1文字を大文字にした略称を導出する（空の名前は空文字列）
    pub fn derive_short_name(name: &str) -> String {
        name.chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    /// 名前を変更し、略称も導出し直す
    ///
    /// `name` フィールドを直接書き換えた場合、略称は更新されない。
    pub fn rename_with_short_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.short_name = Self::derive_short_name(&self.name);
    }

    /// 背景色を解析する（不正な値は不透明な黒）
    pub fn color(&self) -> Rgba {
        Rgba::parse_or_default(&self.background_color)
    }

    /// 写真を末尾に追加する
    ///
    /// # 戻り値
    /// 追加された写真
    pub fn attach_photo(&mut self, image_path: impl Into<String>) -> CardPhoto {
        let photo = CardPhoto::new(image_path);
        self.photos.push(photo.clone());
        photo
    }

    /// 写真を削除する
    ///
    /// # 戻り値
    /// 削除された写真（存在しない場合はNone）
    pub fn remove_photo(&mut self, photo_id: Uuid) -> Option<CardPhoto> {
        let index = self.photos.iter().position(|photo| photo.id == photo_id)?;
        Some(self.photos.remove(index))
    }
}

/// 初回起動時に表示するサンプルカード
pub fn sample_cards() -> Vec<Card> {
    vec![
        Card::new("altea", "324 359", "#0000FF")
            .with_logo("altea")
            .with_note("会員カード"),
        Card::new("coop", "111222333", "#0000FF").with_logo("coop"),
        Card::new("Costco Wholesale", "111 849 441 757", "#0088AA").with_logo("costco"),
        Card::new("GameStop", "123456789", "#000000").with_logo("gamestop"),
    ]
}
