// ウィジェット共有領域のデータモデル

use crate::features::cards::Card;
use serde::{Deserialize, Serialize};

/// 共有ストアのキー定義
pub struct SharedStoreKeys;

impl SharedStoreKeys {
    /// カードIDの並び順
    pub const CARD_IDS: &'static str = "widgetCardIds";
    /// カードID → {name, backgroundColor} の対応表
    pub const CARD_DATA: &'static str = "widgetCardData";
    /// 最近使ったカード
    pub const RECENT_CARDS: &'static str = "recentCards";
    /// ウィジェットに表示するよう選択されたカードID
    pub const SELECTED_CARD_ID: &'static str = "selectedCardId";
}

/// 最近使ったカードの最大件数
pub const MAX_RECENT_CARDS: usize = 6;

/// ウィジェットに公開するカードの最小情報（メモ・写真・カード番号は含めない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub name: String,
    pub background_color: String,
}

impl From<&Card> for CardSummary {
    fn from(card: &Card) -> Self {
        Self {
            name: card.name.clone(),
            background_color: card.background_color.clone(),
        }
    }
}

/// 最近使ったカードの1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCard {
    pub id: String,
    pub name: String,
    pub background_color: String,
}

impl From<&Card> for RecentCard {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id.to_string(),
            name: card.name.clone(),
            background_color: card.background_color.clone(),
        }
    }
}

/// 最近使ったカードのリストに追加する
///
/// 同じIDの既存エントリを取り除いてから先頭に挿入し、上限で切り詰める。
pub fn push_recent(recent: &mut Vec<RecentCard>, entry: RecentCard) {
    recent.retain(|existing| existing.id != entry.id);
    recent.insert(0, entry);
    recent.truncate(MAX_RECENT_CARDS);
}

/// 実データがないときのウィジェットのプレビュー表示用カード
pub fn placeholder_recent_cards() -> Vec<RecentCard> {
    [
        ("1", "Starbucks", "#00704A"),
        ("2", "Costco", "#005DAA"),
        ("3", "Target", "#CC0000"),
        ("4", "Walmart", "#004C91"),
        ("5", "CVS", "#CC0000"),
        ("6", "Walgreens", "#FF0000"),
    ]
    .into_iter()
    .map(|(id, name, color)| RecentCard {
        id: id.to_string(),
        name: name.to_string(),
        background_color: color.to_string(),
    })
    .collect()
}
