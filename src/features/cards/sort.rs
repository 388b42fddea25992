// カードの並べ替え・検索

use super::models::Card;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// カード一覧の並べ替え方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    /// 名前（A→Z）
    NameAsc,
    /// 名前（Z→A）
    NameDesc,
    /// 新しい順
    Newest,
    /// 古い順
    Oldest,
}

impl SortOption {
    /// すべての並べ替え方法
    pub const ALL: [SortOption; 4] = [
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::Newest,
        SortOption::Oldest,
    ];

    /// 表示名を取得する
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "Name (A to Z)",
            SortOption::NameDesc => "Name (Z to A)",
            SortOption::Newest => "Newest First",
            SortOption::Oldest => "Oldest First",
        }
    }

    /// カードを並べ替える（安定ソート）
    pub fn sort(&self, cards: &mut [Card]) {
        match self {
            SortOption::NameAsc => cards.sort_by(|a, b| compare_names(&a.name, &b.name)),
            SortOption::NameDesc => cards.sort_by(|a, b| compare_names(&b.name, &a.name)),
            SortOption::Newest => cards.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOption::Oldest => cards.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
    }
}

/// 大文字・小文字を区別しない名前比較
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// 名前またはカード番号に検索文字列を含むかどうか（大文字・小文字を区別しない）
pub fn matches_query(card: &Card, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    card.name.to_lowercase().contains(&query) || card.card_number.to_lowercase().contains(&query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::utils;

    fn card_at(name: &str, millis: i64) -> Card {
        let mut card = Card::new(name, "0000", "#000000");
        card.created_at = utils::from_millis(millis);
        card
    }

    fn names(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|card| card.name.as_str()).collect()
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let mut cards = vec![card_at("coop", 1), card_at("Altea", 2), card_at("GameStop", 3)];

        SortOption::NameAsc.sort(&mut cards);
        assert_eq!(names(&cards), vec!["Altea", "coop", "GameStop"]);

        SortOption::NameDesc.sort(&mut cards);
        assert_eq!(names(&cards), vec!["GameStop", "coop", "Altea"]);
    }

    #[test]
    fn test_sort_by_creation_date() {
        let mut cards = vec![card_at("b", 2_000), card_at("a", 1_000), card_at("c", 3_000)];

        SortOption::Newest.sort(&mut cards);
        assert_eq!(names(&cards), vec!["c", "b", "a"]);

        SortOption::Oldest.sort(&mut cards);
        assert_eq!(names(&cards), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_option_serialization() {
        let json = serde_json::to_string(&SortOption::NameAsc).unwrap();
        assert_eq!(json, "\"nameAsc\"");
        let option: SortOption = serde_json::from_str("\"oldest\"").unwrap();
        assert_eq!(option, SortOption::Oldest);
        assert_eq!(SortOption::ALL.len(), 4);
        assert_eq!(SortOption::Newest.label(), "Newest First");
    }

    #[test]
    fn test_matches_query() {
        let card = Card::new("Costco Wholesale", "111 849 441 757", "#0088AA");

        assert!(matches_query(&card, ""));
        assert!(matches_query(&card, "costco"));
        assert!(matches_query(&card, "WHOLE"));
        assert!(matches_query(&card, "849 441"));
        assert!(!matches_query(&card, "walmart"));
    }
}
