// 領収書の検索・グループ化

use super::models::Receipt;
use crate::shared::utils;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// 店舗名に検索文字列を含むかどうか（大文字・小文字を区別しない）
pub fn matches_query(receipt: &Receipt, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || receipt.name.to_lowercase().contains(&query)
}

/// 店舗名ごとにグループ化する（キーは名前順、各グループ内は元の順序）
pub fn group_by_store(receipts: &[Receipt]) -> BTreeMap<String, Vec<Receipt>> {
    let mut groups: BTreeMap<String, Vec<Receipt>> = BTreeMap::new();
    for receipt in receipts {
        groups
            .entry(receipt.name.clone())
            .or_default()
            .push(receipt.clone());
    }
    groups
}

/// 取引日（UTC）ごとにグループ化する
///
/// # 戻り値
/// 新しい日付から順に並んだ (日付, 領収書) のリスト
pub fn group_by_day(receipts: &[Receipt]) -> Vec<(NaiveDate, Vec<Receipt>)> {
    let mut groups: BTreeMap<NaiveDate, Vec<Receipt>> = BTreeMap::new();
    for receipt in receipts {
        groups
            .entry(utils::day_of(&receipt.date))
            .or_default()
            .push(receipt.clone());
    }
    groups.into_iter().rev().collect()
}
