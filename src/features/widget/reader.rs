// ウィジェット側からの共有ストア読み取り

use super::models::{CardSummary, RecentCard, SharedStoreKeys};
use crate::shared::storage::{read_json, KeyValueStore};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

/// ウィジェット（外部プロセス）が共有ストアを読むためのリーダー
///
/// 読み取りに失敗した値は空として扱う。
#[derive(Clone)]
pub struct WidgetReader {
    store: Arc<dyn KeyValueStore>,
}

impl WidgetReader {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// カードIDの並び順を取得する
    pub fn card_ids(&self) -> Vec<String> {
        self.read_or_default(SharedStoreKeys::CARD_IDS)
    }

    /// IDとカード概要の対応表を取得する
    pub fn card_data(&self) -> HashMap<String, CardSummary> {
        self.read_or_default(SharedStoreKeys::CARD_DATA)
    }

    /// 表示順に並んだ (ID, 概要) の一覧を取得する（対応表にないIDは飛ばす）
    pub fn card_summaries(&self) -> Vec<(String, CardSummary)> {
        let mut data = self.card_data();
        self.card_ids()
            .into_iter()
            .filter_map(|id| data.remove(&id).map(|summary| (id, summary)))
            .collect()
    }

    /// 最近使ったカードを取得する
    pub fn recent_cards(&self) -> Vec<RecentCard> {
        self.read_or_default(SharedStoreKeys::RECENT_CARDS)
    }

    /// アプリで選択されたカードIDを取得する
    pub fn selected_card_id(&self) -> Option<String> {
        self.read_or_default::<Option<String>>(SharedStoreKeys::SELECTED_CARD_ID)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match read_json::<T>(self.store.as_ref(), key) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                log::warn!("共有ストアの読み取りに失敗しました: key={key}, {e}");
                T::default()
            }
        }
    }
}
