/// 検索履歴モジュール
///
/// カード検索で使った文字列を新しい順に最大10件保存します。
use crate::shared::errors::AppResult;
use crate::shared::storage::{read_json, write_json, KeyValueStore};
use std::sync::Arc;

/// 検索履歴の保存キー
pub const SEARCH_HISTORY_KEY: &str = "RecentSearches";
/// 保存する最大件数
pub const MAX_HISTORY_ITEMS: usize = 10;

/// 最近の検索文字列
pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
    searches: Vec<String>,
}

impl SearchHistory {
    /// 保存済みの履歴を読み込む（読めない場合は空）
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let searches = match read_json::<Vec<String>>(store.as_ref(), SEARCH_HISTORY_KEY) {
            Ok(searches) => searches.unwrap_or_default(),
            Err(e) => {
                log::warn!("検索履歴の読み込みに失敗しました: {e}");
                Vec::new()
            }
        };
        Self { store, searches }
    }

    /// 新しい順の検索履歴
    pub fn recent_searches(&self) -> &[String] {
        &self.searches
    }

    /// 検索文字列を先頭に追加する
    ///
    /// 同じ文字列は先頭に移動し、空の文字列は記録しない。
    pub fn add_search(&mut self, text: &str) -> AppResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        self.searches.retain(|existing| existing != text);
        self.searches.insert(0, text.to_string());
        self.searches.truncate(MAX_HISTORY_ITEMS);
        self.save()
    }

    /// 履歴をすべて削除する
    pub fn clear(&mut self) -> AppResult<()> {
        self.searches.clear();
        self.save()
    }

    fn save(&self) -> AppResult<()> {
        write_json(self.store.as_ref(), SEARCH_HISTORY_KEY, &self.searches)
    }
}
