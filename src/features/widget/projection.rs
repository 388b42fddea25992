// ウィジェット向け投影の書き込み

use super::models::{push_recent, CardSummary, RecentCard, SharedStoreKeys};
use super::notifier::ChangeNotifier;
use crate::features::cards::Card;
use crate::shared::errors::AppResult;
use crate::shared::storage::{read_json, write_json, KeyValueStore};
use std::collections::HashMap;
use std::sync::Arc;

/// カード一覧の縮約ビューを共有ストアへ公開する
///
/// 共有ストアはアプリ本体のストアとは別の名前空間で、ウィジェットは
/// カードのフルスキーマに依存せずここだけを読む。
#[derive(Clone)]
pub struct WidgetProjector {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl WidgetProjector {
    /// 投影の書き込み先と通知先を指定して作成する
    pub fn new(store: Arc<dyn KeyValueStore>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self { store, notifier }
    }

    /// カード一覧から投影を全面的に作り直し、ウィジェットへ通知する
    ///
    /// 書き込みに失敗してもエラーにはしない（ウィジェットは次回の定期更新で追いつく）。
    ///
    /// # 引数
    /// * `cards` - 現在のカード一覧（表示順）
    pub fn sync(&self, cards: &[Card]) {
        match self.write_projection(cards) {
            Ok(()) => {
                log::debug!("ウィジェット投影を更新しました: {}件", cards.len());
                self.notifier.notify_changed();
            }
            Err(e) => {
                log::warn!("ウィジェット投影の更新に失敗しました: {e}");
            }
        }
    }

    fn write_projection(&self, cards: &[Card]) -> AppResult<()> {
        let ids: Vec<String> = cards.iter().map(|card| card.id.to_string()).collect();
        let data: HashMap<String, CardSummary> = cards
            .iter()
            .map(|card| (card.id.to_string(), CardSummary::from(card)))
            .collect();

        write_json(self.store.as_ref(), SharedStoreKeys::CARD_IDS, &ids)?;
        write_json(self.store.as_ref(), SharedStoreKeys::CARD_DATA, &data)?;
        Ok(())
    }

    /// カードを「使用した」として最近使ったカードの先頭に記録する
    ///
    /// # 戻り値
    /// 更新後の最近使ったカード一覧
    pub fn mark_used(&self, card: &Card) -> AppResult<Vec<RecentCard>> {
        let mut recent = self.load_recent();
        push_recent(&mut recent, RecentCard::from(card));

        write_json(self.store.as_ref(), SharedStoreKeys::RECENT_CARDS, &recent)?;
        log::debug!("最近使ったカードを更新しました: id={}", card.id);

        self.notifier.notify_changed();
        Ok(recent)
    }

    /// ウィジェットに表示するカードを選択する（Noneで選択解除）
    pub fn set_selected_card(&self, card_id: Option<&str>) -> AppResult<()> {
        match card_id {
            Some(id) => write_json(self.store.as_ref(), SharedStoreKeys::SELECTED_CARD_ID, id)?,
            None => self.store.remove(SharedStoreKeys::SELECTED_CARD_ID)?,
        }
        self.notifier.notify_changed();
        Ok(())
    }

    /// 保存済みの最近使ったカードを読み込む（読めない場合は空）
    fn load_recent(&self) -> Vec<RecentCard> {
        match read_json::<Vec<RecentCard>>(self.store.as_ref(), SharedStoreKeys::RECENT_CARDS) {
            Ok(recent) => recent.unwrap_or_default(),
            Err(e) => {
                log::warn!("最近使ったカードの読み込みに失敗したため空から始めます: {e}");
                Vec::new()
            }
        }
    }
}
