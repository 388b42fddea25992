use super::events::{RepositoryEvent, EVENT_CHANNEL_CAPACITY};
use crate::features::cards::{self, sample_cards, Card, SortOption};
use crate::features::receipts::{self, sample_receipts, Receipt};
use crate::features::widget::{RecentCard, WidgetProjector};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::storage::{read_json, write_json, KeyValueStore};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// アプリ用ストアのキー定義
pub struct AppStoreKeys;

impl AppStoreKeys {
    /// カード一覧
    pub const CARDS: &'static str = "SavedCards";
    /// 領収書一覧
    pub const RECEIPTS: &'static str = "receipts";
}

/// カードと領収書の唯一の所有者
///
/// メモリ上のコレクションと永続化状態を管理する。変更操作は毎回
/// コレクション全体を1つのJSONとして書き込むため、保存内容は常に
/// 最後に完了した変更を反映する。書き込みは1スレッドからのみ行う前提で、
/// 変更操作はすべて `&mut self` を要求する。
pub struct CardRepository {
    store: Arc<dyn KeyValueStore>,
    projector: WidgetProjector,
    cards: Vec<Card>,
    receipts: Vec<Receipt>,
    events: broadcast::Sender<RepositoryEvent>,
}

impl CardRepository {
    /// ストアからカードと領収書を読み込んでリポジトリを作成する
    ///
    /// # 引数
    /// * `store` - アプリ用キー・バリューストア
    /// * `projector` - ウィジェット向け投影の書き込み先
    ///
    /// # 戻り値
    /// 初期化されたリポジトリ
    ///
    /// # 処理内容
    /// 1. カード一覧を読み込み（存在しない・壊れている場合はサンプルカード）
    /// 2. 領収書一覧を読み込み（空の場合はサンプルを投入して即座に保存）
    /// 3. ウィジェット投影を同期
    pub fn load(store: Arc<dyn KeyValueStore>, projector: WidgetProjector) -> Self {
        let cards = load_cards(store.as_ref());
        let receipts = load_receipts(store.as_ref());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let mut repository = Self {
            store,
            projector,
            cards,
            receipts,
            events,
        };

        if repository.receipts.is_empty() {
            log::info!("領収書がないためサンプルデータを投入します");
            repository.receipts = sample_receipts();
            if let Err(e) = repository.persist_receipts() {
                log::error!("サンプル領収書の保存に失敗しました: {e}");
            }
        }

        repository.projector.sync(&repository.cards);

        log::info!(
            "リポジトリを初期化しました: カード{}件, 領収書{}件",
            repository.cards.len(),
            repository.receipts.len()
        );
        repository
    }

    /// 変更イベントを購読する
    pub fn subscribe(&self) -> broadcast::Receiver<RepositoryEvent> {
        self.events.subscribe()
    }

    // ===== カード =====

    /// カード一覧を取得する（表示順）
    pub fn list_cards(&self) -> &[Card] {
        &self.cards
    }

    /// IDでカードを取得する
    pub fn find_card(&self, id: Uuid) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// ID文字列でカードを取得する（解析できないIDはNone）
    pub fn find_card_by_str(&self, id: &str) -> Option<&Card> {
        Uuid::from_str(id.trim())
            .ok()
            .and_then(|id| self.find_card(id))
    }

    /// 名前またはカード番号で検索する（空の検索語は全件）
    pub fn search_cards(&self, query: &str) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|card| cards::matches_query(card, query))
            .collect()
    }

    /// カードを末尾に追加する
    ///
    /// 呼び出し側が設定したIDをそのまま使う。既存のカードとIDが重複する
    /// 場合のみ、一意性を保つために新しいIDを割り当てる。
    ///
    /// # 戻り値
    /// 保存されたカード
    pub fn add_card(&mut self, mut card: Card) -> AppResult<Card> {
        if self.find_card(card.id).is_some() {
            let new_id = Uuid::new_v4();
            log::warn!("カードIDが重複しているため再割り当てします: {} -> {new_id}", card.id);
            card.id = new_id;
        }

        self.cards.push(card.clone());
        log::info!("カードを追加しました: id={}, name={}", card.id, card.name);

        self.commit_cards()?;
        Ok(card)
    }

    /// カードを同じ位置で置き換える
    ///
    /// # 戻り値
    /// 置き換えた場合はtrue。IDが見つからない場合は何もせずfalse
    pub fn update_card(&mut self, card: Card) -> AppResult<bool> {
        let Some(index) = self.cards.iter().position(|existing| existing.id == card.id) else {
            log::debug!("更新対象のカードが見つかりません: id={}", card.id);
            return Ok(false);
        };

        self.cards[index] = card;
        self.commit_cards()?;
        Ok(true)
    }

    /// カードを削除する
    ///
    /// # 戻り値
    /// 削除した場合はtrue。IDが見つからない場合は何もせずfalse
    pub fn delete_card(&mut self, card: &Card) -> AppResult<bool> {
        let before = self.cards.len();
        self.cards.retain(|existing| existing.id != card.id);
        if self.cards.len() == before {
            log::debug!("削除対象のカードが見つかりません: id={}", card.id);
            return Ok(false);
        }

        log::info!("カードを削除しました: id={}", card.id);
        self.commit_cards()?;
        Ok(true)
    }

    /// カードを `from` から取り出して `to` に挿入する
    ///
    /// # エラー
    /// どちらかの位置が範囲外の場合は `AppError::IndexOutOfRange`（一覧は変更しない）
    pub fn move_card(&mut self, from: usize, to: usize) -> AppResult<()> {
        let len = self.cards.len();
        if from >= len {
            return Err(AppError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(AppError::IndexOutOfRange { index: to, len });
        }

        let card = self.cards.remove(from);
        self.cards.insert(to, card);
        self.commit_cards()
    }

    /// 指定の方法でカード一覧を並べ替えて保存する
    pub fn sort_cards(&mut self, option: SortOption) -> AppResult<()> {
        option.sort(&mut self.cards);
        log::debug!("カードを並べ替えました: {}", option.label());
        self.commit_cards()
    }

    /// カードを「使用した」として最近使ったカードに記録する
    pub fn mark_card_used(&mut self, card: &Card) -> AppResult<Vec<RecentCard>> {
        let recent = self.projector.mark_used(card)?;
        self.emit(RepositoryEvent::RecentCardsChanged);
        Ok(recent)
    }

    /// ウィジェット投影への参照を取得する
    pub fn projector(&self) -> &WidgetProjector {
        &self.projector
    }

    /// カード一覧全体を保存する
    pub fn persist_cards(&self) -> AppResult<()> {
        write_json(self.store.as_ref(), AppStoreKeys::CARDS, &self.cards).map_err(|e| {
            log::error!("カードの保存に失敗しました: {e}");
            e
        })
    }

    /// 保存・投影同期・イベント通知をまとめて行う
    ///
    /// 保存に失敗しても投影とイベントは現在のメモリ上の状態で更新する。
    fn commit_cards(&mut self) -> AppResult<()> {
        let saved = self.persist_cards();
        self.projector.sync(&self.cards);
        self.emit(RepositoryEvent::CardsChanged);
        saved
    }

    // ===== 領収書 =====

    /// 領収書一覧を取得する
    pub fn list_receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// IDで領収書を取得する
    pub fn find_receipt(&self, id: Uuid) -> Option<&Receipt> {
        self.receipts.iter().find(|receipt| receipt.id == id)
    }

    /// 店舗名で検索する（空の検索語は全件）
    pub fn search_receipts(&self, query: &str) -> Vec<&Receipt> {
        self.receipts
            .iter()
            .filter(|receipt| receipts::matches_query(receipt, query))
            .collect()
    }

    /// 店舗名ごとの領収書
    pub fn receipts_by_store(&self) -> BTreeMap<String, Vec<Receipt>> {
        receipts::group_by_store(&self.receipts)
    }

    /// 日付ごとの領収書（新しい日付から）
    pub fn receipts_by_day(&self) -> Vec<(NaiveDate, Vec<Receipt>)> {
        receipts::group_by_day(&self.receipts)
    }

    /// 領収書を末尾に追加する（IDは常に新しく割り当てる）
    ///
    /// # 戻り値
    /// 保存された領収書
    pub fn add_receipt(&mut self, mut receipt: Receipt) -> AppResult<Receipt> {
        receipt.id = Uuid::new_v4();
        self.receipts.push(receipt.clone());
        log::info!("領収書を追加しました: id={}, name={}", receipt.id, receipt.name);

        self.commit_receipts()?;
        Ok(receipt)
    }

    /// 領収書を同じ位置で置き換える（見つからない場合は何もせずfalse）
    pub fn update_receipt(&mut self, receipt: Receipt) -> AppResult<bool> {
        let Some(index) = self
            .receipts
            .iter()
            .position(|existing| existing.id == receipt.id)
        else {
            log::debug!("更新対象の領収書が見つかりません: id={}", receipt.id);
            return Ok(false);
        };

        self.receipts[index] = receipt;
        self.commit_receipts()?;
        Ok(true)
    }

    /// 領収書を削除する（見つからない場合は何もせずfalse）
    pub fn delete_receipt(&mut self, receipt: &Receipt) -> AppResult<bool> {
        let before = self.receipts.len();
        self.receipts.retain(|existing| existing.id != receipt.id);
        if self.receipts.len() == before {
            log::debug!("削除対象の領収書が見つかりません: id={}", receipt.id);
            return Ok(false);
        }

        log::info!("領収書を削除しました: id={}", receipt.id);
        self.commit_receipts()?;
        Ok(true)
    }

    /// 領収書一覧全体を保存する
    pub fn persist_receipts(&self) -> AppResult<()> {
        write_json(self.store.as_ref(), AppStoreKeys::RECEIPTS, &self.receipts).map_err(|e| {
            log::error!("領収書の保存に失敗しました: {e}");
            e
        })
    }

    fn commit_receipts(&mut self) -> AppResult<()> {
        let saved = self.persist_receipts();
        self.emit(RepositoryEvent::ReceiptsChanged);
        saved
    }

    fn emit(&self, event: RepositoryEvent) {
        // 購読者がいない場合の送信エラーは無視する
        let _ = self.events.send(event);
    }
}

/// カード一覧を読み込む（存在しない・壊れている場合はサンプルカード）
fn load_cards(store: &dyn KeyValueStore) -> Vec<Card> {
    match read_json::<Vec<Card>>(store, AppStoreKeys::CARDS) {
        Ok(Some(cards)) => cards,
        Ok(None) => {
            log::info!("保存済みのカードがないためサンプルカードを使用します");
            sample_cards()
        }
        Err(e) => {
            log::warn!("カードの読み込みに失敗したためサンプルカードを使用します: {e}");
            sample_cards()
        }
    }
}

/// 領収書一覧を読み込む（存在しない・壊れている場合は空）
fn load_receipts(store: &dyn KeyValueStore) -> Vec<Receipt> {
    match read_json::<Vec<Receipt>>(store, AppStoreKeys::RECEIPTS) {
        Ok(receipts) => receipts.unwrap_or_default(),
        Err(e) => {
            log::warn!("領収書の読み込みに失敗しました: {e}");
            Vec::new()
        }
    }
}
