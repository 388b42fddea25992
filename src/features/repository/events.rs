// リポジトリの変更イベント

use serde::Serialize;

/// 変更イベント（UI層はこれを購読して再描画する）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RepositoryEvent {
    /// カード一覧が変更された（追加・更新・削除・並べ替え）
    CardsChanged,
    /// 領収書一覧が変更された
    ReceiptsChanged,
    /// 最近使ったカードが更新された
    RecentCardsChanged,
}

/// イベントチャネルの容量
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
