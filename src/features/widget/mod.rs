/// ウィジェット連携モジュール
///
/// このモジュールは、ホーム画面ウィジェットとのデータ共有を提供します：
/// - カード一覧の縮約投影（ID順序とID→名前/色）
/// - 最近使ったカード（最大6件、重複なし）
/// - 共有ストアの読み取り（ウィジェット側）
/// - 更新通知
pub mod models;
pub mod notifier;
pub mod projection;
pub mod reader;

// 公開インターフェース
pub use models::{
    placeholder_recent_cards, push_recent, CardSummary, RecentCard, SharedStoreKeys,
    MAX_RECENT_CARDS,
};
pub use notifier::{BroadcastNotifier, ChangeNotifier, NoopNotifier};
pub use projection::WidgetProjector;
pub use reader::WidgetReader;
