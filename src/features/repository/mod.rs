/// リポジトリモジュール
///
/// このモジュールは、カードと領収書の所有・永続化を提供します：
/// - 読み込み（存在しない・壊れている場合のサンプルデータ）
/// - 追加・更新・削除・並べ替え
/// - ウィジェット投影の同期
/// - 変更イベントの配信
pub mod card_repository;
pub mod events;

// 公開インターフェース
pub use card_repository::{AppStoreKeys, CardRepository};
pub use events::{RepositoryEvent, EVENT_CHANNEL_CAPACITY};
