/// 領収書機能モジュール
///
/// このモジュールは、領収書に関連する機能を提供します：
/// - 領収書のデータモデルとサンプルデータ
/// - 店舗名検索
/// - 店舗別・日付別のグループ化
pub mod grouping;
pub mod models;

// 公開インターフェース
pub use grouping::{group_by_day, group_by_store, matches_query};
pub use models::{sample_receipts, Receipt};
