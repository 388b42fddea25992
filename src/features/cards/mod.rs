/// カード機能モジュール
///
/// このモジュールは、会員カードに関連する機能を提供します：
/// - カード・写真のデータモデルとサンプルデータ
/// - 背景色の解析
/// - 並べ替え・検索
pub mod color;
pub mod models;
pub mod sort;

// 公開インターフェース
pub use color::{Rgba, PRESET_COLORS};
pub use models::{sample_cards, Card, CardPhoto};
pub use sort::{matches_query, SortOption};
