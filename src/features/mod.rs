/// 機能別モジュール
///
/// このモジュールは、アプリケーションの機能を機能別に整理したモジュール群を提供します。
/// 各機能モジュールは、その機能に関連するコード（モデル、操作、永続化）を含む
/// 自己完結型のユニットです。
// 機能モジュールの宣言
pub mod barcode;
pub mod cards;
pub mod deep_link;
pub mod photos;
pub mod receipts;
pub mod repository;
pub mod search_history;
pub mod widget;
