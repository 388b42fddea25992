/// バーコード機能モジュール
///
/// このモジュールは、カード番号のバーコード化と読み取りを提供します：
/// - 変換ポート（端末のコーデックを差し込む）
/// - 組み込みの1次元コーデック（EAN-13 / EAN-8 / Code 128）
/// - カメラフレームの連続読み取りセッション
pub mod code128;
pub mod codec;
pub mod ean;
pub mod raster;
pub mod scanner;

// 公開インターフェース
pub use codec::{BarcodeCodec, LinearBarcodeCodec, Symbology};
pub use scanner::{decode_in_background, ScanSession};
