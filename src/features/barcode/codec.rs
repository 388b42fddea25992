// バーコードのエンコード・デコード

use super::raster::{self, Scanline};
use super::{code128, ean};
use serde::{Deserialize, Serialize};

/// バーコード変換ポート
///
/// 端末のバーコード生成・読み取り機能（QRコード、PDF417など）は
/// このトレイトの実装として差し込む。
pub trait BarcodeCodec: Send + Sync {
    /// 文字列をバーコード画像（PNG）にする
    ///
    /// # 戻り値
    /// 空文字列・ASCII以外の文字を含む場合はNone（バーコードを表示しない）
    fn encode(&self, text: &str) -> Option<Vec<u8>>;

    /// 画像から最初に見つかったバーコードの内容を読み取る
    fn decode(&self, image: &[u8]) -> Option<String>;
}

/// 対応する1次元バーコードの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Symbology {
    Ean13,
    Ean8,
    Code128,
}

/// 組み込みの1次元バーコード変換（EAN-13 / EAN-8 / Code 128）
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearBarcodeCodec;

impl LinearBarcodeCodec {
    pub fn new() -> Self {
        Self
    }

    /// 文字列からモジュール列を生成する
    ///
    /// 半角スペースを取り除いた結果が13桁の数字ならEAN-13を試み、
    /// 失敗した場合（チェックデジット不一致を含む）はCode 128 にする。
    ///
    /// # 戻り値
    /// 使用した種類とモジュール列
    pub fn encode_modules(text: &str) -> Option<(Symbology, Vec<bool>)> {
        // 取り除くのは半角スペースのみ（タブなどの制御文字はCode 128 で表せる）
        let cleaned: String = text.chars().filter(|&c| c != ' ').collect();

        if cleaned.len() == 13 && cleaned.chars().all(|c| c.is_ascii_digit()) {
            if let Some(modules) = ean::encode_ean13(&cleaned) {
                return Some((Symbology::Ean13, modules));
            }
        }

        code128::encode(&cleaned).map(|modules| (Symbology::Code128, modules))
    }

    /// 走査線1本を読み取る（EAN-13 → EAN-8 → Code 128 の順）
    fn decode_scanline(line: &Scanline) -> Option<(Symbology, String)> {
        let runs = line.run_count();

        if runs == ean::EAN13_RUNS {
            if let Some(text) = line.sample(ean::EAN13_MODULES).and_then(|m| ean::decode_ean13(&m)) {
                return Some((Symbology::Ean13, text));
            }
        }
        if runs == ean::EAN8_RUNS {
            if let Some(text) = line.sample(ean::EAN8_MODULES).and_then(|m| ean::decode_ean8(&m)) {
                return Some((Symbology::Ean8, text));
            }
        }

        // Code 128 は1シンボル6区間、停止コード7区間
        if runs >= 7 && (runs - 7) % 6 == 0 {
            let symbols = (runs - 7) / 6;
            let modules = symbols * code128::SYMBOL_MODULES + code128::STOP_MODULES;
            if let Some(text) = line.sample(modules).and_then(|m| code128::decode(&m)) {
                return Some((Symbology::Code128, text));
            }
        }
        None
    }

    /// 画像を読み取り、種類と内容を返す
    pub fn decode_with_symbology(image: &[u8]) -> Option<(Symbology, String)> {
        let lines = match raster::scanlines(image) {
            Ok(lines) => lines,
            Err(e) => {
                log::debug!("バーコード画像を読み取れません: {e}");
                return None;
            }
        };

        lines.iter().find_map(|line| {
            Self::decode_scanline(line).or_else(|| Self::decode_scanline(&line.reversed()))
        })
    }
}

impl BarcodeCodec for LinearBarcodeCodec {
    fn encode(&self, text: &str) -> Option<Vec<u8>> {
        let (symbology, modules) = Self::encode_modules(text)?;
        match raster::render_png(&modules) {
            Ok(bytes) => {
                log::debug!("バーコードを生成しました: {symbology:?}, {}モジュール", modules.len());
                Some(bytes)
            }
            Err(e) => {
                log::warn!("バーコード画像の生成に失敗しました: {e}");
                None
            }
        }
    }

    fn decode(&self, image: &[u8]) -> Option<String> {
        Self::decode_with_symbology(image).map(|(_, text)| text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_thirteen_digits_use_ean13() {
        let codec = LinearBarcodeCodec::new();
        let image = codec.encode("4006381333931").unwrap();

        let (symbology, text) = LinearBarcodeCodec::decode_with_symbology(&image).unwrap();
        assert_eq!(symbology, Symbology::Ean13);
        assert_eq!(text, "4006381333931");
    }

    #[test]
    fn test_whitespace_is_stripped() {
        let codec = LinearBarcodeCodec::new();
        let image = codec.encode("4 006381 333931").unwrap();
        assert_eq!(codec.decode(&image).as_deref(), Some("4006381333931"));
    }

    #[test]
    fn test_bad_checksum_falls_back_to_code128() {
        let (symbology, _) = LinearBarcodeCodec::encode_modules("4006381333932").unwrap();
        assert_eq!(symbology, Symbology::Code128);

        let codec = LinearBarcodeCodec::new();
        let image = codec.encode("4006381333932").unwrap();
        assert_eq!(
            LinearBarcodeCodec::decode_with_symbology(&image),
            Some((Symbology::Code128, "4006381333932".to_string()))
        );
    }

    #[test]
    fn test_card_numbers_round_trip() {
        let codec = LinearBarcodeCodec::new();
        for (input, expected) in [
            ("324 359", "324359"),
            ("111 849 441 757", "111849441757"),
            ("GameStop-123456789", "GameStop-123456789"),
        ] {
            let image = codec.encode(input).unwrap();
            assert_eq!(codec.decode(&image).as_deref(), Some(expected), "input {input}");
        }
    }

    #[test]
    fn test_control_characters_are_kept() {
        let codec = LinearBarcodeCodec::new();
        let image = codec.encode("AB\tCD").unwrap();
        assert_eq!(codec.decode(&image).as_deref(), Some("AB\tCD"));
    }

    #[test]
    fn test_non_ascii_whitespace_is_rejected() {
        let codec = LinearBarcodeCodec::new();
        assert!(codec.encode("1234\u{3000}5678").is_none());
        assert!(codec.encode("1234\u{a0}5678").is_none());
    }

    #[test]
    fn test_oversized_input_is_rejected() {
        let codec = LinearBarcodeCodec::new();
        let long = "A".repeat(code128::MAX_INPUT_LEN + 1);
        assert!(codec.encode(&long).is_none());

        let longest = "A".repeat(code128::MAX_INPUT_LEN);
        assert!(codec.encode(&longest).is_some());
    }

    #[test]
    fn test_encode_failures() {
        let codec = LinearBarcodeCodec::new();
        assert!(codec.encode("").is_none());
        assert!(codec.encode("   ").is_none());
        assert!(codec.encode("会員カード").is_none());
    }

    #[test]
    fn test_decode_non_barcode_images() {
        let codec = LinearBarcodeCodec::new();
        assert!(codec.decode(b"").is_none());
        assert!(codec.decode(b"garbage").is_none());

        let blank = raster::render_png(&[]).unwrap();
        assert!(codec.decode(&blank).is_none());
    }

    #[quickcheck]
    fn prop_printable_ascii_round_trips(input: Vec<u8>) -> bool {
        let text: String = input
            .into_iter()
            .map(|b| char::from(b'!' + b % 94))
            .take(24)
            .collect();
        if text.is_empty() {
            return true;
        }

        let codec = LinearBarcodeCodec::new();
        match codec.encode(&text) {
            Some(image) => codec.decode(&image).as_deref() == Some(text.as_str()),
            None => false,
        }
    }
}
