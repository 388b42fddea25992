// カード背景色の解析

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 受け付ける16進カラー（RGB / RRGGBB / AARRGGBB、前後の記号は除去済み）
static HEX_COLOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$")
        .expect("カラーパターンの正規表現が不正です")
});

/// 8ビットRGBA色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// 不透明な黒（不正な値のフォールバック）
    pub const OPAQUE_BLACK: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// 16進文字列が有効な形式かどうか
    pub fn is_valid_hex(value: &str) -> bool {
        HEX_COLOR_PATTERN.is_match(strip_symbols(value))
    }

    /// 16進文字列を解析する
    ///
    /// # 引数
    /// * `value` - "#RGB"、"#RRGGBB"、"#AARRGGBB"（前後の英数字以外は無視）
    ///
    /// # 戻り値
    /// 解析結果（形式が不正な場合はNone）
    pub fn parse(value: &str) -> Option<Rgba> {
        let digits = strip_symbols(value);
        if !HEX_COLOR_PATTERN.is_match(digits) {
            return None;
        }
        let raw = u32::from_str_radix(digits, 16).ok()?;

        let color = match digits.len() {
            3 => Rgba {
                r: ((raw >> 8) & 0xF) as u8 * 17,
                g: ((raw >> 4) & 0xF) as u8 * 17,
                b: (raw & 0xF) as u8 * 17,
                a: 255,
            },
            6 => Rgba {
                r: (raw >> 16) as u8,
                g: (raw >> 8) as u8,
                b: raw as u8,
                a: 255,
            },
            8 => Rgba {
                a: (raw >> 24) as u8,
                r: (raw >> 16) as u8,
                g: (raw >> 8) as u8,
                b: raw as u8,
            },
            _ => return None,
        };
        Some(color)
    }

    /// 16進文字列を解析する（不正な値は不透明な黒）
    pub fn parse_or_default(value: &str) -> Rgba {
        Self::parse(value).unwrap_or_else(|| {
            log::debug!("不正なカラー値のため黒を使用します: {value:?}");
            Self::OPAQUE_BLACK
        })
    }

    /// 16進文字列に変換する（不透明なら #RRGGBB、それ以外は #AARRGGBB）
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }
}

/// 前後の英数字以外の文字（"#"、空白、括弧など）を取り除く
fn strip_symbols(value: &str) -> &str {
    value.trim_matches(|c: char| !c.is_ascii_alphanumeric())
}

/// カード追加画面で選択できる背景色
pub const PRESET_COLORS: [&str; 6] = [
    "#0000FF", "#FF0000", "#00AA88", "#000000", "#4B0082", "#800080",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit() {
        assert_eq!(
            Rgba::parse("#0088AA"),
            Some(Rgba {
                r: 0x00,
                g: 0x88,
                b: 0xAA,
                a: 255
            })
        );
        // "#" 省略・小文字
        assert_eq!(Rgba::parse("0088aa"), Rgba::parse("#0088AA"));
    }

    #[test]
    fn test_parse_eight_digit_alpha_first() {
        let color = Rgba::parse("#80FF0000").unwrap();
        assert_eq!(color.a, 0x80);
        assert_eq!(color.r, 0xFF);
        assert_eq!(color.g, 0);
        assert_eq!(color.b, 0);
    }

    #[test]
    fn test_surrounding_symbols_are_ignored() {
        let expected = Rgba::parse("#0088AA");
        assert!(expected.is_some());
        assert_eq!(Rgba::parse("#0088AA;"), expected);
        assert_eq!(Rgba::parse("(#0088AA)"), expected);
        assert_eq!(Rgba::parse("  #0088AA\n"), expected);
        assert!(Rgba::is_valid_hex("(#0088AA)"));
        assert_eq!(Rgba::parse_or_default("\"#0088AA\""), expected.unwrap());

        // 内側の不正な文字は除去しない
        assert!(Rgba::parse("#00 88AA").is_none());
    }

    #[test]
    fn test_parse_short_form() {
        assert_eq!(
            Rgba::parse("#F0A"),
            Some(Rgba {
                r: 0xFF,
                g: 0x00,
                b: 0xAA,
                a: 255
            })
        );
    }

    #[test]
    fn test_malformed_values_degrade_to_black() {
        for value in ["", "#", "blue", "#12345", "#GGGGGG", "#1234567890"] {
            assert_eq!(Rgba::parse(value), None, "{value}");
            assert_eq!(Rgba::parse_or_default(value), Rgba::OPAQUE_BLACK);
        }
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Rgba::parse_or_default("#00aa88").to_hex(), "#00AA88");
        assert_eq!(Rgba::parse_or_default("#7F00AA88").to_hex(), "#7F00AA88");
    }

    #[test]
    fn test_preset_colors_are_valid() {
        for color in PRESET_COLORS {
            assert!(Rgba::is_valid_hex(color));
        }
    }
}
