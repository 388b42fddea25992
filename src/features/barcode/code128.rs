// Code 128 のモジュール列変換（コードセットA/B、読み取りはCも対応）

use once_cell::sync::Lazy;

/// シンボル値 0..=105 と停止コード（106）のバー・スペース幅
const WIDTHS: [&str; 107] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214", "211232", "2331112",
];

const START_A: u8 = 103;
const START_B: u8 = 104;
const START_C: u8 = 105;
const STOP: usize = 106;

const SHIFT: u8 = 98;
const CODE_C: u8 = 99;
/// コードセットAで「Bへ切り替え」、Cでも同じ値
const CODE_B: u8 = 100;
/// コードセットBで「Aへ切り替え」、Cでも同じ値
const CODE_A: u8 = 101;

/// エンコードできる最大文字数
///
/// コードセット切り替えが毎文字入っても `raster::MAX_WIDTH` に収まる長さ。
pub const MAX_INPUT_LEN: usize = 256;

/// 1シンボルのモジュール数
pub const SYMBOL_MODULES: usize = 11;
/// 停止コードのモジュール数（終端バーを含む）
pub const STOP_MODULES: usize = 13;

static PATTERNS: Lazy<Vec<Vec<bool>>> = Lazy::new(|| {
    WIDTHS
        .iter()
        .map(|widths| {
            let mut modules = Vec::new();
            for (i, width) in widths.bytes().enumerate() {
                let dark = i % 2 == 0;
                modules.extend(std::iter::repeat(dark).take((width - b'0') as usize));
            }
            modules
        })
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeSet {
    A,
    B,
    C,
}

impl CodeSet {
    fn contains(self, byte: u8) -> bool {
        match self {
            CodeSet::A => byte < 96,
            CodeSet::B => (32..128).contains(&byte),
            CodeSet::C => false,
        }
    }

    fn value_of(self, byte: u8) -> u8 {
        match self {
            CodeSet::A if byte < 32 => byte + 64,
            _ => byte - 32,
        }
    }

    fn char_of(self, value: u8) -> char {
        match self {
            CodeSet::A if value >= 64 => char::from(value - 64),
            _ => char::from(value + 32),
        }
    }

    /// シフト・切り替え先のもう一方のコードセット（A/B間）
    fn other(self) -> CodeSet {
        match self {
            CodeSet::A => CodeSet::B,
            _ => CodeSet::A,
        }
    }
}

/// 文字列をCode 128 のモジュール列に変換する
///
/// # 戻り値
/// 空文字列、ASCII以外の文字を含む場合、`MAX_INPUT_LEN` を超える場合はNone
pub fn encode(text: &str) -> Option<Vec<bool>> {
    let bytes = text.as_bytes();
    if bytes.is_empty() || !text.is_ascii() {
        return None;
    }
    if bytes.len() > MAX_INPUT_LEN {
        log::warn!("バーコードにするには長すぎます: {}文字", bytes.len());
        return None;
    }

    let mut set = if bytes[0] < 32 { CodeSet::A } else { CodeSet::B };
    let mut values = vec![if set == CodeSet::A { START_A } else { START_B }];

    for &byte in bytes {
        if !set.contains(byte) {
            set = set.other();
            values.push(if set == CodeSet::A { CODE_A } else { CODE_B });
        }
        values.push(set.value_of(byte));
    }
    values.push(checksum(&values));

    let mut modules = Vec::with_capacity(values.len() * SYMBOL_MODULES + STOP_MODULES);
    for &value in &values {
        modules.extend_from_slice(&PATTERNS[value as usize]);
    }
    modules.extend_from_slice(&PATTERNS[STOP]);
    Some(modules)
}

/// 開始コードとデータ値からチェックサムを計算する
fn checksum(values: &[u8]) -> u8 {
    let sum: u32 = values
        .iter()
        .enumerate()
        .map(|(i, &v)| v as u32 * (i as u32).max(1))
        .sum();
    (sum % 103) as u8
}

/// モジュール列から含まれるシンボル数（開始・データ・チェックサム）を求める
pub fn symbol_count(modules: usize) -> Option<usize> {
    let body = modules.checked_sub(STOP_MODULES)?;
    (body % SYMBOL_MODULES == 0 && body / SYMBOL_MODULES >= 3).then_some(body / SYMBOL_MODULES)
}

/// Code 128 のモジュール列を読み取る
pub fn decode(modules: &[bool]) -> Option<String> {
    let count = symbol_count(modules.len())?;
    let (body, stop) = modules.split_at(count * SYMBOL_MODULES);
    if stop != PATTERNS[STOP].as_slice() {
        return None;
    }

    let values = body
        .chunks(SYMBOL_MODULES)
        .map(|chunk| {
            PATTERNS[..STOP]
                .iter()
                .position(|pattern| pattern.as_slice() == chunk)
                .map(|v| v as u8)
        })
        .collect::<Option<Vec<u8>>>()?;

    let (check, symbols) = values.split_last()?;
    if checksum(symbols) != *check {
        return None;
    }

    let mut set = match symbols[0] {
        START_A => CodeSet::A,
        START_B => CodeSet::B,
        START_C => CodeSet::C,
        _ => return None,
    };

    let mut text = String::new();
    let mut shifted = false;
    for &value in &symbols[1..] {
        let active = if shifted { set.other() } else { set };
        shifted = false;

        match active {
            CodeSet::C => match value {
                0..=99 => {
                    text.push(char::from(b'0' + value / 10));
                    text.push(char::from(b'0' + value % 10));
                }
                CODE_B => set = CodeSet::B,
                CODE_A => set = CodeSet::A,
                _ => {}
            },
            _ => match value {
                0..=95 => text.push(active.char_of(value)),
                SHIFT => shifted = true,
                CODE_C => set = CodeSet::C,
                CODE_B if active == CodeSet::A => set = CodeSet::B,
                CODE_A if active == CodeSet::B => set = CodeSet::A,
                // FNC1〜FNC4 は文字として出力しない
                _ => {}
            },
        }
    }

    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_widths() {
        for (value, pattern) in PATTERNS.iter().enumerate() {
            let expected = if value == STOP { STOP_MODULES } else { SYMBOL_MODULES };
            assert_eq!(pattern.len(), expected, "value {value}");
        }
    }

    #[test]
    fn test_known_checksum() {
        // "PJJ123C": 104 + 48*1 + 42*2 + 42*3 + 17*4 + 18*5 + 19*6 + 35*7 = 879
        let values = [START_B, 48, 42, 42, 17, 18, 19, 35];
        assert_eq!(checksum(&values), 55);
    }

    #[test]
    fn test_round_trip_printable() {
        for text in ["Costco Wholesale", "111849441757", "A-b_c~{}", "McDonald's"] {
            let modules = encode(text).unwrap();
            assert_eq!(decode(&modules).as_deref(), Some(text));
        }
    }

    #[test]
    fn test_round_trip_control_characters() {
        let text = "\tTAB\nline\u{7f}";
        let modules = encode(text).unwrap();
        assert_eq!(decode(&modules).as_deref(), Some(text));
    }

    #[test]
    fn test_rejects_too_long_input() {
        assert!(encode(&"7".repeat(MAX_INPUT_LEN)).is_some());
        assert!(encode(&"7".repeat(MAX_INPUT_LEN + 1)).is_none());
    }

    #[test]
    fn test_longest_input_fits_raster() {
        // 1文字ごとにコードセットが切り替わる最悪の場合
        let text: String = (0..MAX_INPUT_LEN)
            .map(|i| if i % 2 == 0 { '\t' } else { 'a' })
            .collect();
        let modules = encode(&text).unwrap();
        assert!(crate::features::barcode::raster::render_png(&modules).is_ok());
        assert_eq!(decode(&modules).as_deref(), Some(text.as_str()));
    }

    #[test]
    fn test_rejects_empty_and_non_ascii() {
        assert!(encode("").is_none());
        assert!(encode("カード").is_none());
        assert!(encode("café").is_none());
    }

    #[test]
    fn test_decode_code_set_c() {
        let values = [START_C, 12, 34, 56];
        let mut modules = Vec::new();
        for &value in &values {
            modules.extend_from_slice(&PATTERNS[value as usize]);
        }
        modules.extend_from_slice(&PATTERNS[checksum(&values) as usize]);
        modules.extend_from_slice(&PATTERNS[STOP]);

        assert_eq!(decode(&modules).as_deref(), Some("123456"));
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        let mut modules = encode("GameStop").unwrap();
        // チェックサム（54）のシンボルを値0に置き換える
        let check_start = modules.len() - STOP_MODULES - SYMBOL_MODULES;
        modules.splice(
            check_start..check_start + SYMBOL_MODULES,
            PATTERNS[0].iter().copied(),
        );
        assert!(decode(&modules).is_none());
    }
}
