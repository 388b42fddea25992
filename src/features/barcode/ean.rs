// EAN-13 / EAN-8 のモジュール列変換

/// 左側・奇数パリティ（L）の7モジュールパターン
const L_CODES: [u8; 10] = [
    0b0001101, 0b0011001, 0b0010011, 0b0111101, 0b0100011,
    0b0110001, 0b0101111, 0b0111011, 0b0110111, 0b0001011,
];

/// 左側・偶数パリティ（G）の7モジュールパターン
const G_CODES: [u8; 10] = [
    0b0100111, 0b0110011, 0b0011011, 0b0100001, 0b0011101,
    0b0111001, 0b0000101, 0b0010001, 0b0001001, 0b0010111,
];

/// 先頭桁ごとの左側6桁のパリティ（1 = G、上位ビットが2桁目）
const FIRST_DIGIT_PARITY: [u8; 10] = [
    0b000000, 0b001011, 0b001101, 0b001110, 0b010011,
    0b011001, 0b011100, 0b010101, 0b010110, 0b011010,
];

const DIGIT_MODULES: usize = 7;
const GUARD: [bool; 3] = [true, false, true];
const CENTER_GUARD: [bool; 5] = [false, true, false, true, false];

/// EAN-13 のモジュール数
pub const EAN13_MODULES: usize = 95;
/// EAN-8 のモジュール数
pub const EAN8_MODULES: usize = 67;

/// EAN-13 のバー・スペース区間数（ガード3+5+3、各桁4）
pub const EAN13_RUNS: usize = 59;
/// EAN-8 のバー・スペース区間数
pub const EAN8_RUNS: usize = 43;

/// 右側（R）パターンはLパターンの反転
fn r_code(digit: u8) -> u8 {
    !L_CODES[digit as usize] & 0x7F
}

/// チェックデジットを計算する
///
/// # 引数
/// * `payload` - チェックデジットを除いた桁（EAN-13は12桁、EAN-8は7桁）
pub fn check_digit(payload: &[u8]) -> u8 {
    // 右端から重み3, 1, 3, ...
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| d as u32 * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

fn parse_digits(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect()
}

fn push_pattern(modules: &mut Vec<bool>, pattern: u8) {
    for shift in (0..DIGIT_MODULES).rev() {
        modules.push((pattern >> shift) & 1 == 1);
    }
}

fn read_pattern(modules: &[bool]) -> u8 {
    modules
        .iter()
        .fold(0u8, |acc, &dark| (acc << 1) | dark as u8)
}

/// EAN-13 のモジュール列を生成する
///
/// # 戻り値
/// 13桁の数字でない場合、またはチェックデジットが一致しない場合はNone
pub fn encode_ean13(text: &str) -> Option<Vec<bool>> {
    let digits = parse_digits(text)?;
    if digits.len() != 13 {
        return None;
    }
    if check_digit(&digits[..12]) != digits[12] {
        log::debug!("EAN-13のチェックデジットが一致しません: {text}");
        return None;
    }

    let parity = FIRST_DIGIT_PARITY[digits[0] as usize];
    let mut modules = Vec::with_capacity(EAN13_MODULES);
    modules.extend_from_slice(&GUARD);
    for (i, &digit) in digits[1..7].iter().enumerate() {
        let use_g = (parity >> (5 - i)) & 1 == 1;
        let pattern = if use_g {
            G_CODES[digit as usize]
        } else {
            L_CODES[digit as usize]
        };
        push_pattern(&mut modules, pattern);
    }
    modules.extend_from_slice(&CENTER_GUARD);
    for &digit in &digits[7..] {
        push_pattern(&mut modules, r_code(digit));
    }
    modules.extend_from_slice(&GUARD);
    Some(modules)
}

/// EAN-13 のモジュール列を読み取る
pub fn decode_ean13(modules: &[bool]) -> Option<String> {
    if modules.len() != EAN13_MODULES
        || modules[..3] != GUARD
        || modules[45..50] != CENTER_GUARD
        || modules[92..] != GUARD
    {
        return None;
    }

    let mut digits = vec![0u8; 13];
    let mut parity = 0u8;
    for i in 0..6 {
        let start = 3 + i * DIGIT_MODULES;
        let pattern = read_pattern(&modules[start..start + DIGIT_MODULES]);
        let (digit, is_g) = match L_CODES.iter().position(|&p| p == pattern) {
            Some(d) => (d, false),
            None => (G_CODES.iter().position(|&p| p == pattern)?, true),
        };
        digits[i + 1] = digit as u8;
        parity = (parity << 1) | is_g as u8;
    }
    digits[0] = FIRST_DIGIT_PARITY.iter().position(|&p| p == parity)? as u8;

    for i in 0..6 {
        let start = 50 + i * DIGIT_MODULES;
        digits[i + 7] = decode_right(&modules[start..start + DIGIT_MODULES])?;
    }

    finish(&digits)
}

/// EAN-8 のモジュール列を読み取る
pub fn decode_ean8(modules: &[bool]) -> Option<String> {
    if modules.len() != EAN8_MODULES
        || modules[..3] != GUARD
        || modules[31..36] != CENTER_GUARD
        || modules[64..] != GUARD
    {
        return None;
    }

    let mut digits = Vec::with_capacity(8);
    for i in 0..4 {
        let start = 3 + i * DIGIT_MODULES;
        let pattern = read_pattern(&modules[start..start + DIGIT_MODULES]);
        digits.push(L_CODES.iter().position(|&p| p == pattern)? as u8);
    }
    for i in 0..4 {
        let start = 36 + i * DIGIT_MODULES;
        digits.push(decode_right(&modules[start..start + DIGIT_MODULES])?);
    }

    finish(&digits)
}

fn decode_right(modules: &[bool]) -> Option<u8> {
    let pattern = read_pattern(modules);
    (0..10u8).find(|&d| r_code(d) == pattern)
}

/// チェックデジットを検証して文字列にする
fn finish(digits: &[u8]) -> Option<String> {
    let (payload, check) = digits.split_at(digits.len() - 1);
    if check_digit(payload) != check[0] {
        return None;
    }
    Some(digits.iter().map(|d| char::from(b'0' + d)).collect())
}
