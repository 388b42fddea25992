// バーコード画像の描画と走査線の読み取り

use crate::shared::errors::{AppError, AppResult};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::io::Cursor;

/// 1モジュールあたりの横幅（ピクセル）
pub const MODULE_SCALE: u32 = 4;
/// 左右の余白（モジュール数）
pub const QUIET_ZONE_MODULES: u32 = 10;
/// 画像の高さ（ピクセル）
pub const BAR_HEIGHT: u32 = 80;

/// 描画できる最大の横幅（ピクセル）
pub const MAX_WIDTH: u32 = 32_768;

/// 二値化に必要な最小の明暗差
const MIN_CONTRAST: u8 = 48;

/// モジュール列（true = バー）をPNG画像にする
///
/// # エラー
/// 横幅が `MAX_WIDTH` を超える場合は `AppError::Barcode`
pub fn render_png(modules: &[bool]) -> AppResult<Vec<u8>> {
    let width = u32::try_from(modules.len())
        .ok()
        .and_then(|len| len.checked_add(QUIET_ZONE_MODULES * 2))
        .and_then(|len| len.checked_mul(MODULE_SCALE))
        .filter(|&width| width <= MAX_WIDTH)
        .ok_or_else(|| {
            AppError::barcode(format!("バーコードが大きすぎます: {}モジュール", modules.len()))
        })?;
    let image = GrayImage::from_fn(width, BAR_HEIGHT, |x, _| {
        let dark = ((x / MODULE_SCALE) as usize)
            .checked_sub(QUIET_ZONE_MODULES as usize)
            .and_then(|module| modules.get(module).copied())
            .unwrap_or(false);
        Luma([if dark { 0 } else { 255 }])
    });

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| AppError::barcode(format!("PNGの書き出しに失敗しました: {e}")))?;
    Ok(bytes)
}

/// 二値化済みの1行分の走査線
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanline {
    dark: Vec<bool>,
}

impl Scanline {
    /// 輝度値の行から走査線を作る
    ///
    /// 最小値と最大値の中間をしきい値にする。明暗差が小さすぎる行はNone。
    pub fn from_luma(row: &[u8]) -> Option<Self> {
        let min = *row.iter().min()?;
        let max = *row.iter().max()?;
        if max - min < MIN_CONTRAST {
            return None;
        }
        let threshold = ((min as u16 + max as u16) / 2) as u8;
        Some(Self {
            dark: row.iter().map(|&luma| luma < threshold).collect(),
        })
    }

    /// 最初と最後の暗いピクセルの位置
    fn bounds(&self) -> Option<(usize, usize)> {
        let left = self.dark.iter().position(|&d| d)?;
        let right = self.dark.iter().rposition(|&d| d)?;
        Some((left, right))
    }

    /// バーとスペースの連続区間の数（両端はバー）
    pub fn run_count(&self) -> usize {
        let Some((left, right)) = self.bounds() else {
            return 0;
        };
        1 + self.dark[left..=right]
            .windows(2)
            .filter(|pair| pair[0] != pair[1])
            .count()
    }

    /// バーの範囲を指定のモジュール数に等分し、各モジュールの中央を読む
    pub fn sample(&self, modules: usize) -> Option<Vec<bool>> {
        let (left, right) = self.bounds()?;
        let span = right - left + 1;
        if modules == 0 || span < modules {
            return None;
        }

        let width = span as f64 / modules as f64;
        Some(
            (0..modules)
                .map(|i| {
                    let x = left + ((i as f64 + 0.5) * width) as usize;
                    self.dark[x.min(right)]
                })
                .collect(),
        )
    }

    /// 左右を反転した走査線（逆向きに写った画像用）
    pub fn reversed(&self) -> Self {
        Self {
            dark: self.dark.iter().rev().copied().collect(),
        }
    }
}

/// 画像データを読み込み、複数の高さで走査線を取り出す
///
/// # 引数
/// * `bytes` - PNG/JPEG画像データ
///
/// # 戻り値
/// 明暗差のある走査線（中央から外側へ）
pub fn scanlines(bytes: &[u8]) -> AppResult<Vec<Scanline>> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| AppError::barcode(format!("画像の読み込みに失敗しました: {e}")))?
        .to_luma8();

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }

    let mut rows = vec![
        height / 2,
        height / 3,
        height * 2 / 3,
        height / 4,
        height * 3 / 4,
    ];
    rows.dedup();

    Ok(rows
        .into_iter()
        .filter_map(|y| {
            let row: Vec<u8> = (0..width).map(|x| image.get_pixel(x, y)[0]).collect();
            Scanline::from_luma(&row)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_dimensions() {
        let modules = [true, false, true, true];
        let bytes = render_png(&modules).unwrap();
        let image = image::load_from_memory(&bytes).unwrap();
        assert_eq!(image.width(), (4 + QUIET_ZONE_MODULES * 2) * MODULE_SCALE);
        assert_eq!(image.height(), BAR_HEIGHT);
    }

    #[test]
    fn test_render_rejects_oversized_symbol() {
        let limit = (MAX_WIDTH / MODULE_SCALE - QUIET_ZONE_MODULES * 2) as usize;
        assert!(render_png(&vec![true; limit]).is_ok());
        assert!(matches!(
            render_png(&vec![true; limit + 1]),
            Err(AppError::Barcode(_))
        ));
    }

    #[test]
    fn test_render_then_sample() {
        let modules = vec![true, false, true, true, false, false, true];
        let bytes = render_png(&modules).unwrap();
        let lines = scanlines(&bytes).unwrap();

        assert!(!lines.is_empty());
        assert_eq!(lines[0].run_count(), 5);
        assert_eq!(lines[0].sample(modules.len()), Some(modules));
    }

    #[test]
    fn test_flat_row_has_no_scanline() {
        assert!(Scanline::from_luma(&[200; 64]).is_none());
        assert!(Scanline::from_luma(&[]).is_none());
    }

    #[test]
    fn test_reversed() {
        let line = Scanline::from_luma(&[255, 0, 0, 255, 0, 255, 255]).unwrap();
        assert_eq!(line.sample(4), Some(vec![true, true, false, true]));
        assert_eq!(line.reversed().sample(4), Some(vec![true, false, true, true]));
    }

    #[test]
    fn test_invalid_image_is_error() {
        assert!(matches!(
            scanlines(b"not an image"),
            Err(AppError::Barcode(_))
        ));
    }
}
