/// 写真保存モジュール
///
/// カード・領収書に添付する写真をアプリ専用ディレクトリに保存します。
/// データモデルにはファイルパスだけを記録し、画像本体はここで管理します。
use crate::shared::errors::{AppError, AppResult};
use image::codecs::jpeg::JpegEncoder;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 再エンコード時のJPEG品質
pub const JPEG_QUALITY: u8 = 80;

/// アプリ専用ディレクトリ内の写真ファイル管理
#[derive(Debug, Clone)]
pub struct PhotoStorage {
    directory: PathBuf,
}

impl PhotoStorage {
    /// 保存先ディレクトリを指定して作成する（ディレクトリがなければ作成）
    pub fn new(directory: impl Into<PathBuf>) -> AppResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// 画像データを `{uuid}.jpg` として保存する
    ///
    /// # 戻り値
    /// 保存したファイルのパス。書き込みに失敗した場合はNone
    pub fn save(&self, bytes: &[u8]) -> Option<String> {
        let path = self.directory.join(format!("{}.jpg", Uuid::new_v4()));
        match fs::write(&path, bytes) {
            Ok(()) => {
                log::debug!("写真を保存しました: {}", path.display());
                Some(path.to_string_lossy().into_owned())
            }
            Err(e) => {
                log::warn!("写真の保存に失敗しました: {}: {e}", path.display());
                None
            }
        }
    }

    /// 任意形式の画像をJPEGに変換して保存する
    ///
    /// # 戻り値
    /// 保存したファイルのパス。画像として読めない場合・書き込みに失敗した場合はNone
    pub fn save_as_jpeg(&self, bytes: &[u8]) -> Option<String> {
        match encode_jpeg(bytes) {
            Ok(jpeg) => self.save(&jpeg),
            Err(e) => {
                log::warn!("写真の変換に失敗しました: {e}");
                None
            }
        }
    }

    /// 保存済みの写真を読み込む（存在しない場合はNone）
    pub fn load(&self, path: &str) -> Option<Vec<u8>> {
        fs::read(path)
            .map_err(|e| log::debug!("写真を読み込めません: {path}: {e}"))
            .ok()
    }

    /// 写真ファイルを削除する（失敗してもエラーにしない）
    pub fn remove(&self, path: &str) {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("写真の削除に失敗しました: {path}: {e}");
        }
    }
}

/// 画像データをJPEGに再エンコードする
fn encode_jpeg(bytes: &[u8]) -> AppResult<Vec<u8>> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| AppError::validation(format!("画像を読み込めません: {e}")))?;

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    image
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| AppError::validation(format!("JPEGへの変換に失敗しました: {e}")))?;
    Ok(jpeg)
}
