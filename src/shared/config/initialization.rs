use crate::shared::config::{
    get_app_store_filename, get_environment, get_shared_store_filename, Environment,
    EnvironmentConfig,
};
use crate::shared::errors::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// アプリケーションデータディレクトリ名（dirs::data_dir() 配下）
const APP_DIR_NAME: &str = "easy-card";

/// 写真を保存するサブディレクトリ名
const PHOTOS_DIR_NAME: &str = "photos";

/// アプリケーション初期化の結果を表す構造体
#[derive(Debug)]
pub struct InitializationResult {
    /// 初回起動かどうか
    pub is_first_run: bool,
    /// アプリケーションデータディレクトリのパス
    pub app_data_dir: PathBuf,
    /// アプリ用ストアファイルのパス
    pub app_store_path: PathBuf,
    /// ウィジェット共有ストアファイルのパス
    pub shared_store_path: PathBuf,
    /// 写真保存ディレクトリのパス
    pub photos_dir: PathBuf,
    /// 実行環境
    pub environment: Environment,
}

/// アプリケーションの初期化を実行する
///
/// # 引数
/// * `config` - 環境設定（`data_dir` が指定されていればそれを使用）
///
/// # 戻り値
/// 初期化結果、または失敗時はエラー
///
/// # 処理内容
/// 1. アプリケーションデータディレクトリの作成
/// 2. 初回起動の判定
/// 3. 写真ディレクトリの作成
pub fn initialize_application(config: &EnvironmentConfig) -> AppResult<InitializationResult> {
    let environment = get_environment();

    let app_data_dir = match &config.data_dir {
        Some(dir) => dir.clone(),
        None => default_app_data_dir()?,
    };
    ensure_directory(&app_data_dir)?;

    let app_store_path = app_data_dir.join(get_app_store_filename(&environment));
    let shared_store_path = app_data_dir.join(get_shared_store_filename(&environment));
    let photos_dir = app_data_dir.join(PHOTOS_DIR_NAME);

    // ストアファイルの有無で初回起動を判定
    let is_first_run = !app_store_path.exists();
    if is_first_run {
        log_first_run_initialization(&environment, &app_data_dir, &app_store_path);
    }

    ensure_directory(&photos_dir)?;

    Ok(InitializationResult {
        is_first_run,
        app_data_dir,
        app_store_path,
        shared_store_path,
        photos_dir,
        environment,
    })
}

/// OS標準のデータディレクトリからアプリ用ディレクトリを決定する
fn default_app_data_dir() -> AppResult<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| AppError::configuration("アプリデータディレクトリの取得に失敗しました"))
}

/// ディレクトリが存在しない場合は作成する
fn ensure_directory(dir: &Path) -> AppResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            AppError::configuration(format!("ディレクトリの作成に失敗: {dir:?} ({e})"))
        })?;
        log::info!("ディレクトリを作成しました: {dir:?}");
    }
    Ok(())
}

/// 初回起動時の初期化ログを出力する
fn log_first_run_initialization(environment: &Environment, app_data_dir: &Path, store_path: &Path) {
    log::info!("=== アプリケーション初回起動 ===");
    log::info!("実行環境: {environment:?}");
    log::info!("アプリデータディレクトリ: {app_data_dir:?}");
    log::info!("ストアファイル: {store_path:?}");
}

/// 初期化完了ログを出力する
pub fn log_initialization_complete(result: &InitializationResult) {
    if result.is_first_run {
        log::info!("初回起動の初期化が正常に完了しました");
    } else {
        log::info!("アプリケーション起動完了（既存ストアを使用）");
    }
    log::info!("環境: {:?}", result.environment);
    log::info!("ストア: {:?}", result.app_store_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::DEFAULT_URL_SCHEME;
    use tempfile::TempDir;

    fn config_with_dir(dir: PathBuf) -> EnvironmentConfig {
        EnvironmentConfig {
            environment: "development".to_string(),
            debug_mode: true,
            log_level: "debug".to_string(),
            data_dir: Some(dir),
            url_scheme: DEFAULT_URL_SCHEME.to_string(),
        }
    }

    #[test]
    fn test_initialize_application_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("nested").join("easy-card");
        let config = config_with_dir(data_dir.clone());

        let result = initialize_application(&config).unwrap();

        assert!(result.is_first_run);
        assert_eq!(result.app_data_dir, data_dir);
        assert!(result.app_data_dir.exists());
        assert!(result.photos_dir.exists());
        assert!(result.app_store_path.starts_with(&data_dir));
        assert_ne!(result.app_store_path, result.shared_store_path);
    }

    #[test]
    fn test_second_run_is_not_first_run() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_with_dir(temp_dir.path().to_path_buf());

        let first = initialize_application(&config).unwrap();
        fs::write(&first.app_store_path, b"").unwrap();

        let second = initialize_application(&config).unwrap();
        assert!(!second.is_first_run);
    }

    #[test]
    fn test_log_initialization_complete() {
        let result = InitializationResult {
            is_first_run: true,
            app_data_dir: PathBuf::from("/tmp/test"),
            app_store_path: PathBuf::from("/tmp/test/dev_easy_card.db"),
            shared_store_path: PathBuf::from("/tmp/test/dev_widget_shared.db"),
            photos_dir: PathBuf::from("/tmp/test/photos"),
            environment: Environment::Development,
        };

        // パニックしないことを確認
        log_initialization_complete(&result);
    }
}
