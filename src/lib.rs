pub mod features;
pub mod shared;

use features::barcode::{BarcodeCodec, LinearBarcodeCodec};
use features::photos::PhotoStorage;
use features::repository::CardRepository;
use features::search_history::SearchHistory;
use features::widget::{BroadcastNotifier, WidgetProjector, WidgetReader};
use log::info;
use shared::config::{
    initialize_application, initialize_logging_system, load_environment_variables,
    log_initialization_complete, EnvironmentConfig, InitializationResult,
};
use shared::errors::AppResult;
use shared::storage::{KeyValueStore, SqliteStore};
use std::sync::Arc;

/// アプリ本体のストアの名前空間
pub const APP_NAMESPACE: &str = "app";
/// ウィジェットと共有するストアの名前空間
pub const SHARED_NAMESPACE: &str = "widget";

/// 起動済みアプリケーションの状態
pub struct AppContext {
    pub config: EnvironmentConfig,
    pub initialization: InitializationResult,
    pub repository: CardRepository,
    pub search_history: SearchHistory,
    pub photos: PhotoStorage,
    pub widget_reader: WidgetReader,
    pub widget_notifier: BroadcastNotifier,
    pub codec: Arc<dyn BarcodeCodec>,
}

/// 環境変数とログを初期化してアプリケーションを起動する
pub fn run() -> AppResult<AppContext> {
    load_environment_variables();
    initialize_logging_system();

    info!("アプリケーション初期化を開始します...");
    start(EnvironmentConfig::from_env())
}

/// 環境設定を指定してアプリケーションを起動する
///
/// # 引数
/// * `config` - 環境設定
///
/// # 戻り値
/// アプリケーション状態、または失敗時はエラー
///
/// # 処理内容
/// 1. データディレクトリとストアファイルのパスを決定
/// 2. アプリ用・ウィジェット共有用のストアを開く
/// 3. リポジトリを読み込み、ウィジェット投影を同期
pub fn start(config: EnvironmentConfig) -> AppResult<AppContext> {
    let initialization = initialize_application(&config)?;

    let app_store: Arc<dyn KeyValueStore> =
        Arc::new(SqliteStore::open(&initialization.app_store_path, APP_NAMESPACE)?);
    let shared_store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(
        &initialization.shared_store_path,
        SHARED_NAMESPACE,
    )?);

    let widget_notifier = BroadcastNotifier::default();
    let projector = WidgetProjector::new(shared_store.clone(), Arc::new(widget_notifier.clone()));
    let repository = CardRepository::load(app_store.clone(), projector);
    let search_history = SearchHistory::load(app_store);
    let photos = PhotoStorage::new(&initialization.photos_dir)?;

    log_initialization_complete(&initialization);

    Ok(AppContext {
        config,
        initialization,
        repository,
        search_history,
        photos,
        widget_reader: WidgetReader::new(shared_store),
        widget_notifier,
        codec: Arc::new(LinearBarcodeCodec::new()),
    })
}
