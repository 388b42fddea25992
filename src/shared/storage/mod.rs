/// キー・バリューストアの抽象化
///
/// リポジトリとウィジェット投影はこのトレイトを通してのみ永続化を行う。
/// 値は不透明なバイト列で、キー単位の get / set / remove だけを提供する。
pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::shared::errors::AppResult;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// 永続化ポート（同期・プロセス内共有）
pub trait KeyValueStore: Send + Sync {
    /// キーに対応する値を取得する（存在しない場合はNone）
    fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>>;

    /// キーに値を書き込む（既存の値は置き換える）
    fn set(&self, key: &str, value: &[u8]) -> AppResult<()>;

    /// キーを削除する（存在しない場合は何もしない）
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// 値をJSONとして書き込む
///
/// # 引数
/// * `store` - 書き込み先ストア
/// * `key` - キー
/// * `value` - シリアライズ可能な値
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> AppResult<()> {
    let encoded = serde_json::to_vec(value)?;
    store.set(key, &encoded)
}

/// JSONとして値を読み込む
///
/// # 戻り値
/// 値が存在しない場合は `Ok(None)`、デコードに失敗した場合は `Err(AppError::Json)`
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> AppResult<Option<T>> {
    match store.get(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}
