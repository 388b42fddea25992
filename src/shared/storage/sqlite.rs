use super::KeyValueStore;
use crate::shared::errors::{AppError, AppResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLiteを使ったキー・バリューストア
///
/// 1つのファイルを複数の名前空間で共有できる。アプリ本体とウィジェットは
/// それぞれ別の名前空間（通常は別ファイル）を使用する。
pub struct SqliteStore {
    conn: Mutex<Connection>,
    namespace: String,
}

impl SqliteStore {
    /// ファイルを開いてストアを作成する（ファイルが存在しない場合は自動作成される）
    ///
    /// # 引数
    /// * `path` - データベースファイルのパス
    /// * `namespace` - キーの名前空間
    ///
    /// # 戻り値
    /// ストア、または失敗時はエラー
    pub fn open<P: AsRef<Path>>(path: P, namespace: &str) -> AppResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        log::info!(
            "キー・バリューストアを開きました: {:?} (namespace={namespace})",
            path.as_ref()
        );
        Self::with_connection(conn, namespace)
    }

    /// メモリ上のSQLiteでストアを作成する
    pub fn open_in_memory(namespace: &str) -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, namespace)
    }

    fn with_connection(conn: Connection, namespace: &str) -> AppResult<Self> {
        create_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            namespace: namespace.to_string(),
        })
    }

    /// 名前空間を取得する
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| AppError::concurrency(format!("データベース接続のロック取得に失敗: {e}")))
    }
}

/// キー・バリューテーブルを作成する
fn create_tables(conn: &Connection) -> AppResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            namespace TEXT NOT NULL,
            key TEXT NOT NULL,
            value BLOB NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (namespace, key)
        )",
        [],
    )?;
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> AppResult<()> {
        let now = Utc::now().to_rfc3339();
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv_store (namespace, key, value, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![self.namespace, key, value, now],
        )?;
        log::debug!(
            "ストアに書き込みました: namespace={}, key={key}, bytes={}",
            self.namespace,
            value.len()
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM kv_store WHERE namespace = ?1 AND key = ?2",
            params![self.namespace, key],
        )?;
        Ok(())
    }
}
