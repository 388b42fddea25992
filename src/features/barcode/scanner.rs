// カメラフレームの連続読み取りセッション

use super::codec::BarcodeCodec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

enum ScanMessage {
    Payload(String),
    Stopped,
}

/// バーコードの連続読み取りセッション
///
/// フレームのデコードはtokioのブロッキングプールで行い、結果はチャネルで
/// セッションを所有するタスクへ戻す。同じバーコードが複数フレームで
/// 認識されることがあるため、最初の一致でセッションをラッチし以降の結果は捨てる。
pub struct ScanSession {
    codec: Arc<dyn BarcodeCodec>,
    running: Arc<AtomicBool>,
    matched: Arc<AtomicBool>,
    sender: mpsc::UnboundedSender<ScanMessage>,
    receiver: mpsc::UnboundedReceiver<ScanMessage>,
}

impl ScanSession {
    /// 停止状態のセッションを作成する
    pub fn new(codec: Arc<dyn BarcodeCodec>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            codec,
            running: Arc::new(AtomicBool::new(false)),
            matched: Arc::new(AtomicBool::new(false)),
            sender,
            receiver,
        }
    }

    /// 読み取りを開始する（一致済みのセッションは再開しない）
    pub fn start(&self) {
        if self.has_matched() {
            log::debug!("読み取り済みのセッションは再開しません");
            return;
        }
        self.running.store(true, Ordering::SeqCst);
        log::debug!("バーコード読み取りを開始しました");
    }

    /// 読み取りを停止する（待機中の `first_match` はNoneを返す）
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            let _ = self.sender.send(ScanMessage::Stopped);
            log::debug!("バーコード読み取りを停止しました");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// 最初の一致を受け取った後かどうか
    pub fn has_matched(&self) -> bool {
        self.matched.load(Ordering::SeqCst)
    }

    /// フレームをバックグラウンドでデコードする
    ///
    /// # 引数
    /// * `frame` - カメラから取得した画像データ
    ///
    /// # 戻り値
    /// デコードタスクのハンドル。停止中・一致済みの場合はNone（フレームは捨てる）
    pub fn submit_frame(&self, frame: Vec<u8>) -> Option<JoinHandle<()>> {
        if !self.is_running() || self.has_matched() {
            return None;
        }

        let codec = self.codec.clone();
        let running = self.running.clone();
        let matched = self.matched.clone();
        let sender = self.sender.clone();

        Some(tokio::task::spawn_blocking(move || {
            let Some(payload) = codec.decode(&frame) else {
                return;
            };
            if running.load(Ordering::SeqCst) && !matched.load(Ordering::SeqCst) {
                let _ = sender.send(ScanMessage::Payload(payload));
            }
        }))
    }

    /// 最初に読み取れた内容を待つ
    ///
    /// # 戻り値
    /// 読み取った内容。停止された場合・一致済みの場合はNone
    pub async fn first_match(&mut self) -> Option<String> {
        if self.has_matched() {
            return None;
        }

        while let Some(message) = self.receiver.recv().await {
            match message {
                ScanMessage::Payload(payload) => {
                    self.matched.store(true, Ordering::SeqCst);
                    self.running.store(false, Ordering::SeqCst);
                    log::info!("バーコードを読み取りました: {payload}");
                    return Some(payload);
                }
                ScanMessage::Stopped if !self.is_running() => return None,
                // 停止後に再開された場合の古い停止通知
                ScanMessage::Stopped => continue,
            }
        }
        None
    }
}

/// 画像1枚をブロッキングプールでデコードする
pub async fn decode_in_background(codec: Arc<dyn BarcodeCodec>, image: Vec<u8>) -> Option<String> {
    match tokio::task::spawn_blocking(move || codec.decode(&image)).await {
        Ok(result) => result,
        Err(e) => {
            log::error!("バーコードのデコードタスクが失敗しました: {e}");
            None
        }
    }
}
