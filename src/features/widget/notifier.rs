// 外部プロセス（ウィジェット）への更新通知

use tokio::sync::broadcast;

/// 「データが変わったので再読み込みしてほしい」という通知のポート
///
/// 通知はベストエフォートで、配信できなくても再送しない。
pub trait ChangeNotifier: Send + Sync {
    fn notify_changed(&self);
}

/// 何もしない通知（ウィジェットがない環境用）
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn notify_changed(&self) {}
}

/// tokioのbroadcastチャネルを使った通知
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<()>,
}

impl BroadcastNotifier {
    /// 通知チャネルを作成する
    ///
    /// # 引数
    /// * `capacity` - 受信側が読み遅れた場合に保持する通知数
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// 通知を購読する
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(16)
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn notify_changed(&self) {
        // 受信側がいない場合の送信エラーは無視する
        if self.sender.send(()).is_err() {
            log::debug!("ウィジェット更新通知の受信者がいません");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_notifier() {
        NoopNotifier.notify_changed();
    }

    #[test]
    fn test_broadcast_without_receivers_does_not_fail() {
        let notifier = BroadcastNotifier::default();
        notifier.notify_changed();
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscriber() {
        let notifier = BroadcastNotifier::new(4);
        let mut receiver = notifier.subscribe();

        notifier.notify_changed();

        assert!(receiver.recv().await.is_ok());
    }
}
