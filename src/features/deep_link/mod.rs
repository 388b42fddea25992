/// ディープリンクモジュール
///
/// ウィジェットから開かれるURLを解析し、対応するカードを特定します。
/// 対応する形式：
/// - `easycard://card/{id}`
/// - `easycard://open?id={id}&action=detail`
use crate::features::cards::Card;
use crate::features::repository::CardRepository;
use crate::shared::config::DEFAULT_URL_SCHEME;
use url::Url;
use uuid::Uuid;

/// カード詳細を開くディープリンク
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    /// リンクに含まれるカードID（未検証の文字列）
    pub card_id: String,
}

impl DeepLink {
    /// 既定のURLスキームでリンクを解析する
    pub fn parse(link: &str) -> Option<Self> {
        Self::parse_with_scheme(link, DEFAULT_URL_SCHEME)
    }

    /// URLスキームを指定してリンクを解析する
    ///
    /// # 引数
    /// * `link` - 開かれたURL
    /// * `scheme` - アプリのURLスキーム
    ///
    /// # 戻り値
    /// 対応する形式でない場合はNone
    pub fn parse_with_scheme(link: &str, scheme: &str) -> Option<Self> {
        let url = Url::parse(link.trim()).ok()?;
        if !url.scheme().eq_ignore_ascii_case(scheme) {
            return None;
        }

        let card_id = match url.host_str()? {
            "card" => url
                .path_segments()?
                .filter(|segment| !segment.is_empty())
                .last()?
                .to_string(),
            "open" => {
                let mut id = None;
                let mut action = None;
                for (key, value) in url.query_pairs() {
                    match key.as_ref() {
                        "id" => id = Some(value.into_owned()),
                        "action" => action = Some(value.into_owned()),
                        _ => {}
                    }
                }
                // actionを省略した場合も詳細表示とみなす
                if action.is_some_and(|action| action != "detail") {
                    log::debug!("未対応のディープリンク操作です: {link}");
                    return None;
                }
                id.filter(|id| !id.is_empty())?
            }
            _ => return None,
        };

        Some(Self { card_id })
    }

    /// リンク先のカードを取得する（存在しないIDはNone）
    pub fn resolve(&self, repository: &CardRepository) -> Option<Card> {
        let card = repository.find_card_by_str(&self.card_id).cloned();
        if card.is_none() {
            log::debug!("ディープリンクのカードが見つかりません: {}", self.card_id);
        }
        card
    }
}

/// ウィジェットからカード詳細を開くリンクを作成する
pub fn card_link(scheme: &str, card_id: Uuid) -> String {
    format!("{scheme}://card/{card_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::widget::{NoopNotifier, WidgetProjector};
    use crate::shared::storage::MemoryStore;
    use std::sync::Arc;

    fn repository() -> CardRepository {
        let projector = WidgetProjector::new(Arc::new(MemoryStore::new()), Arc::new(NoopNotifier));
        CardRepository::load(Arc::new(MemoryStore::new()), projector)
    }

    #[test]
    fn test_parse_card_path() {
        let link = DeepLink::parse("easycard://card/1234-abcd").unwrap();
        assert_eq!(link.card_id, "1234-abcd");

        let link = DeepLink::parse("easycard://card/1234-abcd/").unwrap();
        assert_eq!(link.card_id, "1234-abcd");
    }

    #[test]
    fn test_parse_open_query() {
        let link = DeepLink::parse("easycard://open?id=42&action=detail").unwrap();
        assert_eq!(link.card_id, "42");

        let link = DeepLink::parse("easycard://open?id=42").unwrap();
        assert_eq!(link.card_id, "42");

        assert!(DeepLink::parse("easycard://open?id=42&action=delete").is_none());
        assert!(DeepLink::parse("easycard://open?action=detail").is_none());
    }

    #[test]
    fn test_parse_rejects_other_links() {
        assert!(DeepLink::parse("https://card/42").is_none());
        assert!(DeepLink::parse("easycard://receipt/42").is_none());
        assert!(DeepLink::parse("easycard://card").is_none());
        assert!(DeepLink::parse("not a url").is_none());
    }

    #[test]
    fn test_custom_scheme() {
        let link = DeepLink::parse_with_scheme("mycards://card/7", "mycards").unwrap();
        assert_eq!(link.card_id, "7");
        assert!(DeepLink::parse_with_scheme("easycard://card/7", "mycards").is_none());
    }

    #[test]
    fn test_resolve() {
        let repository = repository();
        let card = repository.list_cards()[1].clone();

        let link = DeepLink::parse(&card_link(DEFAULT_URL_SCHEME, card.id)).unwrap();
        assert_eq!(link.resolve(&repository), Some(card));

        let unknown = DeepLink::parse(&card_link(DEFAULT_URL_SCHEME, Uuid::new_v4())).unwrap();
        assert!(unknown.resolve(&repository).is_none());

        let garbage = DeepLink::parse("easycard://card/garbage").unwrap();
        assert!(garbage.resolve(&repository).is_none());
    }
}
