use serde::Serialize;

use super::{Link, LinkSource};
use crate::common::LinkId;

/// Events pushed to live dashboards.
///
/// Wire shape is `{"type": "link_added" | "link_updated", "data": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum LinkEvent {
    LinkAdded(LinkAdded),
    LinkUpdated(Link),
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkAdded {
    pub id: LinkId,
    pub raw_url: String,
    pub source: LinkSource,
}

impl LinkEvent {
    pub fn added(link: &Link) -> Self {
        LinkEvent::LinkAdded(LinkAdded {
            id: link.id,
            raw_url: link.raw_url.clone(),
            source: link.source,
        })
    }

    pub fn updated(link: Link) -> Self {
        LinkEvent::LinkUpdated(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_added_wire_shape() {
        let link = Link::placeholder("https://example.com", LinkSource::Web, None);
        let json = serde_json::to_value(LinkEvent::added(&link)).unwrap();

        assert_eq!(json["type"], "link_added");
        assert_eq!(json["data"]["raw_url"], "https://example.com");
        assert_eq!(json["data"]["source"], "web");
        assert_eq!(json["data"]["id"], link.id.to_string());
        assert_eq!(json["data"].as_object().unwrap().len(), 3);
    }

    #[test]
    fn link_updated_carries_full_record() {
        let link = Link::placeholder("https://example.com", LinkSource::Web, None);
        let json = serde_json::to_value(LinkEvent::updated(link)).unwrap();

        assert_eq!(json["type"], "link_updated");
        assert_eq!(json["data"]["processed"], false);
        assert!(json["data"].get("created_at").is_some());
    }
}
