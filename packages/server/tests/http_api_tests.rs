//! HTTP surface tests: dashboard link API, export, health and webhooks.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use test_context::test_context;

use crate::common::{TestHarness, TEST_VERIFY_TOKEN};
use saver_core::domains::links::activities::{ACK_REPLY, NO_LINK_REPLY};
use saver_core::domains::links::models::{Category, Link, LinkSource};
use saver_core::kernel::{BaseLinkStore, TestDependencies};
use saver_core::MessagingProvider;

async fn seed(ctx: &TestHarness, url: &str, category: Option<Category>, days_old: i64) -> Link {
    let mut link = Link::placeholder(url, LinkSource::Web, Some("seed".into()));
    link.title = Some(format!("Title for {}", url));
    link.category = category;
    link.processed = category.is_some();
    link.created_at = Utc::now() - Duration::days(days_old);
    ctx.deps.store.insert(&link).await.unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn health_reports_service(ctx: &TestHarness) {
    let (status, body) = ctx.get_json("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "social-saver-backend");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["subscribers"], 0);

    let (status, _) = ctx.get_json("/").await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Link API
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn add_link_uses_first_url_only(ctx: &TestHarness) {
    let (status, body) = ctx
        .post_json(
            "/links",
            json!({ "url": "https://x.com/rustlang/status/42?s=20 and https://example.com/b" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    ctx.settle().await;

    let links = ctx.links().await;
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].id.to_string(), body["id"].as_str().unwrap());
    assert_eq!(links[0].raw_url, "https://x.com/rustlang/status/42");
    assert_eq!(links[0].source, LinkSource::Twitter);
    assert_eq!(links[0].sender_phone.as_deref(), Some("web_manual"));
    assert!(links[0].processed);

    // Dashboard submissions never produce chat replies.
    assert!(ctx.deps.messenger.sent().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn add_link_without_url_is_rejected(ctx: &TestHarness) {
    let (status, body) = ctx.post_json("/links", json!({ "url": "not a link" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "No valid URL found");
    assert!(ctx.links().await.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn list_links_paginates_and_filters(ctx: &TestHarness) {
    seed(ctx, "https://a.com", Some(Category::Coding), 3).await;
    seed(ctx, "https://b.com", Some(Category::Food), 2).await;
    seed(ctx, "https://c.com", Some(Category::Coding), 1).await;

    let (status, body) = ctx.get_json("/links").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    // Newest first.
    assert_eq!(body["links"][0]["raw_url"], "https://c.com");

    let (_, body) = ctx.get_json("/links?limit=1&offset=1").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["links"][0]["raw_url"], "https://b.com");

    let (_, body) = ctx.get_json("/links?category=Coding").await;
    assert_eq!(body["count"], 2);

    let (_, body) = ctx.get_json("/links?category=Gardening").await;
    assert_eq!(body["count"], 0);

    let (status, _) = ctx.get_json("/links?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = ctx.get_json("/links?limit=501").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn get_and_delete_link(ctx: &TestHarness) {
    let link = seed(ctx, "https://a.com", Some(Category::News), 0).await;
    let path = format!("/links/{}", link.id);

    let (status, body) = ctx.get_json(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["raw_url"], "https://a.com");
    assert_eq!(body["category"], "News");

    let (status, body) = ctx.delete_json(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
    assert_eq!(body["id"], link.id.to_string());

    let (status, _) = ctx.get_json(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = ctx.delete_json(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = ctx.get_json("/links/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn roulette_prefers_forgotten_links(ctx: &TestHarness) {
    let (status, _) = ctx.get_json("/links/roulette").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    seed(ctx, "https://old.com", Some(Category::Travel), 60).await;
    seed(ctx, "https://new.com", Some(Category::Travel), 1).await;

    for _ in 0..5 {
        let (status, body) = ctx.get_json("/links/roulette?days_ago=30").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["raw_url"], "https://old.com");
    }

    // Nothing older than 90 days: any recent link will do.
    let (status, _) = ctx.get_json("/links/roulette?days_ago=90").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.get_json("/links/roulette?days_ago=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn roulette_rejects_days_beyond_calendar(ctx: &TestHarness) {
    seed(ctx, "https://old.com", Some(Category::Travel), 60).await;

    for days in ["9223372036854775807", "100000000"] {
        let (status, body) = ctx
            .get_json(&format!("/links/roulette?days_ago={}", days))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "days_ago={}", days);
        assert_eq!(body["detail"], "days_ago is out of range");
    }
}

// =============================================================================
// Export
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn export_markdown_is_an_attachment(ctx: &TestHarness) {
    seed(ctx, "https://a.com", Some(Category::Coding), 1).await;
    seed(ctx, "https://b.com", None, 1).await;

    let request = axum::http::Request::get("/export/markdown")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(ctx.app(), request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=social_saver_export.md"
    );

    let (_, body) = ctx.get("/export/markdown").await;
    assert!(body.contains("> Exported 2 links"));
    assert!(body.contains("## 📂 Coding"));
    assert!(body.contains("## 📂 Uncategorized"));
}

// =============================================================================
// Twilio webhook
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn twilio_webhook_saves_links(ctx: &TestHarness) {
    let (status, body) = ctx
        .post_form(
            "/webhook/twilio",
            &[
                ("From", "whatsapp:+15550001111"),
                ("Body", "check https://www.instagram.com/reel/Cx1/?igsh=abc"),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    ctx.settle().await;

    let links = ctx.links().await;
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].raw_url, "https://www.instagram.com/reel/Cx1/");
    assert_eq!(links[0].sender_phone.as_deref(), Some("whatsapp:+15550001111"));

    let replies = ctx.deps.messenger.sent_to("whatsapp:+15550001111");
    assert!(replies.contains(&ACK_REPLY.to_string()));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn twilio_webhook_without_link_replies(ctx: &TestHarness) {
    let (status, body) = ctx
        .post_form(
            "/webhook/twilio",
            &[("From", "whatsapp:+15550001111"), ("Body", "hello!")],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    assert!(ctx.links().await.is_empty());
    assert_eq!(
        ctx.deps.messenger.sent_to("whatsapp:+15550001111"),
        vec![NO_LINK_REPLY.to_string()]
    );
}

// =============================================================================
// Meta webhook
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn meta_verification_handshake(ctx: &TestHarness) {
    let (status, body) = ctx
        .get(&format!(
            "/webhook/meta?hub.mode=subscribe&hub.verify_token={}&hub.challenge=1158201444",
            TEST_VERIFY_TOKEN
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "1158201444");

    let (status, _) = ctx
        .get("/webhook/meta?hub.verify_token=wrong&hub.challenge=1")
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn meta_webhook_saves_links_and_replies_to_plus_number() {
    let ctx = TestHarness::with_deps(TestDependencies::new().messaging_provider(MessagingProvider::Meta));

    let payload = json!({
        "object": "whatsapp_business_account",
        "entry": [{ "changes": [{ "value": { "messages": [{
            "from": "919876543210",
            "text": { "body": "https://example.com/recipe" }
        }] } }] }]
    });
    let (status, body) = ctx.post_json("/webhook/meta", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    ctx.settle().await;

    let links = ctx.links().await;
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].sender_phone.as_deref(), Some("919876543210"));

    // Meta recipients are bare digits.
    let replies = ctx.deps.messenger.sent_to("919876543210");
    assert!(replies.contains(&ACK_REPLY.to_string()));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn meta_webhook_statuses(ctx: &TestHarness) {
    let no_messages = json!({ "entry": [{ "changes": [{ "value": { "statuses": [] } }] }] });
    let (_, body) = ctx.post_json("/webhook/meta", no_messages).await;
    assert_eq!(body["status"], "no messages");

    let no_url = json!({ "entry": [{ "changes": [{ "value": { "messages": [{
        "from": "1555", "text": { "body": "hi there" }
    }] } }] }] });
    let (_, body) = ctx.post_json("/webhook/meta", no_url).await;
    assert_eq!(body["status"], "no url");

    let malformed = json!({ "object": "whatsapp_business_account" });
    let (status, body) = ctx.post_json("/webhook/meta", malformed).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    assert!(ctx.links().await.is_empty());
}
