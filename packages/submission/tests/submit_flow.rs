//! Integration tests for the request pipeline.
//!
//! These drive the orchestrator end to end through the library's own
//! mock remote: story page scrape → template render → submission →
//! outcome, plus the batch, spreadsheet, publication, and message
//! paths.

use futures::StreamExt;
use serde_json::json;

use submission::sheet;
use submission::testing::{service_body, MockRemote};
use submission::{
    HostContext, HostMessage, HostResponse, MemorySettings, Orchestrator, SubmitError,
};

/// Story-page markup with all three identifier fences.
fn story_markup(post_id: &str, author_id: &str, author_name: &str) -> String {
    format!(
        r#"<html><body>
        <article data-post-id="{post_id}" data-user-id="{author_id}"></article>
        <script>{{"creator":["{author_name}"],"section":"stories"}}</script>
        </body></html>"#
    )
}

async fn seeded_orchestrator(remote: MockRemote) -> Orchestrator<MemorySettings, MockRemote> {
    let orchestrator = Orchestrator::new(MemorySettings::new(), remote);
    orchestrator.settings().seed_defaults().await.unwrap();
    orchestrator
}

#[tokio::test]
async fn submit_one_posts_the_resolved_parameters() {
    let story = "https://medium.com/@grace/compilers-are-fun";
    let remote = MockRemote::new().with_page(story, story_markup("42", "7", "Grace Hopper"));

    let orchestrator = seeded_orchestrator(remote).await;
    orchestrator
        .settings()
        .update_template_body(1, "Hi {{first_name}}")
        .await
        .unwrap();

    let outcome = orchestrator.submit_one(story, 1).await;
    assert!(outcome.success, "outcome: {outcome:?}");
    assert_eq!(outcome.story_url, story);

    let submissions = orchestrator.remote().submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].author_id, "7");
    assert_eq!(submissions[0].payload.post_id, "42");
    assert_eq!(submissions[0].payload.comment, "Hi Grace");
    assert_eq!(submissions[0].payload.bid_amount, 0);
    assert_eq!(submissions[0].payload.bid_currency, 1);
    assert_eq!(
        submissions[0].payload.request_type,
        "submit_post_to_publication"
    );
}

#[tokio::test]
async fn fetch_failure_short_circuits_before_any_submission() {
    let story = "https://medium.com/@x/unreachable";
    let remote = MockRemote::new().with_page_failure(story);

    let orchestrator = seeded_orchestrator(remote).await;
    let outcome = orchestrator.submit_one(story, 1).await;

    assert!(!outcome.success);
    assert!(outcome
        .error_message
        .as_deref()
        .unwrap()
        .starts_with("fetch failed"));
    assert!(outcome.raw_response.is_none());
    assert!(orchestrator.remote().submissions().is_empty());
}

#[tokio::test]
async fn service_rejection_passes_the_error_through() {
    let story = "https://medium.com/@a/story";
    let remote = MockRemote::new()
        .with_page(story, story_markup("1", "a1", "Ada Lovelace"))
        .with_response(
            "a1",
            service_body(&json!({"success": false, "error": "Already requested"})),
        );

    let orchestrator = seeded_orchestrator(remote).await;
    let outcome = orchestrator.submit_one(story, 1).await;

    assert!(!outcome.success);
    assert_eq!(outcome.error_message.as_deref(), Some("Already requested"));
    assert_eq!(outcome.raw_response.unwrap()["error"], "Already requested");
}

#[tokio::test]
async fn malformed_response_is_a_parse_failure_outcome() {
    let story = "https://medium.com/@a/story";
    let remote = MockRemote::new()
        .with_page(story, story_markup("1", "a1", "Ada"))
        .with_response("a1", "])");

    let orchestrator = seeded_orchestrator(remote).await;
    let outcome = orchestrator.submit_one(story, 1).await;

    assert!(!outcome.success);
    assert!(outcome.raw_response.is_none());
}

#[tokio::test]
async fn batch_reports_one_outcome_per_story() {
    let ok_a = "https://medium.com/@a/one";
    let broken = "https://medium.com/@b/two";
    let ok_c = "https://medium.com/@c/three";

    let remote = MockRemote::new()
        .with_page(ok_a, story_markup("p1", "u1", "Author One"))
        .with_page_failure(broken)
        .with_page(ok_c, story_markup("p3", "u3", "Author Three"));

    let orchestrator = seeded_orchestrator(remote).await;
    let outcomes = orchestrator
        .submit_batch_collect(
            vec![ok_a.to_string(), broken.to_string(), ok_c.to_string()],
            1,
        )
        .await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes.iter().filter(|o| !o.success).count(), 1);
    let failed = outcomes.iter().find(|o| !o.success).unwrap();
    assert_eq!(failed.story_url, broken);
}

#[tokio::test]
async fn spreadsheet_path_uses_the_default_template() {
    let story_a = "https://medium.com/@a/one";
    let story_b = "https://medium.com/@b/two";
    let sheet_url = "https://docs.google.com/spreadsheets/d/sheet-1/edit";
    let feed = format!(
        r#"<feed xmlns:gs="http://schemas.google.com/spreadsheets/2006">
          <entry><gs:cell row="1" col="1" inputValue="story links">x</gs:cell></entry>
          <entry><gs:cell row="2" col="1" inputValue="{story_a}">x</gs:cell></entry>
          <entry><gs:cell row="3" col="1" inputValue="{story_b}">x</gs:cell></entry>
        </feed>"#
    );

    let remote = MockRemote::new()
        .with_page(sheet::cell_feed_url("sheet-1"), feed)
        .with_page(story_a, story_markup("p1", "u1", "One Author"))
        .with_page(story_b, story_markup("p2", "u2", "Two Author"));

    let orchestrator = seeded_orchestrator(remote).await;
    orchestrator
        .settings()
        .update_template_body(2, "Default says hi to {{first_name}}")
        .await
        .unwrap();
    orchestrator.settings().set_default_template(2).await.unwrap();

    let outcomes: Vec<_> = orchestrator
        .submit_spreadsheet(sheet_url)
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.success));

    let submissions = orchestrator.remote().submissions();
    assert_eq!(submissions.len(), 2);
    assert!(submissions
        .iter()
        .all(|s| s.payload.comment.starts_with("Default says hi to ")));
}

#[tokio::test]
async fn unreachable_sheet_is_one_error_for_the_whole_sheet() {
    let sheet_url = "https://docs.google.com/spreadsheets/d/gone/edit";
    let remote = MockRemote::new().with_page_failure(sheet::cell_feed_url("gone"));

    let orchestrator = seeded_orchestrator(remote).await;
    assert!(matches!(
        orchestrator.submit_spreadsheet(sheet_url).await,
        Err(SubmitError::SheetFeed(_))
    ));
    assert!(orchestrator.remote().submissions().is_empty());
}

#[tokio::test]
async fn publication_resolution_stores_the_identity() {
    let pub_url = "https://medium.com/better-compilers";
    let remote =
        MockRemote::new().with_page(pub_url, r#"<body data-collection-id="col-9">"#.to_string());

    let orchestrator = seeded_orchestrator(remote).await;
    let identity = orchestrator.resolve_publication(pub_url).await.unwrap();

    assert_eq!(identity.id, "col-9");
    let stored = orchestrator.settings().publication().await.unwrap();
    assert_eq!(stored, identity);
}

#[tokio::test]
async fn failed_resolution_leaves_the_stored_identity_untouched() {
    let pub_url = "https://medium.com/not-a-publication";
    let remote = MockRemote::new().with_page(pub_url, "<body>no fence here</body>".to_string());

    let orchestrator = seeded_orchestrator(remote).await;
    let before = orchestrator.settings().publication().await.unwrap();

    assert!(matches!(
        orchestrator.resolve_publication(pub_url).await,
        Err(SubmitError::PublicationNotFound { .. })
    ));

    let after = orchestrator.settings().publication().await.unwrap();
    assert_eq!(before, after);
    assert!(after.is_unset());
}

#[tokio::test]
async fn quick_request_message_submits_the_active_story() {
    let story = "https://medium.com/@a/current-tab-story";
    let remote = MockRemote::new().with_page(story, story_markup("p9", "u9", "Niner Author"));

    let orchestrator = seeded_orchestrator(remote).await;
    let response = orchestrator
        .handle(
            HostMessage::QuickRequest { template_id: 1 },
            &HostContext::with_story(story),
        )
        .await
        .unwrap();

    match response {
        HostResponse::Outcome(outcome) => assert!(outcome.success),
        other => panic!("unexpected response: {other:?}"),
    }
    assert_eq!(orchestrator.remote().submissions()[0].author_id, "u9");
}

#[tokio::test]
async fn quick_request_without_a_story_is_an_error() {
    let orchestrator = seeded_orchestrator(MockRemote::new()).await;
    assert!(matches!(
        orchestrator
            .handle(
                HostMessage::QuickRequest { template_id: 1 },
                &HostContext::empty()
            )
            .await,
        Err(SubmitError::NoActiveStory)
    ));
}

#[tokio::test]
async fn home_quick_request_builds_the_story_url_from_the_post_id() {
    let remote = MockRemote::new().with_page(
        "https://medium.com/@elysian/p42",
        story_markup("p42", "u4", "Home Author"),
    );

    let orchestrator = seeded_orchestrator(remote).await;
    let response = orchestrator
        .handle(
            HostMessage::HomeQuickRequest {
                post_id: "p42".to_string(),
                template_id: 1,
            },
            &HostContext::empty(),
        )
        .await
        .unwrap();

    match response {
        HostResponse::Outcome(outcome) => assert!(outcome.success),
        other => panic!("unexpected response: {other:?}"),
    }
    assert_eq!(
        orchestrator.remote().submissions()[0].payload.post_id,
        "p42"
    );
}

#[tokio::test]
async fn get_templates_returns_the_seeded_names() {
    let orchestrator = seeded_orchestrator(MockRemote::new()).await;
    let response = orchestrator
        .handle(HostMessage::GetTemplates, &HostContext::empty())
        .await
        .unwrap();

    match response {
        HostResponse::Templates(names) => {
            assert_eq!(names, vec!["Template 1", "Template 2", "Template 3"]);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}
