use std::time::Duration;

use anyhow::Result;
use browser_tests::{employee_fixtures, spawn_garbage_upstream, spawn_upstream};
use platform_api::{ApiError, Endpoint, FetchOutcome, Gateway, HttpTransport};

fn gateway(base_url: &str) -> Result<Gateway<HttpTransport>> {
    Ok(Gateway::new(HttpTransport::new(
        base_url,
        Duration::from_secs(5),
    )?))
}

#[tokio::test]
async fn reads_all_four_endpoints() -> Result<()> {
    let upstream = spawn_upstream(employee_fixtures()).await?;
    let gateway = gateway(&upstream.base_url())?;

    let users = gateway.fetch_users().await.into_items().unwrap();
    assert_eq!(users.len(), 2);

    let posts = gateway.fetch_user_posts(3).await.into_items().unwrap();
    assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), [21, 22]);

    let author = gateway.fetch_user(3).await.into_entity().unwrap();
    assert_eq!(author.company.catch_phrase, "Face to face bifurcated interface");

    let comments = gateway.fetch_post_comments(22).await.into_items().unwrap();
    assert_eq!(comments.len(), 3);
    assert!(comments.iter().all(|c| c.post_id == 22));

    assert_eq!(upstream.hits(), 4);
    Ok(())
}

#[tokio::test]
async fn not_found_user_is_a_null_fallback() -> Result<()> {
    let upstream = spawn_upstream(employee_fixtures()).await?;
    let gateway = gateway(&upstream.base_url())?;

    let outcome = gateway.fetch_user(77).await;
    assert!(matches!(
        outcome,
        FetchOutcome::Failed(ApiError::Status {
            endpoint: Endpoint::User(77),
            status: 404
        })
    ));
    assert_eq!(outcome.into_entity(), None);
    Ok(())
}

#[tokio::test]
async fn non_json_bodies_fall_back_to_empty_lists() -> Result<()> {
    let upstream = spawn_garbage_upstream().await?;
    let gateway = gateway(&upstream.base_url())?;

    let outcome = gateway.fetch_post_comments(5).await;
    assert!(matches!(outcome, FetchOutcome::Failed(ApiError::Decode { .. })));
    assert_eq!(outcome.into_items(), Some(Vec::new()));

    assert_eq!(gateway.fetch_users().await.into_items(), Some(Vec::new()));
    assert_eq!(upstream.hits(), 2);
    Ok(())
}

#[tokio::test]
async fn falsy_ids_issue_no_http_requests() -> Result<()> {
    let upstream = spawn_upstream(employee_fixtures()).await?;
    let gateway = gateway(&upstream.base_url())?;

    assert!(gateway.fetch_user_posts(0).await.is_skipped());
    assert!(gateway.fetch_user(0).await.is_skipped());
    assert!(gateway.fetch_post_comments(0).await.is_skipped());
    assert_eq!(upstream.hits(), 0);
    Ok(())
}
