//! PostgreSQL repository tests. Each test gets a fresh database from
//! `#[sqlx::test]`, so they only run with `DATABASE_URL` set.

use shorturl::domain::entities::NewUrlRecord;
use shorturl::domain::repositories::UrlRepository;
use shorturl::error::AppError;
use shorturl::infrastructure::persistence::PgUrlRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn repository(pool: PgPool) -> PgUrlRepository {
    PgUrlRepository::new(Arc::new(pool))
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_and_find(pool: PgPool) {
    let repo = repository(pool);

    let created = repo
        .create(NewUrlRecord::new("abc123", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(created.short_code, "abc123");
    assert_eq!(created.clicks, 0);

    let by_code = repo.find_by_code("abc123").await.unwrap().unwrap();
    assert_eq!(by_code.id, created.id);

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.original_url, "https://example.com");

    assert!(repo.exists("abc123").await.unwrap());
    assert!(!repo.exists("ABC123").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_code_is_conflict(pool: PgPool) {
    let repo = repository(pool);

    repo.create(NewUrlRecord::new("dup001", "https://a.com"))
        .await
        .unwrap();
    let err = repo
        .create(NewUrlRecord::new("dup001", "https://b.com"))
        .await
        .unwrap_err();

    assert!(err.is_duplicate_code());
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_bulk_is_all_or_nothing(pool: PgPool) {
    let repo = repository(pool);

    repo.create(NewUrlRecord::new("taken1", "https://a.com"))
        .await
        .unwrap();

    let err = repo
        .create_bulk(vec![
            NewUrlRecord::new("fresh1", "https://b.com"),
            NewUrlRecord::new("taken1", "https://c.com"),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
    assert!(!repo.exists("fresh1").await.unwrap());

    let created = repo
        .create_bulk(vec![
            NewUrlRecord::new("fresh1", "https://b.com"),
            NewUrlRecord::new("fresh2", "https://c.com"),
        ])
        .await
        .unwrap();

    assert_eq!(created.len(), 2);
    assert_eq!(created[0].short_code, "fresh1");
    assert_eq!(created[1].short_code, "fresh2");
    assert_eq!(repo.count().await.unwrap(), 3);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_increment_clicks(pool: PgPool) {
    let repo = repository(pool);

    let record = repo
        .create(NewUrlRecord::new("click1", "https://example.com"))
        .await
        .unwrap();

    for _ in 0..3 {
        assert!(repo.increment_clicks(record.id).await.unwrap());
    }
    assert!(!repo.increment_clicks(record.id + 1000).await.unwrap());

    let stored = repo.find_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(stored.clicks, 3);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_newest_first(pool: PgPool) {
    let repo = repository(pool);

    for code in ["list01", "list02", "list03"] {
        repo.create(NewUrlRecord::new(code, "https://example.com"))
            .await
            .unwrap();
    }

    let first = repo.list(1, 2).await.unwrap();
    let codes: Vec<_> = first.iter().map(|r| r.short_code.as_str()).collect();
    assert_eq!(codes, ["list03", "list02"]);

    let second = repo.list(2, 2).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].short_code, "list01");
}
