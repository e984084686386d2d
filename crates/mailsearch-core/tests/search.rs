//! End-to-end search tests against an in-memory `SQLite` store.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};

use mailsearch_core::search::{ErrorCode, ResponseData};
use mailsearch_core::{
    AcceptedDomains, EmailRecord, EmailRepository, MessageStore, NewEmail, Query, Recipient,
    SearchError, SearchService,
};

/// Repository wrapper that counts how often the store is queried.
struct CountingStore {
    inner: EmailRepository,
    calls: AtomicUsize,
}

impl MessageStore for CountingStore {
    async fn find(&self, query: &Query) -> mailsearch_core::Result<Vec<EmailRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find(query).await
    }
}

async fn service_with(emails: &[NewEmail]) -> SearchService<EmailRepository> {
    let repo = EmailRepository::in_memory().await.unwrap();
    for email in emails {
        repo.insert(email).await.unwrap();
    }
    SearchService::new(repo, AcceptedDomains::new(["accepted.com"]))
}

fn received(from: &str, to: &str) -> NewEmail {
    NewEmail::received(from, vec![Recipient::new(to)])
}

#[tokio::test]
async fn search_matches_sender_and_recipient() {
    let service = service_with(&[received("alice@x.com", "user@accepted.com")]).await;

    let found = service
        .search("alice@x.com", "user@accepted.com")
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].from_address, "alice@x.com");

    let other = service
        .search("alice@x.com", "other@accepted.com")
        .await
        .unwrap();
    assert!(other.is_empty());

    let wrong_sender = service
        .search("bob@x.com", "user@accepted.com")
        .await
        .unwrap();
    assert!(wrong_sender.is_empty());
}

#[tokio::test]
async fn search_returns_newest_first() {
    let service = service_with(&[
        received("alice@x.com", "user@accepted.com"),
        received("alice@x.com", "user@accepted.com"),
        received("alice@x.com", "user@accepted.com"),
    ])
    .await;

    let ids: Vec<i64> = service
        .search("alice@x.com", "user@accepted.com")
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn search_does_not_match_substrings() {
    let service = service_with(&[received("alice@x.com", "notuser@accepted.com")]).await;

    let found = service
        .search("alice@x.com", "user@accepted.com")
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn search_matches_any_entry_of_multi_recipient_list() {
    let email = NewEmail::received(
        "alice@x.com",
        vec![
            Recipient::with_name("first@accepted.com", "First"),
            Recipient::new("user@accepted.com"),
        ],
    );
    let service = service_with(&[email]).await;

    let found = service
        .search("alice@x.com", "user@accepted.com")
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].to.len(), 2);
}

#[tokio::test]
async fn handle_returns_matching_record_in_envelope() {
    let service =
        service_with(&[received("a@b.com", "c@accepted.com").subject("hello there")]).await;

    let response = service
        .handle(br#"{"from":"a@b.com","to":"c@accepted.com","subject":"hi"}"#)
        .await;
    assert!(response.is_success());

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["errorNo"], 0);
    let emails = json["data"]["emails"].as_array().unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0]["id"], 1);
    assert_eq!(emails[0]["from_address"], "a@b.com");
    assert_eq!(emails[0]["subject"], "hello there");
    assert_eq!(emails[0]["to"][0]["EmailAddress"], "c@accepted.com");
}

#[tokio::test]
async fn handle_rejects_unknown_domain() {
    let service = service_with(&[received("a@b.com", "c@unknown.com")]).await;

    let response = service
        .handle(br#"{"from":"a@b.com","to":"c@unknown.com","subject":"hi"}"#)
        .await;
    assert_eq!(response.error_no, ErrorCode::ParamsError);
    assert_eq!(response.error_msg, "params error");
    assert_eq!(response.data, ResponseData::Detail(String::new()));

    let err = service
        .validate(br#"{"from":"a@b.com","to":"c@unknown.com","subject":"hi"}"#)
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidRecipientDomain(_)));
}

#[tokio::test]
async fn handle_reports_malformed_payload() {
    let service = service_with(&[]).await;

    let response = service.handle(b"{\"from\":").await;
    assert_eq!(response.error_no, ErrorCode::ParamsError);
    assert_eq!(response.error_msg, "params error");
    assert!(matches!(response.data, ResponseData::Detail(ref d) if !d.is_empty()));
}

#[tokio::test]
async fn handle_rejects_non_object_payloads_before_store() {
    let repo = EmailRepository::in_memory().await.unwrap();
    repo.insert(&received("a@b.com", "c@accepted.com"))
        .await
        .unwrap();
    let store = CountingStore {
        inner: repo,
        calls: AtomicUsize::new(0),
    };
    let service = SearchService::new(&store, AcceptedDomains::new(["accepted.com"]));

    for payload in [
        r#"["a@b.com","c@accepted.com","hi"]"#,
        r#"["a@b.com"]"#,
        r#""a@b.com""#,
        "5",
        "null",
    ] {
        let response = service.handle(payload.as_bytes()).await;
        assert_eq!(response.error_no, ErrorCode::ParamsError, "{payload}");
        assert_eq!(response.error_msg, "params error", "{payload}");
    }
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);

    let err = service
        .validate(br#"["a@b.com","c@accepted.com","hi"]"#)
        .unwrap_err();
    assert!(matches!(err, SearchError::MalformedInput(_)));

    let response = service
        .handle(br#"{"from":"a@b.com","to":"c@accepted.com","subject":"hi"}"#)
        .await;
    assert!(response.is_success());
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn service_works_over_borrowed_store() {
    let repo = EmailRepository::in_memory().await.unwrap();
    repo.insert(&received("alice@x.com", "user@accepted.com"))
        .await
        .unwrap();

    let service = SearchService::new(&repo, AcceptedDomains::new(["accepted.com"]));
    let found = service
        .search("alice@x.com", "user@accepted.com")
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}
