//! Repository behaviour against the in-memory document store
//!
//! These exercise the real repository logic (id codec, document mapping,
//! error classification) without a MongoDB server.

use domain_users::{
    DocumentStore, DocumentUserRepository, ErrorKind, InMemoryDocumentStore,
    InMemoryUserRepository, Operation, OperationContext, User, UserRepository,
};
use mongodb::bson::{doc, oid::ObjectId};
use serde_json::json;
use test_utils::TestDataBuilder;
use test_utils::assertions::assert_object_id_hex;

fn ctx() -> OperationContext {
    OperationContext::background()
}

#[tokio::test]
async fn test_alice_becomes_bob_then_disappears() {
    let repo = InMemoryUserRepository::in_memory();

    let id = repo
        .create(&ctx(), User::new().with_name("Alice"))
        .await
        .unwrap();
    assert_object_id_hex(&id, "create");

    let found = repo.find_one(&ctx(), &id).await.unwrap();
    assert_eq!(found, User::new().with_id(&id).with_name("Alice"));

    repo.update(&ctx(), User::new().with_id(&id).with_name("Bob"))
        .await
        .unwrap();
    let found = repo.find_one(&ctx(), &id).await.unwrap();
    assert_eq!(found.name.as_deref(), Some("Bob"));

    repo.delete(&ctx(), &id).await.unwrap();
    let err = repo.find_one(&ctx(), &id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_create_then_find_returns_input_plus_id() {
    let repo = InMemoryUserRepository::in_memory();
    let builder = TestDataBuilder::from_test_name("create_then_find");

    let input = User::new()
        .with_name("Alice")
        .with_email(builder.email("alice"))
        .with_username(builder.name("user", "alice"))
        .with_metadata(json!({"roles": ["admin"], "age": 31}));

    let id = repo.create(&ctx(), input.clone()).await.unwrap();
    let found = repo.find_one(&ctx(), &id).await.unwrap();

    assert_eq!(found, input.with_id(id));
}

#[tokio::test]
async fn test_identifier_is_never_a_stored_attribute() {
    let store = InMemoryDocumentStore::new();
    let repo = DocumentUserRepository::with_store(store.clone());

    let id = repo
        .create(&ctx(), User::new().with_id("ignored").with_name("Alice"))
        .await
        .unwrap();
    repo.update(&ctx(), User::new().with_id(&id).with_name("Bob"))
        .await
        .unwrap();

    let documents = store.documents().await;
    assert_eq!(documents.len(), 1);
    assert!(!documents[0].contains_key("id"));
    assert_eq!(documents[0].get_object_id("_id").unwrap().to_hex(), id);
}

#[tokio::test]
async fn test_well_formed_unused_id_is_not_found() {
    let repo = InMemoryUserRepository::in_memory();
    repo.create(&ctx(), User::new().with_name("Someone else"))
        .await
        .unwrap();
    let unused = ObjectId::new().to_hex();

    let err = repo.find_one(&ctx(), &unused).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = repo
        .update(&ctx(), User::new().with_id(&unused).with_name("Bob"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = repo.delete(&ctx(), &unused).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.id(), Some(unused.as_str()));
}

#[tokio::test]
async fn test_delete_zero_id_on_empty_collection_is_not_found() {
    let repo = InMemoryUserRepository::in_memory();

    let err = repo
        .delete(&ctx(), "000000000000000000000000")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_find_all_on_empty_collection() {
    let repo = InMemoryUserRepository::in_memory();
    assert!(repo.find_all(&ctx()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_all_in_store_order() {
    let repo = InMemoryUserRepository::in_memory();
    let mut ids = Vec::new();
    for name in ["Alice", "Bob", "Carol"] {
        ids.push(
            repo.create(&ctx(), User::new().with_name(name))
                .await
                .unwrap(),
        );
    }

    let users = repo.find_all(&ctx()).await.unwrap();

    let found: Vec<_> = users.iter().map(|u| u.id.clone()).collect();
    assert_eq!(found, ids);
}

#[tokio::test]
async fn test_update_leaves_absent_attributes_untouched() {
    let repo = InMemoryUserRepository::in_memory();
    let id = repo
        .create(
            &ctx(),
            User::new()
                .with_name("Alice")
                .with_email("alice@example.com"),
        )
        .await
        .unwrap();

    repo.update(&ctx(), User::new().with_id(&id).with_username("alice"))
        .await
        .unwrap();

    let found = repo.find_one(&ctx(), &id).await.unwrap();
    assert_eq!(found.name.as_deref(), Some("Alice"));
    assert_eq!(found.email.as_deref(), Some("alice@example.com"));
    assert_eq!(found.username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_identical_update_still_counts_as_found() {
    let repo = InMemoryUserRepository::in_memory();
    let id = repo
        .create(&ctx(), User::new().with_name("Alice"))
        .await
        .unwrap();

    let same = User::new().with_id(&id).with_name("Alice");
    repo.update(&ctx(), same.clone()).await.unwrap();
    repo.update(&ctx(), same).await.unwrap();
}

#[tokio::test]
async fn test_malformed_ids_are_invalid_identifier() {
    let repo = InMemoryUserRepository::in_memory();

    for bad in ["", "abc123", "zzzzzzzzzzzzzzzzzzzzzzzz", " 65f1c0ffee0000000000beef"] {
        let err = repo.find_one(&ctx(), bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier, "{bad:?}");

        let err = repo.delete(&ctx(), bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier, "{bad:?}");
    }
}

#[tokio::test]
async fn test_corrupt_document_is_decode_failure() {
    let store = InMemoryDocumentStore::new();
    let oid = ObjectId::new();
    store
        .insert_one(doc! { "_id": oid, "name": ["not", "a", "string"] })
        .await
        .unwrap();
    let repo = DocumentUserRepository::with_store(store);

    let err = repo.find_one(&ctx(), &oid.to_hex()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeFailed);

    let err = repo.find_all(&ctx()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeFailed);
}

#[tokio::test]
async fn test_unavailable_store_kind_per_operation() {
    let store = InMemoryDocumentStore::new();
    let repo = DocumentUserRepository::with_store(store.clone());
    let id = repo
        .create(&ctx(), User::new().with_name("Alice"))
        .await
        .unwrap();
    store.set_unavailable(true);

    let err = repo
        .create(&ctx(), User::new().with_name("Bob"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert_eq!(err.operation(), Operation::Create);

    let err = repo.find_one(&ctx(), &id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReadFailed);

    let err = repo.find_all(&ctx()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReadFailed);

    let err = repo
        .update(&ctx(), User::new().with_id(&id).with_name("Bob"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WriteFailed);

    let err = repo.delete(&ctx(), &id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WriteFailed);
    assert!(err.is_retryable());

    store.set_unavailable(false);
    assert_eq!(repo.find_one(&ctx(), &id).await.unwrap().id, id);
}

#[tokio::test]
async fn test_cancelled_context_leaves_store_untouched() {
    let store = InMemoryDocumentStore::new();
    let repo = DocumentUserRepository::with_store(store.clone());
    let ctx = OperationContext::background();
    ctx.cancel();

    let err = repo
        .create(&ctx, User::new().with_name("Alice"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Canceled);
    assert!(store.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_expired_deadline_is_deadline_exceeded() {
    let repo = InMemoryUserRepository::in_memory();
    let ctx = OperationContext::with_timeout(std::time::Duration::from_millis(5));
    tokio::time::advance(std::time::Duration::from_millis(10)).await;

    let err = repo.find_all(&ctx).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DeadlineExceeded);
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let repo = std::sync::Arc::new(InMemoryUserRepository::in_memory());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.create(&ctx(), User::new().with_name(format!("user-{i}")))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 16);
    assert_eq!(repo.find_all(&ctx()).await.unwrap().len(), 16);
}
