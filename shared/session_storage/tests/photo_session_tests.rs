//! Integration tests for the photo session table.
//!
//! These run against a local DynamoDB endpoint (LocalStack) and are ignored
//! by default: `cargo test -- --ignored` with LocalStack running.

use std::sync::Arc;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use chrono::Utc;
use session_storage::photo_session::{
    PhotoSession, PhotoSessionAttribute, SessionStorage, SessionStorageError,
};
use uuid::Uuid;

/// Test configuration for LocalStack
const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";
const TEST_REGION: &str = "us-east-1";

/// Test context that automatically cleans up the table on drop
struct TestContext {
    storage: SessionStorage,
    table_name: String,
    dynamodb_client: Arc<DynamoDbClient>,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let client = self.dynamodb_client.clone();
        let table = self.table_name.clone();

        let handle = tokio::runtime::Handle::try_current();
        if let Ok(handle) = handle {
            handle.spawn(async move {
                let _ = client.delete_table().table_name(&table).send().await;
            });
        }
    }
}

/// Creates a test setup with a unique table
async fn setup_test() -> TestContext {
    let table_name = format!("test-photo-sessions-{}", Uuid::new_v4());

    let credentials = Credentials::from_keys("test", "test", None);
    let config = aws_config::defaults(BehaviorVersion::latest())
        .endpoint_url(LOCALSTACK_ENDPOINT)
        .region(Region::new(TEST_REGION))
        .credentials_provider(credentials)
        .load()
        .await;

    let dynamodb_client = Arc::new(DynamoDbClient::new(&config));

    // Create a table to avoid race conditions among tests
    dynamodb_client
        .create_table()
        .table_name(&table_name)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(PhotoSessionAttribute::SessionId.to_string())
                .attribute_type(ScalarAttributeType::S)
                .build()
                .unwrap(),
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(PhotoSessionAttribute::SessionId.to_string())
                .key_type(KeyType::Hash)
                .build()
                .unwrap(),
        )
        .billing_mode(aws_sdk_dynamodb::types::BillingMode::PayPerRequest)
        .send()
        .await
        .expect("Failed to create test table");

    // Enable TTL
    dynamodb_client
        .update_time_to_live()
        .table_name(&table_name)
        .time_to_live_specification(
            aws_sdk_dynamodb::types::TimeToLiveSpecification::builder()
                .enabled(true)
                .attribute_name(PhotoSessionAttribute::Ttl.to_string())
                .build()
                .unwrap(),
        )
        .send()
        .await
        .expect("Failed to enable TTL");

    // Wait a bit for table to be ready
    tokio::time::sleep(Duration::from_millis(100)).await;

    let storage = SessionStorage::new(dynamodb_client.clone(), table_name.clone());

    TestContext {
        storage,
        table_name,
        dynamodb_client,
    }
}

/// Creates a test photo session with a unique session id
fn create_test_session() -> PhotoSession {
    let now = Utc::now().timestamp();
    PhotoSession {
        session_id: Uuid::new_v4().to_string(),
        event_id: format!("event-{}", Uuid::new_v4()),
        password_hash: "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW".to_string(),
        photo_urls: vec!["u1".to_string(), "u2".to_string(), "u3".to_string()],
        selected_photos: vec![],
        created_at: now,
        updated_at: now,
        ttl: now + 24 * 60 * 60,
    }
}

#[tokio::test]
#[ignore = "requires a local DynamoDB endpoint"]
async fn test_insert_and_get_by_id() {
    let context = setup_test().await;

    let session = create_test_session();
    context
        .storage
        .insert(&session)
        .await
        .expect("Failed to insert session");

    let retrieved = context
        .storage
        .get_by_id(&session.session_id)
        .await
        .expect("Failed to get by id")
        .expect("Session should exist");

    assert_eq!(retrieved, session);

    // Get non-existent session id - should return None
    let non_existent = context
        .storage
        .get_by_id("non-existent-session")
        .await
        .expect("Failed to get non-existent");

    assert!(non_existent.is_none());
}

#[tokio::test]
#[ignore = "requires a local DynamoDB endpoint"]
async fn test_insert_duplicate_prevention() {
    let context = setup_test().await;

    let session = create_test_session();

    // First insert should succeed
    context
        .storage
        .insert(&session)
        .await
        .expect("First insert should succeed");

    // Second insert with same session id should fail
    let result = context.storage.insert(&session).await;
    assert!(matches!(result, Err(SessionStorageError::SessionExists)));

    // Insert with different session id should succeed
    let mut other = create_test_session();
    other.event_id = session.event_id.clone();

    context
        .storage
        .insert(&other)
        .await
        .expect("Insert with different session id should succeed");
}

#[tokio::test]
#[ignore = "requires a local DynamoDB endpoint"]
async fn test_update_selected_photos() {
    let context = setup_test().await;

    let session = create_test_session();
    context
        .storage
        .insert(&session)
        .await
        .expect("Failed to insert session");

    let selection = vec!["u1".to_string(), "u3".to_string()];
    context
        .storage
        .update_selected_photos(&session.session_id, &selection)
        .await
        .expect("Failed to update selection");

    let retrieved = context
        .storage
        .get_by_id(&session.session_id)
        .await
        .expect("Failed to get by id")
        .expect("Session should exist");

    assert_eq!(retrieved.selected_photos, selection);
    // Photo list is untouched, updated_at has been bumped
    assert_eq!(retrieved.photo_urls, session.photo_urls);
    assert!(retrieved.updated_at >= session.updated_at);
}

#[tokio::test]
#[ignore = "requires a local DynamoDB endpoint"]
async fn test_delete() {
    let context = setup_test().await;

    let session = create_test_session();
    context
        .storage
        .insert(&session)
        .await
        .expect("Failed to insert session");

    context
        .storage
        .delete(&session.session_id)
        .await
        .expect("Failed to delete session");

    let retrieved = context
        .storage
        .get_by_id(&session.session_id)
        .await
        .expect("Failed to get by id");

    assert!(retrieved.is_none());
}
