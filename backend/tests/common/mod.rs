// Not every util is used in every test, so we allow dead code
#![allow(dead_code)]

use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_s3::Client as S3Client;
use axum::{body::Body, http::Request, response::Response, Extension, Router};
use photoshare_backend::{
    jwt::JwtManager, media_storage::MediaStorage, routes, types::Environment,
};
use session_storage::photo_session::SessionStorage;
use tower::ServiceExt;

/// Base test setup with core dependencies
///
/// The AWS clients point at the development LocalStack endpoint but are
/// never contacted by the request paths exercised here (auth and
/// validation failures short-circuit before any storage call).
pub struct TestSetup {
    pub router: Router,
    pub environment: Environment,
    pub jwt_manager: Arc<JwtManager>,
}

impl TestSetup {
    pub async fn new() -> Self {
        // Initialize tracing for tests
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .try_init()
            .ok();

        let environment = Environment::Development {
            presign_expiry_override: None,
        };

        let s3_config = environment.s3_client_config().await;
        let s3_client = Arc::new(S3Client::from_conf(s3_config));

        let media_storage = Arc::new(MediaStorage::new(
            s3_client,
            environment.s3_bucket(),
            environment.presigned_url_expiry_secs(),
        ));

        let dynamodb_client = Arc::new(DynamoDbClient::new(&environment.aws_config().await));
        let session_storage = Arc::new(SessionStorage::new(
            dynamodb_client,
            environment.session_table_name(),
        ));

        let jwt_manager = Arc::new(JwtManager::new(&environment.jwt_secret()));

        let router: Router = routes::handler()
            .layer(Extension(environment.clone()))
            .layer(Extension(media_storage))
            .layer(Extension(session_storage))
            .layer(Extension(jwt_manager.clone()))
            .into();

        Self {
            router,
            environment,
            jwt_manager,
        }
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
        bearer_token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", "application/json");
        if let Some(token) = bearer_token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = builder
            .body(Body::from(payload.to_string()))
            .expect("failed to build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed")
    }

    pub async fn send_get_request(&self, route: &str, bearer_token: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(route).method("GET");
        if let Some(token) = bearer_token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::empty()).expect("failed to build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed")
    }
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    use http_body_util::BodyExt;

    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
