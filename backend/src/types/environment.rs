//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};

/// Default session lifetime: 30 days
const DEFAULT_SESSION_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development {
        /// Optional override for presigned URL expiry in seconds
        presign_expiry_override: Option<u64>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => {
                let presign_expiry_override = env::var("PRESIGNED_URL_EXPIRY_SECS")
                    .ok()
                    .and_then(|val| val.parse::<u64>().ok());

                Self::Development {
                    presign_expiry_override,
                }
            }
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the S3 bucket name for photo uploads
    ///
    /// # Panics
    ///
    /// Panics if the `S3_BUCKET_NAME` environment variable is not set
    #[must_use]
    pub fn s3_bucket(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME environment variable is not set")
            }
            Self::Development { .. } => {
                env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "photoshare-media".to_string())
            }
        }
    }

    /// Returns the DynamoDB table name for photo sessions
    ///
    /// # Panics
    ///
    /// Panics if the `SESSION_TABLE_NAME` environment variable is not set
    #[must_use]
    pub fn session_table_name(&self) -> String {
        match self {
            Self::Production | Self::Staging => env::var("SESSION_TABLE_NAME")
                .expect("SESSION_TABLE_NAME environment variable is not set"),
            Self::Development { .. } => {
                env::var("SESSION_TABLE_NAME").unwrap_or_else(|_| "photo-sessions".to_string())
            }
        }
    }

    /// Returns the secret for signing access tokens
    ///
    /// # Panics
    ///
    /// Panics if the `JWT_SECRET` environment variable is not set outside of
    /// development
    #[must_use]
    pub fn jwt_secret(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("JWT_SECRET").expect("JWT_SECRET environment variable is not set")
            }
            Self::Development { .. } => {
                env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-not-for-production".to_string())
            }
        }
    }

    /// Base URL used to build shareable session links
    #[must_use]
    pub fn share_link_base_url(&self) -> String {
        env::var("SHARE_LINK_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development { .. } | Self::Staging)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development { .. } => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development { .. }) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Presigned upload URL expiry time in seconds
    #[must_use]
    pub fn presigned_url_expiry_secs(&self) -> u64 {
        match self {
            Self::Production | Self::Staging => {
                // Default: 1 hour
                60 * 60
            }
            Self::Development {
                presign_expiry_override,
            } => {
                // Use override if provided, otherwise default to 1 hour
                presign_expiry_override.unwrap_or(60 * 60)
            }
        }
    }

    /// Session lifetime in seconds; expired sessions read as not found
    #[must_use]
    pub fn session_ttl_secs(&self) -> i64 {
        env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|val| val.parse::<i64>().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_SECS)
    }
}
