//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Server port
    pub port: u16,

    /// JWT secret key
    pub jwt_secret: String,

    /// JWT expiration in minutes
    pub token_expire_minutes: u64,

    /// Classification backend ("keyword" or "zero-shot")
    pub classifier_backend: String,

    /// Zero-shot inference endpoint
    pub inference_url: String,

    /// Per-request timeout against the inference endpoint, in seconds
    pub inference_timeout_secs: u64,

    /// Capacity of the classification job queue
    pub classify_queue_size: usize,

    /// Number of classification jobs processed concurrently
    pub classify_concurrency: usize,

    /// Seeded admin account
    pub admin_email: String,
    pub admin_password: String,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://incidentdesk.db".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "incidentdesk-super-secret-key-change-in-production".to_string()),

            token_expire_minutes: env::var("TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(30),

            classifier_backend: env::var("CLASSIFIER_BACKEND")
                .unwrap_or_else(|_| "keyword".to_string()),

            inference_url: env::var("INFERENCE_URL").unwrap_or_else(|_| {
                "https://api-inference.huggingface.co/models/joeddav/xlm-roberta-large-xnli"
                    .to_string()
            }),

            inference_timeout_secs: env::var("INFERENCE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),

            classify_queue_size: env::var("CLASSIFY_QUEUE_SIZE")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(256),

            classify_concurrency: env::var("CLASSIFY_CONCURRENCY")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(4),

            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".to_string()),

            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string()),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
