use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm::LlmClient;
use crate::screening::Screener;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Redis holds opaque bearer sessions (`session:{token}` with TTL).
    pub redis: RedisClient,
    /// Uploaded resume PDFs land in S3 / MinIO under `resumes/{id}.pdf`.
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    /// Pluggable screening backend. Default: LlmScreener.
    /// Swap via ENABLE_KEYWORD_SCREENING for offline operation.
    pub screener: Arc<dyn Screener>,
}
