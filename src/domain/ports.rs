use crate::domain::model::{
    ConversionRecord, ConvertedFile, NewConversionRecord, PlanType, UploadedFile, UserId,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};

/// Destination for files the client downloads.
pub trait Storage: Send + Sync {
    /// Returns the full path the data was written to.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Resolves the caller behind an incoming request.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<UserId>;
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// `None` when the user has no subscription record.
    async fn plan_for(&self, user_id: &UserId) -> Result<Option<PlanType>>;
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn insert(&self, record: NewConversionRecord) -> Result<ConversionRecord>;
    async fn count_since(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<u64>;
    /// Most recent first, at most `limit` entries.
    async fn recent(&self, user_id: &UserId, limit: usize) -> Result<Vec<ConversionRecord>>;
}

#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, file: UploadedFile, output_format: &str) -> Result<ConvertedFile>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
