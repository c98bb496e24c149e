use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque caller identifier handed out by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    #[default]
    Free,
    Premium,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Free => "free",
            PlanType::Premium => "premium",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "free" => Some(PlanType::Free),
            "premium" => Some(PlanType::Premium),
            _ => None,
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse grouping used for the tool tabs. Only informs the UI and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConversionCategory {
    #[default]
    Documents,
    Images,
    Media,
}

impl ConversionCategory {
    pub const ALL: [ConversionCategory; 3] = [
        ConversionCategory::Documents,
        ConversionCategory::Images,
        ConversionCategory::Media,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionCategory::Documents => "documents",
            ConversionCategory::Images => "images",
            ConversionCategory::Media => "media",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for ConversionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: PlanType,
    pub name: &'static str,
    pub description: &'static str,
    pub price_in_cents: u32,
    pub features: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_price_id: Option<&'static str>,
}

/// One accepted conversion. `conversion_type` is stored as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub conversion_type: String,
    pub file_name: String,
    pub file_size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConversionRecord {
    pub user_id: UserId,
    pub conversion_type: String,
    pub file_name: String,
    pub file_size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

impl NewConversionRecord {
    pub fn into_record(self, id: Uuid) -> ConversionRecord {
        ConversionRecord {
            id,
            user_id: self.user_id,
            conversion_type: self.conversion_type,
            file_name: self.file_name,
            file_size_bytes: self.file_size_bytes,
            created_at: self.created_at,
        }
    }
}

/// A file as received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Parsed multipart form of a conversion request. Fields stay optional until validated.
#[derive(Debug, Clone, Default)]
pub struct ConversionRequest {
    pub file: Option<UploadedFile>,
    pub output_format: Option<String>,
    pub conversion_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConvertedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
