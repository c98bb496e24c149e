use crate::core::quota::{check_daily_quota, start_of_local_day};
use crate::core::{
    Clock, ConversionRequest, ConvertedFile, Converter, Entitlement, HistoryStore,
    NewConversionRecord, SubscriptionStore, UserId,
};
use crate::utils::error::{ConvertError, Result};
use std::sync::Arc;

/// Attachment name for a conversion result: `converted.<format>` with a lower-cased extension.
pub fn converted_file_name(output_format: &str) -> String {
    format!("converted.{}", output_format.to_lowercase())
}

/// Output formats end up in a header and a file name, so only plain
/// extension characters are accepted.
pub fn is_valid_output_format(output_format: &str) -> bool {
    !output_format.is_empty()
        && output_format
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
}

/// Server side of the conversion flow: entitlement, size and quota gating,
/// the conversion itself and the bookkeeping record.
#[derive(Clone)]
pub struct ConversionService {
    subscriptions: Arc<dyn SubscriptionStore>,
    history: Arc<dyn HistoryStore>,
    converter: Arc<dyn Converter>,
    clock: Arc<dyn Clock>,
}

impl ConversionService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionStore>,
        history: Arc<dyn HistoryStore>,
        converter: Arc<dyn Converter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            subscriptions,
            history,
            converter,
            clock,
        }
    }

    pub async fn entitlement_for(&self, user_id: &UserId) -> Result<Entitlement> {
        let plan = self.subscriptions.plan_for(user_id).await?;
        Ok(Entitlement::from_subscription(plan))
    }

    /// Runs one accepted-or-rejected conversion. Nothing is written unless
    /// field, size and quota checks all pass.
    pub async fn convert(
        &self,
        user_id: &UserId,
        entitlement: &Entitlement,
        request: ConversionRequest,
    ) -> Result<ConvertedFile> {
        let ConversionRequest {
            file,
            output_format,
            conversion_type,
        } = request;

        let (file, output_format) = match (file, output_format.filter(|f| !f.is_empty())) {
            (Some(file), Some(format)) => (file, format),
            _ => return Err(ConvertError::MissingFields),
        };
        if !is_valid_output_format(&output_format) {
            tracing::info!(user = %user_id, format = ?output_format, "Rejected output format");
            return Err(ConvertError::InvalidOutputFormat {
                format: output_format,
            });
        }
        let conversion_type = conversion_type.unwrap_or_default();

        if !entitlement.allows_size(file.size()) {
            tracing::info!(
                user = %user_id,
                size = file.size(),
                limit = entitlement.max_file_bytes,
                "Rejected oversized upload"
            );
            return Err(ConvertError::SizeExceeded {
                limit_label: entitlement.size_limit_label().to_string(),
                size_bytes: file.size(),
            });
        }

        let now = self.clock.now();
        if entitlement.daily_limit.is_some() {
            let used = self
                .history
                .count_since(user_id, start_of_local_day(now))
                .await?;
            tracing::debug!(user = %user_id, used, "Counted conversions in quota window");
            if let Err(e) = check_daily_quota(entitlement, used) {
                tracing::info!(user = %user_id, used, "Daily conversion limit reached");
                return Err(e);
            }
        }

        let file_name = file.file_name.clone();
        let file_size_bytes = file.size();

        let converted = self.converter.convert(file, &output_format).await?;

        // 紀錄寫入失敗不影響回應，與檔案交付並非同一交易
        let record = NewConversionRecord {
            user_id: user_id.clone(),
            conversion_type: conversion_type.clone(),
            file_name: file_name.clone(),
            file_size_bytes,
            created_at: self.clock.now(),
        };
        match self.history.insert(record).await {
            Ok(saved) => tracing::info!(
                user = %user_id,
                record = %saved.id,
                category = %conversion_type,
                file = %file_name,
                size = file_size_bytes,
                format = %output_format,
                "Conversion recorded"
            ),
            Err(e) => tracing::error!(
                user = %user_id,
                file = %file_name,
                "Failed to record conversion: {}",
                e
            ),
        }

        Ok(converted)
    }
}
