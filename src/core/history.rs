use crate::core::{Clock, ConversionRecord, HistoryStore, UserId};
use crate::utils::error::Result;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub file_name: String,
    pub conversion_type: String,
    pub file_size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub relative_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub authenticated: bool,
    pub conversions: Vec<HistoryEntry>,
}

impl HistoryView {
    /// Neutral state shown to callers without an identity.
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            conversions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }
}

pub struct HistoryViewer {
    history: Arc<dyn HistoryStore>,
    clock: Arc<dyn Clock>,
}

impl HistoryViewer {
    pub fn new(history: Arc<dyn HistoryStore>, clock: Arc<dyn Clock>) -> Self {
        Self { history, clock }
    }

    pub async fn load(&self, user_id: Option<&UserId>) -> Result<HistoryView> {
        let Some(user_id) = user_id else {
            return Ok(HistoryView::anonymous());
        };

        let records = self.history.recent(user_id, HISTORY_LIMIT).await?;
        let now = self.clock.now();
        let conversions = records
            .into_iter()
            .take(HISTORY_LIMIT)
            .map(|record| to_entry(record, now))
            .collect();

        Ok(HistoryView {
            authenticated: true,
            conversions,
        })
    }
}

fn to_entry(record: ConversionRecord, now: DateTime<Utc>) -> HistoryEntry {
    HistoryEntry {
        id: record.id.to_string(),
        relative_date: relative_date(record.created_at, now, &Local),
        file_name: record.file_name,
        conversion_type: record.conversion_type,
        file_size_bytes: record.file_size_bytes,
        created_at: record.created_at,
    }
}

/// Day-granular label for a record, computed on the local calendar of `tz`.
pub fn relative_date<Tz: chrono::TimeZone>(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> String {
    let created_day = created_at.with_timezone(tz).date_naive();
    let today = now.with_timezone(tz).date_naive();
    let days = (today - created_day).num_days();

    match days {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        _ => created_day.format("%Y-%m-%d").to_string(),
    }
}
