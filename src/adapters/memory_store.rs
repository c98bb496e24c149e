use crate::core::{
    ConversionRecord, HistoryStore, NewConversionRecord, PlanType, SubscriptionStore, UserId,
};
use crate::utils::error::{ConvertError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// In-process stand-in for the subscriptions and conversion history tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
    subscriptions: Mutex<HashMap<UserId, PlanType>>,
    history: Mutex<Vec<ConversionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriptions(plans: impl IntoIterator<Item = (UserId, PlanType)>) -> Self {
        let store = Self::new();
        for (user_id, plan) in plans {
            store.set_plan(user_id, plan);
        }
        store
    }

    pub fn set_plan(&self, user_id: UserId, plan: PlanType) {
        if let Ok(mut subscriptions) = self.subscriptions.lock() {
            subscriptions.insert(user_id, plan);
        }
    }

    /// Every record of one user, in insertion order.
    pub fn records_for(&self, user_id: &UserId) -> Vec<ConversionRecord> {
        self.history
            .lock()
            .map(|history| {
                history
                    .iter()
                    .filter(|r| &r.user_id == user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn history(&self) -> Result<MutexGuard<'_, Vec<ConversionRecord>>> {
        self.history
            .lock()
            .map_err(|_| ConvertError::store("conversion history lock poisoned"))
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn plan_for(&self, user_id: &UserId) -> Result<Option<PlanType>> {
        let subscriptions = self
            .subscriptions
            .lock()
            .map_err(|_| ConvertError::store("subscriptions lock poisoned"))?;
        Ok(subscriptions.get(user_id).copied())
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn insert(&self, record: NewConversionRecord) -> Result<ConversionRecord> {
        let record = record.into_record(Uuid::new_v4());
        self.history()?.push(record.clone());
        Ok(record)
    }

    async fn count_since(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<u64> {
        let count = self
            .history()?
            .iter()
            .filter(|r| &r.user_id == user_id && r.created_at >= since)
            .count();
        Ok(count as u64)
    }

    async fn recent(&self, user_id: &UserId, limit: usize) -> Result<Vec<ConversionRecord>> {
        let mut records: Vec<ConversionRecord> = self
            .history()?
            .iter()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect();
        // 穩定排序：同一時間戳記時，較晚寫入者在前
        records.reverse();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }
}
