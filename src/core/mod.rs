pub mod ads;
pub mod conversion;
pub mod entitlement;
pub mod history;
pub mod plans;
pub mod quota;
pub mod tools;
pub mod uploader;

pub use crate::core::entitlement::Entitlement;
pub use crate::domain::model::{
    ConversionCategory, ConversionRecord, ConversionRequest, ConvertedFile, NewConversionRecord,
    PlanType, SubscriptionPlan, UploadedFile, UserId,
};
pub use crate::domain::ports::{
    Clock, Converter, HistoryStore, IdentityResolver, Storage, SubscriptionStore,
};
pub use crate::utils::error::Result;
