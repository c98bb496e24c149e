pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use config::AppConfig;
#[cfg(feature = "cli")]
pub use config::ServerArgs;

pub use adapters::{
    clock::SystemClock, converter::PassthroughConverter, http_client::HttpConvertClient,
    identity::TokenIdentity, memory_store::MemoryStore, storage::LocalStorage,
};
pub use core::{conversion::ConversionService, history::HistoryViewer, uploader::UploadForm};
pub use server::{build_router, start_server, AppState};
pub use utils::error::{ConvertError, Result};
