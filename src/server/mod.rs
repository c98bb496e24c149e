use std::{sync::Arc, time::Duration};

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub mod handlers;
pub mod response;

use crate::adapters::{
    clock::SystemClock, converter::PassthroughConverter, identity::TokenIdentity,
    memory_store::MemoryStore,
};
use crate::config::AppConfig;
use crate::core::{
    ads::AdNetwork, conversion::ConversionService, history::HistoryViewer, Clock, Converter,
    HistoryStore, IdentityResolver, SubscriptionStore,
};
use crate::utils::error::Result;
use handlers::{
    convert_handler, entitlement_handler, health_handler, history_handler, plans_handler,
    tools_handler,
};

pub struct AppState {
    pub identity: Arc<dyn IdentityResolver>,
    pub service: ConversionService,
    pub history: HistoryViewer,
    pub ad_network: AdNetwork,
    pub max_body_bytes: usize,
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityResolver>,
        subscriptions: Arc<dyn SubscriptionStore>,
        history: Arc<dyn HistoryStore>,
        converter: Arc<dyn Converter>,
        clock: Arc<dyn Clock>,
        ad_network: AdNetwork,
    ) -> Self {
        Self {
            identity,
            service: ConversionService::new(
                subscriptions,
                history.clone(),
                converter,
                clock.clone(),
            ),
            history: HistoryViewer::new(history, clock),
            ad_network,
            max_body_bytes: crate::core::entitlement::PREMIUM_MAX_FILE_BYTES as usize
                + 4 * 1024 * 1024,
            cors_origins: Vec::new(),
        }
    }

    /// Wires the in-memory adapters from configuration.
    pub fn from_config(config: &AppConfig) -> Arc<Self> {
        let store = Arc::new(MemoryStore::with_subscriptions(config.subscriptions()));
        let identity = Arc::new(TokenIdentity::new(config.identity_tokens()));
        let converter = Arc::new(PassthroughConverter::new(config.simulated_delay()));

        info!(
            "Loaded {} accounts, simulated conversion delay {:?}",
            config.accounts.len(),
            config.simulated_delay()
        );

        let mut state = Self::new(
            identity,
            store.clone(),
            store,
            converter,
            Arc::new(SystemClock),
            config.ad_network(),
        );
        state.max_body_bytes = config.server.max_body_bytes as usize;
        state.cors_origins = config.server.cors_origins.clone();
        Arc::new(state)
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let origins: Vec<HeaderValue> = state
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping CORS origin {origin}: {e}");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/convert", post(convert_handler))
        .route("/api/history", get(history_handler))
        .route("/api/entitlement", get(entitlement_handler))
        .route("/api/plans", get(plans_handler))
        .route("/tools", get(tools_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: AppConfig) -> Result<()> {
    info!("Initializing state...");
    let state = AppState::from_config(&config);

    info!("Starting server...");
    let app = build_router(state);

    let address = config.bind_address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
