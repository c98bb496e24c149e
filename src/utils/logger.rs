use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directives when `RUST_LOG` is unset. The server adds tower-http so
/// `TraceLayer` request spans show up; they are emitted at debug level.
fn default_directives(verbose: bool, server: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut directives = format!("convert_pro={},warn", level);
    if server {
        directives.push_str(&format!(",tower_http={}", level));
    }
    directives
}

fn env_filter(verbose: bool, server: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, server)))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose, false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .compact(),
        )
        .init();
}

pub fn init_server_logger(verbose: bool, json: bool) {
    let registry = tracing_subscriber::registry().with(env_filter(verbose, true));

    if json {
        // 正式環境輸出 JSON 方便日誌收集
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true).compact())
            .init();
    }
}
