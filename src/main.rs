use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nursery_reports::{config::Config, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    if !config.data_dir.is_dir() {
        tracing::warn!("Data directory {} does not exist yet", config.data_dir.display());
    }
    info!("Serving snapshots from {}", config.data_dir.display());

    let addr = format!("{}:{}", config.host, config.port);
    let cors = cors_layer(config.app_base_url.clone());
    let state = AppState::new(config);

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    info!("nursery-reports API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Allow the app base URL and its subdomains; localhost is always allowed.
fn cors_layer(base: String) -> CorsLayer {
    let origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
            return true;
        }
        if o == base {
            return true;
        }
        if let Some(idx) = base.find("://") {
            let after_scheme = &base[idx + 3..];
            let domain = after_scheme.split('/').next().unwrap_or(after_scheme);
            let domain_clean = domain.split(':').next().unwrap_or(domain);
            if o.ends_with(&format!(".{domain_clean}")) {
                return true;
            }
        }
        false
    });

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-school"),
        ]))
        .expose_headers([header::CONTENT_DISPOSITION])
        .allow_origin(origin)
}
