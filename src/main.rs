use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vynce_api::auth::JwtValidator;
use vynce_api::{create_router, db, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Starting vynce-api");

    let cfg_path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config/config.yaml".into());
    let cfg = Config::load(&cfg_path)?;
    info!("Configuration loaded from {}", cfg_path);

    let http = reqwest::Client::builder()
        .user_agent(concat!("vynce-api/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let jwks = match (&cfg.supabase.jwks_url, &cfg.supabase.issuer) {
        (Some(jwks_url), Some(issuer)) => {
            match JwtValidator::new(&http, jwks_url, issuer.clone()).await {
                Ok(validator) => {
                    info!("Loaded JWKS from {}", jwks_url);
                    Some(validator)
                }
                Err(e) => {
                    warn!("Failed to load JWKS from {}: {}", jwks_url, e);
                    None
                }
            }
        }
        _ => None,
    };

    // Status endpoints must keep answering while the database is down
    let pool = db::connect_lazy(&cfg.database)?;
    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => info!("Connected to database"),
        Err(e) => warn!("Database not reachable at startup: {}", e),
    }

    let addr = cfg.bind_address();
    let state = AppState::new(pool, cfg, http, jwks);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    info!("API server listening on {}", addr);

    let serve = axum::serve(listener, router);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    if let Err(e) = serve.with_graceful_shutdown(shutdown).await {
        tracing::error!(error = %e, "API server error");
    }

    info!("Application shutdown complete");
    Ok(())
}
