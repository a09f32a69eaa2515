use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use usersphere::infrastructure::seed::seed_demo_users;
use usersphere::{AppState, Config, InMemoryUserStore, PostgresUserStore, UserService, UserStore, build_router};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn open_store(config: &Config) -> Result<Arc<dyn UserStore>, Box<dyn std::error::Error>> {
    match config.database_url.as_deref() {
        Some(url) => {
            let store = PostgresUserStore::connect(url, config.max_connections).await?;
            if config.run_migrations {
                store.migrate().await?;
            }
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => warn!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received, closing server gracefully"),
        _ = terminate => info!("SIGTERM received, closing server gracefully"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    init_tracing(&config);
    info!(environment = %config.environment, "Starting UserSphere API");

    let store = open_store(&config).await?;
    if config.seed_demo_users {
        seed_demo_users(store.as_ref()).await?;
    }

    let service = Arc::new(UserService::new(store.clone()));
    let app = build_router(AppState::new(service, config.environment.clone()), &config);

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", addr);
    info!("API base: http://{}/api", addr);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    store.close().await;
    Ok(())
}
