use std::{env, net::SocketAddr};

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use payment_counter::{router, AppState, CounterStore, DEFAULT_COUNT, DEFAULT_USER_ID};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut store = CounterStore::new();
    store.create(DEFAULT_USER_ID, DEFAULT_COUNT);
    let state = AppState::new(store);

    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
