pub mod app;
pub mod cache;
pub mod client;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod store;

pub use app::router;
pub use cache::LocalCache;
pub use client::HybridClient;
pub use state::AppState;
pub use store::{CounterStore, DEFAULT_COUNT, DEFAULT_USER_ID};
