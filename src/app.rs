use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/counter/:user_id",
            get(handlers::get_counter).patch(handlers::set_counter),
        )
        .route("/counter/:user_id/add", post(handlers::add_payment))
        .route("/counter/:user_id/pay", post(handlers::make_payment))
        .with_state(state)
}
