use crate::handlers;
use crate::state::AppState;
use crate::storage::ScoreStore;
use axum::{routing::{get, post}, Router};

pub fn router<S: ScoreStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(handlers::index::<S>))
        .route("/score", post(handlers::save_score_form::<S>))
        .route(
            "/api/scores",
            get(handlers::list_scores::<S>).post(handlers::save_score::<S>),
        )
        .route("/api/export", get(handlers::export::<S>))
        .with_state(state)
}
