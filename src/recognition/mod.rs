pub mod classifier;
pub mod food_db;
mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::recognition_routes()
}
