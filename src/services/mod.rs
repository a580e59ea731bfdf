use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod model;
mod repo;

pub fn router() -> Router<AppState> {
    handlers::router()
}
