pub mod dates;
mod dto;
pub mod extract;
pub mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::subsidy_routes()
}
