use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod jwt;
mod password;
pub mod repo;

pub use jwt::AuthUser;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
