//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod locations;
pub mod navigation;
pub mod scoreboard;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

/// Register every API handler; mounted under `/api/v1` by the server.
pub fn configure(cfg: &mut web::ServiceConfig) {
    auth::configure(cfg);
    navigation::configure(cfg);
    dashboard::configure(cfg);
    locations::configure(cfg);
    scoreboard::configure(cfg);
}
