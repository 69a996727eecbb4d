//! usergate - user accounts over HTTP
//!
//! Registration, login and user management behind bearer-token
//! authentication with a two-level role gate. The binary wraps this
//! library with a CLI; tests and embedders can build the router directly
//! from [`api::AppState`] and any [`store::UserStore`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
