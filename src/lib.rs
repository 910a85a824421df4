pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod utils;

use std::path::PathBuf;

use crate::services::account_service::AccountService;

#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
}

impl AppState {
    pub fn new() -> Self {
        let config = crate::config::get_config();
        let account_service = AccountService::new(config.state_file.clone().map(PathBuf::from));

        Self { account_service }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
