pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registration_service: Arc<services::RegistrationService>,
}

impl AppState {
    pub fn new(repository: Arc<dyn repositories::RegistrationRepository>) -> Self {
        Self {
            registration_service: Arc::new(services::RegistrationService::new(repository)),
        }
    }
}
