use std::sync::Arc;

use crate::domain::repositories::ProductRepository;
use crate::infrastructure::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ProductRepository>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ProductRepository>, config: AppConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}
