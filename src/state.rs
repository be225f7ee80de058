use crate::config::settings::AppConfig;
use crate::infrastructure::encoding::EncodingService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub encoding: Arc<dyn EncodingService>,
}

impl AppState {
    pub fn new(config: AppConfig, encoding: Arc<dyn EncodingService>) -> Self {
        Self { config, encoding }
    }
}
