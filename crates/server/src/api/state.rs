use std::sync::Arc;

use data_loader::DataIndex;
use recommender::RecommenderConfig;

use crate::config::Config;
use crate::service::RecommendationService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: RecommendationService,
}

impl AppState {
    pub fn new(service: RecommendationService) -> Self {
        Self { service }
    }

    /// Build state over a loaded index using the server configuration
    pub fn from_config(data_index: Arc<DataIndex>, config: &Config) -> anyhow::Result<Self> {
        let core: RecommenderConfig = config.recommender_config()?;
        Ok(Self::new(RecommendationService::new(
            data_index,
            core,
            config.request_timeout(),
        )))
    }
}
