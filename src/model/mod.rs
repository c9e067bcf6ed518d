pub mod linear;
pub mod ml_client;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::info;

use crate::{
    config::Config,
    features::{FeatureRow, ModelSchema},
};

pub use linear::LinearModel;
pub use ml_client::RemoteModel;

/// A trained price regressor. The model itself is opaque, only its declared
/// input schema and a single-row predict are relied upon.
#[async_trait]
pub trait Regressor: Send + Sync {
    fn schema(&self) -> ModelSchema;

    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }

    async fn predict(&self, row: &FeatureRow) -> Result<f64>;
}

pub async fn load_model(config: &Config) -> Result<Arc<dyn Regressor>> {
    if let Some(path) = &config.model_path {
        let model = LinearModel::from_file(path)?;
        info!(
            "loaded linear model from {} ({} coefficients)",
            path,
            model.width()
        );
        return Ok(Arc::new(model));
    }

    if let Some(url) = &config.ml_service_url {
        let model = RemoteModel::connect(url).await?;
        info!("using remote ML service at {}", url);
        return Ok(Arc::new(model));
    }

    Err(anyhow!(
        "No model configured, set either model_path or ml_service_url"
    ))
}
