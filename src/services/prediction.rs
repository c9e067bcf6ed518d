use anyhow::{anyhow, Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    features::align,
    model::Regressor,
    models::{history::format_price, house::RawInput},
};

#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub price: f64,
    pub formatted_price: String,
    pub message: String,
    pub columns: Vec<String>,
}

/// Validates the form, aligns it to the model's inputs and asks the model
/// for a price. Nothing is recorded here, callers append to the session
/// history only once this succeeds.
pub async fn estimate(model: &dyn Regressor, currency: &str, input: &RawInput) -> Result<Estimate> {
    input.validate()?;

    let row = align(input, &model.schema());
    let price = model
        .predict(&row)
        .await
        .context("Prediction error")?;
    if !price.is_finite() || price.abs() >= i64::MAX as f64 {
        return Err(anyhow!("Prediction error: model returned an unusable price {price}"));
    }

    let formatted_price = format_price(currency, price);
    info!(
        "predicted {} for {} sq ft in {}",
        formatted_price,
        input.area,
        input.display_location()
    );

    Ok(Estimate {
        price,
        message: format!(
            "Estimated House Price in {}: {}",
            input.display_location(),
            formatted_price
        ),
        formatted_price,
        columns: row.names().into_iter().map(String::from).collect(),
    })
}
