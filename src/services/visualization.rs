use serde::Serialize;

use crate::{
    features::{align, ModelSchema},
    model::Regressor,
    models::house::RawInput,
    session::history::{History, TrendPoint},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Visualization {
    /// `None` when the model exposes no importances or they cannot be paired
    /// with feature names.
    pub feature_importance: Option<Vec<FeatureImportance>>,
    pub trend: Vec<TrendPoint>,
}

/// Importances paired with the model's feature names, largest first. Models
/// without declared names are labelled with the columns a default form
/// aligns to.
pub fn feature_importance(model: &dyn Regressor) -> Option<Vec<FeatureImportance>> {
    let importances = model.feature_importances()?;
    let schema: ModelSchema = model.schema();
    let names = match schema.expected_names.clone() {
        Some(names) => names,
        None => align(&RawInput::default(), &schema)
            .names()
            .into_iter()
            .map(String::from)
            .collect(),
    };

    if names.len() != importances.len() {
        return None;
    }

    let mut paired: Vec<FeatureImportance> = names
        .into_iter()
        .zip(importances)
        .map(|(feature, importance)| FeatureImportance {
            feature,
            importance,
        })
        .collect();
    paired.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    Some(paired)
}

pub fn build(model: &dyn Regressor, history: &History) -> Visualization {
    Visualization {
        feature_importance: feature_importance(model),
        trend: history.trend(),
    }
}
