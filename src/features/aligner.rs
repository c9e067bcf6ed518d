use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::models::house::{FurnishingStatus, RawInput};

/// Numeric and yes/no columns, in the order the training frame had them.
pub const BASE_COLUMNS: [&str; 11] = [
    "area",
    "bedrooms",
    "bathrooms",
    "stories",
    "mainroad",
    "guestroom",
    "basement",
    "hotwaterheating",
    "airconditioning",
    "parking",
    "prefarea",
];

pub const LABEL_COLUMN: &str = "furnishingstatus";
pub const FURNISHED_COLUMN: &str = "furnishingstatus_furnished";
pub const SEMI_FURNISHED_COLUMN: &str = "furnishingstatus_semi-furnished";

/// How `furnishingstatus` is presented to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMode {
    /// Single integer column: Furnished=0, Semi-Furnished=1, Unfurnished=2.
    Label,
    /// Two indicator columns, Unfurnished is the all-zero baseline.
    OneHot,
}

/// What the loaded model declares about its inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub expected_count: Option<usize>,
    pub expected_names: Option<Vec<String>>,
    /// Declared by newer artifacts. When set, no inference is done.
    #[serde(default)]
    pub encoding: Option<EncodingMode>,
}

/// A single row of named features, ordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureRow {
    columns: Vec<(String, f64)>,
}

impl FeatureRow {
    pub fn push(&mut self, name: &str, value: f64) {
        match self.columns.iter_mut().find(|(column, _)| column == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| *value)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.columns.iter().map(|(_, value)| *value).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Rebuilds the row with exactly `names`, in that order. Columns the
    /// row does not have are filled with 0, columns not listed are dropped.
    pub fn select(&self, names: &[String]) -> FeatureRow {
        FeatureRow {
            columns: names
                .iter()
                .map(|name| (name.clone(), self.get(name).unwrap_or(0.0)))
                .collect(),
        }
    }
}

pub fn encoding_for(schema: &ModelSchema) -> EncodingMode {
    if let Some(mode) = schema.encoding {
        return mode;
    }

    match schema.expected_count {
        Some(count) if count == BASE_COLUMNS.len() + 1 => EncodingMode::Label,
        Some(count) if count == BASE_COLUMNS.len() + 2 => EncodingMode::OneHot,
        Some(count) => {
            warn!(
                "model expects {count} features, which matches neither label ({}) nor one-hot ({}) layout; using one-hot",
                BASE_COLUMNS.len() + 1,
                BASE_COLUMNS.len() + 2
            );
            EncodingMode::OneHot
        }
        None => EncodingMode::OneHot,
    }
}

pub fn align(raw: &RawInput, schema: &ModelSchema) -> FeatureRow {
    let mut row = FeatureRow::default();

    let base = [
        raw.area as f64,
        raw.bedrooms as f64,
        raw.bathrooms as f64,
        raw.stories as f64,
        raw.mainroad.as_flag(),
        raw.guestroom.as_flag(),
        raw.basement.as_flag(),
        raw.hotwaterheating.as_flag(),
        raw.airconditioning.as_flag(),
        raw.parking as f64,
        raw.prefarea.as_flag(),
    ];
    for (name, value) in BASE_COLUMNS.iter().zip(base) {
        row.push(name, value);
    }

    let mode = encoding_for(schema);
    match mode {
        EncodingMode::Label => row.push(LABEL_COLUMN, raw.furnishingstatus.label_code()),
        EncodingMode::OneHot => {
            let furnished = raw.furnishingstatus == FurnishingStatus::Furnished;
            let semi = raw.furnishingstatus == FurnishingStatus::SemiFurnished;
            row.push(FURNISHED_COLUMN, if furnished { 1.0 } else { 0.0 });
            row.push(SEMI_FURNISHED_COLUMN, if semi { 1.0 } else { 0.0 });
        }
    }

    let row = match &schema.expected_names {
        Some(names) => row.select(names),
        None => row,
    };

    debug!("aligned {} features using {:?} encoding", row.len(), mode);
    row
}
