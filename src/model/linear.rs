use std::path::Path;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use nalgebra::DVector;
use serde::Deserialize;

use super::Regressor;
use crate::features::{EncodingMode, FeatureRow, ModelSchema};

/// On-disk form of an exported linear regression.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearArtifact {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub n_features_in: Option<usize>,
    #[serde(default)]
    pub feature_names_in: Option<Vec<String>>,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
    #[serde(default)]
    pub encoding: Option<EncodingMode>,
}

#[derive(Debug, Clone)]
pub struct LinearModel {
    intercept: f64,
    coefficients: DVector<f64>,
    n_features_in: Option<usize>,
    feature_names_in: Option<Vec<String>>,
    feature_importances: Option<Vec<f64>>,
    encoding: Option<EncodingMode>,
}

impl LinearModel {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read model artifact {}", path.display()))?;
        let artifact: LinearArtifact = serde_json::from_slice(&bytes)
            .with_context(|| format!("Model artifact {} is not valid", path.display()))?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: LinearArtifact) -> Result<Self> {
        let width = artifact.coefficients.len();
        if width == 0 {
            return Err(anyhow!("Model artifact has no coefficients"));
        }
        if let Some(count) = artifact.n_features_in {
            if count != width {
                return Err(anyhow!(
                    "Model declares {} input features but has {} coefficients",
                    count,
                    width
                ));
            }
        }
        if let Some(names) = &artifact.feature_names_in {
            if names.len() != width {
                return Err(anyhow!(
                    "Model lists {} feature names but has {} coefficients",
                    names.len(),
                    width
                ));
            }
        }

        Ok(LinearModel {
            intercept: artifact.intercept,
            coefficients: DVector::from_vec(artifact.coefficients),
            n_features_in: artifact.n_features_in,
            feature_names_in: artifact.feature_names_in,
            feature_importances: artifact.feature_importances,
            encoding: artifact.encoding,
        })
    }

    pub fn width(&self) -> usize {
        self.coefficients.len()
    }
}

#[async_trait]
impl Regressor for LinearModel {
    fn schema(&self) -> ModelSchema {
        ModelSchema {
            expected_count: self.n_features_in,
            expected_names: self.feature_names_in.clone(),
            encoding: self.encoding,
        }
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.feature_importances.clone()
    }

    async fn predict(&self, row: &FeatureRow) -> Result<f64> {
        if row.len() != self.width() {
            return Err(anyhow!(
                "X has {} features, but the model is expecting {} features as input",
                row.len(),
                self.width()
            ));
        }

        if let Some(expected) = &self.feature_names_in {
            let given = row.names();
            if given.iter().zip(expected).any(|(a, b)| *a != b.as_str()) {
                return Err(anyhow!(
                    "The feature names should match those that were passed during fit: expected {:?}, got {:?}",
                    expected,
                    given
                ));
            }
        }

        let x = DVector::from_vec(row.values());
        Ok(self.coefficients.dot(&x) + self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(coefficients: Vec<f64>) -> LinearArtifact {
        LinearArtifact {
            intercept: 10.0,
            coefficients,
            n_features_in: None,
            feature_names_in: None,
            feature_importances: None,
            encoding: None,
        }
    }

    #[tokio::test]
    async fn predicts_dot_product_plus_intercept() {
        let model = LinearModel::from_artifact(artifact(vec![2.0, 3.0])).unwrap();
        let mut row = FeatureRow::default();
        row.push("a", 1.0);
        row.push("b", 4.0);
        assert_eq!(model.predict(&row).await.unwrap(), 24.0);
    }

    #[tokio::test]
    async fn rejects_wrong_width() {
        let model = LinearModel::from_artifact(artifact(vec![2.0, 3.0])).unwrap();
        let mut row = FeatureRow::default();
        row.push("a", 1.0);
        let err = model.predict(&row).await.unwrap_err();
        assert!(err.to_string().contains("expecting 2 features"));
    }

    #[tokio::test]
    async fn rejects_misordered_names() {
        let mut art = artifact(vec![2.0, 3.0]);
        art.feature_names_in = Some(vec!["a".to_string(), "b".to_string()]);
        let model = LinearModel::from_artifact(art).unwrap();

        let mut row = FeatureRow::default();
        row.push("b", 4.0);
        row.push("a", 1.0);
        assert!(model.predict(&row).await.is_err());
    }

    #[test]
    fn inconsistent_artifact_fails_to_load() {
        let mut art = artifact(vec![2.0, 3.0]);
        art.n_features_in = Some(3);
        assert!(LinearModel::from_artifact(art).is_err());
    }

    #[test]
    fn schema_reflects_artifact() {
        let mut art = artifact(vec![0.0; 12]);
        art.n_features_in = Some(12);
        let model = LinearModel::from_artifact(art).unwrap();
        let schema = model.schema();
        assert_eq!(schema.expected_count, Some(12));
        assert_eq!(schema.expected_names, None);
    }
}
