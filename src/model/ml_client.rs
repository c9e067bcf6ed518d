use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::Regressor;
use crate::features::{EncodingMode, FeatureRow, ModelSchema};

#[derive(Debug, Serialize)]
pub struct PricePredictionRequest<'a> {
    pub columns: Vec<&'a str>,
    pub values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct PricePredictionResponse {
    prediction: f64,
}

#[derive(Debug, Deserialize)]
struct SchemaResponse {
    #[serde(default)]
    n_features_in: Option<usize>,
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
    #[serde(default)]
    feature_importances: Option<Vec<f64>>,
    #[serde(default)]
    encoding: Option<EncodingMode>,
}

/// A model served by the ML prediction service. The schema is fetched once
/// when connecting.
pub struct RemoteModel {
    client: Client,
    base_url: String,
    schema: ModelSchema,
    feature_importances: Option<Vec<f64>>,
}

impl RemoteModel {
    pub async fn connect(base_url: &str) -> Result<Self> {
        let client = Client::new();
        let base_url = base_url.trim_end_matches('/').to_string();
        let url = format!("{}/schema", base_url);

        let response = client
            .get(url)
            .send()
            .await
            .context("Failed to reach ML prediction service")?;
        let response = check_status(response, "schema").await?;

        let parsed: SchemaResponse = response
            .json()
            .await
            .context("Failed to deserialize ML schema response")?;

        Ok(RemoteModel {
            client,
            base_url,
            schema: ModelSchema {
                expected_count: parsed.n_features_in,
                expected_names: parsed.feature_names_in,
                encoding: parsed.encoding,
            },
            feature_importances: parsed.feature_importances,
        })
    }
}

async fn check_status(response: Response, endpoint: &str) -> Result<Response> {
    if response.status() == StatusCode::NOT_FOUND {
        return Err(anyhow!("ML {} endpoint not found (404)", endpoint));
    }

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!(
            "ML service responded with error {}: {}",
            status,
            body
        ));
    }

    Ok(response)
}

#[async_trait]
impl Regressor for RemoteModel {
    fn schema(&self) -> ModelSchema {
        self.schema.clone()
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.feature_importances.clone()
    }

    async fn predict(&self, row: &FeatureRow) -> Result<f64> {
        let payload = PricePredictionRequest {
            columns: row.names(),
            values: row.values(),
        };
        let url = format!("{}/predict", self.base_url);

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .context("Failed to reach ML prediction service")?;
        let response = check_status(response, "prediction").await?;

        let parsed: PricePredictionResponse = response
            .json()
            .await
            .context("Failed to deserialize ML prediction response")?;

        Ok(parsed.prediction)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn schema_route() -> Router {
        Router::new().route(
            "/schema",
            get(|| async {
                Json(json!({
                    "n_features_in": 2,
                    "feature_names_in": ["area", "furnishingstatus"],
                    "feature_importances": [0.75, 0.25],
                    "encoding": "label",
                }))
            }),
        )
    }

    #[tokio::test]
    async fn schema_is_read_on_connect() {
        let url = serve(schema_route()).await;
        let model = RemoteModel::connect(&url).await.unwrap();

        assert_eq!(
            model.schema(),
            ModelSchema {
                expected_count: Some(2),
                expected_names: Some(vec!["area".to_string(), "furnishingstatus".to_string()]),
                encoding: Some(EncodingMode::Label),
            }
        );
        assert_eq!(model.feature_importances(), Some(vec![0.75, 0.25]));
    }

    #[tokio::test]
    async fn predict_posts_columns_and_values() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let recorder = seen.clone();
        let app = schema_route().route(
            "/predict",
            post(move |Json(body): Json<Value>| {
                let recorder = recorder.clone();
                async move {
                    *recorder.lock().unwrap() = Some(body);
                    Json(json!({ "prediction": 4550000.0 }))
                }
            }),
        );
        let model = RemoteModel::connect(&serve(app).await).await.unwrap();

        let mut row = FeatureRow::default();
        row.push("area", 1500.0);
        row.push("furnishingstatus", 1.0);
        assert_eq!(model.predict(&row).await.unwrap(), 4550000.0);

        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(
            body,
            json!({ "columns": ["area", "furnishingstatus"], "values": [1500.0, 1.0] })
        );
    }

    #[tokio::test]
    async fn missing_schema_endpoint_is_reported() {
        let url = serve(Router::new()).await;
        let err = RemoteModel::connect(&url).await.err().unwrap();
        assert!(err.to_string().contains("schema endpoint not found (404)"));
    }

    #[tokio::test]
    async fn server_errors_carry_status_and_body() {
        let app = schema_route().route(
            "/predict",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
        );
        let model = RemoteModel::connect(&serve(app).await).await.unwrap();

        let mut row = FeatureRow::default();
        row.push("area", 1500.0);
        row.push("furnishingstatus", 0.0);
        let err = model.predict(&row).await.unwrap_err().to_string();
        assert!(err.contains("500"));
        assert!(err.contains("model crashed"));
    }
}
