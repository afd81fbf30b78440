use tracing::{info, warn};

use super::{
    classifier::FoodClassifier,
    food_db::{self, FoodAnalysis},
};

/// Best-effort nutrition estimate for a food photo. Never fails: a missing
/// classifier, a failed call or an empty result all give the placeholder.
pub async fn analyze_food_image(
    classifier: Option<&dyn FoodClassifier>,
    image: &[u8],
) -> FoodAnalysis {
    let Some(classifier) = classifier else {
        return FoodAnalysis::placeholder();
    };

    match classifier.classify(image).await {
        Ok(Some(label)) => {
            let analysis = food_db::lookup(&label);
            info!(%label, food_name = %analysis.food_name, "food recognised");
            analysis
        }
        Ok(None) => FoodAnalysis::placeholder(),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "classifier failed, using fallback");
            FoodAnalysis::placeholder()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::recognition::classifier::HuggingFaceClassifier;

    struct Fixed(Option<&'static str>);

    #[async_trait]
    impl FoodClassifier for Fixed {
        async fn classify(&self, _image: &[u8]) -> anyhow::Result<Option<String>> {
            Ok(self.0.map(str::to_string))
        }
    }

    struct Broken;

    #[async_trait]
    impl FoodClassifier for Broken {
        async fn classify(&self, _image: &[u8]) -> anyhow::Result<Option<String>> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn no_classifier_gives_placeholder() {
        assert_eq!(analyze_food_image(None, b"img").await, FoodAnalysis::placeholder());
    }

    #[tokio::test]
    async fn label_is_looked_up() {
        let a = analyze_food_image(Some(&Fixed(Some("Banana split"))), b"img").await;
        assert_eq!(a.food_name, "banana");
        assert_eq!(a.calories, 105.0);
    }

    #[tokio::test]
    async fn unknown_label_keeps_name() {
        let a = analyze_food_image(Some(&Fixed(Some("sandwich"))), b"img").await;
        assert_eq!(a.food_name, "sandwich");
        assert_eq!(a.calories, 250.0);
    }

    #[tokio::test]
    async fn empty_result_gives_placeholder() {
        let a = analyze_food_image(Some(&Fixed(None)), b"img").await;
        assert_eq!(a, FoodAnalysis::placeholder());
    }

    #[tokio::test]
    async fn classifier_error_gives_placeholder() {
        let a = analyze_food_image(Some(&Broken), b"img").await;
        assert_eq!(a, FoodAnalysis::placeholder());
    }

    async fn spawn_endpoint(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/models/detr")
    }

    #[tokio::test]
    async fn remote_classifier_sends_bearer_and_base64() {
        let app = Router::new().route(
            "/models/detr",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                // "img" in base64
                if auth == "Bearer secret" && body["inputs"] == "aW1n" {
                    Json(json!([
                        {"score": 0.2, "label": "cup"},
                        {"score": 0.9, "label": "salmon fillet"}
                    ]))
                } else {
                    Json(json!([]))
                }
            }),
        );
        let url = spawn_endpoint(app).await;
        let client = HuggingFaceClassifier::new(url, "secret", Duration::from_secs(5)).unwrap();

        let a = analyze_food_image(Some(&client), b"img").await;
        assert_eq!(a.food_name, "salmon");
        assert_eq!(a.protein, 22.0);
    }

    #[tokio::test]
    async fn remote_error_status_falls_back() {
        let app = Router::new().route(
            "/models/detr",
            post(|| async {
                (
                    axum::http::StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"error": "model is loading"})),
                )
            }),
        );
        let url = spawn_endpoint(app).await;
        let client = HuggingFaceClassifier::new(url, "secret", Duration::from_secs(5)).unwrap();

        let a = analyze_food_image(Some(&client), b"img").await;
        assert_eq!(a, FoodAnalysis::placeholder());
    }
}
