//! Vector index over OpenSearch kNN queries.
//!
//! Requests are SigV4-signed (`aoss` for serverless collections) unless the
//! cluster is configured for basic auth.

use async_trait::async_trait;
use aws_config::SdkConfig;
use dre_config::SearchConfig;
use dre_core::EmbeddingVector;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use crate::error::ServiceError;
use crate::http::{build_client, check_response};
use crate::sigv4::RequestSigner;
use crate::{SearchHit, VectorIndex};

const JSON: &str = "application/json";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source", default)]
    source: Map<String, Value>,
}

#[derive(Debug, Clone)]
enum Auth {
    Basic { username: String, password: String },
    SigV4(RequestSigner),
}

pub struct OpenSearchIndex {
    http: reqwest::Client,
    search_url: String,
    vector_field: String,
    auth: Auth,
}

impl OpenSearchIndex {
    /// Build an index client from config.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotConfigured`] without an endpoint or, for
    /// signed access, without AWS credentials. Returns
    /// [`ServiceError::Http`] if the HTTP client cannot be built.
    pub fn from_config(
        config: &SearchConfig,
        sdk: &SdkConfig,
        timeout_secs: u64,
    ) -> Result<Self, ServiceError> {
        if !config.is_configured() {
            return Err(ServiceError::NotConfigured { service: "search" });
        }
        let auth = if config.uses_basic_auth() {
            Auth::Basic {
                username: config.username.clone(),
                password: config.password.clone(),
            }
        } else {
            Auth::SigV4(RequestSigner::from_sdk_config(sdk, &config.signing_service)?)
        };
        Ok(Self {
            http: build_client(timeout_secs)?,
            search_url: format!("{}/{}/_search", config.endpoint_url(), config.index),
            vector_field: config.vector_field.clone(),
            auth,
        })
    }

    fn query_body(&self, vector: &EmbeddingVector, k: usize) -> Value {
        json!({
            "size": k,
            "query": {
                "knn": {
                    (self.vector_field.as_str()): {
                        "vector": vector.as_slice(),
                        "k": k
                    }
                }
            }
        })
    }
}

fn to_hits(data: SearchResponse) -> Result<Vec<SearchHit>, ServiceError> {
    data.hits
        .hits
        .into_iter()
        .map(|hit| {
            let score = hit
                .score
                .ok_or_else(|| ServiceError::Parse("search hit has no _score".to_string()))?;
            match hit.source.get("metadata") {
                Some(Value::Object(metadata)) => Ok(SearchHit {
                    score,
                    metadata: metadata.clone(),
                }),
                _ => Err(ServiceError::Parse(
                    "search hit has no _source.metadata object".to_string(),
                )),
            }
        })
        .collect()
}

#[async_trait]
impl VectorIndex for OpenSearchIndex {
    #[instrument(skip_all, fields(k = k, dimension = vector.dimension()))]
    async fn query(
        &self,
        vector: &EmbeddingVector,
        k: usize,
    ) -> Result<Vec<SearchHit>, ServiceError> {
        let body = serde_json::to_vec(&self.query_body(vector, k))?;
        let mut request = self
            .http
            .post(&self.search_url)
            .header(reqwest::header::CONTENT_TYPE, JSON);
        match &self.auth {
            Auth::Basic { username, password } => {
                request = request.basic_auth(username, Some(password));
            }
            Auth::SigV4(signer) => {
                let signed = signer
                    .sign("POST", &self.search_url, &[("content-type", JSON)], &body)
                    .await?;
                for (name, value) in signed {
                    request = request.header(name, value);
                }
            }
        }
        let resp = check_response(request.body(body).send().await?).await?;
        let hits = to_hits(resp.json().await?)?;
        debug!(hits = hits.len(), "search complete");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use aws_config::{BehaviorVersion, Region};
    use aws_credential_types::Credentials;
    use aws_credential_types::provider::SharedCredentialsProvider;
    use pretty_assertions::assert_eq;

    use super::*;

    const FIXTURE: &str = r#"{
        "took": 12,
        "hits": {
            "total": {"value": 2, "relation": "eq"},
            "max_score": 0.91,
            "hits": [
                {"_index": "repair-cost-data", "_id": "1", "_score": 0.91,
                 "_source": {"damage_vector": [0.1], "metadata": {"make": "Make_1", "repair_cost": 500, "s3_location": "images/1.jpg"}}},
                {"_index": "repair-cost-data", "_id": "2", "_score": 0.77,
                 "_source": {"metadata": {"make": "Make_2", "repair_cost": 700, "s3_location": "images/2.jpg"}}}
            ]
        }
    }"#;

    fn sdk() -> SdkConfig {
        SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(SharedCredentialsProvider::new(Credentials::new(
                "AKID", "secret", None, None, "test",
            )))
            .build()
    }

    fn index() -> OpenSearchIndex {
        OpenSearchIndex::from_config(
            &SearchConfig {
                endpoint: "search.local".into(),
                ..Default::default()
            },
            &sdk(),
            5,
        )
        .unwrap()
    }

    #[test]
    fn parse_search_response() {
        let hits = to_hits(serde_json::from_str(FIXTURE).unwrap()).unwrap();
        assert_eq!(hits.len(), 2);
        assert!((hits[0].score - 0.91).abs() < f64::EPSILON);
        assert_eq!(hits[1].metadata["s3_location"], "images/2.jpg");
    }

    #[test]
    fn hit_without_metadata_is_parse_error() {
        let data: SearchResponse =
            serde_json::from_str(r#"{"hits":{"hits":[{"_score":1.0,"_source":{}}]}}"#).unwrap();
        assert!(matches!(to_hits(data), Err(ServiceError::Parse(_))));
    }

    #[test]
    fn knn_body_uses_configured_field() {
        let body = index().query_body(&EmbeddingVector::new(vec![0.5, 0.25]), 2);
        assert_eq!(
            body,
            json!({"size": 2, "query": {"knn": {"damage_vector": {"vector": [0.5, 0.25], "k": 2}}}})
        );
    }

    #[test]
    fn search_url_includes_index() {
        assert_eq!(index().search_url, "https://search.local/repair-cost-data/_search");
    }

    #[test]
    fn requires_endpoint() {
        let result = OpenSearchIndex::from_config(&SearchConfig::default(), &sdk(), 5);
        assert!(matches!(result, Err(ServiceError::NotConfigured { service: "search" })));
    }

    #[test]
    fn auth_follows_config() {
        assert!(matches!(index().auth, Auth::SigV4(_)));

        let basic = OpenSearchIndex::from_config(
            &SearchConfig {
                endpoint: "localhost:9200".into(),
                username: "admin".into(),
                ..Default::default()
            },
            &SdkConfig::builder().build(),
            5,
        )
        .unwrap();
        assert!(matches!(basic.auth, Auth::Basic { .. }));
    }
}
