//! Elasticsearch-backed people fetcher.
//!
//! Pulls a capped `match_all` page from each directory collection. The client is built once at
//! startup from [`Config`] and handed to whoever needs it; there is no global instance.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::Person;

/// Collection holding employee records.
pub const EMPLOYEES: &str = "employees";
/// Collection holding customer records.
pub const CUSTOMERS: &str = "customers";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: Person,
}

/// Both directory collections, each in the order the backend returned them.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub employees: Vec<Person>,
    pub customers: Vec<Person>,
}

/// Thin client over the Elasticsearch `_search` API.
#[derive(Debug, Clone)]
pub struct ElasticClient {
    http: reqwest::Client,
    endpoint: String,
    username: String,
    password: String,
    fetch_size: usize,
}

impl ElasticClient {
    /// Build a client from configuration.
    ///
    /// An explicit `ELASTIC_URL` wins; otherwise the endpoint is derived from the cloud id.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let endpoint = match &config.elastic_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => decode_cloud_id(&config.elastic_cloud_id)?,
        };

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            username: config.elastic_user.clone(),
            password: config.elastic_password.clone(),
            fetch_size: config.fetch_size,
        })
    }

    /// Base URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch up to `fetch_size` people from a collection with a `match_all` query.
    pub async fn fetch_people(&self, collection: &str) -> Result<Vec<Person>, AppError> {
        if collection.trim().is_empty() {
            return Err(AppError::Validation(
                "Collection name is required".to_string(),
            ));
        }

        let url = format!("{}/{}/_search", self.endpoint, collection);
        let body = json!({
            "query": { "match_all": {} },
            "size": self.fetch_size,
        });

        let mut request = self.http.post(&url).json(&body);
        if !self.username.is_empty() || !self.password.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!("Search on '{}' failed with status {}", collection, status);
            return Err(AppError::Fetch(format!(
                "Search on '{}' failed with status {}",
                collection, status
            )));
        }

        let text = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&text)?;
        let people: Vec<Person> = parsed.hits.hits.into_iter().map(|h| h.source).collect();

        tracing::info!("Fetched {} records from '{}'", people.len(), collection);
        Ok(people)
    }

    /// Fetch both collections concurrently. Fails as soon as either request fails.
    pub async fn fetch_directory(&self) -> Result<Directory, AppError> {
        let (employees, customers) =
            tokio::try_join!(self.fetch_people(EMPLOYEES), self.fetch_people(CUSTOMERS))?;

        Ok(Directory {
            employees,
            customers,
        })
    }
}

/// Resolve an Elastic Cloud id (`name:base64(host$es_id$kibana_id)`) to its Elasticsearch URL.
pub fn decode_cloud_id(cloud_id: &str) -> Result<String, AppError> {
    let invalid = || AppError::Config("Invalid ELASTIC_CLOUD_ID".to_string());

    if cloud_id.trim().is_empty() {
        return Err(AppError::Config(
            "No search backend configured (set ELASTIC_CLOUD_ID or ELASTIC_URL)".to_string(),
        ));
    }

    let (_, encoded) = cloud_id.split_once(':').ok_or_else(invalid)?;
    let decoded = STANDARD_NO_PAD
        .decode(encoded.trim().trim_end_matches('='))
        .map_err(|_| invalid())?;
    let decoded = String::from_utf8(decoded).map_err(|_| invalid())?;

    let mut parts = decoded.split('$');
    let host = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
    let es_id = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;

    Ok(format!("https://{}.{}", es_id, host))
}
