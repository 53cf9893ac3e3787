//! Personnel directory HTTP client.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::DirectoryConfig;
use crate::error::{AppError, Result};
use crate::models::{Department, Employee};

/// Read-only source of the employee roster and department catalog.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn employees(&self) -> Result<Vec<Employee>>;

    async fn departments(&self) -> Result<Vec<Department>>;
}

/// Bearer-authenticated client for the personnel API.
///
/// The API answers POST requests on fixed endpoints; listings come back
/// either as a bare array or wrapped in `{ "data": [...] }`.
pub struct DirectoryClient {
    client: Client,
    base_url: String,
    employees_path: String,
    departments_path: String,
    token: String,
}

impl DirectoryClient {
    /// Create a new client from directory settings.
    pub fn new(config: &DirectoryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            employees_path: config.employees_path.clone(),
            departments_path: config.departments_path.clone(),
            token: config.token.clone(),
        })
    }

    async fn fetch_listing<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{base}{path}", base = self.base_url);
        debug!("Fetching directory listing from {url}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Directory request to {url} failed with HTTP {status}");
            return Err(AppError::Upstream(status.as_u16()));
        }

        let body = response.text().await?;
        parse_listing(&body)
    }
}

#[async_trait]
impl Directory for DirectoryClient {
    async fn employees(&self) -> Result<Vec<Employee>> {
        self.fetch_listing(&self.employees_path).await
    }

    async fn departments(&self) -> Result<Vec<Department>> {
        self.fetch_listing(&self.departments_path).await
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

/// Parse a directory listing in either of its shapes.
fn parse_listing<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let listing: Listing<T> =
        serde_json::from_str(body).map_err(|e| AppError::parse(format!("Invalid directory payload: {e}")))?;

    Ok(match listing {
        Listing::Bare(items) => items,
        Listing::Wrapped { data } => data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPLOYEE: &str = r#"{"id": 20, "name": "Marta", "primer_apellido": "Lopez", "cedula": "281", "id_departamento": 2, "id_cargo": "7"}"#;

    #[test]
    fn test_parse_bare_array() {
        let body = format!("[{EMPLOYEE}]");
        let employees: Vec<Employee> = parse_listing(&body).unwrap();

        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].id, 20);
        assert_eq!(employees[0].display_name(), "Marta Lopez");
    }

    #[test]
    fn test_parse_wrapped_listing() {
        let body = format!(r#"{{"data": [{EMPLOYEE}, {EMPLOYEE}]}}"#);
        let employees: Vec<Employee> = parse_listing(&body).unwrap();

        assert_eq!(employees.len(), 2);
    }

    #[test]
    fn test_parse_invalid_payload() {
        let result: Result<Vec<Employee>> = parse_listing(r#"{"error": "unauthorized"}"#);
        assert!(matches!(result, Err(AppError::Parse(_))));
    }

    #[test]
    fn test_new_trims_base_url() {
        let config = DirectoryConfig {
            base_url: "http://personnel.local/".to_string(),
            ..DirectoryConfig::default()
        };
        let client = DirectoryClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://personnel.local");
    }
}
