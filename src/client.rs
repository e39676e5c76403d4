use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::{CensusError, Result};
use crate::types::{DataTable, HousingCounts, variables};

pub const DEFAULT_BASE_URL: &str = "https://api.census.gov/data";
pub const DEFAULT_YEAR: u16 = 2022;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ACS_DATASET: &str = "acs/acs5";
const CBP_DATASET: &str = "cbp";
const ZCTA_GEOGRAPHY: &str = "zip%20code%20tabulation%20area";

/// Configuration for CensusClient
#[derive(Debug, Clone)]
pub struct CensusConfig {
    /// Root of the data API, without trailing slash
    pub base_url: String,
    /// Static API key; requests are sent without `key` when absent
    pub api_key: Option<String>,
    /// ACS 5-year vintage used for housing characteristics
    pub acs_year: u16,
    /// County Business Patterns vintage used for establishment counts
    pub cbp_year: u16,
    pub timeout: Duration,
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            acs_year: DEFAULT_YEAR,
            cbp_year: DEFAULT_YEAR,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct CensusClient {
    http_client: Client,
    config: CensusConfig,
}

impl CensusClient {
    pub fn new() -> Result<Self> {
        Self::with_config(CensusConfig::default())
    }

    pub fn with_config(config: CensusConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Build a ZCTA query URL for one dataset
    fn dataset_url(&self, year: u16, dataset: &str, get: &str, zip_code: &str) -> String {
        let mut url = format!(
            "{}/{}/{}?get={}&for={}:{}",
            self.config.base_url.trim_end_matches('/'),
            year,
            dataset,
            get,
            ZCTA_GEOGRAPHY,
            zip_code
        );
        if let Some(key) = &self.config.api_key {
            url.push_str("&key=");
            url.push_str(key);
        }
        url
    }

    /// Perform a GET and parse the tabular body
    async fn fetch_table(&self, url: &str) -> Result<DataTable> {
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        // The API answers 204 with an empty body for geographies it has no data for
        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Err(CensusError::NoData);
        }

        if !status.is_success() {
            return Err(CensusError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let table: DataTable = serde_json::from_str(&body)?;
        if !table.has_values() {
            return Err(CensusError::NoData);
        }
        Ok(table)
    }

    /// Fetch ACS housing unit counts for a ZCTA
    pub async fn housing_counts(&self, zip_code: &str) -> Result<HousingCounts> {
        let url = self.dataset_url(
            self.config.acs_year,
            ACS_DATASET,
            &variables::HOUSING.join(","),
            zip_code,
        );
        tracing::debug!(zip_code, year = self.config.acs_year, "Fetching ACS housing data");

        let table = self.fetch_table(&url).await?;
        HousingCounts::from_table(&table)
    }

    /// Fetch the County Business Patterns establishment count for a ZCTA
    pub async fn business_establishments(&self, zip_code: &str) -> Result<i64> {
        let url = self.dataset_url(
            self.config.cbp_year,
            CBP_DATASET,
            variables::ESTABLISHMENTS,
            zip_code,
        );
        tracing::debug!(zip_code, year = self.config.cbp_year, "Fetching CBP establishments");

        let table = self.fetch_table(&url).await?;
        table.integer(variables::ESTABLISHMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_url() {
        let client = CensusClient::with_config(CensusConfig {
            base_url: "https://example.test/data/".to_string(),
            api_key: Some("secret".to_string()),
            acs_year: 2021,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            client.dataset_url(2021, ACS_DATASET, "B25001_001E,B25003_002E", "12345"),
            "https://example.test/data/2021/acs/acs5?get=B25001_001E,B25003_002E\
             &for=zip%20code%20tabulation%20area:12345&key=secret"
        );
    }

    #[test]
    fn test_dataset_url_without_key() {
        let client = CensusClient::new().unwrap();
        assert_eq!(
            client.dataset_url(2022, CBP_DATASET, "ESTAB", "02134"),
            "https://api.census.gov/data/2022/cbp?get=ESTAB\
             &for=zip%20code%20tabulation%20area:02134"
        );
    }
}
