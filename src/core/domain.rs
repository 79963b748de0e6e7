use std::env;
use serde::{Deserialize, Serialize};
use crate::core::repository::RepositoryStore;

pub const DEFAULT_ENVIRONMENT: &str = "prod";
pub const DEFAULT_TABLE_NAME: &str = "books";
pub const DEFAULT_DDB_ENDPOINT: &str = "http://localhost:8000";

// Configuration abstracts config options for the catalog service
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub environment: String,
    pub store: RepositoryStore,
    pub table_name: String,
    // only used by the local DynamoDB store
    pub endpoint_url: String,
}

impl Configuration {
    pub fn new(environment: &str, store: RepositoryStore) -> Self {
        Configuration {
            environment: environment.to_string(),
            store,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            endpoint_url: DEFAULT_DDB_ENDPOINT.to_string(),
        }
    }

    /// Reads `CATALOG_ENV`, `CATALOG_STORE`, `CATALOG_TABLE` and `CATALOG_DDB_ENDPOINT`.
    ///
    /// Unset variables fall back to a `prod` environment on DynamoDB; local setups opt in
    /// with `CATALOG_ENV=dev` and `CATALOG_STORE=LocalDynamoDB`.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub(crate) fn from_vars<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let environment = lookup("CATALOG_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        let store = lookup("CATALOG_STORE").map(RepositoryStore::from)
            .unwrap_or(RepositoryStore::DynamoDB);
        let mut config = Configuration::new(environment.as_str(), store);
        if let Some(table_name) = lookup("CATALOG_TABLE") {
            config.table_name = table_name;
        }
        if let Some(endpoint_url) = lookup("CATALOG_DDB_ENDPOINT") {
            config.endpoint_url = endpoint_url;
        }
        config
    }

    pub fn is_dev(&self) -> bool {
        self.environment == "dev"
    }
}
