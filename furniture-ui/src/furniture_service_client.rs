use crate::{config::DEFAULT_BASE_URL, error::Error, furniture_types::FurnitureTypes};
type ReqwestClient = reqwest::blocking::Client;

const FURNITURE_TYPES_PATH: &str = "/furniture-types";

/// Builder used to build a FurnitureServiceClient instance
#[derive(Debug, Clone, Default)]
pub struct FurnitureServiceClientBuilder {
    base_url: Option<String>,
    http_client: Option<ReqwestClient>,
}

impl FurnitureServiceClientBuilder {
    /// Create a new FurnitureServiceClientBuilder instance.
    pub fn new() -> Self {
        Self {
            base_url: None,
            http_client: None,
        }
    }

    /// Use the given base URL when building a FurnitureServiceClient instance.
    ///
    /// # Arguments
    /// `base_url` - scheme, host and port of the furniture service, e.g. `http://localhost:8080`.
    ///
    /// # Returns
    /// This builder.
    pub fn with_base_url<T: Into<String>>(mut self, base_url: T) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Use the given blocking reqwest client when building a FurnitureServiceClient instance.
    ///
    /// # Arguments
    /// `client` - a pre-configured blocking reqwest client.
    ///
    /// # Returns
    /// This builder.
    pub fn with_http_client(mut self, client: ReqwestClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Consume the builder and create a FurnitureServiceClient instance using all of the previously configured values
    /// or their defaults.
    pub fn build(mut self) -> FurnitureServiceClient {
        FurnitureServiceClient {
            http: self.http_client.take().unwrap_or_default(),
            base_url: self
                .base_url
                .take()
                .unwrap_or_else(|| String::from(DEFAULT_BASE_URL)),
        }
    }
}

/// Client of the furniture service's HTTP API.
#[derive(Debug, Clone)]
pub struct FurnitureServiceClient {
    http: ReqwestClient,
    base_url: String,
}

impl FurnitureServiceClient {
    /// Create a FurnitureServiceClient talking to the default base URL.
    pub fn new() -> Self {
        FurnitureServiceClient {
            http: ReqwestClient::new(),
            base_url: String::from(DEFAULT_BASE_URL),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Gets the furniture types the furniture service offers.
    ///
    /// # Returns
    /// The types in the order the service listed them. Non-2xx answers and bodies that aren't a JSON array of strings
    /// are errors.
    pub fn get_furniture_types(&self) -> Result<Vec<String>, Error> {
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            FURNITURE_TYPES_PATH
        );

        let response_text = self.http.get(&url).send()?.error_for_status()?.text()?;

        Ok(FurnitureTypes::decode(&response_text)?.into_vec())
    }
}

impl Default for FurnitureServiceClient {
    fn default() -> Self {
        Self::new()
    }
}
