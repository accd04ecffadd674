use crate::body::BodyMatch;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display};

/// Version written into the `metadata` section of every contract document.
pub const SPECIFICATION_VERSION: &str = "2.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestData {
    pub method: String,
    /// Path and query exactly as the consumer sent them.
    pub path: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestData {
    pub fn new<S1: Into<String>, S2: Into<String>>(method: S1, path: S2) -> Self {
        Self {
            method: method.into().to_uppercase(),
            path: path.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_header<S1: Into<String>, S2: Into<String>>(mut self, name: S1, value: S2) -> Self {
        self.headers
            .insert(name.into().to_lowercase(), value.into());
        self
    }

    pub fn with_body<S: Into<String>>(mut self, body: S) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }
}

impl Display for RequestData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    #[serde(rename = "status")]
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "BodyMatch::is_exact")]
    pub body_match: BodyMatch,
}

impl ResponseData {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
            body: None,
            body_match: BodyMatch::Exact,
        }
    }

    pub fn with_header<S1: Into<String>, S2: Into<String>>(mut self, name: S1, value: S2) -> Self {
        self.headers
            .insert(name.into().to_lowercase(), value.into());
        self
    }

    pub fn with_body<S: Into<String>>(mut self, body: S) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Only the JSON shape of the body is expected to hold when verifying.
    pub fn with_shape_match(mut self) -> Self {
        self.body_match = BodyMatch::Shape;
        self
    }

    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }
}

impl Display for ResponseData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status_code)?;
        if let Some(body) = &self.body {
            write!(f, " \"{}\"", body.escape_default())?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_state: Option<String>,
    pub request: RequestData,
    pub response: ResponseData,
}

impl Interaction {
    pub fn new(request: RequestData, response: ResponseData) -> Self {
        Self {
            description: format!("{} -> {}", request, response.status_code),
            provider_state: None,
            request,
            response,
        }
    }

    pub fn with_provider_state<S: Into<String>>(mut self, state: S) -> Self {
        self.provider_state = Some(state.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacticipant {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationVersion {
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub pact_specification: SpecificationVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub consumer: Pacticipant,
    pub provider: Pacticipant,
    pub interactions: Vec<Interaction>,
    pub metadata: Metadata,
}

impl Contract {
    pub fn new<S1: Into<String>, S2: Into<String>>(consumer: S1, provider: S2) -> Self {
        Self {
            consumer: Pacticipant {
                name: consumer.into(),
            },
            provider: Pacticipant {
                name: provider.into(),
            },
            interactions: Vec::new(),
            metadata: Metadata {
                pact_specification: SpecificationVersion {
                    version: String::from(SPECIFICATION_VERSION),
                },
            },
        }
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interactions.push(interaction);
        self
    }

    pub fn consumer_name(&self) -> &str {
        &self.consumer.name
    }

    pub fn provider_name(&self) -> &str {
        &self.provider.name
    }

    /// Serializes the contract into its on-disk form. The output is stable for equal contracts.
    pub fn to_document(&self) -> Result<String, serde_json::Error> {
        let mut document = serde_json::to_string_pretty(self)?;
        document.push('\n');
        Ok(document)
    }

    pub fn from_document(document: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn furniture_contract() -> Contract {
        Contract::new("furniture-ui-consumer", "furniture-service-producer").with_interaction(
            Interaction::new(
                RequestData::new("get", "/furniture-types"),
                ResponseData::new(200)
                    .with_header("Content-Type", "application/json")
                    .with_body(r#"["Tables","Chairs"]"#),
            ),
        )
    }

    #[test]
    fn test_interaction_description_names_request_and_status() {
        let contract = furniture_contract();

        assert_eq!(
            contract.interactions[0].description,
            "GET /furniture-types -> 200"
        );
    }

    #[test]
    fn test_document_layout() {
        let document = furniture_contract().to_document().unwrap();
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();

        assert_eq!(value["consumer"]["name"], "furniture-ui-consumer");
        assert_eq!(value["provider"]["name"], "furniture-service-producer");
        assert_eq!(value["metadata"]["pactSpecification"]["version"], "2.0.0");
        assert_eq!(value["interactions"][0]["response"]["status"], 200);
        assert_eq!(
            value["interactions"][0]["response"]["headers"]["content-type"],
            "application/json"
        );
        assert!(value["interactions"][0]["request"].get("body").is_none());
        assert!(value["interactions"][0]["response"].get("bodyMatch").is_none());
        assert!(document.ends_with('\n'));
    }

    #[test]
    fn test_document_read_back() {
        let contract = furniture_contract();
        let document = contract.to_document().unwrap();

        assert_eq!(Contract::from_document(&document).unwrap(), contract);
    }

    #[test]
    fn test_shape_match_is_kept_in_document() {
        let contract = Contract::new("a", "b").with_interaction(Interaction::new(
            RequestData::new("GET", "/x"),
            ResponseData::new(200).with_body("[]").with_shape_match(),
        ));
        let document = contract.to_document().unwrap();

        assert!(document.contains("\"bodyMatch\": \"shape\""));
        assert_eq!(
            Contract::from_document(&document).unwrap().interactions[0]
                .response
                .body_match,
            BodyMatch::Shape
        );
    }
}
