use crate::{
    body::{self, BodyMatch},
    contract_store::ContractStore,
    data::{Contract, Interaction, ResponseData},
    error::Error,
    http_client::{HttpClient, HyperHttpClient},
};
use std::{fmt::Display, sync::Arc};
use tokio::runtime;

/// One way a provider's response diverged from the recorded expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Status {
        expected: u16,
        actual: u16,
    },
    Header {
        name: String,
        expected: String,
        actual: Option<String>,
    },
    Body {
        expected: String,
        actual: Option<String>,
    },
    BodyShape {
        path: String,
        expected: String,
        actual: String,
    },
    /// The request couldn't be replayed at all.
    Request {
        message: String,
    },
}

impl Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mismatch::Status { expected, actual } => {
                write!(f, "status differs. expected {}, actual {}", expected, actual)
            }
            Mismatch::Header {
                name,
                expected,
                actual,
            } => {
                let actual = match actual {
                    Some(value) => format!("\"{}\"", value),
                    None => String::from("<no header value>"),
                };
                write!(
                    f,
                    "header \"{}\" differs. expected \"{}\", actual {}",
                    name, expected, actual
                )
            }
            Mismatch::Body { expected, actual } => write!(
                f,
                "body differs. expected \"{}\", actual \"{}\"",
                expected.escape_default(),
                actual.as_deref().unwrap_or("").escape_default()
            ),
            Mismatch::BodyShape {
                path,
                expected,
                actual,
            } => write!(
                f,
                "body shape differs at {}. expected {}, actual {}",
                path, expected, actual
            ),
            Mismatch::Request { message } => write!(f, "request failed: {}", message),
        }
    }
}

/// Outcome of replaying one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub description: String,
    pub mismatches: Vec<Mismatch>,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.passed() {
            return write!(f, "{}: OK", self.description);
        }

        write!(f, "{}: FAILED", self.description)?;
        for mismatch in &self.mismatches {
            write!(f, "\n  - {}", mismatch)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub consumer: String,
    pub provider: String,
    pub results: Vec<VerificationResult>,
}

impl VerificationReport {
    /// True when every verified interaction passed.
    pub fn passed(&self) -> bool {
        self.results.iter().all(VerificationResult::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &VerificationResult> {
        self.results.iter().filter(|result| !result.passed())
    }

    pub fn into_result(self) -> Result<Self, Error> {
        let failed = self.failures().count();
        if failed == 0 {
            Ok(self)
        } else {
            Err(Error::VerificationFailed {
                failed,
                total: self.results.len(),
            })
        }
    }
}

impl Display for VerificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Verifying contract between {} and {}",
            self.consumer, self.provider
        )?;
        for result in &self.results {
            write!(f, "\n{}", result)?;
        }

        Ok(())
    }
}

/// Replays contract interactions against a running provider.
///
/// Interactions are sent one after another in contract order. A failing interaction never stops
/// the remaining ones from being verified.
#[derive(Debug)]
pub struct ContractVerifier {
    http_client: Arc<dyn HttpClient + Send + Sync>,
    description_filter: Option<String>,
}

impl ContractVerifier {
    pub fn new() -> Self {
        Self {
            http_client: Arc::new(HyperHttpClient::new()),
            description_filter: None,
        }
    }

    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient + Send + Sync>) -> Self {
        self.http_client = http_client;
        self
    }

    /// Only verify interactions whose description contains `filter`.
    pub fn with_description_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.description_filter = Some(filter.into());
        self
    }

    /// Blocks on its own runtime, so it mustn't be called from async code.
    pub fn verify(&self, contract: &Contract, base_url: &str) -> Result<VerificationReport, Error> {
        let runtime = runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let results = contract
            .interactions
            .iter()
            .filter(|interaction| self.selects(interaction))
            .map(|interaction| {
                tracing::info!(
                    provider = contract.provider_name(),
                    description = %interaction.description,
                    provider_state = ?interaction.provider_state,
                    "Verifying interaction"
                );

                let result = runtime.block_on(self.verify_interaction(interaction, base_url));
                if result.passed() {
                    tracing::info!(description = %result.description, "Interaction verified");
                } else {
                    tracing::warn!("{}", result);
                }

                result
            })
            .collect();

        Ok(VerificationReport {
            consumer: contract.consumer_name().to_string(),
            provider: contract.provider_name().to_string(),
            results,
        })
    }

    /// Loads the pair's contract first; a missing contract fails the whole run.
    pub fn verify_from_store(
        &self,
        store: &dyn ContractStore,
        consumer: &str,
        provider: &str,
        base_url: &str,
    ) -> Result<VerificationReport, Error> {
        let contract = store.load(consumer, provider)?;
        self.verify(&contract, base_url)
    }

    fn selects(&self, interaction: &Interaction) -> bool {
        match &self.description_filter {
            Some(filter) => interaction.description.contains(filter.as_str()),
            None => true,
        }
    }

    async fn verify_interaction(&self, interaction: &Interaction, base_url: &str) -> VerificationResult {
        let mismatches = match self
            .http_client
            .make_request(base_url, &interaction.request)
            .await
        {
            Ok(actual) => compare_response(&interaction.response, &actual),
            Err(e) => vec![Mismatch::Request {
                message: e.to_string(),
            }],
        };

        VerificationResult {
            description: interaction.description.clone(),
            mismatches,
        }
    }
}

impl Default for ContractVerifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Lists every field of `actual` that doesn't satisfy `expected`.
pub fn compare_response(expected: &ResponseData, actual: &ResponseData) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();

    if expected.status_code != actual.status_code {
        mismatches.push(Mismatch::Status {
            expected: expected.status_code,
            actual: actual.status_code,
        });
    }

    for (name, value) in &expected.headers {
        let actual_value = actual.header(name);
        if actual_value.map(|v| v.trim()) != Some(value.trim()) {
            mismatches.push(Mismatch::Header {
                name: name.clone(),
                expected: value.clone(),
                actual: actual_value.cloned(),
            });
        }
    }

    if let Some(expected_body) = &expected.body {
        if let Some(mismatch) = compare_body(expected.body_match, expected_body, actual.body.as_deref()) {
            mismatches.push(mismatch);
        }
    }

    mismatches
}

fn compare_body(body_match: BodyMatch, expected: &str, actual: Option<&str>) -> Option<Mismatch> {
    let exact_mismatch = || {
        if Some(expected) == actual {
            None
        } else {
            Some(Mismatch::Body {
                expected: expected.to_string(),
                actual: actual.map(String::from),
            })
        }
    };

    if body_match.is_exact() {
        return exact_mismatch();
    }

    // a shape is only meaningful for JSON, anything else has to match exactly
    let expected_value: serde_json::Value = match serde_json::from_str(expected) {
        Ok(value) => value,
        Err(_) => return exact_mismatch(),
    };

    let actual_value: serde_json::Value = match actual.map(serde_json::from_str::<serde_json::Value>) {
        Some(Ok(value)) => value,
        Some(Err(_)) => {
            return Some(Mismatch::BodyShape {
                path: String::from("$"),
                expected: String::from("JSON"),
                actual: String::from("invalid JSON"),
            })
        }
        None => {
            return Some(Mismatch::BodyShape {
                path: String::from("$"),
                expected: String::from("JSON"),
                actual: String::from("missing"),
            })
        }
    };

    body::match_shape(&expected_value, &actual_value)
        .err()
        .map(|shape| Mismatch::BodyShape {
            path: shape.path,
            expected: shape.expected,
            actual: shape.actual,
        })
}
