//! Consumer-driven contract testing for JSON-over-HTTP services.
//!
//! Consumer tests run their client against a [`StubServer`]; an [`InteractionRecorder`] turns the
//! exchanges into a [`Contract`] that a [`ContractStore`] keeps. Provider tests load the contract
//! and replay it with a [`ContractVerifier`].

mod body;
mod consumer_session;
mod contract_configuration;
mod contract_store;
mod data;
mod error;
mod http_client;
mod matcher;
mod mutations;
mod recorder;
mod stub_server;
mod util;
mod verifier;

pub use body::{match_shape, BodyMatch, ShapeMismatch};
pub use consumer_session::ConsumerSession;
pub use contract_codegen::contract_test;
pub use contract_configuration::{ContractConfiguration, DEFAULT_CONTRACT_DIRECTORY};
pub use contract_store::{ContractStore, FileContractStore, MemoryContractStore};
pub use data::{
    Contract, Interaction, Metadata, Pacticipant, RequestData, ResponseData, SpecificationVersion,
    SPECIFICATION_VERSION,
};
pub use error::Error;
pub use http_client::{HttpClient, HyperHttpClient};
pub use matcher::{PathPattern, RequestMatcher};
pub use mutations::{
    BodyMutation, HeadersMutation, MutationsBuilder, RequestMutation, ResponseMutation,
    TRANSPORT_HEADERS,
};
pub use recorder::InteractionRecorder;
pub use stub_server::{ExchangeListener, StubServer};
pub use verifier::{
    compare_response, ContractVerifier, Mismatch, VerificationReport, VerificationResult,
};
