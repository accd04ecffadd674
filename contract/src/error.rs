use crate::data::ResponseData;
use hyper::http;
use std::{io, sync};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No stub matched request {method} {path}")]
    StubMismatch { method: String, path: String },
    #[error("Conflicting recordings for {request}: first {first}, then {second}")]
    ContractConflict {
        request: String,
        first: Box<ResponseData>,
        second: Box<ResponseData>,
    },
    #[error("No contract found between consumer {consumer} and provider {provider}")]
    ContractNotFound { consumer: String, provider: String },
    #[error("The contract between {consumer} and {provider} differs from the stored one")]
    ContractChanged { consumer: String, provider: String },
    #[error("{failed} of {total} interactions failed verification")]
    VerificationFailed { failed: usize, total: usize },
    #[error("The stub server is already running")]
    ServerAlreadyRunning,
    #[error("The stub server isn't running")]
    ServerNotRunning,
    #[error("The stub server couldn't be started: {0}")]
    ServerStartup(String),
    #[error("The lock was poisoned")]
    PoisonedLock,
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid contract document: {0}")]
    InvalidContract(#[from] serde_json::Error),
    #[error("Invalid header name")]
    InvalidHeaderName(#[from] hyper::header::InvalidHeaderName),
    #[error("Invalid header value")]
    InvalidHeaderValue(#[from] hyper::header::InvalidHeaderValue),
    #[error("Invalid HTTP method")]
    InvalidMethod(#[from] http::method::InvalidMethod),
    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),
    #[error("Invalid body")]
    InvalidBody,
    #[error("Hyper error: {0}")]
    HyperError(#[from] hyper::Error),
    #[error("Http Error: {0}")]
    HttpError(#[from] http::Error),
}

impl<T> From<sync::PoisonError<T>> for Error {
    fn from(_: sync::PoisonError<T>) -> Self {
        Error::PoisonedLock
    }
}
