use crate::data::RequestData;
use regex::Regex;
use std::{collections::BTreeMap, fmt::Display};

#[derive(Debug, Clone)]
pub enum PathPattern {
    Exact(String),
    /// The whole path (including the query) must match the pattern.
    Regex(Regex),
}

impl PathPattern {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(expected) => expected == path,
            PathPattern::Regex(pattern) => pattern
                .find(path)
                .map(|m| m.start() == 0 && m.end() == path.len())
                .unwrap_or(false),
        }
    }
}

/// Predicate over incoming stub requests.
#[derive(Debug, Clone)]
pub struct RequestMatcher {
    method: Option<String>,
    path: PathPattern,
    headers: BTreeMap<String, String>,
    body: Option<String>,
}

impl RequestMatcher {
    pub fn new<S1: Into<String>, S2: Into<String>>(method: S1, path: S2) -> Self {
        Self {
            method: Some(method.into().to_uppercase()),
            path: PathPattern::Exact(path.into()),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get<S: Into<String>>(path: S) -> Self {
        Self::new("GET", path)
    }

    pub fn post<S: Into<String>>(path: S) -> Self {
        Self::new("POST", path)
    }

    /// Matches any method on paths accepted by `pattern`.
    pub fn path_matching(pattern: Regex) -> Self {
        Self {
            method: None,
            path: PathPattern::Regex(pattern),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_method<S: Into<String>>(mut self, method: S) -> Self {
        self.method = Some(method.into().to_uppercase());
        self
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

    pub fn matches(&self, request: &RequestData) -> bool {
        if let Some(method) = &self.method {
            if *method != request.method {
                return false;
            }
        }

        if !self.path.matches(&request.path) {
            return false;
        }

        for (name, value) in &self.headers {
            match request.header(name) {
                Some(actual) if actual.trim() == value.trim() => {}
                _ => return false,
            }
        }

        match &self.body {
            Some(body) => request.body.as_deref() == Some(body.as_str()),
            None => true,
        }
    }
}

impl Display for RequestMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let method = self.method.as_deref().unwrap_or("ANY");
        match &self.path {
            PathPattern::Exact(path) => write!(f, "{} {}", method, path),
            PathPattern::Regex(pattern) => write!(f, "{} ~{}", method, pattern),
        }
    }
}
