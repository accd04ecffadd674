mod add_header_mutation;
mod body_replace_mutation;
mod remove_headers_mutation;

use crate::data::{RequestData, ResponseData};
use add_header_mutation::AddHeaderMutation;
use body_replace_mutation::{BodyReplaceMutation, BodyReplaceRegexMutation};
use regex::Regex;
use remove_headers_mutation::{RemoveHeadersMutation, RemoveHeadersRegexMutation};
use std::{collections::BTreeMap, fmt::Debug};

/// Headers that describe the transport rather than the interaction. They are stripped from
/// recorded requests so contracts don't depend on the stub's port or the client's connection
/// handling.
pub const TRANSPORT_HEADERS: [&str; 3] = ["host", "content-length", "connection"];

pub trait BodyMutation: Debug {
    fn mutate(&self, body: &mut String);
}

pub trait HeadersMutation: Debug {
    fn mutate(&self, headers: &mut BTreeMap<String, String>);
}

#[derive(Debug)]
enum MutationType {
    Body(Box<dyn BodyMutation + Send + Sync>),
    Headers(Box<dyn HeadersMutation + Send + Sync>),
}

impl MutationType {
    fn apply(&self, headers: &mut BTreeMap<String, String>, body: &mut Option<String>) {
        match self {
            MutationType::Headers(hm) => hm.mutate(headers),
            MutationType::Body(bm) => {
                if let Some(body) = body {
                    bm.mutate(body);
                }
            }
        }
    }
}

/// Rewrites a request before it is written into a contract.
#[derive(Debug)]
pub struct RequestMutation {
    mutation_type: MutationType,
}

impl RequestMutation {
    fn from_mutation_type(mutation_type: MutationType) -> Self {
        Self { mutation_type }
    }

    pub fn mutate(&self, request_data: &mut RequestData) {
        self.mutation_type
            .apply(&mut request_data.headers, &mut request_data.body);
    }
}

/// Rewrites a response before it is written into a contract.
#[derive(Debug)]
pub struct ResponseMutation {
    mutation_type: MutationType,
}

impl ResponseMutation {
    fn from_mutation_type(mutation_type: MutationType) -> Self {
        Self { mutation_type }
    }

    pub fn mutate(&self, response_data: &mut ResponseData) {
        self.mutation_type
            .apply(&mut response_data.headers, &mut response_data.body);
    }
}

pub struct MutationsBuilder {
    mutations: Vec<MutationType>,
}

impl MutationsBuilder {
    pub(crate) fn new() -> Self {
        Self {
            mutations: Vec::new(),
        }
    }

    pub fn remove_headers<S: Into<String>, I: IntoIterator<Item = S>>(
        &mut self,
        headers: I,
    ) -> &mut Self {
        self.add_headers_mutation(RemoveHeadersMutation::new(headers))
    }

    pub fn remove_headers_regex<I: IntoIterator<Item = Regex>>(
        &mut self,
        patterns: I,
    ) -> &mut Self {
        self.add_headers_mutation(RemoveHeadersRegexMutation::new(patterns))
    }

    pub fn add_header<S1: Into<String>, S2: Into<String>>(
        &mut self,
        header_name: S1,
        header_value: S2,
    ) -> &mut Self {
        self.add_headers_mutation(AddHeaderMutation::new(header_name, header_value))
    }

    pub fn body_replace<S1: Into<String>, S2: Into<String>>(
        &mut self,
        text: S1,
        replacement: S2,
    ) -> &mut Self {
        self.add_body_mutation(BodyReplaceMutation::new(text, replacement))
    }

    pub fn body_replace_regex<S: Into<String>>(
        &mut self,
        pattern: Regex,
        replacement: S,
    ) -> &mut Self {
        self.add_body_mutation(BodyReplaceRegexMutation::new(pattern, replacement))
    }

    pub fn add_headers_mutation<HM: HeadersMutation + Send + Sync + 'static>(
        &mut self,
        mutation: HM,
    ) -> &mut Self {
        self.mutations
            .push(MutationType::Headers(Box::new(mutation)));
        self
    }

    pub fn add_body_mutation<BM: BodyMutation + Send + Sync + 'static>(
        &mut self,
        mutation: BM,
    ) -> &mut Self {
        self.mutations.push(MutationType::Body(Box::new(mutation)));
        self
    }

    pub fn into_response_mutations(self) -> Vec<ResponseMutation> {
        self.mutations
            .into_iter()
            .map(ResponseMutation::from_mutation_type)
            .collect()
    }

    pub fn into_request_mutations(self) -> Vec<RequestMutation> {
        self.mutations
            .into_iter()
            .map(RequestMutation::from_mutation_type)
            .collect()
    }
}

impl Default for MutationsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_mutations_strip_transport_headers() {
        let mut builder = MutationsBuilder::new();
        builder.remove_headers(TRANSPORT_HEADERS.iter().copied());
        let mutations = builder.into_request_mutations();
        let mut request = RequestData::new("GET", "/furniture-types")
            .with_header("Host", "127.0.0.1:40111")
            .with_header("Accept", "*/*");

        for mutation in &mutations {
            mutation.mutate(&mut request);
        }

        assert_eq!(request.header("host"), None);
        assert_eq!(request.header("accept"), Some(&String::from("*/*")));
    }

    #[test]
    fn test_response_mutations_run_in_order() {
        let mut builder = MutationsBuilder::new();
        builder
            .body_replace("Tables", "Desks")
            .body_replace_regex(Regex::new("D[a-z]+").unwrap(), "Sofas")
            .remove_headers_regex(vec![Regex::new("^x-").unwrap()])
            .add_header("X-Recorded", "true");
        let mut response = ResponseData::new(200)
            .with_header("X-Request-Id", "5f1c")
            .with_body(r#"["Tables","Chairs"]"#);

        for mutation in builder.into_response_mutations() {
            mutation.mutate(&mut response);
        }

        assert_eq!(response.body.as_deref(), Some(r#"["Sofas","Chairs"]"#));
        assert_eq!(response.header("x-request-id"), None);
        assert_eq!(response.header("x-recorded"), Some(&String::from("true")));
    }

    #[test]
    fn test_body_mutation_ignores_missing_body() {
        let mut builder = MutationsBuilder::new();
        builder.body_replace("a", "b");
        let mut request = RequestData::new("GET", "/furniture-types");

        for mutation in builder.into_request_mutations() {
            mutation.mutate(&mut request);
        }

        assert_eq!(request.body, None);
    }
}
