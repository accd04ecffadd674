use crate::{
    contract_configuration::ContractConfiguration,
    contract_store::ContractStore,
    data::{Contract, Interaction, RequestData, ResponseData},
    error::Error,
    mutations::{MutationsBuilder, RequestMutation, ResponseMutation},
    stub_server::ExchangeListener,
};
use std::{mem, sync::Arc, sync::Mutex};

#[derive(Debug, Clone)]
struct Conflict {
    request: String,
    first: ResponseData,
    second: ResponseData,
}

impl From<Conflict> for Error {
    fn from(conflict: Conflict) -> Self {
        Error::ContractConflict {
            request: conflict.request,
            first: Box::new(conflict.first),
            second: Box::new(conflict.second),
        }
    }
}

#[derive(Debug, Default)]
struct RecorderState {
    interactions: Vec<Interaction>,
    conflict: Option<Conflict>,
}

/// Turns exchanges observed on a stub server into contract interactions.
///
/// Identical exchanges are recorded once. Two exchanges for the same request (method, path and
/// body) with different responses are a conflict; the first conflict is kept and makes every
/// later [`flush`](InteractionRecorder::flush) fail.
#[derive(Debug)]
pub struct InteractionRecorder {
    store: Arc<dyn ContractStore + Send + Sync>,
    fail_if_contract_changed: bool,
    request_mutations: Vec<RequestMutation>,
    response_mutations: Vec<ResponseMutation>,
    state: Mutex<RecorderState>,
}

impl InteractionRecorder {
    pub fn new(store: Arc<dyn ContractStore + Send + Sync>) -> Self {
        Self {
            store,
            fail_if_contract_changed: false,
            request_mutations: Vec::new(),
            response_mutations: Vec::new(),
            state: Mutex::new(RecorderState::default()),
        }
    }

    /// Takes the store, the change check and the record mutations out of `configuration`.
    pub fn from_configuration(configuration: &mut ContractConfiguration) -> Self {
        let mut recorder = Self::new(configuration.contract_store());
        recorder.fail_if_contract_changed = configuration.fail_if_contract_changed;
        recorder.request_mutations = mem::take(&mut configuration.record_request_mutations);
        recorder.response_mutations = mem::take(&mut configuration.record_response_mutations);
        recorder
    }

    pub fn set_fail_if_contract_changed(&mut self, value: bool) {
        self.fail_if_contract_changed = value;
    }

    pub fn add_request_mutations<F: FnOnce(&mut MutationsBuilder) -> &mut MutationsBuilder>(
        &mut self,
        func: F,
    ) {
        let mut mutations = MutationsBuilder::new();
        let _ = func(&mut mutations);
        self.request_mutations
            .extend(mutations.into_request_mutations());
    }

    pub fn add_response_mutations<F: FnOnce(&mut MutationsBuilder) -> &mut MutationsBuilder>(
        &mut self,
        func: F,
    ) {
        let mut mutations = MutationsBuilder::new();
        let _ = func(&mut mutations);
        self.response_mutations
            .extend(mutations.into_response_mutations());
    }

    pub fn observe(&self, mut request: RequestData, mut response: ResponseData) -> Result<(), Error> {
        for mutation in &self.request_mutations {
            mutation.mutate(&mut request);
        }
        for mutation in &self.response_mutations {
            mutation.mutate(&mut response);
        }

        let mut state = self.state.lock()?;
        let existing = state.interactions.iter().position(|interaction| {
            interaction.request.method == request.method
                && interaction.request.path == request.path
                && interaction.request.body == request.body
        });

        match existing {
            Some(index) if state.interactions[index].response == response => {
                tracing::debug!(request = %request, "Interaction already recorded");
                Ok(())
            }
            Some(index) => {
                let conflict = Conflict {
                    request: request.to_string(),
                    first: state.interactions[index].response.clone(),
                    second: response,
                };
                tracing::warn!(
                    request = %conflict.request,
                    first = %conflict.first,
                    second = %conflict.second,
                    "Conflicting responses recorded for the same request"
                );

                if state.conflict.is_none() {
                    state.conflict = Some(conflict.clone());
                }

                Err(conflict.into())
            }
            None => {
                let interaction = Interaction::new(request, response);
                tracing::debug!(description = %interaction.description, "Recorded interaction");
                state.interactions.push(interaction);
                Ok(())
            }
        }
    }

    pub fn interactions(&self) -> Result<Vec<Interaction>, Error> {
        Ok(self.state.lock()?.interactions.clone())
    }

    /// Builds the contract from everything observed so far and saves it to the store.
    ///
    /// Observations are kept, so flushing again without new exchanges writes the same document.
    pub fn flush(&self, consumer: &str, provider: &str) -> Result<Contract, Error> {
        let state = self.state.lock()?;

        if let Some(conflict) = &state.conflict {
            return Err(conflict.clone().into());
        }

        let mut contract = Contract::new(consumer, provider);
        contract.interactions = state.interactions.clone();
        drop(state);

        if self.fail_if_contract_changed {
            match self.store.load(consumer, provider) {
                Ok(stored) if stored != contract => {
                    return Err(Error::ContractChanged {
                        consumer: consumer.into(),
                        provider: provider.into(),
                    })
                }
                Ok(_) | Err(Error::ContractNotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        self.store.save(&contract)?;

        Ok(contract)
    }
}

impl ExchangeListener for InteractionRecorder {
    fn on_exchange(&self, request: &RequestData, response: &ResponseData) {
        // conflicts are kept in the recorder and reported by flush
        let _ = self.observe(request.clone(), response.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_store::{FileContractStore, MemoryContractStore};
    use std::fs;

    const CONSUMER: &str = "furniture-ui-consumer";
    const PROVIDER: &str = "furniture-service-producer";

    fn furniture_types_request() -> RequestData {
        RequestData::new("GET", "/furniture-types")
            .with_header("host", "127.0.0.1:40111")
            .with_header("accept", "*/*")
    }

    fn furniture_types_response(body: &str) -> ResponseData {
        ResponseData::new(200)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    fn recorder(store: Arc<dyn ContractStore + Send + Sync>) -> InteractionRecorder {
        let mut configuration = ContractConfiguration::new(CONSUMER, PROVIDER);
        configuration.set_contract_store(store);
        InteractionRecorder::from_configuration(&mut configuration)
    }

    #[test]
    fn test_flush_writes_observed_interaction() {
        let store = Arc::new(MemoryContractStore::new());
        let recorder = recorder(store.clone());

        recorder
            .observe(
                furniture_types_request(),
                furniture_types_response(r#"["Tables","Chairs"]"#),
            )
            .unwrap();
        let contract = recorder.flush(CONSUMER, PROVIDER).unwrap();

        assert_eq!(contract.interactions.len(), 1);
        assert_eq!(contract.interactions[0].description, "GET /furniture-types -> 200");
        assert_eq!(contract.interactions[0].request.header("host"), None);
        assert_eq!(
            contract.interactions[0].request.header("accept"),
            Some(&String::from("*/*"))
        );
        assert_eq!(store.load(CONSUMER, PROVIDER).unwrap(), contract);
    }

    #[test]
    fn test_identical_exchanges_are_recorded_once() {
        let recorder = recorder(Arc::new(MemoryContractStore::new()));

        for port in &[40111, 40112, 40113] {
            recorder
                .observe(
                    RequestData::new("GET", "/furniture-types")
                        .with_header("host", format!("127.0.0.1:{}", port)),
                    furniture_types_response(r#"["Tables","Chairs"]"#),
                )
                .unwrap();
        }

        assert_eq!(recorder.interactions().unwrap().len(), 1);
    }

    #[test]
    fn test_different_bodies_are_different_interactions() {
        let recorder = recorder(Arc::new(MemoryContractStore::new()));

        recorder
            .observe(
                RequestData::new("POST", "/orders").with_body(r#"{"type":"Tables"}"#),
                ResponseData::new(201),
            )
            .unwrap();
        recorder
            .observe(
                RequestData::new("POST", "/orders").with_body(r#"{"type":"Chairs"}"#),
                ResponseData::new(201),
            )
            .unwrap();

        let interactions = recorder.interactions().unwrap();
        assert_eq!(interactions.len(), 2);
        assert_eq!(interactions[0].request.body.as_deref(), Some(r#"{"type":"Tables"}"#));
    }

    #[test]
    fn test_conflicting_responses_halt_flush() {
        let store = Arc::new(MemoryContractStore::new());
        let recorder = recorder(store.clone());

        recorder
            .observe(
                furniture_types_request(),
                furniture_types_response(r#"["Tables","Chairs"]"#),
            )
            .unwrap();
        let observed = recorder.observe(
            furniture_types_request(),
            furniture_types_response(r#"["Tables"]"#),
        );

        assert!(matches!(observed, Err(Error::ContractConflict { .. })));
        match recorder.flush(CONSUMER, PROVIDER) {
            Err(Error::ContractConflict {
                request,
                first,
                second,
            }) => {
                assert_eq!(request, "GET /furniture-types");
                assert_eq!(first.body.as_deref(), Some(r#"["Tables","Chairs"]"#));
                assert_eq!(second.body.as_deref(), Some(r#"["Tables"]"#));
            }
            other => panic!("Expected a contract conflict, got {:?}", other),
        }
        assert_eq!(store.document(CONSUMER, PROVIDER).unwrap(), None);
    }

    #[test]
    fn test_flush_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileContractStore::new(dir.path());
        let recorder = recorder(Arc::new(store.clone()));
        let path = store.contract_path(CONSUMER, PROVIDER);

        recorder
            .observe(
                furniture_types_request(),
                furniture_types_response(r#"["Tables","Chairs"]"#),
            )
            .unwrap();
        recorder.flush(CONSUMER, PROVIDER).unwrap();
        let first = fs::read(&path).unwrap();
        recorder.flush(CONSUMER, PROVIDER).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_fail_if_contract_changed() {
        let store = Arc::new(MemoryContractStore::new());
        let original = recorder(store.clone());
        original
            .observe(
                furniture_types_request(),
                furniture_types_response(r#"["Tables","Chairs"]"#),
            )
            .unwrap();
        original.flush(CONSUMER, PROVIDER).unwrap();

        let mut changed = recorder(store.clone());
        changed.set_fail_if_contract_changed(true);
        changed
            .observe(furniture_types_request(), furniture_types_response(r#"["Tables"]"#))
            .unwrap();

        assert!(matches!(
            changed.flush(CONSUMER, PROVIDER),
            Err(Error::ContractChanged { .. })
        ));
        assert_eq!(
            store.load(CONSUMER, PROVIDER).unwrap().interactions[0]
                .response
                .body
                .as_deref(),
            Some(r#"["Tables","Chairs"]"#)
        );
    }

    #[test]
    fn test_response_mutations_apply_before_recording() {
        let mut recorder = recorder(Arc::new(MemoryContractStore::new()));
        recorder.add_response_mutations(|m| m.remove_headers(vec!["date"]));

        recorder
            .observe(
                furniture_types_request(),
                furniture_types_response("[]").with_header("Date", "Sat, 17 Oct 2026 10:00:00 GMT"),
            )
            .unwrap();
        recorder
            .observe(
                furniture_types_request(),
                furniture_types_response("[]").with_header("Date", "Sat, 17 Oct 2026 10:00:01 GMT"),
            )
            .unwrap();

        let interactions = recorder.interactions().unwrap();
        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0].response.header("date"), None);
    }
}
