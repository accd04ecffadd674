use crate::{
    contract_store::{ContractStore, FileContractStore},
    mutations::{MutationsBuilder, RequestMutation, ResponseMutation, TRANSPORT_HEADERS},
};
use std::{path::PathBuf, sync::Arc};

pub const DEFAULT_CONTRACT_DIRECTORY: &str = "target/contracts";

/// Settings of one consumer test: who talks to whom, where the stub listens and where the
/// resulting contract goes.
#[derive(Debug)]
pub struct ContractConfiguration {
    pub(crate) consumer: String,
    pub(crate) provider: String,
    pub(crate) port: u16,
    pub(crate) contract_directory: PathBuf,
    pub(crate) contract_store: Option<Arc<dyn ContractStore + Send + Sync>>,
    pub(crate) fail_if_contract_changed: bool,
    pub(crate) record_request_mutations: Vec<RequestMutation>,
    pub(crate) record_response_mutations: Vec<ResponseMutation>,
}

impl ContractConfiguration {
    pub fn new<S1: Into<String>, S2: Into<String>>(consumer: S1, provider: S2) -> Self {
        let mut transport_headers = MutationsBuilder::new();
        transport_headers.remove_headers(TRANSPORT_HEADERS.iter().copied());

        Self {
            consumer: consumer.into(),
            provider: provider.into(),
            port: 0,
            contract_directory: PathBuf::from(DEFAULT_CONTRACT_DIRECTORY),
            contract_store: None,
            fail_if_contract_changed: false,
            record_request_mutations: transport_headers.into_request_mutations(),
            record_response_mutations: Vec::new(),
        }
    }

    pub fn consumer(&self) -> &str {
        &self.consumer
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Port of the stub server, `0` picks a free one.
    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_contract_directory<P: Into<PathBuf>>(&mut self, directory: P) {
        self.contract_directory = directory.into();
    }

    /// Overrides the file store rooted at the contract directory.
    pub fn set_contract_store(&mut self, store: Arc<dyn ContractStore + Send + Sync>) {
        self.contract_store = Some(store);
    }

    pub fn contract_store(&self) -> Arc<dyn ContractStore + Send + Sync> {
        self.contract_store
            .clone()
            .unwrap_or_else(|| Arc::new(FileContractStore::new(self.contract_directory.clone())))
    }

    pub fn set_fail_if_contract_changed(&mut self, value: bool) {
        self.fail_if_contract_changed = value;
    }

    pub fn fail_if_contract_changed(&self) -> bool {
        self.fail_if_contract_changed
    }

    pub fn add_record_request_mutations<
        F: FnOnce(&mut MutationsBuilder) -> &mut MutationsBuilder,
    >(
        &mut self,
        func: F,
    ) {
        let mut mutations = MutationsBuilder::new();
        let _ = func(&mut mutations);
        self.record_request_mutations
            .extend(mutations.into_request_mutations());
    }

    pub fn add_record_response_mutations<
        F: FnOnce(&mut MutationsBuilder) -> &mut MutationsBuilder,
    >(
        &mut self,
        func: F,
    ) {
        let mut mutations = MutationsBuilder::new();
        let _ = func(&mut mutations);
        self.record_response_mutations
            .extend(mutations.into_response_mutations());
    }
}
