use crate::{
    contract_configuration::ContractConfiguration,
    data::{Contract, ResponseData},
    error::Error,
    matcher::RequestMatcher,
    recorder::InteractionRecorder,
    stub_server::StubServer,
};
use std::sync::Arc;

/// A stub server wired to an interaction recorder for the duration of one consumer test.
///
/// The stub listener lives exactly as long as the session: [`finish`](ConsumerSession::finish)
/// releases it before writing the contract, and dropping the session (for example while a failed
/// assertion unwinds) releases it without writing anything.
#[derive(Debug)]
pub struct ConsumerSession {
    consumer: String,
    provider: String,
    server: StubServer,
    recorder: Arc<InteractionRecorder>,
}

impl ConsumerSession {
    pub fn start(mut configuration: ContractConfiguration) -> Result<Self, Error> {
        let recorder = Arc::new(InteractionRecorder::from_configuration(&mut configuration));
        let mut server = StubServer::new();
        server.add_listener(recorder.clone())?;
        server.start(configuration.port())?;

        tracing::debug!(
            consumer = configuration.consumer(),
            provider = configuration.provider(),
            "Consumer session started"
        );

        Ok(Self {
            consumer: configuration.consumer,
            provider: configuration.provider,
            server,
            recorder,
        })
    }

    pub fn register_stub(&self, matcher: RequestMatcher, response: ResponseData) -> Result<(), Error> {
        self.server.register_stub(matcher, response)
    }

    /// Base URL the consumer under test should call instead of the real provider.
    pub fn base_url(&self) -> Result<String, Error> {
        self.server.base_url()
    }

    pub fn server(&self) -> &StubServer {
        &self.server
    }

    pub fn recorder(&self) -> &InteractionRecorder {
        &self.recorder
    }

    /// Stops the stub, then writes the contract unless a request went unmatched or two
    /// recordings conflicted.
    pub fn finish(mut self) -> Result<Contract, Error> {
        self.server.stop();
        self.server.check_unmatched()?;
        self.recorder.flush(&self.consumer, &self.provider)
    }
}
