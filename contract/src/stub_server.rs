use crate::{
    data::{RequestData, ResponseData},
    error::Error,
    matcher::RequestMatcher,
    util,
};
use futures::channel::oneshot;
use hyper::{
    body,
    header::CONTENT_TYPE,
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server, StatusCode,
};
use std::{
    convert::Infallible,
    fmt::Debug,
    net::SocketAddr,
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};
use tokio::runtime::Runtime;

/// Gets every exchange the stub server answered from a registered stub.
pub trait ExchangeListener: Debug {
    fn on_exchange(&self, request: &RequestData, response: &ResponseData);
}

#[derive(Debug)]
struct Stub {
    matcher: RequestMatcher,
    response: ResponseData,
}

#[derive(Debug, Default)]
struct StubState {
    stubs: Mutex<Vec<Stub>>,
    listeners: Mutex<Vec<Arc<dyn ExchangeListener + Send + Sync>>>,
    unmatched: Mutex<Vec<RequestData>>,
}

impl StubState {
    fn find_response(&self, request: &RequestData) -> Result<Option<ResponseData>, Error> {
        Ok(self
            .stubs
            .lock()?
            .iter()
            .rev()
            .find(|stub| stub.matcher.matches(request))
            .map(|stub| stub.response.clone()))
    }

    fn notify(&self, request: &RequestData, response: &ResponseData) -> Result<(), Error> {
        for listener in self.listeners.lock()?.iter() {
            listener.on_exchange(request, response);
        }

        Ok(())
    }
}

#[derive(Debug)]
struct RunningServer {
    address: SocketAddr,
    shutdown: oneshot::Sender<()>,
    join_handle: JoinHandle<()>,
}

/// In-process HTTP server answering registered stubs on `127.0.0.1`.
///
/// Requests no stub matches get a `404` and are kept for [`check_unmatched`]. When several stubs
/// match a request the most recently registered one answers. The listener is released by
/// [`stop`] or, at the latest, when the server is dropped.
///
/// [`check_unmatched`]: StubServer::check_unmatched
/// [`stop`]: StubServer::stop
#[derive(Debug, Default)]
pub struct StubServer {
    state: Arc<StubState>,
    running: Option<RunningServer>,
}

impl StubServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_stub(&self, matcher: RequestMatcher, response: ResponseData) -> Result<(), Error> {
        tracing::debug!(stub = %matcher, response = %response, "Registered stub");
        self.state.stubs.lock()?.push(Stub { matcher, response });
        Ok(())
    }

    pub fn add_listener(&self, listener: Arc<dyn ExchangeListener + Send + Sync>) -> Result<(), Error> {
        self.state.listeners.lock()?.push(listener);
        Ok(())
    }

    /// Binds `127.0.0.1:port` (`0` for any free port) and starts answering requests.
    pub fn start(&mut self, port: u16) -> Result<SocketAddr, Error> {
        if self.running.is_some() {
            return Err(Error::ServerAlreadyRunning);
        }

        let (shutdown_sender, shutdown_receiver) = oneshot::channel();
        let (ready_sender, ready_receiver) = mpsc::channel();
        let state = self.state.clone();

        let join_handle = thread::Builder::new()
            .name(String::from("stub-server"))
            .spawn(move || match Runtime::new() {
                Ok(runtime) => {
                    runtime.block_on(serve(state, port, ready_sender, shutdown_receiver));
                }
                Err(e) => {
                    let _ = ready_sender.send(Err(e.into()));
                }
            })?;

        match ready_receiver.recv() {
            Ok(Ok(address)) => {
                tracing::info!(%address, "Stub server started");
                self.running = Some(RunningServer {
                    address,
                    shutdown: shutdown_sender,
                    join_handle,
                });
                Ok(address)
            }
            Ok(Err(e)) => {
                let _ = join_handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = join_handle.join();
                Err(Error::ServerStartup(String::from(
                    "the server thread exited before binding",
                )))
            }
        }
    }

    /// Shuts the listener down and waits for the server thread. Does nothing when not running.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = running.shutdown.send(());
            if running.join_handle.join().is_err() {
                tracing::error!("Stub server thread panicked");
            }

            tracing::info!(address = %running.address, "Stub server stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn address(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|running| running.address)
    }

    pub fn base_url(&self) -> Result<String, Error> {
        self.address()
            .map(|address| format!("http://{}", address))
            .ok_or(Error::ServerNotRunning)
    }

    pub fn unmatched_requests(&self) -> Result<Vec<RequestData>, Error> {
        Ok(self.state.unmatched.lock()?.clone())
    }

    /// Fails with [`Error::StubMismatch`] for the first request no stub matched.
    pub fn check_unmatched(&self) -> Result<(), Error> {
        match self.state.unmatched.lock()?.first() {
            Some(request) => Err(Error::StubMismatch {
                method: request.method.clone(),
                path: request.path.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Forgets the registered stubs and the unmatched requests. Listeners stay.
    pub fn reset(&self) -> Result<(), Error> {
        self.state.stubs.lock()?.clear();
        self.state.unmatched.lock()?.clear();
        Ok(())
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn serve(
    state: Arc<StubState>,
    port: u16,
    ready: mpsc::Sender<Result<SocketAddr, Error>>,
    shutdown: oneshot::Receiver<()>,
) {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let builder = match Server::try_bind(&addr) {
        Ok(builder) => builder,
        Err(e) => {
            let _ = ready.send(Err(e.into()));
            return;
        }
    };

    let server = builder.serve(make_service_fn(move |_| {
        let state = state.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |request| {
                handle_request(state.clone(), request)
            }))
        }
    }));

    let _ = ready.send(Ok(server.local_addr()));

    let server = server.with_graceful_shutdown(async {
        let _ = shutdown.await;
    });

    if let Err(e) = server.await {
        tracing::error!("Stub server error: {}", e);
    }
}

async fn handle_request(
    state: Arc<StubState>,
    mut request: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    match respond(&state, &mut request).await {
        Ok(response) => Ok(response),
        Err(error) => {
            tracing::error!("Stub server couldn't answer: {}", error);
            let mut response = Response::new(Body::from(error.to_string()));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            Ok(response)
        }
    }
}

async fn respond(state: &StubState, request: &mut Request<Body>) -> Result<Response<Body>, Error> {
    let request_data = read_request_data(request).await?;

    match state.find_response(&request_data)? {
        Some(response_data) => {
            state.notify(&request_data, &response_data)?;
            build_response(&response_data)
        }
        None => {
            tracing::warn!(request = %request_data, "No stub matched request");
            let body = format!("No stub matched request {}", request_data);
            state.unmatched.lock()?.push(request_data);

            Ok(Response::builder()
                .status(StatusCode::NOT_FOUND)
                .header(CONTENT_TYPE, "text/plain")
                .body(body.into())?)
        }
    }
}

async fn read_request_data(request: &mut Request<Body>) -> Result<RequestData, Error> {
    let method = request.method().to_string();
    let path = request
        .uri()
        .path_and_query()
        .map(|path_and_query| path_and_query.as_str())
        .unwrap_or("/")
        .to_string();
    let headers = util::extract_headers(request.headers());

    let body = body::to_bytes(request.body_mut())
        .await
        .map_err(|_| Error::InvalidBody)?;

    Ok(RequestData {
        method,
        path,
        headers,
        body: util::body_text(&body)?,
    })
}

fn build_response(response_data: &ResponseData) -> Result<Response<Body>, Error> {
    let mut response_builder = Response::builder().status(response_data.status_code);

    if let Some(headers_mut) = response_builder.headers_mut() {
        util::put_headers(
            headers_mut,
            response_data
                .headers
                .iter()
                // the body is written at once, a chunked fixture header would confuse clients
                .filter(|(key, value)| *key != "transfer-encoding" || *value != "chunked"),
        )?;
    }

    let body = response_data.body.clone().unwrap_or_default();
    Ok(response_builder.body(body.into())?)
}
