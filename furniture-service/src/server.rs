use crate::{error::Error, furniture::FurnitureService};
use futures::channel::oneshot;
use hyper::{
    header::{ALLOW, CONTENT_TYPE},
    server::conn::AddrIncoming,
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server, StatusCode,
};
use std::{
    convert::Infallible,
    future::Future,
    net::SocketAddr,
    sync::mpsc,
    thread::{self, JoinHandle},
};
use tokio::runtime::Runtime;

pub const DEFAULT_PORT: u16 = 8080;
pub const FURNITURE_TYPES_PATH: &str = "/furniture-types";

pub fn route(service: &FurnitureService, request: &Request<Body>) -> Result<Response<Body>, Error> {
    let response = match (request.method(), request.uri().path()) {
        (&Method::GET, FURNITURE_TYPES_PATH) => {
            let body = serde_json::to_string(&service.furniture_types())?;
            Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, "application/json")
                .body(body.into())?
        }
        (_, FURNITURE_TYPES_PATH) => Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(ALLOW, "GET")
            .body(Body::empty())?,
        _ => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::empty())?,
    };

    Ok(response)
}

fn answer(service: &FurnitureService, request: Request<Body>) -> Response<Body> {
    tracing::debug!(method = %request.method(), uri = %request.uri(), "Request received");

    match route(service, &request) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Couldn't answer {} {}: {}", request.method(), request.uri(), e);
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

/// Serves the furniture routes on `incoming` until `shutdown` completes.
pub async fn serve<F: Future<Output = ()>>(
    incoming: AddrIncoming,
    service: FurnitureService,
    shutdown: F,
) -> Result<(), Error> {
    let address = incoming.local_addr();
    let server = Server::builder(incoming).serve(make_service_fn(move |_| {
        let service = service.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |request| {
                let response = answer(&service, request);
                async move { Ok::<_, Infallible>(response) }
            }))
        }
    }));

    tracing::info!(%address, "Furniture service listening");
    server.with_graceful_shutdown(shutdown).await?;
    tracing::info!(%address, "Furniture service stopped");

    Ok(())
}

/// The furniture service running on its own thread, for tests that need a live provider.
#[derive(Debug)]
pub struct ProducerServer {
    address: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl ProducerServer {
    /// Binds `127.0.0.1:port`, `0` picking a free port.
    pub fn start(port: u16) -> Result<Self, Error> {
        let (shutdown_sender, shutdown_receiver) = oneshot::channel::<()>();
        let (ready_sender, ready_receiver) = mpsc::channel::<Result<SocketAddr, Error>>();

        let join_handle = thread::Builder::new()
            .name(String::from("furniture-service"))
            .spawn(move || {
                let runtime = match Runtime::new() {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        let _ = ready_sender.send(Err(e.into()));
                        return;
                    }
                };

                runtime.block_on(async move {
                    let incoming = match AddrIncoming::bind(&SocketAddr::from(([127, 0, 0, 1], port))) {
                        Ok(incoming) => incoming,
                        Err(e) => {
                            let _ = ready_sender.send(Err(e.into()));
                            return;
                        }
                    };
                    let _ = ready_sender.send(Ok(incoming.local_addr()));

                    let shutdown = async {
                        let _ = shutdown_receiver.await;
                    };
                    if let Err(e) = serve(incoming, FurnitureService::new(), shutdown).await {
                        tracing::error!("Furniture service error: {}", e);
                    }
                });
            })?;

        match ready_receiver.recv() {
            Ok(Ok(address)) => Ok(Self {
                address,
                shutdown: Some(shutdown_sender),
                join_handle: Some(join_handle),
            }),
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

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    pub fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                tracing::error!("Furniture service thread panicked");
            }
        }
    }
}

impl Drop for ProducerServer {
    fn drop(&mut self) {
        self.stop();
    }
}
