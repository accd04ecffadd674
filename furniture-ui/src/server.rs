use crate::{
    error::Error,
    furniture_service_client::FurnitureServiceClient,
    view::{render_error, render_furniture_types},
};
use hyper::{
    header::CONTENT_TYPE,
    server::conn::AddrIncoming,
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server, StatusCode,
};
use std::{convert::Infallible, future::Future, sync::Arc};

pub const DISPLAY_FURNITURE_TYPES_PATH: &str = "/display-furniture-types";

fn html_response(status: StatusCode, page: String) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .body(page.into())?)
}

/// Fetches the furniture types and renders them. A failing furniture service gives a `502` page.
///
/// Blocks on the furniture service, so async callers have to run it on a blocking thread.
pub fn display_furniture_types(client: &FurnitureServiceClient) -> Result<Response<Body>, Error> {
    match client.get_furniture_types() {
        Ok(furniture_types) => html_response(StatusCode::OK, render_furniture_types(&furniture_types)),
        Err(e) => {
            tracing::warn!(base_url = client.base_url(), "Couldn't fetch furniture types: {}", e);
            html_response(StatusCode::BAD_GATEWAY, render_error(&e.to_string()))
        }
    }
}

fn not_found() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::empty())?)
}

fn internal_error() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

async fn answer(client: Arc<FurnitureServiceClient>, request: Request<Body>) -> Response<Body> {
    tracing::debug!(method = %request.method(), uri = %request.uri(), "Request received");

    let result = match (request.method(), request.uri().path()) {
        (&Method::GET, DISPLAY_FURNITURE_TYPES_PATH) => {
            match tokio::task::spawn_blocking(move || display_furniture_types(&client)).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Furniture types page task failed: {}", e);
                    return internal_error();
                }
            }
        }
        _ => not_found(),
    };

    result.unwrap_or_else(|e| {
        tracing::error!("Couldn't answer {} {}: {}", request.method(), request.uri(), e);
        internal_error()
    })
}

/// Serves the UI routes on `incoming` until `shutdown` completes.
///
/// The client must be built outside of the runtime: its blocking reqwest internals can't be
/// created or dropped from an async context.
pub async fn serve<F: Future<Output = ()>>(
    incoming: AddrIncoming,
    client: Arc<FurnitureServiceClient>,
    shutdown: F,
) -> Result<(), Error> {
    let address = incoming.local_addr();
    let server = Server::builder(incoming).serve(make_service_fn(move |_| {
        let client = client.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |request| {
                let client = client.clone();
                async move { Ok::<_, Infallible>(answer(client, request).await) }
            }))
        }
    }));

    tracing::info!(%address, "Furniture UI listening");
    server.with_graceful_shutdown(shutdown).await?;
    tracing::info!(%address, "Furniture UI stopped");

    Ok(())
}
