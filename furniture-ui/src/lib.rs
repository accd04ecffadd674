//! The furniture UI: a client of the furniture service plus a small HTML front end over it.

mod config;
mod error;
mod furniture_service_client;
mod furniture_types;
mod server;
mod view;

pub use config::{UiConfig, BASE_URL_VARIABLE, DEFAULT_BASE_URL, DEFAULT_UI_PORT};
pub use error::Error;
pub use furniture_service_client::{FurnitureServiceClient, FurnitureServiceClientBuilder};
pub use furniture_types::FurnitureTypes;
pub use server::{display_furniture_types, serve, DISPLAY_FURNITURE_TYPES_PATH};
pub use view::{render_error, render_furniture_types};
