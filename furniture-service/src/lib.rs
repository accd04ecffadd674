//! The furniture catalogue service: `GET /furniture-types` answers the known furniture types.

mod error;
mod furniture;
mod server;

pub use error::Error;
pub use furniture::FurnitureService;
pub use server::{route, serve, ProducerServer, DEFAULT_PORT, FURNITURE_TYPES_PATH};
