mod error;
mod log;
pub mod midware;
pub mod routes;
pub mod types;

pub use error::{Error, Result};

pub const REQUEST_ID_HEADER: &str = "x-request-id";
