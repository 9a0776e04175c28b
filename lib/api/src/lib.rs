pub mod error;
pub mod rest;

pub use error::ApiError;
pub use rest::RestApi;
