mod error;
pub use error::ApiError;

mod handler;
pub use handler::ApiHandler;

mod adapter;
pub use adapter::DispatcherAdapter;

#[cfg(feature = "http")]
mod config;
#[cfg(feature = "http")]
pub use config::HttpConfig;

#[cfg(feature = "http")]
mod resolve;
#[cfg(feature = "http")]
pub use resolve::{DEFAULT_TTL_HEADER, RequestMeta, Resolver};

#[cfg(feature = "http")]
mod response;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{HttpApi, NO_CACHE};

#[cfg(feature = "http")]
pub use axum;
