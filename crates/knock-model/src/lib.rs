mod domain;
pub use domain::*;

mod config;
pub use config::*;
