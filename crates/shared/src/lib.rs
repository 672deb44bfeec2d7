pub mod auth;
pub mod config;
pub mod errors;
pub mod lambda_error;
pub mod logging;
pub mod metrics;
pub mod telemetry;

pub use auth::*;
pub use config::*;
pub use errors::*;
pub use logging::*;
pub use metrics::*;
