pub mod config;
pub mod connect;
pub mod metrics_server;
pub mod observability;
pub mod pipeline;
pub mod routes;
pub mod transform;

pub use pipeline::{DataSource, InsightsFlow, Prediction};
pub use routes::{create_router, AppState};
