pub mod bayou;
pub mod domain;
pub mod error;
pub mod fixtures;
mod http;
pub mod palmetto;

pub use bayou::{Aggregator, BayouClient};
pub use error::{ClientError, ErrorKind};
pub use palmetto::PalmettoClient;
