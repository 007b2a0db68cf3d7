// passdeck-api: Async Rust client for the wallet-pass manager REST API (v1)

pub mod auth;
pub mod error;
pub mod transport;
pub mod v1;

pub use auth::TokenPair;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use v1::client::ApiClient;
pub use v1::types;
