// REST API v1 (`/api/v1/`)
//
// `client` owns transport mechanics; each resource module adds its
// endpoints to `ApiClient` as inherent methods.

pub mod auth;
pub mod campaigns;
pub mod client;
pub mod customers;
pub mod passes;
pub mod templates;
pub mod timestamp;
pub mod types;
