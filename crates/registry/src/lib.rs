//! REST client for a Nexus-style component registry.
//!
//! Only the paginated "list components" endpoint is wrapped; see
//! [`api::RegistryClient::list_components`].

pub mod api;
pub mod models;
