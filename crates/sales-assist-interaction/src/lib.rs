//! Backend integrations for the Sales Assistant client.

pub mod http_gateway;

pub use http_gateway::HttpBackendGateway;
