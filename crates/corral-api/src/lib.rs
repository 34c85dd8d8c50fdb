//! Remote control protocol of the corral orchestrator.
//!
//! The protocol surface is a [`ClusterHandler`] trait; the gRPC service and
//! the optional HTTP surface are thin shells over it. The gRPC client
//! proxy unwraps transport-level errors back into typed [`ApiError`]s so
//! callers keep the original error classification.

#[cfg(feature = "grpc")]
mod proto {
    tonic::include_proto!("corral.v1");
}

mod error;
pub use error::ApiError;

#[cfg(feature = "grpc")]
pub use error::ERROR_KIND_KEY;

mod version;
pub use version::{PROTOCOL_NAME, PROTOCOL_VERSION, check_protocol};

mod handler;
pub use handler::ClusterHandler;

mod adapter;
pub use adapter::ClusterStateAdapter;

#[cfg(feature = "grpc")]
mod convert;

#[cfg(feature = "grpc")]
mod grpc;

#[cfg(feature = "grpc")]
pub use grpc::ClusterProtocolService;

#[cfg(feature = "grpc")]
pub use proto::cluster_protocol_server::ClusterProtocolServer;

#[cfg(feature = "grpc")]
mod client;

#[cfg(feature = "grpc")]
pub use client::ClusterClient;

#[cfg(feature = "grpc")]
pub use tonic;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpApi;

#[cfg(feature = "http")]
pub use axum;
