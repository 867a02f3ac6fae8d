//! The structs
//!
use std::io;
use hickory_proto::error::ProtoError;

/// A failed lookup, displayed as `Can't resolve '<host>' on <server>: <reason>`.
#[derive(Debug, thiserror::Error)]
#[error("Can't resolve '{host}' on {server}: {kind}")]
pub struct ResolveError {
    pub host: String,
    pub server: String,
    pub kind: ResolveErrorKind,
}
#[derive(Debug, thiserror::Error)]
pub enum ResolveErrorKind {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Proto(#[from] ProtoError),
    #[error("No results")]
    NoResults,
    #[error("invalid host name: {0}")]
    InvalidName(String),
    #[error("server returned rcode {0}")]
    Rcode(u16),
}
