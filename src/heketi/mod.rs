//! Module for reading the heketi REST API.
//!
//! The health check reads the following endpoints:
//! - `GET /clusters`: the ids of all the clusters known to heketi.
//! - `GET /clusters/<id>`: the cluster details, including the ids of its nodes.
//! - `GET /nodes/<id>`: the node details, including its state and hostnames.
//!
//! Every request is authenticated with a bearer JWT signed with the shared key.
//! The token carries a `qsh` claim, which is the SHA-256 of `<METHOD>&<path>`,
//! so a token is only valid for the request it was created for.
//!
//! The reads are done via the [HeketiApi] trait, so the health check can be run against
//! something else than a live heketi controller.
//!
mod structs;
mod functions;

pub use structs::*;
pub use functions::*;
