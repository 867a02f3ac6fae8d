//! Module for checking the health of heketi, its clusters and their nodes.
//!
//! The check is done in a fixed order, one request at a time:
//! - `/clusters`: if this fails, a single CRIT line for heketi is reported and the check stops.
//!   If it succeeds, heketi itself is reported OK.
//! - for every cluster, `/clusters/<id>` and then `/nodes/<id>` for every node of the cluster.
//!   A node is healthy if its state is `online`.
//!   Every cluster gets exactly one line, scoped as `<service>_<cluster id>`:
//!   - OK if all nodes are online.
//!   - CRIT listing the nodes that are not online.
//!   - CRIT if the cluster or one of its nodes could not be read.
//!     The first node that cannot be read ends the check of that cluster.
//!
//! Nothing is retried, and a failing cluster does not stop the check of the next cluster.
//!
mod structs;
mod functions;

pub use structs::*;
pub use functions::*;
