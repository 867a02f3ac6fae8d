//! Module for resolving the heketi host via another DNS server than the system resolver.
//!
//! This sends a single A record query over UDP, with recursion desired, to the given server
//! and returns the first A record found in the answer section. The messages are encoded and
//! decoded with `hickory-proto`. Replies that don't belong to the query are skipped until the
//! timeout. There are no retries and no caching: the check runs once and exits.
//!
//! The resolver is used when `-dns` is set. If it's not set, the host name is left to
//! the normal resolver of the HTTP client.
//!
mod structs;
mod functions;

pub use structs::*;
pub use functions::*;
