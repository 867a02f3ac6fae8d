//! Module for writing status lines in the sshmon/check_mk local check format.
//!
//! Every line has the form:
//! ```text
//! <code> <service> - <status word> - <message>
//! ```
//! For example:
//! ```text
//! 0 Heketi_h1 - OK - Heketi controller on h1 is up and running
//! ```
//! Lines are written and flushed one at a time, so a monitoring agent sees the
//! results as they become available.
//!
mod structs;
mod functions;

pub use structs::*;
