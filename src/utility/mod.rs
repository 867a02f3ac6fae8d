//! Utilities
//!
//! - resolving the options into a [Config]: the command line option, the `HEKETI_*`
//!   environment variable (which can be set via `.env`) or the default, in that order.
//! - accepting the single dash long options (`-host h1`) monitoring configurations use.
//! - the version information.
//!
mod utility;

pub use utility::*;
