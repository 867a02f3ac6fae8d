//! The structs
//!
use std::io::Write;

/// The status of a check, the numeric value is the code printed at the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 0,
    #[allow(dead_code)]
    Warn = 1,
    Crit = 2,
    Unknown = 3,
}
/// Writes status lines to the wrapped writer, which is stdout for the binary.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    pub(super) out: W,
}
