//! The impls and functions
//!
use std::io::Write;
use anyhow::{Context, Result};
use crate::reporter::{Reporter, Status};

impl Status {
    pub fn code(self) -> u8 {
        self as u8
    }
    pub fn word(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warn => "WARN",
            Status::Crit => "CRIT",
            Status::Unknown => "UNKNOWN",
        }
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Reporter { out }
    }
    pub fn report(
        &mut self,
        status: Status,
        service: &str,
        message: &str,
    ) -> Result<()>
    {
        writeln!(self.out, "{} {} - {} - {}", status.code(), service, status.word(), message)
            .with_context(|| format!("Error writing status line for {}", service))?;
        self.out.flush()
            .with_context(|| "Error flushing status output")?;
        Ok(())
    }
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
