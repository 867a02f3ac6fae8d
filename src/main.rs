//! sshmon_check_heketi: a health check for heketi.
//!
//! This reads the clusters and nodes from the heketi REST API, and prints a status line for
//! heketi itself and for every cluster in the sshmon/check_mk local check format:
//! ```text
//! 0 Heketi_h1 - OK - Heketi controller on h1 is up and running
//! 2 Heketi_h1_c1 - CRIT - 1 of 2 nodes of heketi cluster 'c1' are unhealthy: Node n2[s2] (offline)
//! ```
//! The state is in the status code of every line, the exit code is 0 whenever the check could run.
//!
//! Options can be given as `-host h1` or `--host h1`. If an option is not given, the `HEKETI_*`
//! environment variable is used, which can be set in a `.env` file in the current directory.
//!
#[macro_use]
extern crate serde_derive;

use std::{env, io};
use clap::Parser;
use dotenv::dotenv;
use anyhow::Result;

mod dns;
mod heketi;
mod health_check;
mod reporter;
mod utility;

use reporter::Reporter;
use utility::Config;

const DEFAULT_PORT: u16 = 5080;
const DEFAULT_SERVICE_PREFIX: &str = "Heketi_";
const PROJECT_URL: &str = "https://github.com/indece-official/sshmon-check-heketi";
const COPYRIGHT: &str = "Copyright 2020 by indece UG (haftungsbeschränkt)";

#[derive(Debug, Parser)]
#[command(name = "sshmon_check_heketi", about = "Health check for heketi, its clusters and nodes")]
pub struct Opts {
    /// Print the version info and exit
    #[arg(short = 'v')]
    print_version: bool,
    /// Service name (defaults to Heketi_<host>)
    #[arg(long, value_name = "NAME")]
    service: Option<String>,
    /// Host
    #[arg(long, value_name = "HOST")]
    host: Option<String>,
    /// Username
    #[arg(long, value_name = "USER")]
    user: Option<String>,
    /// Key
    #[arg(long, value_name = "KEY", allow_hyphen_values = true)]
    key: Option<String>,
    /// Port (defaults to 5080)
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,
    /// Use other dns server to resolve the host
    #[arg(long, value_name = "SERVER")]
    dns: Option<String>,
    /// Use https to connect to heketi
    #[arg(long)]
    tls: bool,
    /// Accept invalid certificates when using https
    #[arg(long)]
    insecure: bool,
}

fn main() -> Result<()>
{
    env_logger::init();
    dotenv().ok();

    let options = Opts::parse_from(utility::normalize_command_line(env::args()));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if options.print_version {
        return utility::print_version(&mut out);
    }

    let config = Config::from_options(&options)?;
    let mut reporter = Reporter::new(out);
    health_check::perform_check(&config, &mut reporter)
}
