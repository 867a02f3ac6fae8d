//! Utilities
use std::{env, io::Write};
use anyhow::{Context, Result};
use clap::CommandFactory;
use log::*;
use crate::Opts;
use crate::{DEFAULT_PORT, DEFAULT_SERVICE_PREFIX, PROJECT_URL, COPYRIGHT};

/// The settings for a single run, resolved once from the options and the environment.
#[derive(Clone, Default)]
pub struct Config {
    pub service: String,
    pub host: String,
    pub user: String,
    pub key: String,
    pub port: u16,
    pub dns_server: Option<String>,
    pub tls: bool,
    pub accept_invalid_certs: bool,
}

impl Config {
    pub fn from_options(options: &Opts) -> Result<Config> {
        Config::resolve(options, |variable| env::var(variable).ok())
    }
    /// Resolve every setting as: option, then environment variable, then default.
    pub fn resolve(
        options: &Opts,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Config>
    {
        let host = set_option("host", &options.host, "HEKETI_HOST", "", true, &lookup);
        let default_service = format!("{}{}", DEFAULT_SERVICE_PREFIX, host);
        let service = Some(set_option("service", &options.service, "HEKETI_SERVICE", &default_service, true, &lookup))
            .filter(|service| !service.is_empty())
            .unwrap_or(default_service);
        let user = set_option("user", &options.user, "HEKETI_USER", "", true, &lookup);
        // the key is never logged
        let key = set_option("key", &options.key, "HEKETI_KEY", "", false, &lookup);
        let port = set_port(&options.port, &lookup)?;
        let dns_server = Some(set_option("dns", &options.dns, "HEKETI_DNS", "", true, &lookup))
            .filter(|server| !server.is_empty());

        Ok(Config {
            service,
            host,
            user,
            key,
            port,
            dns_server,
            tls: options.tls,
            accept_invalid_certs: options.insecure,
        })
    }
    /// The heketi url, using `connect_host`, which is the resolved address when `-dns` is used.
    pub fn base_url(&self, connect_host: &str) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, connect_host, self.port)
    }
}

fn set_option(
    name: &str,
    option: &Option<String>,
    variable: &str,
    default: &str,
    show_value: bool,
    lookup: &impl Fn(&str) -> Option<String>,
) -> String
{
    let shown = |value: &str| if show_value { value.to_string() } else { "<hidden>".to_string() };
    match option {
        Some(value) => {
            info!("{} argument set: using: {}", name, shown(value.as_str()));
            value.clone()
        }
        None => match lookup(variable) {
            Some(value) => {
                info!("{} not set: set via environment: {}: {}", name, variable, shown(value.as_str()));
                value
            }
            None => {
                info!("{} not set: and not set via environment: using default: {}", name, shown(default));
                default.to_string()
            }
        },
    }
}

fn set_port(
    option: &Option<u16>,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<u16>
{
    match option {
        Some(port) => {
            info!("port argument set: using: {}", port);
            Ok(*port)
        }
        None => match lookup("HEKETI_PORT") {
            Some(value) => {
                info!("port not set: set via environment: HEKETI_PORT: {}", value);
                value.trim().parse()
                    .with_context(|| format!("Invalid port in HEKETI_PORT: {}", value))
            }
            None => {
                info!("port not set: and not set via environment: using default: {}", DEFAULT_PORT);
                Ok(DEFAULT_PORT)
            }
        },
    }
}

/// Turn single dash long options (`-host`, `-port=5080`) into their double dash form.
///
/// Only the names in `long_names` are rewritten, so short options and values starting
/// with a dash are left alone. Nothing after `--` is touched.
pub fn normalize_args<I: IntoIterator<Item = String>>(
    args: I,
    long_names: &[&str],
) -> Vec<String>
{
    let mut options_ended = false;
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            if index == 0 || options_ended {
                return arg;
            }
            if arg == "--" {
                options_ended = true;
                return arg;
            }
            match arg.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') && long_names.contains(&rest.split('=').next().unwrap_or_default()) => format!("-{}", arg),
                _ => arg,
            }
        })
        .collect()
}

/// [`normalize_args`] with the long option names of [`Opts`], including the ones clap adds itself.
pub fn normalize_command_line<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    let mut command = Opts::command();
    command.build();
    let long_names: Vec<&str> = command.get_arguments()
        .filter_map(|argument| argument.get_long())
        .collect();
    normalize_args(args, &long_names)
}

pub fn print_version(out: &mut impl Write) -> Result<()> {
    writeln!(out, "{} {} (Build {})", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), option_env!("BUILD_DATE").unwrap_or("unknown"))?;
    writeln!(out)?;
    writeln!(out, "{}", PROJECT_URL)?;
    writeln!(out)?;
    writeln!(out, "{}", COPYRIGHT)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use clap::Parser;

    fn no_environment(_variable: &str) -> Option<String> {
        None
    }

    #[test]
    fn unit_normalize_single_dash_long_options() {
        let args = ["prog", "-host", "h1", "-port=5081", "-v", "--user", "admin", "-key", "-secret", "--", "-host"]
            .iter().map(|arg| arg.to_string());
        let normalized = normalize_args(args, &["host", "port", "user", "key"]);
        assert_eq!(normalized, vec!["prog", "--host", "h1", "--port=5081", "-v", "--user", "admin", "--key", "-secret", "--", "-host"]);
    }

    #[test]
    fn unit_normalize_command_line_includes_help() {
        let args = ["prog", "-help", "-host", "h1", "-v"].iter().map(|arg| arg.to_string());
        assert_eq!(normalize_command_line(args), vec!["prog", "--help", "--host", "h1", "-v"]);
    }

    #[test]
    fn unit_config_defaults() {
        let options = Opts::parse_from(["prog", "--host", "h1"]);
        let config = Config::resolve(&options, no_environment).unwrap();
        assert_eq!(config.host, "h1");
        assert_eq!(config.service, "Heketi_h1");
        assert_eq!(config.user, "");
        assert_eq!(config.key, "");
        assert_eq!(config.port, 5080);
        assert_eq!(config.dns_server, None);
        assert_eq!(config.base_url(&config.host), "http://h1:5080");
    }

    #[test]
    fn unit_config_options() {
        let options = Opts::parse_from([
            "prog", "--host", "h1", "--service", "Storage", "--user", "admin", "--key", "secret",
            "--port", "8080", "--dns", "10.0.0.53", "--tls", "--insecure",
        ]);
        let config = Config::resolve(&options, no_environment).unwrap();
        assert_eq!(config.service, "Storage");
        assert_eq!(config.user, "admin");
        assert_eq!(config.key, "secret");
        assert_eq!(config.dns_server.as_deref(), Some("10.0.0.53"));
        assert!(config.accept_invalid_certs);
        assert_eq!(config.base_url("10.0.0.7"), "https://10.0.0.7:8080");
    }

    #[test]
    fn unit_config_environment_fallback() {
        let environment: HashMap<&str, &str> = [
            ("HEKETI_HOST", "h2"),
            ("HEKETI_USER", "admin"),
            ("HEKETI_KEY", "from-env"),
            ("HEKETI_PORT", "5081"),
        ].into_iter().collect();
        let lookup = |variable: &str| environment.get(variable).map(|value| value.to_string());

        // the option wins over the environment
        let options = Opts::parse_from(["prog", "--key", "from-option"]);
        let config = Config::resolve(&options, lookup).unwrap();
        assert_eq!(config.host, "h2");
        assert_eq!(config.service, "Heketi_h2");
        assert_eq!(config.key, "from-option");
        assert_eq!(config.port, 5081);
    }

    #[test]
    fn unit_config_empty_service_uses_default() {
        let options = Opts::parse_from(["prog", "--host", "h1", "--service", ""]);
        let config = Config::resolve(&options, no_environment).unwrap();
        assert_eq!(config.service, "Heketi_h1");

        let options = Opts::parse_from(["prog", "--host", "h1"]);
        let config = Config::resolve(&options, |variable| (variable == "HEKETI_SERVICE").then(String::new)).unwrap();
        assert_eq!(config.service, "Heketi_h1");
    }

    #[test]
    fn unit_config_invalid_environment_port() {
        let options = Opts::parse_from(["prog", "--host", "h1"]);
        let result = Config::resolve(&options, |variable| (variable == "HEKETI_PORT").then(|| "heketi".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn unit_print_version() {
        let mut out = Vec::new();
        print_version(&mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with(&format!("{} {} (Build ", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))));
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "https://github.com/indece-official/sshmon-check-heketi");
        assert_eq!(lines[4], "Copyright 2020 by indece UG (haftungsbeschränkt)");
    }
}
