//! The impls and functions
//!
use std::{fmt, io::Write, time::Instant};
use itertools::Itertools;
use log::*;
use anyhow::Result;
use crate::dns;
use crate::heketi::{HeketiApi, HeketiClient};
use crate::health_check::{ClusterFailure, ClusterHealth, UnhealthyNode};
use crate::reporter::{Reporter, Status};
use crate::utility::Config;

impl fmt::Display for UnhealthyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node {}[{}] ({})", self.id, self.storage_hostnames.join(";"), self.state)
    }
}

impl ClusterHealth {
    pub fn status(&self) -> Status {
        if self.unhealthy_nodes.is_empty() {
            Status::Ok
        } else {
            Status::Crit
        }
    }
    pub fn message(&self) -> String {
        if self.unhealthy_nodes.is_empty() {
            format!("All {} nodes of heketi cluster '{}' are healthy", self.total_nodes, self.cluster_id)
        } else {
            format!(
                "{} of {} nodes of heketi cluster '{}' are unhealthy: {}",
                self.unhealthy_nodes.len(),
                self.total_nodes,
                self.cluster_id,
                self.unhealthy_nodes.iter().join(", "),
            )
        }
    }
}

impl ClusterFailure {
    pub fn message(&self) -> String {
        match self {
            ClusterFailure::ClusterInfo { cluster_id, error } => {
                format!("Can't get cluster info for heketi cluster '{}': {}", cluster_id, error)
            }
            ClusterFailure::NodeInfo { cluster_id, node_id, error } => {
                format!("Can't get node info for node '{}' in heketi cluster '{}': {}", node_id, cluster_id, error)
            }
        }
    }
}

/// Read a cluster and all its nodes.
///
/// The first node that cannot be read ends the evaluation, the nodes after it are not requested.
pub fn evaluate_cluster<A: HeketiApi + ?Sized>(
    api: &A,
    cluster_id: &str,
) -> Result<ClusterHealth, ClusterFailure>
{
    let cluster = api.cluster_info(cluster_id)
        .map_err(|error| ClusterFailure::ClusterInfo { cluster_id: cluster_id.to_string(), error })?;

    let mut health = ClusterHealth {
        cluster_id: cluster_id.to_string(),
        total_nodes: cluster.nodes.len(),
        unhealthy_nodes: Vec::new(),
    };
    for node_id in &cluster.nodes {
        let node = api.node_info(node_id)
            .map_err(|error| ClusterFailure::NodeInfo { cluster_id: cluster_id.to_string(), node_id: node_id.to_string(), error })?;
        if !node.is_online() {
            debug!("cluster {}: node {} is {}", cluster_id, node_id, node.state);
            health.unhealthy_nodes.push(UnhealthyNode {
                id: node_id.to_string(),
                storage_hostnames: node.hostnames.storage,
                state: node.state,
            });
        }
    }
    Ok(health)
}

/// Check heketi and every cluster it knows, writing a status line for each as soon as it's known.
pub fn evaluate<A: HeketiApi + ?Sized, W: Write>(
    api: &A,
    config: &Config,
    reporter: &mut Reporter<W>,
) -> Result<()>
{
    info!("begin health check of heketi on {}", config.host);
    let timer = Instant::now();

    let clusters = match api.cluster_list() {
        Ok(clusters) => clusters,
        Err(error) => {
            warn!("cluster list from {} failed: {}", config.host, error);
            return reporter.report(
                Status::Crit,
                &config.service,
                &format!("Can't get cluster list from heketi on {}: {}", config.host, error),
            );
        }
    };
    reporter.report(Status::Ok, &config.service, &format!("Heketi controller on {} is up and running", config.host))?;

    for cluster_id in &clusters {
        let service = format!("{}_{}", config.service, cluster_id);
        match evaluate_cluster(api, cluster_id) {
            Ok(health) => reporter.report(health.status(), &service, &health.message())?,
            Err(failure) => {
                warn!("{}", failure.message());
                reporter.report(Status::Crit, &service, &failure.message())?
            }
        }
    }

    info!("end health check of {} clusters: {:?}", clusters.len(), timer.elapsed());
    Ok(())
}

/// Resolve the host (if a DNS server is set), create the client and run the check.
pub fn perform_check<W: Write>(
    config: &Config,
    reporter: &mut Reporter<W>,
) -> Result<()>
{
    if config.host.is_empty() {
        return reporter.report(Status::Unknown, &config.service, "No heketi host set, use -host");
    }

    let connect_host = match &config.dns_server {
        Some(server) => match dns::resolve(&config.host, server) {
            Ok(address) => {
                info!("resolved {} on {}: {}", config.host, server, address);
                address
            }
            Err(error) => {
                warn!("{}", error);
                return reporter.report(Status::Crit, &config.service, &error.to_string());
            }
        },
        None => config.host.clone(),
    };

    let client = match HeketiClient::new(&config.base_url(&connect_host), &config.user, &config.key, config.accept_invalid_certs) {
        Ok(client) => client,
        Err(error) => {
            return reporter.report(
                Status::Crit,
                &config.service,
                &format!("Can't create heketi client for {}: {}", config.host, error),
            );
        }
    };

    evaluate(&client, config, reporter)
}
