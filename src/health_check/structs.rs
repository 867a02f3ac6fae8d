//! The structs
//!
use crate::heketi::ApiError;

/// A node that is not online.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnhealthyNode {
    pub id: String,
    pub storage_hostnames: Vec<String>,
    pub state: String,
}
/// The result of a cluster for which all nodes could be read.
#[derive(Debug, Default)]
pub struct ClusterHealth {
    pub cluster_id: String,
    pub total_nodes: usize,
    pub unhealthy_nodes: Vec<UnhealthyNode>,
}
/// The reason a cluster could not be checked.
#[derive(Debug)]
pub enum ClusterFailure {
    ClusterInfo {
        cluster_id: String,
        error: ApiError,
    },
    NodeInfo {
        cluster_id: String,
        node_id: String,
        error: ApiError,
    },
}
