//! The structs
//!
use reqwest::StatusCode;

/// The state heketi reports for a node that is in use.
pub const ENTRY_STATE_ONLINE: &str = "online";

/// The struct for deserializing `/clusters`.
///
/// ```json
/// {
///   "clusters": [
///     "67e267ea403dfcdf80731165b300d1ca",
///     "fef5e5b4e5a04b8f3c8e6ef9e2e3fb3a"
///   ]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ClusterList {
    #[serde(default)]
    pub clusters: Vec<String>,
}
/// The struct for deserializing `/clusters/<id>`.
///
/// heketi returns more (volumes, block, file), which is not used and ignored.
/// ```json
/// {
///   "id": "67e267ea403dfcdf80731165b300d1ca",
///   "nodes": [
///     "78696abbba372d3b7a5a4b9b1c7d6d63",
///     "e3ab6b1b4b0c5a6d8e7f90a1b2c3d4e5"
///   ],
///   "volumes": [],
///   "block": true,
///   "file": true
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct ClusterInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<String>,
}
/// The struct for deserializing `/nodes/<id>`.
///
/// ```json
/// {
///   "zone": 1,
///   "hostnames": {
///     "manage": ["node1.example.com"],
///     "storage": ["10.0.0.11"]
///   },
///   "cluster": "67e267ea403dfcdf80731165b300d1ca",
///   "id": "78696abbba372d3b7a5a4b9b1c7d6d63",
///   "state": "online",
///   "devices": []
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct NodeInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub zone: i64,
    /// `online`, `offline` or `failed`, kept as a string so unknown states are reported as-is.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub hostnames: HostAddresses,
}
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct HostAddresses {
    #[serde(default)]
    pub manage: Vec<String>,
    #[serde(default)]
    pub storage: Vec<String>,
}
/// The claims of the JWT sent with every request.
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub qsh: String,
}
/// The reqwest based heketi client.
#[derive(Debug)]
pub struct HeketiClient {
    pub(super) base_url: String,
    pub(super) user: String,
    pub(super) key: String,
    pub(super) client: reqwest::blocking::Client,
}
/// Everything that can go wrong reading from heketi.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    /// heketi returns its errors as plain text in the body, the message is that body.
    #[error("{message}")]
    Status {
        status: StatusCode,
        message: String,
    },
    #[error("Unable to parse response from {url}: {source}")]
    Parse {
        url: String,
        source: serde_json::Error,
    },
    #[error("Unable to create request token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}
/// The reads the health check needs from heketi.
pub trait HeketiApi {
    fn cluster_list(&self) -> Result<Vec<String>, ApiError>;
    fn cluster_info(&self, cluster_id: &str) -> Result<ClusterInfo, ApiError>;
    fn node_info(&self, node_id: &str) -> Result<NodeInfo, ApiError>;
}
