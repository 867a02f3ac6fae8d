//! The impls and functions
//!
use std::time::Instant;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use log::*;
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use crate::heketi::{ApiError, Claims, ClusterInfo, ClusterList, HeketiApi, HeketiClient, NodeInfo, ENTRY_STATE_ONLINE};

const TOKEN_VALIDITY_MINUTES: i64 = 10;

impl NodeInfo {
    pub fn is_online(&self) -> bool {
        self.state == ENTRY_STATE_ONLINE
    }
}

impl HeketiClient {
    pub fn new(
        base_url: &str,
        user: &str,
        key: &str,
        accept_invalid_certs: bool,
    ) -> Result<Self, ApiError>
    {
        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(HeketiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            user: user.to_string(),
            key: key.to_string(),
            client,
        })
    }
    fn token(
        &self,
        method: &str,
        path: &str,
    ) -> Result<String, ApiError>
    {
        let now = Utc::now();
        let claims = Claims {
            iss: self.user.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(TOKEN_VALIDITY_MINUTES)).timestamp(),
            qsh: request_hash(method, path),
        };
        Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(self.key.as_bytes()))?)
    }
    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError>
    {
        let url = format!("{}{}", self.base_url, path);
        let token = self.token("GET", path)?;

        let timer = Instant::now();
        let response = self.client
            .get(&url)
            .header(AUTHORIZATION, format!("bearer {}", token))
            .send()?;
        let status = response.status();
        debug!("GET {} = {} ({:?})", url, status, timer.elapsed());

        let body = response.text()?;
        if status != StatusCode::OK {
            let message = body.trim();
            return Err(ApiError::Status {
                status,
                message: if message.is_empty() { status.to_string() } else { message.to_string() },
            });
        }
        serde_json::from_str(&body)
            .map_err(|source| ApiError::Parse { url, source })
    }
}

impl HeketiApi for HeketiClient {
    fn cluster_list(&self) -> Result<Vec<String>, ApiError> {
        let list: ClusterList = self.get("/clusters")?;
        Ok(list.clusters)
    }
    fn cluster_info(&self, cluster_id: &str) -> Result<ClusterInfo, ApiError> {
        self.get(&format!("/clusters/{}", cluster_id))
    }
    fn node_info(&self, node_id: &str) -> Result<NodeInfo, ApiError> {
        self.get(&format!("/nodes/{}", node_id))
    }
}

/// The `qsh` claim: lowercase hex SHA-256 of `<METHOD>&<path>`.
pub fn request_hash(
    method: &str,
    path: &str,
) -> String
{
    format!("{:x}", Sha256::digest(format!("{}&{}", method, path).as_bytes()))
}
