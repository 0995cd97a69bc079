//! Cluster inventory collaborator.
//!
//! The accumulation core never touches this module; it exists for embedders
//! that pair a coordinated run with a listing of what is deployed on the
//! cluster (running workloads, deployed functions). Connection settings are
//! explicit constructor inputs; nothing here reads or mutates process
//! environment variables. Query failures surface as recoverable errors
//! rather than being swallowed.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{Result, StampedeError};

/// A named resource returned by an inventory query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub name: String,
    pub kind: ResourceKind,
    pub namespace: String,
}

impl ResourceRecord {
    pub fn new<N: Into<String>, S: Into<String>>(name: N, kind: ResourceKind, namespace: S) -> Self {
        Self {
            name: name.into(),
            kind,
            namespace: namespace.into(),
        }
    }
}

/// The two resource classes an inventory backend reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A running workload (e.g. a pod).
    Workload,
    /// A deployed function.
    Function,
}

/// Connection settings for an inventory backend.
///
/// The credential path is a plain value handed to the constructor, never an
/// environment variable set as a side effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    pub credential_path: PathBuf,
    pub namespace: String,
}

impl InventoryConfig {
    pub fn new<P: Into<PathBuf>, N: Into<String>>(credential_path: P, namespace: N) -> Result<Self> {
        let credential_path = credential_path.into();
        if credential_path.as_os_str().is_empty() {
            return Err(StampedeError::configuration_field(
                "credential path must not be empty",
                "credential_path",
            ));
        }
        Ok(Self {
            credential_path,
            namespace: namespace.into(),
        })
    }
}

/// Backend-agnostic inventory query interface.
///
/// Implementations must report failures as errors; an unreachable backend is
/// never an empty listing.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Backend name, used in logs and error context.
    fn name(&self) -> String;

    /// Lists running workloads in the configured namespace.
    async fn list_workloads(&self) -> Result<Vec<ResourceRecord>>;

    /// Lists deployed functions in the configured namespace.
    async fn list_functions(&self) -> Result<Vec<ResourceRecord>>;
}

/// Fixed in-memory inventory, for embedding and tests.
pub struct StaticInventory {
    config: InventoryConfig,
    records: Vec<ResourceRecord>,
}

impl StaticInventory {
    pub fn new(config: InventoryConfig, records: Vec<ResourceRecord>) -> Self {
        Self { config, records }
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    fn list_kind(&self, kind: ResourceKind) -> Vec<ResourceRecord> {
        let records: Vec<ResourceRecord> = self
            .records
            .iter()
            .filter(|r| r.kind == kind && r.namespace == self.config.namespace)
            .cloned()
            .collect();
        debug!(
            backend = %self.name(),
            namespace = %self.config.namespace,
            count = records.len(),
            "inventory listing served"
        );
        records
    }
}

#[async_trait]
impl InventoryClient for StaticInventory {
    fn name(&self) -> String {
        "static".to_string()
    }

    async fn list_workloads(&self) -> Result<Vec<ResourceRecord>> {
        Ok(self.list_kind(ResourceKind::Workload))
    }

    async fn list_functions(&self) -> Result<Vec<ResourceRecord>> {
        Ok(self.list_kind(ResourceKind::Function))
    }
}
