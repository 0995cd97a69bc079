//! Integration tests for the inventory collaborator seam.

use anyhow::Result;
use async_trait::async_trait;

use stampede::{
    InventoryClient, InventoryConfig, ResourceKind, ResourceRecord, StampedeError,
    StaticInventory,
};

/// Backend whose queries always fail, standing in for an unreachable cluster.
struct UnreachableInventory;

#[async_trait]
impl InventoryClient for UnreachableInventory {
    fn name(&self) -> String {
        "unreachable".to_string()
    }

    async fn list_workloads(&self) -> stampede::Result<Vec<ResourceRecord>> {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "no route to apiserver");
        Err(StampedeError::inventory_with_source("list_workloads", io).with_backend(self.name()))
    }

    async fn list_functions(&self) -> stampede::Result<Vec<ResourceRecord>> {
        Err(StampedeError::inventory("list_functions").with_backend(self.name()))
    }
}

/// Query failures come back as recoverable errors, never as a silently
/// empty listing.
#[tokio::test]
async fn test_backend_failure_is_a_recoverable_error() {
    let client: Box<dyn InventoryClient> = Box::new(UnreachableInventory);

    let err = client.list_workloads().await.unwrap_err();
    assert_eq!(err.category(), "inventory");
    assert!(err.is_recoverable());

    let err = client.list_functions().await.unwrap_err();
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_static_backend_through_trait_object() -> Result<()> {
    let config = InventoryConfig::new("/home/tester/.kube/config", "fission-function")?;
    let client: Box<dyn InventoryClient> = Box::new(StaticInventory::new(
        config,
        vec![
            ResourceRecord::new("hello-py", ResourceKind::Function, "fission-function"),
            ResourceRecord::new("hello-py-5b9f", ResourceKind::Workload, "fission-function"),
        ],
    ));

    let names: Vec<String> = client
        .list_functions()
        .await?
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["hello-py".to_string()]);
    Ok(())
}

#[test]
fn test_credentials_are_explicit_configuration() {
    // Malformed setup is the one fatal-at-construction case.
    let err = InventoryConfig::new("", "default").unwrap_err();
    assert!(!err.is_recoverable());

    // The path is carried as plain data; nothing consults the environment.
    let config = InventoryConfig::new("/home/tester/.kube/config", "default").unwrap();
    assert_eq!(config.namespace, "default");
    assert_eq!(
        config.credential_path.to_str(),
        Some("/home/tester/.kube/config")
    );
}
