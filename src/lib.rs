// Core infrastructure modules
pub mod core {
    pub mod errors;
}

// The concurrent accumulation primitive and its coordination pieces
pub mod barrier;
pub mod coordinator;
pub mod sequence;
pub mod worker;

// The external-cluster collaborator seam; the core above never depends on it
pub mod inventory;

// Re-exports for convenience
pub use crate::core::errors::{Result, StampedeError};
pub use barrier::{CompletionBarrier, CompletionPermit};
pub use coordinator::{Coordinator, RunConfig, RunReport};
pub use inventory::{InventoryClient, InventoryConfig, ResourceKind, ResourceRecord, StaticInventory};
pub use sequence::SyncSequence;
pub use worker::{Worker, WorkerState, WorkerSummary};
