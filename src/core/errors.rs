use thiserror::Error;

/// Unified error type for the entire stampede library
#[derive(Debug, Error)]
pub enum StampedeError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// Worker-specific errors
    #[error("Worker {worker_id} failed: {message}")]
    Worker { worker_id: usize, message: String },

    /// Inventory collaborator errors
    #[error("Inventory query failed: {operation}")]
    Inventory {
        operation: String,
        backend: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization errors
    #[error("Serialization failed: {format}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Timeout errors
    #[error("Operation timed out: {operation} (timeout: {timeout_ms}ms)")]
    Timeout { operation: String, timeout_ms: u64 },

    /// Cancellation errors
    #[error("Operation was cancelled: {operation}")]
    Cancelled {
        operation: String,
        reason: Option<String>,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StampedeError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            field: None,
        }
    }

    /// Create a configuration error with the offending field
    pub fn configuration_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Configuration {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a worker error
    pub fn worker<S: Into<String>>(worker_id: usize, message: S) -> Self {
        Self::Worker {
            worker_id,
            message: message.into(),
        }
    }

    /// Create an inventory error
    pub fn inventory<S: Into<String>>(operation: S) -> Self {
        Self::Inventory {
            operation: operation.into(),
            backend: None,
            source: None,
        }
    }

    /// Create an inventory error with source
    pub fn inventory_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        operation: S,
        source: E,
    ) -> Self {
        Self::Inventory {
            operation: operation.into(),
            backend: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach the backend name to an inventory error
    pub fn with_backend<B: Into<String>>(mut self, name: B) -> Self {
        if let Self::Inventory {
            ref mut backend, ..
        } = self
        {
            *backend = Some(name.into());
        }
        self
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        format: S,
        source: E,
    ) -> Self {
        Self::Serialization {
            format: format.into(),
            source: Box::new(source),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Create a cancellation error
    pub fn cancelled<S: Into<String>>(operation: S) -> Self {
        Self::Cancelled {
            operation: operation.into(),
            reason: None,
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Inventory { .. } => true,
            Self::Configuration { .. } | Self::Serialization { .. } => false,
            Self::Worker { .. } | Self::Cancelled { .. } | Self::Internal { .. } => false,
        }
    }

    /// Get error category for metrics/logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Worker { .. } => "worker",
            Self::Inventory { .. } => "inventory",
            Self::Serialization { .. } => "serialization",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled { .. } => "cancelled",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, StampedeError>;

/// Convert from common error types
impl From<serde_json::Error> for StampedeError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("json", err)
    }
}

impl From<std::io::Error> for StampedeError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: "io operation failed".to_string(),
            source: Some(Box::new(err)),
        }
    }
}
