//! Error types for gadmin.
//!
//! Every core operation either succeeds or reports exactly one of these
//! errors. Nothing is retried and partial filesystem changes are left in
//! place for the caller to inspect.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gadmin operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for gadmin.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Inventory Errors
    // ========================================================================
    /// Cluster is not tracked by the inventory store.
    #[error("Cluster named '{0}' isn't in the inventory")]
    ClusterNotFound(String),

    /// Cluster name is already tracked by the inventory store.
    #[error("Cluster named '{0}' already in the inventory")]
    ClusterAlreadyExists(String),

    /// Cluster name cannot be used as an inventory file name.
    #[error("Invalid cluster name '{name}': {message}")]
    InvalidName {
        /// Offending name
        name: String,
        /// Why it was rejected
        message: String,
    },

    /// Inventory document does not follow the hosts/children schema.
    #[error("Malformed inventory document '{origin}': {source}")]
    MalformedDocument {
        /// Cluster name or file the bytes came from
        origin: String,
        /// Parser error
        #[source]
        source: serde_yaml::Error,
    },

    /// Inventory document could not be rendered.
    #[error("Unable to generate YAML inventory: {0}")]
    Serialization(#[source] serde_yaml::Error),

    /// Reading or writing a file or directory failed.
    #[error("{action} '{path}': {source}")]
    Persistence {
        /// What was being attempted
        action: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    // ========================================================================
    // Workspace Errors
    // ========================================================================
    /// Run workspace base directory already exists or could not be created.
    #[error("Unable to create the runner base directory '{path}': {source}")]
    WorkspaceExists {
        /// Workspace base directory
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Directory is missing, not a directory, or not writable.
    #[error("Directory '{path}' is not writable: {message}")]
    WorkspaceNotWritable {
        /// Directory checked
        path: PathBuf,
        /// Why the check failed
        message: String,
    },

    /// Playbook source could not be opened for reading.
    #[error("Unable to read playbook source '{path}': {source}")]
    SourceNotReadable {
        /// Source path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Staged playbook would overwrite the staged cluster inventory.
    #[error("Playbook would overwrite the staged inventory '{0}'")]
    StagingConflict(PathBuf),

    /// Path would resolve outside of its confining root.
    #[error("Path '{path}' escapes base directory '{root}'")]
    PathEscape {
        /// Confining root
        root: PathBuf,
        /// Requested path
        path: PathBuf,
    },

    // ========================================================================
    // Orchestration Errors
    // ========================================================================
    /// An explicit target list was empty.
    #[error("No {0} targets provided")]
    EmptyTarget(&'static str),

    /// None of the requested groups resolved to any host.
    #[error("No hosts found in the group(s) provided: {}", .0.join(", "))]
    NoMatchingHosts(Vec<String>),

    /// Invocation was requested or executed out of order.
    #[error("Invocation not ready: {0}")]
    InvocationNotReady(&'static str),

    /// Run identifier cannot be passed to the runner.
    #[error("Invalid run identifier '{0}'")]
    InvalidRunIdentifier(String),

    /// The runner process could not be started.
    #[error("Failed to start runner '{executable}': {source}")]
    RunnerSpawn {
        /// Runner executable
        executable: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration or environment is unusable.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new persistence error.
    pub fn persistence(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Persistence {
            action,
            path: path.into(),
            source,
        }
    }

    /// Creates a new malformed document error.
    pub fn malformed(origin: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::MalformedDocument {
            origin: origin.into(),
            source,
        }
    }

    /// Creates a new invalid name error.
    pub fn invalid_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ClusterNotFound(_) | Error::ClusterAlreadyExists(_) | Error::InvalidName { .. } => 2,
            Error::MalformedDocument { .. } | Error::Serialization(_) => 3,
            Error::Persistence { .. }
            | Error::WorkspaceExists { .. }
            | Error::WorkspaceNotWritable { .. }
            | Error::SourceNotReadable { .. }
            | Error::StagingConflict(_)
            | Error::PathEscape { .. } => 4,
            Error::EmptyTarget(_) | Error::NoMatchingHosts(_) => 5,
            Error::InvocationNotReady(_)
            | Error::InvalidRunIdentifier(_)
            | Error::RunnerSpawn { .. } => 6,
            Error::Config(_) => 254,
        }
    }
}
