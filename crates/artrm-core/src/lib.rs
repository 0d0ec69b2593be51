//! artrm Core Library
//!
//! Resolves file specifications against an Artifactory-style repository
//! manager, compacts the matches to the minimal set of deletions and
//! executes them with dry-run and fail-fast semantics.

pub mod auth;
pub mod config;
pub mod credentials;
pub mod delete;
pub mod error;
pub mod reduce;
pub mod search;
pub mod service;
pub mod subprocess;
pub mod transport;

pub use error::{Error, Result};

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::auth::AuthDetails;
    pub use crate::config::{ServerProfile, ServerProfileStore, ServiceConfig};

    // Pipeline
    pub use crate::delete::{DeleteItem, DeleteParams, DeleteParamsImpl, DeleteReport};
    pub use crate::reduce::{DeletionPlan, reduce};
    pub use crate::search::{FileSpec, ItemKind, ItemRecord, QueryMode};
    pub use crate::service::ServiceManager;

    // Errors
    pub use crate::error::{Error, Result};
}
