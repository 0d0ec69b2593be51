//! Service manager wiring search, reduction and deletion together.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::credentials;
use crate::delete::{DeleteExecutor, DeleteItem, DeleteParams, DeleteReport};
use crate::error::Result;
use crate::reduce::{DeletionPlan, reduce};
use crate::search::{FileSpec, ItemRecord, QueryMode, SearchClient};
use crate::transport::{HttpTransport, Transport};

/// Owns the shared configuration and transport for one or more operations.
///
/// Frontends build one per invocation and call [`ServiceManager::delete_matching`],
/// or split it into [`search_paths_to_delete`](Self::search_paths_to_delete) and
/// [`delete_files`](Self::delete_files) to confirm the plan in between.
#[derive(Clone)]
pub struct ServiceManager {
    config: ServiceConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ServiceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ServiceManager {
    /// Create a manager with a reqwest transport that trusts the certificates
    /// in the configured directory.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let transport = match config.certificates_path() {
            Some(dir) => HttpTransport::with_certificates(dir, config.timeout())?,
            None => HttpTransport::new(config.timeout())?,
        };
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ServiceConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn is_dry_run(&self) -> bool {
        self.config.is_dry_run()
    }

    /// Run a search without reducing the results.
    pub async fn search(&self, spec: &FileSpec) -> Result<Vec<ItemRecord>> {
        SearchClient::new(self.transport.as_ref(), &self.config)
            .search(spec)
            .await
    }

    /// Resolve `params` to the minimal set of paths to delete.
    ///
    /// Structured patterns always include folders, so a matching folder is
    /// removed with one call instead of one call per file.
    pub async fn search_paths_to_delete<P: DeleteParams>(
        &self,
        mut params: P,
    ) -> Result<DeletionPlan> {
        tracing::info!("Searching artifacts...");
        if params.file_spec().mode() == QueryMode::StructuredPattern {
            params.set_include_directories(true);
        }
        let items = self.search(params.file_spec()).await?;
        let found = items.len();
        let plan = reduce(items);
        tracing::debug!(found, planned = plan.len(), "Reduced search results");
        Ok(plan)
    }

    /// Delete every item of a plan, in order.
    pub async fn delete_files(&self, plan: &DeletionPlan) -> Result<DeleteReport> {
        DeleteExecutor::new(self.transport.as_ref(), &self.config)
            .execute(plan)
            .await
    }

    /// Delete arbitrary items, in order, without reduction.
    pub async fn delete_items<I: DeleteItem>(&self, items: &[I]) -> Result<DeleteReport> {
        DeleteExecutor::new(self.transport.as_ref(), &self.config)
            .delete_items(items)
            .await
    }

    /// Search, reduce and delete in one call.
    pub async fn delete_matching<P: DeleteParams>(&self, params: P) -> Result<DeleteReport> {
        let plan = self.search_paths_to_delete(params).await?;
        self.delete_files(&plan).await
    }

    pub async fn retrieve_encrypted_credential(&self) -> Result<String> {
        credentials::retrieve_encrypted_credential(self.transport.as_ref(), &self.config).await
    }
}
