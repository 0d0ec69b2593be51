//! Sequential, fail-fast deletion.

use reqwest::StatusCode;

use super::DeleteItem;
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::reduce::DeletionPlan;
use crate::transport::{Transport, artifactory_url, indent_json};

/// Result of one delete call (or its dry-run simulation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub path: String,
    pub succeeded: bool,
    /// `None` when no request was issued (dry run).
    pub status: Option<StatusCode>,
    pub error_detail: Option<String>,
}

impl OperationOutcome {
    fn simulated(path: String) -> Self {
        Self {
            path,
            succeeded: true,
            status: None,
            error_detail: None,
        }
    }

    fn deleted(path: String, status: StatusCode) -> Self {
        Self {
            path,
            succeeded: true,
            status: Some(status),
            error_detail: None,
        }
    }

    fn failed(path: String, status: StatusCode, detail: String) -> Self {
        Self {
            path,
            succeeded: false,
            status: Some(status),
            error_detail: Some(detail),
        }
    }

    fn into_error(self, completed: usize) -> Error {
        Error::Delete {
            path: self.path,
            status: self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: self.error_detail.unwrap_or_default(),
            completed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub outcomes: Vec<OperationOutcome>,
    pub dry_run: bool,
}

impl DeleteReport {
    pub fn deleted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }
}

/// Issues delete calls one at a time, in plan order.
///
/// The first non-204 response or transport failure aborts the run. Items deleted before it stay
/// deleted; there is no rollback.
pub struct DeleteExecutor<'a> {
    transport: &'a dyn Transport,
    config: &'a ServiceConfig,
}

impl<'a> DeleteExecutor<'a> {
    pub fn new(transport: &'a dyn Transport, config: &'a ServiceConfig) -> Self {
        Self { transport, config }
    }

    pub async fn execute(&self, plan: &DeletionPlan) -> Result<DeleteReport> {
        self.delete_items(plan.items()).await
    }

    pub async fn delete_items<I: DeleteItem>(&self, items: &[I]) -> Result<DeleteReport> {
        let dry_run = self.config.is_dry_run();
        let headers = if dry_run {
            None
        } else {
            Some(self.config.auth().headers()?)
        };

        let mut report = DeleteReport {
            outcomes: Vec::with_capacity(items.len()),
            dry_run,
        };

        for item in items {
            let path = item.relative_path();
            let url = artifactory_url(self.config.url(), &path)?;

            let Some(headers) = headers.as_ref() else {
                tracing::info!("[Dry run] Deleting: {path}");
                report.outcomes.push(OperationOutcome::simulated(path));
                continue;
            };

            tracing::info!("Deleting: {path}");
            let response = match self.transport.send_delete(&url, headers).await {
                Ok(response) => response,
                Err(source) => {
                    tracing::error!(%path, error = %source, "Delete request failed");
                    return Err(Error::DeleteInterrupted {
                        path,
                        completed: report.deleted_count(),
                        source,
                    });
                }
            };
            if response.status != StatusCode::NO_CONTENT {
                let outcome =
                    OperationOutcome::failed(path, response.status, indent_json(&response.body));
                tracing::error!(path = %outcome.path, status = %response.status, "Delete failed");
                return Err(outcome.into_error(report.deleted_count()));
            }

            tracing::debug!(status = %response.status, "Artifactory response");
            report
                .outcomes
                .push(OperationOutcome::deleted(path, response.status));
        }

        Ok(report)
    }
}
