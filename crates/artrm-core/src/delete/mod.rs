//! Deletion of reduced plans.

mod executor;

pub use executor::{DeleteExecutor, DeleteReport, OperationOutcome};

use crate::search::{FileSpec, ItemRecord};

/// Anything that can be removed by its repository-relative path.
pub trait DeleteItem {
    /// `<repo>/<path>`, without a leading separator.
    fn relative_path(&self) -> String;
}

impl DeleteItem for ItemRecord {
    fn relative_path(&self) -> String {
        self.full_path()
    }
}

/// Parameters of a delete operation.
pub trait DeleteParams {
    fn file_spec(&self) -> &FileSpec;
    fn set_include_directories(&mut self, include_directories: bool);
}

/// [`DeleteParams`] backed by a single [`FileSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteParamsImpl {
    spec: FileSpec,
}

impl DeleteParamsImpl {
    pub fn new(spec: FileSpec) -> Self {
        Self { spec }
    }
}

impl From<FileSpec> for DeleteParamsImpl {
    fn from(spec: FileSpec) -> Self {
        Self::new(spec)
    }
}

impl DeleteParams for DeleteParamsImpl {
    fn file_spec(&self) -> &FileSpec {
        &self.spec
    }

    fn set_include_directories(&mut self, include_directories: bool) {
        self.spec = self.spec.clone().with_include_directories(include_directories);
    }
}
