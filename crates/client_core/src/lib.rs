use std::path::Path;

use async_trait::async_trait;
use shared::{
    domain::SortAlgorithm,
    protocol::{SortOutcome, DEFAULT_UPLOAD_FILE_NAME},
};

pub mod dispatcher;
pub mod error;
pub mod transport;
pub mod vector_source;
mod workbench;

pub use dispatcher::{PreparedSort, SortDispatcher};
pub use error::{ClientError, InputError, Operation, ServiceError};
pub use transport::{HttpSortingService, DEFAULT_SERVICE_URL};
pub use vector_source::VectorSource;
pub use workbench::{
    OrchestrationState, Phase, SortWorkbench, WorkbenchEvent, DEFAULT_RANDOM_COUNT,
};

/// Remote collaborator that parses files, generates vectors and runs the sorts.
#[async_trait]
pub trait SortingService: Send + Sync {
    async fn load_file(&self, file: VectorFile) -> Result<Vec<i64>, ServiceError>;
    async fn generate_random(&self, count: i64) -> Result<Vec<i64>, ServiceError>;
    async fn sort(
        &self,
        algorithm: SortAlgorithm,
        values: &[i64],
    ) -> Result<SortOutcome, ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl VectorFile {
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            contents,
        }
    }

    pub async fn read(path: &Path) -> Result<Self, InputError> {
        let contents = tokio::fs::read(path)
            .await
            .map_err(|err| InputError::UnreadableFile {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self::new(upload_name(path), contents))
    }
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_UPLOAD_FILE_NAME.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
