use std::sync::Arc;

use tracing::{info, warn};

use crate::{error::ClientError, SortingService, VectorFile};

/// Resolves a working vector from the service's ingestion endpoints.
#[derive(Clone)]
pub struct VectorSource {
    service: Arc<dyn SortingService>,
}

impl VectorSource {
    pub fn new(service: Arc<dyn SortingService>) -> Self {
        Self { service }
    }

    pub async fn load_from_file(&self, file: VectorFile) -> Result<Vec<i64>, ClientError> {
        let file_name = file.file_name.clone();
        match self.service.load_file(file).await {
            Ok(values) => {
                info!(file = %file_name, len = values.len(), "loaded vector from file");
                Ok(values)
            }
            Err(err) => {
                warn!(file = %file_name, "vector file load failed: {err}");
                Err(err.into())
            }
        }
    }

    pub async fn generate_random(&self, count: i64) -> Result<Vec<i64>, ClientError> {
        match self.service.generate_random(count).await {
            Ok(values) => {
                info!(count, len = values.len(), "generated random vector");
                Ok(values)
            }
            Err(err) => {
                warn!(count, "random vector generation failed: {err}");
                Err(err.into())
            }
        }
    }
}
