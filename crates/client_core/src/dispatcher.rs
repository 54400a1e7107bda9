use std::sync::Arc;

use shared::{
    domain::{parse_vector, SortAlgorithm},
    protocol::DisplayResult,
};
use tracing::{info, warn};

use crate::{
    error::{ClientError, InputError},
    SortingService,
};

/// A parsed, non-empty vector ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSort {
    pub algorithm: SortAlgorithm,
    pub values: Vec<i64>,
}

#[derive(Clone)]
pub struct SortDispatcher {
    service: Arc<dyn SortingService>,
}

impl SortDispatcher {
    pub fn new(service: Arc<dyn SortingService>) -> Self {
        Self { service }
    }

    pub fn prepare(text: &str, algorithm: SortAlgorithm) -> Result<PreparedSort, InputError> {
        let values = parse_vector(text);
        if values.is_empty() {
            return Err(InputError::EmptyVector);
        }
        Ok(PreparedSort { algorithm, values })
    }

    /// Submits the prepared vector. The result always carries the submitted
    /// snapshot as its original vector, whatever the service echoes back.
    pub async fn dispatch(&self, prepared: PreparedSort) -> Result<DisplayResult, ClientError> {
        let PreparedSort { algorithm, values } = prepared;
        let outcome = match self.service.sort(algorithm, &values).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(algorithm = %algorithm, len = values.len(), "sort request failed: {err}");
                return Err(err.into());
            }
        };
        info!(
            algorithm = %algorithm,
            len = values.len(),
            comparisons = outcome.comparisons,
            movements = outcome.movements,
            elapsed_ms = outcome.elapsed_millis,
            "sort completed"
        );
        Ok(DisplayResult::new(outcome, values))
    }
}
