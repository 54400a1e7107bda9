use serde::{Deserialize, Serialize};

use crate::domain::SortAlgorithm;

pub const LOAD_FILE_PATH: &str = "/api/sort/load-file";
pub const LOAD_FILE_FIELD: &str = "file";
/// Upload name used when the selected path has no file name component.
pub const DEFAULT_UPLOAD_FILE_NAME: &str = "vector.txt";

pub fn generate_random_path(count: i64) -> String {
    format!("/api/sort/generate-random/{count}")
}

pub fn sort_path(algorithm: SortAlgorithm) -> String {
    format!("/api/sort/{}", algorithm.path_segment())
}

/// Metrics returned by the sorting service for a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOutcome {
    #[serde(rename = "comparacoes")]
    pub comparisons: u64,
    #[serde(rename = "movimentacoes")]
    pub movements: u64,
    #[serde(rename = "tempoExecucaoMs")]
    pub elapsed_millis: f64,
    #[serde(rename = "vetorOrdenado")]
    pub sorted_vector: Vec<i64>,
}

/// A completed sort paired with the exact vector that was submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayResult {
    #[serde(flatten)]
    pub outcome: SortOutcome,
    #[serde(rename = "vetorOriginal")]
    pub original_vector: Vec<i64>,
}

impl DisplayResult {
    pub fn new(outcome: SortOutcome, original_vector: Vec<i64>) -> Self {
        Self {
            outcome,
            original_vector,
        }
    }

    pub fn comparisons(&self) -> u64 {
        self.outcome.comparisons
    }

    pub fn movements(&self) -> u64 {
        self.outcome.movements
    }

    pub fn elapsed_millis(&self) -> f64 {
        self.outcome.elapsed_millis
    }

    pub fn sorted_vector(&self) -> &[i64] {
        &self.outcome.sorted_vector
    }
}
