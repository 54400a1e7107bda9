//! reqwest-backed client for the remote sorting service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::SortAlgorithm,
    protocol::{generate_random_path, sort_path, SortOutcome, LOAD_FILE_FIELD, LOAD_FILE_PATH},
};
use tracing::debug;

use crate::{
    error::{Operation, ServiceError},
    SortingService, VectorFile,
};

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8080";

pub struct HttpSortingService {
    http: Client,
    base_url: String,
}

impl HttpSortingService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn decode_success<T: DeserializeOwned>(
    operation: Operation,
    response: Result<Response, reqwest::Error>,
) -> Result<T, ServiceError> {
    let response = response.map_err(|err| ServiceError::transport(operation, err))?;
    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::Status {
            operation,
            status: status.as_u16(),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|err| ServiceError::transport(operation, err))
}

#[async_trait]
impl SortingService for HttpSortingService {
    async fn load_file(&self, file: VectorFile) -> Result<Vec<i64>, ServiceError> {
        let operation = Operation::LoadFile;
        debug!(
            file = %file.file_name,
            size_bytes = file.contents.len(),
            "uploading vector file"
        );
        let part = Part::bytes(file.contents).file_name(file.file_name);
        let form = Form::new().part(LOAD_FILE_FIELD, part);
        let response = self
            .http
            .post(self.url(LOAD_FILE_PATH))
            .multipart(form)
            .send()
            .await;
        decode_success(operation, response).await
    }

    async fn generate_random(&self, count: i64) -> Result<Vec<i64>, ServiceError> {
        let operation = Operation::GenerateRandom;
        debug!(count, "requesting random vector");
        let response = self
            .http
            .get(self.url(&generate_random_path(count)))
            .send()
            .await;
        decode_success(operation, response).await
    }

    async fn sort(
        &self,
        algorithm: SortAlgorithm,
        values: &[i64],
    ) -> Result<SortOutcome, ServiceError> {
        let operation = Operation::Sort(algorithm);
        debug!(algorithm = %algorithm, len = values.len(), "submitting sort request");
        let response = self
            .http
            .post(self.url(&sort_path(algorithm)))
            .json(values)
            .send()
            .await;
        decode_success(operation, response).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
