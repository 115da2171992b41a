// src/client/mod.rs
//! HTTP client for the job board API and the trait the provider depends on

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::future::Future;

use crate::app_log;
use crate::core::{ClientConfig, JobQuery};
use crate::types::{
    CreateJobRequest, DataResponse, ErrorResponse, FieldError, Job, JobId, JobListResponse,
    JobTypeStats, MessageResponse, UpdateJobRequest,
};

const JOBS_ENDPOINT: &str = "/jobs";
const STATS_ENDPOINT: &str = "/jobs/stats";

/// Remote job operations as seen by a consumer of the API
pub trait JobsApi: Send + Sync {
    fn list_jobs(&self, query: &JobQuery) -> impl Future<Output = Result<JobListResponse>> + Send;

    fn get_job(&self, id: JobId) -> impl Future<Output = Result<Job>> + Send;

    fn create_job(&self, request: &CreateJobRequest) -> impl Future<Output = Result<Job>> + Send;

    fn update_job(
        &self,
        id: JobId,
        request: &UpdateJobRequest,
    ) -> impl Future<Output = Result<Job>> + Send;

    fn delete_job(&self, id: JobId) -> impl Future<Output = Result<()>> + Send;

    fn job_stats(&self, active_only: bool)
        -> impl Future<Output = Result<Vec<JobTypeStats>>> + Send;
}

/// Non-success answer from the API, decoded from its error envelope when possible
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("HTTP {status} error: {message}")]
pub struct ApiFailure {
    pub status: u16,
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl ApiFailure {
    fn from_body(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(envelope) => Self {
                status: status.as_u16(),
                message: envelope.message,
                errors: envelope.errors.unwrap_or_default(),
            },
            Err(_) => Self {
                status: status.as_u16(),
                message: if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    body.trim().to_string()
                },
                errors: Vec::new(),
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND.as_u16()
    }
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn job_url(&self, id: JobId) -> String {
        format!("{}{}/{}", self.base_url, JOBS_ENDPOINT, id)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        app_log!(trace, "Response status: {}", status);

        if status.is_success() {
            response
                .json::<T>()
                .await
                .context("Failed to parse API response")
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let failure = ApiFailure::from_body(status, &error_text);
            app_log!(error, "Job API error: {}", failure);
            Err(failure.into())
        }
    }
}

impl JobsApi for ApiClient {
    async fn list_jobs(&self, query: &JobQuery) -> Result<JobListResponse> {
        let url = self.url(JOBS_ENDPOINT);
        app_log!(trace, "Fetching jobs: {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .context("Failed to call job listing endpoint")?;

        Self::read(response).await
    }

    async fn get_job(&self, id: JobId) -> Result<Job> {
        let response = self
            .client
            .get(self.job_url(id))
            .send()
            .await
            .context("Failed to call job endpoint")?;

        Self::read::<DataResponse<Job>>(response)
            .await
            .map(|envelope| envelope.data)
    }

    async fn create_job(&self, request: &CreateJobRequest) -> Result<Job> {
        app_log!(info, "Creating job at {}", self.url(JOBS_ENDPOINT));

        let response = self
            .client
            .post(self.url(JOBS_ENDPOINT))
            .json(request)
            .send()
            .await
            .context("Failed to call job creation endpoint")?;

        Self::read::<DataResponse<Job>>(response)
            .await
            .map(|envelope| envelope.data)
    }

    async fn update_job(&self, id: JobId, request: &UpdateJobRequest) -> Result<Job> {
        let response = self
            .client
            .put(self.job_url(id))
            .json(request)
            .send()
            .await
            .context("Failed to call job update endpoint")?;

        Self::read::<DataResponse<Job>>(response)
            .await
            .map(|envelope| envelope.data)
    }

    async fn delete_job(&self, id: JobId) -> Result<()> {
        let response = self
            .client
            .delete(self.job_url(id))
            .send()
            .await
            .context("Failed to call job deletion endpoint")?;

        let confirmation = Self::read::<MessageResponse>(response).await?;
        app_log!(info, "Deleted job {}: {}", id, confirmation.message);
        Ok(())
    }

    async fn job_stats(&self, active_only: bool) -> Result<Vec<JobTypeStats>> {
        let mut request = self.client.get(self.url(STATS_ENDPOINT));
        if active_only {
            request = request.query(&[("activeOnly", "true")]);
        }

        let response = request
            .send()
            .await
            .context("Failed to call job stats endpoint")?;

        Self::read::<DataResponse<Vec<JobTypeStats>>>(response)
            .await
            .map(|envelope| envelope.data)
    }
}
