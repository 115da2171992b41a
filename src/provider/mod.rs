// src/provider/mod.rs
//! Client-side job list: loading, optimistic writes and quick filtering

pub mod fallback;

pub use fallback::{fallback_id, sample_jobs, FallbackJobs};

use anyhow::Result;
use chrono::Utc;
use std::collections::HashSet;

use crate::app_log;
use crate::client::JobsApi;
use crate::core::query::DEFAULT_PAGE_SIZE;
use crate::core::JobQuery;
use crate::types::{CreateJobRequest, Job, JobId, JobListResponse, JobType, UpdateJobRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Apply locally before the request; optionally restore on failure
    Optimistic { revert_on_failure: bool },
    /// Apply only once the server confirms
    Confirmed,
}

impl Default for SyncMode {
    fn default() -> Self {
        SyncMode::Optimistic {
            revert_on_failure: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderConfig {
    pub page_size: u32,
    pub sync: SyncMode,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sync: SyncMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKey {
    Saved(JobId),
    /// Local placeholder for a create still in flight
    Pending(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOrigin {
    Api,
    Fallback,
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEntry {
    pub key: JobKey,
    pub origin: JobOrigin,
    pub job: Job,
}

impl ProviderEntry {
    fn saved(job: Job, origin: JobOrigin) -> Self {
        Self {
            key: JobKey::Saved(job.id),
            origin,
            job,
        }
    }

    fn is_pending(&self) -> bool {
        self.origin == JobOrigin::Pending
    }
}

/// Quick search over the jobs already held, without a round-trip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientFilter {
    pub text: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
}

impl ClientFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(text) = non_blank(&self.text) {
            let text = text.to_lowercase();
            if !job.position.to_lowercase().contains(&text)
                && !job.company.to_lowercase().contains(&text)
            {
                return false;
            }
        }

        if let Some(location) = non_blank(&self.location) {
            if !job
                .location_type
                .to_lowercase()
                .contains(&location.to_lowercase())
            {
                return false;
            }
        }

        if let Some(job_type) = self.job_type {
            if job.job_type != job_type {
                return false;
            }
        }

        if self.min_salary.is_some() || self.max_salary.is_some() {
            let Some(salary) = job.salary_lpa else {
                return false;
            };
            if self.min_salary.is_some_and(|min| salary < min)
                || self.max_salary.is_some_and(|max| salary > max)
            {
                return false;
            }
        }

        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub struct JobsProvider<A> {
    api: A,
    fallback: Vec<Job>,
    config: ProviderConfig,
    entries: Vec<ProviderEntry>,
    loading: bool,
    error: Option<String>,
    next_pending: u64,
}

impl<A: JobsApi> JobsProvider<A> {
    /// The list holds the fallback dataset and reports loading until the first load finishes
    pub fn new(api: A, fallback: Vec<Job>, config: ProviderConfig) -> Self {
        let entries = fallback
            .iter()
            .cloned()
            .map(|job| ProviderEntry::saved(job, JobOrigin::Fallback))
            .collect();

        Self {
            api,
            fallback,
            config,
            entries,
            loading: true,
            error: None,
            next_pending: 0,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn entries(&self) -> &[ProviderEntry] {
        &self.entries
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.entries.iter().map(|entry| &entry.job)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn entry(&self, key: JobKey) -> Option<&ProviderEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    fn position(&self, key: JobKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    fn pending_entries(&self) -> Vec<ProviderEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.is_pending())
            .cloned()
            .collect()
    }

    /// Fetch the first page; the fallback dataset fills in behind it
    pub async fn load(&mut self) -> Result<()> {
        let query = self.begin_load();
        let result = self.api.list_jobs(&query).await;
        self.finish_load(result)
    }

    /// Mark a fetch as in flight and return the query to send
    pub fn begin_load(&mut self) -> JobQuery {
        self.loading = true;
        JobQuery::page(1, self.config.page_size)
    }

    /// Merge the outcome of a fetch started with `begin_load`
    pub fn finish_load(&mut self, result: Result<JobListResponse>) -> Result<()> {
        self.loading = false;

        let mut entries = self.pending_entries();
        match result {
            Ok(response) => {
                let mut seen = HashSet::new();
                for job in response.data {
                    if seen.insert(job.id) {
                        entries.push(ProviderEntry::saved(job, JobOrigin::Api));
                    }
                }
                for job in &self.fallback {
                    if seen.insert(job.id) {
                        entries.push(ProviderEntry::saved(job.clone(), JobOrigin::Fallback));
                    }
                }

                app_log!(
                    info,
                    "Loaded {} of {} jobs from the API",
                    response.count,
                    response.total
                );
                self.error = None;
                self.entries = entries;
                Ok(())
            }
            Err(e) => {
                app_log!(warn, "Falling back to built-in jobs: {:#}", e);
                entries.extend(
                    self.fallback
                        .iter()
                        .cloned()
                        .map(|job| ProviderEntry::saved(job, JobOrigin::Fallback)),
                );
                self.error = Some(format!("{:#}", e));
                self.entries = entries;
                Err(e)
            }
        }
    }

    /// Validate locally and, in optimistic mode, show a placeholder entry.
    /// Returns the key to hand to `finish_create`.
    pub fn begin_create(&mut self, request: &CreateJobRequest) -> Result<JobKey> {
        let new_job = request.clone().validate()?;

        self.next_pending += 1;
        let key = JobKey::Pending(self.next_pending);

        if matches!(self.config.sync, SyncMode::Optimistic { .. }) {
            self.entries.insert(
                0,
                ProviderEntry {
                    key,
                    origin: JobOrigin::Pending,
                    job: new_job.into_job(JobId::new(), Utc::now()),
                },
            );
        }
        Ok(key)
    }

    /// Reconcile a placeholder with the server's answer
    pub fn finish_create(&mut self, key: JobKey, result: Result<Job>) -> Result<JobKey> {
        let slot = self.position(key);

        match result {
            Ok(job) => {
                let saved = JobKey::Saved(job.id);
                self.entries
                    .retain(|entry| entry.key != saved && entry.key != key);
                let entry = ProviderEntry::saved(job, JobOrigin::Api);
                let index = slot.unwrap_or(0).min(self.entries.len());
                self.entries.insert(index, entry);
                Ok(saved)
            }
            Err(e) => {
                if let Some(index) = slot {
                    self.entries.remove(index);
                }
                app_log!(error, "Error adding job: {:#}", e);
                self.error = Some(format!("{:#}", e));
                Err(e)
            }
        }
    }

    pub async fn create(&mut self, request: CreateJobRequest) -> Result<JobKey> {
        let key = self.begin_create(&request)?;
        let result = self.api.create_job(&request).await;
        self.finish_create(key, result)
    }

    pub async fn update(&mut self, id: JobId, request: UpdateJobRequest) -> Result<()> {
        let key = JobKey::Saved(id);
        let previous = self.entry(key).cloned();

        let revert = match self.config.sync {
            SyncMode::Optimistic { revert_on_failure } => {
                if let Some(index) = self.position(key) {
                    self.entries[index].job.apply_update(&request)?;
                }
                revert_on_failure
            }
            SyncMode::Confirmed => false,
        };

        match self.api.update_job(id, &request).await {
            Ok(job) => {
                match self.position(key) {
                    Some(index) => self.entries[index] = ProviderEntry::saved(job, JobOrigin::Api),
                    None => self.entries.insert(0, ProviderEntry::saved(job, JobOrigin::Api)),
                }
                Ok(())
            }
            Err(e) => {
                if let (true, Some(previous)) = (revert, previous) {
                    if let Some(index) = self.position(key) {
                        self.entries[index] = previous;
                    }
                }
                app_log!(error, "Error updating job {}: {:#}", id, e);
                self.error = Some(format!("{:#}", e));
                Err(e)
            }
        }
    }

    pub async fn delete(&mut self, id: JobId) -> Result<()> {
        let key = JobKey::Saved(id);

        let removed = match self.config.sync {
            SyncMode::Optimistic { revert_on_failure } => self
                .position(key)
                .map(|index| (index, self.entries.remove(index), revert_on_failure)),
            SyncMode::Confirmed => None,
        };

        match self.api.delete_job(id).await {
            Ok(()) => {
                self.entries.retain(|entry| entry.key != key);
                Ok(())
            }
            Err(e) => {
                if let Some((index, entry, true)) = removed {
                    let index = index.min(self.entries.len());
                    self.entries.insert(index, entry);
                }
                app_log!(error, "Error deleting job {}: {:#}", id, e);
                self.error = Some(format!("{:#}", e));
                Err(e)
            }
        }
    }

    pub fn filter(&self, filter: &ClientFilter) -> Vec<&ProviderEntry> {
        self.entries
            .iter()
            .filter(|entry| filter.matches(&entry.job))
            .collect()
    }
}
