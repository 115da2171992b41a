// src/provider/fallback.rs
//! Built-in and file-based job datasets shown when the API is unreachable

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use uuid::Uuid;

use crate::app_log;
use crate::types::job::{
    DEFAULT_DEADLINE, DEFAULT_EXPERIENCE, DEFAULT_LOCATION_TYPE, DEFAULT_SALARY,
};
use crate::types::{CreateJobRequest, Job, JobId, JobType, NewJob};

const SAMPLE_POSTED_TIME: &str = "24h Ago";
const SAMPLE_DESCRIPTION: &str = "A user-friendly interface lets you browse stunning photos and videos\nFilter destinations based on interests and travel style, and create personalized";

const SAMPLE_POSTINGS: [(&str, &str, &str); 3] = [
    ("Amazon", "Full Stack Developer", "/images/img_image_77.png"),
    ("Tesla", "Node Js Developer", "/images/img_image_79.png"),
    ("Swiggy", "UX/UI Designer", "/images/img_image_78.png"),
];

const SAMPLE_COUNT: usize = 8;

/// Stable id for the n-th entry of a fallback dataset (1-based)
pub fn fallback_id(n: u128) -> JobId {
    JobId::from_uuid(Uuid::from_u128(n))
}

/// The eight sample postings that keep the listing populated
pub fn sample_jobs() -> Vec<Job> {
    (0..SAMPLE_COUNT)
        .map(|index| {
            let (company, position, logo) = SAMPLE_POSTINGS[index % SAMPLE_POSTINGS.len()];
            let new_job = NewJob {
                company: company.to_string(),
                position: position.to_string(),
                description: SAMPLE_DESCRIPTION.to_string(),
                logo: logo.to_string(),
                experience: DEFAULT_EXPERIENCE.to_string(),
                location_type: DEFAULT_LOCATION_TYPE.to_string(),
                salary: DEFAULT_SALARY.to_string(),
                job_type: JobType::FullTime,
                application_deadline: DEFAULT_DEADLINE.to_string(),
            };

            let id = fallback_id(index as u128 + 1);
            let mut job = new_job.into_job(id, DateTime::<Utc>::UNIX_EPOCH);
            job.posted_time = SAMPLE_POSTED_TIME.to_string();
            job
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FallbackRecord {
    id: Option<JobId>,
    company: Option<String>,
    position: Option<String>,
    description: Option<String>,
    logo: Option<String>,
    experience: Option<String>,
    location_type: Option<String>,
    salary: Option<String>,
    job_type: Option<String>,
    posted_time: Option<String>,
    application_deadline: Option<String>,
}

impl FallbackRecord {
    fn into_job(self, index: usize) -> Result<Job> {
        let id = self.id.unwrap_or_else(|| fallback_id(index as u128 + 1));
        let posted_time = self
            .posted_time
            .unwrap_or_else(|| SAMPLE_POSTED_TIME.to_string());

        let request = CreateJobRequest {
            company: self.company,
            position: self.position,
            description: self.description,
            logo: self.logo,
            experience: self.experience,
            location_type: self.location_type,
            salary: self.salary,
            job_type: self.job_type,
            application_deadline: self.application_deadline,
        };

        let new_job = request
            .validate()
            .with_context(|| format!("Invalid fallback job #{}", index + 1))?;

        let mut job = new_job.into_job(id, DateTime::<Utc>::UNIX_EPOCH);
        job.posted_time = posted_time;
        Ok(job)
    }
}

#[derive(Debug, Deserialize)]
struct FallbackFile {
    #[serde(default)]
    jobs: Vec<FallbackRecord>,
}

/// A fallback dataset read from a TOML file of `[[jobs]]` tables
pub struct FallbackJobs;

impl FallbackJobs {
    pub fn from_toml_str(content: &str) -> Result<Vec<Job>> {
        let file: FallbackFile =
            toml::from_str(content).context("Failed to parse fallback jobs")?;

        file.jobs
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_job(index))
            .collect()
    }

    pub fn load(path: &Path) -> Result<Vec<Job>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fallback jobs: {}", path.display()))?;
        let jobs = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load fallback jobs: {}", path.display()))?;

        app_log!(
            info,
            "Loaded {} fallback jobs from {}",
            jobs.len(),
            path.display()
        );
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobType;

    #[test]
    fn test_sample_jobs_are_stable() {
        let jobs = sample_jobs();
        assert_eq!(jobs.len(), 8);
        assert_eq!(jobs[0].id, fallback_id(1));
        assert_eq!(jobs[7].id, fallback_id(8));
        assert_eq!(sample_jobs(), jobs);

        assert_eq!(jobs[0].company, "Amazon");
        assert_eq!(jobs[1].company, "Tesla");
        assert_eq!(jobs[2].position, "UX/UI Designer");
        assert_eq!(jobs[2].logo, "/images/img_image_78.png");

        let first = &jobs[0];
        assert_eq!(first.posted_time, "24h Ago");
        assert_eq!(first.salary, "12LPA");
        assert_eq!(first.salary_lpa, Some(12));
        assert_eq!(first.location_type, "Onsite");
        assert_eq!(first.job_type, JobType::FullTime);
        assert_eq!(first.description.lines().count(), 2);
    }

    #[test]
    fn test_sample_jobs_agree_with_server_defaults() {
        for job in sample_jobs() {
            let request = CreateJobRequest {
                description: Some(job.description.clone()),
                logo: Some(job.logo.clone()),
                ..CreateJobRequest::new(job.company.as_str(), job.position.as_str())
            };
            let validated = request.validate().unwrap().into_job(job.id, job.created_at);
            assert_eq!(validated.posted_time, "Just now");
            assert_eq!(
                Job {
                    posted_time: job.posted_time.clone(),
                    ..validated
                },
                job
            );
        }
    }

    #[test]
    fn test_toml_dataset() {
        let jobs = FallbackJobs::from_toml_str(
            r#"
[[jobs]]
company = "Zomato"
position = "Backend Engineer"
salary = "18-24LPA"
jobType = "Contract"

[[jobs]]
id = "7d1d4e1c-8a52-4c1b-9a0e-6a1f2a4b5c6d"
company = "Flipkart"
position = "Data Analyst"
postedTime = "2 days ago"
"#,
        )
        .unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, fallback_id(1));
        assert_eq!(jobs[0].salary_lpa, Some(18));
        assert_eq!(jobs[0].job_type, JobType::Contract);
        assert_eq!(jobs[0].posted_time, "24h Ago");

        assert_eq!(
            jobs[1].id.to_string(),
            "7d1d4e1c-8a52-4c1b-9a0e-6a1f2a4b5c6d"
        );
        assert_eq!(jobs[1].posted_time, "2 days ago");
        assert_eq!(jobs[1].description, "No description provided");
    }

    #[test]
    fn test_bundled_dataset_parses() {
        let jobs =
            FallbackJobs::from_toml_str(include_str!("../../data/fallback_jobs.toml")).unwrap();
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[2].salary_lpa, Some(10));
    }

    #[test]
    fn test_toml_dataset_requires_company_and_position() {
        let result = FallbackJobs::from_toml_str("[[jobs]]\ncompany = \"Acme\"\n");
        assert!(result.is_err());

        assert!(FallbackJobs::from_toml_str("").unwrap().is_empty());
    }
}
