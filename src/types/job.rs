// src/types/job.rs
//! Job posting record, write-time defaults and validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_DESCRIPTION: &str = "No description provided";
pub const DEFAULT_LOGO: &str = "/images/default-company.png";
pub const DEFAULT_EXPERIENCE: &str = "1-3 yr Exp";
pub const DEFAULT_LOCATION_TYPE: &str = "Onsite";
pub const DEFAULT_SALARY: &str = "12LPA";
pub const DEFAULT_DEADLINE: &str = "Not specified";
pub const POSTED_ON_CREATE: &str = "Just now";

const SALARY_MARKER: &str = "LPA";

// ===== Identifier =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

// ===== Job type =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    #[serde(rename = "Full Time")]
    FullTime,
    #[serde(rename = "Part Time")]
    PartTime,
    Contract,
    Internship,
    Remote,
}

impl JobType {
    pub const ALL: [JobType; 5] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
        JobType::Remote,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full Time",
            JobType::PartTime => "Part Time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
            JobType::Remote => "Remote",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("`{0}` is not a valid job type")]
pub struct UnknownJobType(pub String);

impl FromStr for JobType {
    type Err = UnknownJobType;

    /// Accepts display labels ("Full Time") and dropdown values ("fulltime", "full-time").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match compact.as_str() {
            "fulltime" => Ok(JobType::FullTime),
            "parttime" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "internship" => Ok(JobType::Internship),
            "remote" => Ok(JobType::Remote),
            _ => Err(UnknownJobType(s.to_string())),
        }
    }
}

// ===== Salary =====

/// Numeric LPA figure of a salary label.
///
/// Takes the text before the first "LPA" marker (case-insensitive), or the
/// whole text without one. For a range such as "10-15LPA" the lower bound is
/// used. Anything that is not a plain integer yields `None`.
pub fn parse_salary_lpa(text: &str) -> Option<i64> {
    // ASCII uppercasing keeps byte offsets aligned with `text`
    let figure = match text.to_ascii_uppercase().find(SALARY_MARKER) {
        Some(end) => &text[..end],
        None => text,
    };
    let figure = figure.trim();

    let lower_bound = match figure.split_once('-') {
        Some((low, _)) => low.trim(),
        None => figure,
    };

    lower_bound.parse::<i64>().ok()
}

// ===== Record =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub company: String,
    pub position: String,
    pub description: String,
    pub logo: String,
    pub experience: String,
    pub location_type: String,
    pub salary: String,
    #[serde(default)]
    pub salary_lpa: Option<i64>,
    pub job_type: JobType,
    pub posted_time: String,
    pub application_deadline: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Merge a partial update, re-validating the result. The record is left
    /// untouched when validation fails.
    pub fn apply_update(&mut self, update: &UpdateJobRequest) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let mut merged = self.clone();

        if let Some(company) = &update.company {
            merged.company = company.clone();
        }
        if let Some(position) = &update.position {
            merged.position = position.clone();
        }
        if let Some(description) = &update.description {
            merged.description = description.clone();
        }
        if let Some(logo) = &update.logo {
            merged.logo = logo.clone();
        }
        if let Some(experience) = &update.experience {
            merged.experience = experience.clone();
        }
        if let Some(location_type) = &update.location_type {
            merged.location_type = location_type.clone();
        }
        if let Some(salary) = &update.salary {
            merged.salary = salary.clone();
        }
        if let Some(posted_time) = &update.posted_time {
            merged.posted_time = posted_time.clone();
        }
        if let Some(deadline) = &update.application_deadline {
            merged.application_deadline = deadline.clone();
        }
        if let Some(is_active) = update.is_active {
            merged.is_active = is_active;
        }
        if let Some(job_type) = &update.job_type {
            match job_type.parse::<JobType>() {
                Ok(parsed) => merged.job_type = parsed,
                Err(e) => errors.invalid("jobType", e.to_string()),
            }
        }

        if is_blank(&merged.company) {
            errors.missing("company");
        }
        if is_blank(&merged.position) {
            errors.missing("position");
        }
        if is_blank(&merged.description) {
            errors.missing("description");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        merged.salary_lpa = parse_salary_lpa(&merged.salary);
        merged.updated_at = Utc::now();
        *self = merged;
        Ok(())
    }
}

/// A validated job ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub company: String,
    pub position: String,
    pub description: String,
    pub logo: String,
    pub experience: String,
    pub location_type: String,
    pub salary: String,
    pub job_type: JobType,
    pub application_deadline: String,
}

impl NewJob {
    pub fn into_job(self, id: JobId, now: DateTime<Utc>) -> Job {
        let salary_lpa = parse_salary_lpa(&self.salary);
        Job {
            id,
            company: self.company,
            position: self.position,
            description: self.description,
            logo: self.logo,
            experience: self.experience,
            location_type: self.location_type,
            salary: self.salary,
            salary_lpa,
            job_type: self.job_type,
            posted_time: POSTED_ON_CREATE.to_string(),
            application_deadline: self.application_deadline,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

// ===== Request payloads =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
}

impl CreateJobRequest {
    pub fn new(company: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            company: Some(company.into()),
            position: Some(position.into()),
            ..Default::default()
        }
    }

    /// Check required fields and fill defaults for everything omitted.
    pub fn validate(self) -> Result<NewJob, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let company = self.company.filter(|v| !is_blank(v));
        let position = self.position.filter(|v| !is_blank(v));
        if company.is_none() {
            errors.missing("company");
        }
        if position.is_none() {
            errors.missing("position");
        }

        let job_type = match self.job_type.filter(|v| !is_blank(v)) {
            Some(raw) => match raw.parse::<JobType>() {
                Ok(parsed) => parsed,
                Err(e) => {
                    errors.invalid("jobType", e.to_string());
                    JobType::default()
                }
            },
            None => JobType::default(),
        };

        match (company, position) {
            (Some(company), Some(position)) if errors.is_empty() => Ok(NewJob {
                company,
                position,
                description: or_default(self.description, DEFAULT_DESCRIPTION),
                logo: or_default(self.logo, DEFAULT_LOGO),
                experience: or_default(self.experience, DEFAULT_EXPERIENCE),
                location_type: or_default(self.location_type, DEFAULT_LOCATION_TYPE),
                salary: or_default(self.salary, DEFAULT_SALARY),
                job_type,
                application_deadline: or_default(self.application_deadline, DEFAULT_DEADLINE),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// ===== Validation errors =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, thiserror::Error)]
#[error("{}", self.summary())]
pub struct ValidationErrors {
    missing: Vec<String>,
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn missing(&mut self, field: &str) {
        self.missing.push(field.to_string());
        self.errors.push(FieldError {
            field: field.to_string(),
            message: required_message(field),
        });
    }

    fn invalid(&mut self, field: &str, message: String) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn missing_fields(&self) -> &[String] {
        &self.missing
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn summary(&self) -> String {
        if self.missing.is_empty() {
            "Validation Error".to_string()
        } else {
            format!("Missing required fields: {}", self.missing.join(", "))
        }
    }
}

fn required_message(field: &str) -> String {
    match field {
        "company" => "Company name is required".to_string(),
        "position" => "Job position is required".to_string(),
        "description" => "Job description is required".to_string(),
        other => format!("{} is required", other),
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !is_blank(v))
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(request: CreateJobRequest) -> Job {
        request
            .validate()
            .expect("valid request")
            .into_job(JobId::new(), Utc::now())
    }

    #[test]
    fn test_create_fills_documented_defaults() {
        let job = stored(CreateJobRequest::new("Acme", "Engineer"));

        assert_eq!(job.company, "Acme");
        assert_eq!(job.position, "Engineer");
        assert_eq!(job.description, DEFAULT_DESCRIPTION);
        assert_eq!(job.logo, DEFAULT_LOGO);
        assert_eq!(job.experience, DEFAULT_EXPERIENCE);
        assert_eq!(job.location_type, DEFAULT_LOCATION_TYPE);
        assert_eq!(job.salary, "12LPA");
        assert_eq!(job.salary_lpa, Some(12));
        assert_eq!(job.job_type, JobType::FullTime);
        assert_eq!(job.application_deadline, DEFAULT_DEADLINE);
        assert_eq!(job.posted_time, "Just now");
        assert!(job.is_active);
    }

    #[test]
    fn test_create_keeps_submitted_values_and_defaults_blank_ones() {
        let request = CreateJobRequest {
            salary: Some("20LPA".to_string()),
            job_type: Some("Internship".to_string()),
            location_type: Some("Remote".to_string()),
            logo: Some("  ".to_string()),
            ..CreateJobRequest::new("Tesla", "Node Js Developer")
        };
        let job = stored(request);

        assert_eq!(job.salary_lpa, Some(20));
        assert_eq!(job.job_type, JobType::Internship);
        assert_eq!(job.location_type, "Remote");
        assert_eq!(job.logo, DEFAULT_LOGO);
    }

    #[test]
    fn test_create_reports_exactly_the_missing_fields() {
        let errors = CreateJobRequest::default().validate().unwrap_err();
        assert_eq!(errors.missing_fields(), ["company", "position"]);
        assert_eq!(errors.summary(), "Missing required fields: company, position");

        let errors = CreateJobRequest {
            company: Some("Acme".to_string()),
            position: Some("   ".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.missing_fields(), ["position"]);
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn test_create_rejects_unknown_job_type() {
        let request = CreateJobRequest {
            job_type: Some("Gig".to_string()),
            ..CreateJobRequest::new("Acme", "Engineer")
        };
        let errors = request.validate().unwrap_err();

        assert!(errors.missing_fields().is_empty());
        assert_eq!(errors.summary(), "Validation Error");
        assert_eq!(errors.errors()[0].field, "jobType");
    }

    #[test]
    fn test_job_type_parsing_accepts_labels_and_dropdown_values() {
        assert_eq!("Full Time".parse::<JobType>().unwrap(), JobType::FullTime);
        assert_eq!("fulltime".parse::<JobType>().unwrap(), JobType::FullTime);
        assert_eq!("part-time".parse::<JobType>().unwrap(), JobType::PartTime);
        assert_eq!("REMOTE".parse::<JobType>().unwrap(), JobType::Remote);
        assert!("freelance".parse::<JobType>().is_err());
    }

    #[test]
    fn test_job_type_serializes_as_label() {
        let json = serde_json::to_string(&JobType::PartTime).unwrap();
        assert_eq!(json, "\"Part Time\"");
        let parsed: JobType = serde_json::from_str("\"Full Time\"").unwrap();
        assert_eq!(parsed, JobType::FullTime);
    }

    #[test]
    fn test_parse_salary_lpa() {
        assert_eq!(parse_salary_lpa("12LPA"), Some(12));
        assert_eq!(parse_salary_lpa("12 lpa"), Some(12));
        assert_eq!(parse_salary_lpa("10-15LPA"), Some(10));
        assert_eq!(parse_salary_lpa("8"), Some(8));
        assert_eq!(parse_salary_lpa("Competitive salary"), None);
        assert_eq!(parse_salary_lpa("12.5LPA"), None);
        assert_eq!(parse_salary_lpa(""), None);
    }

    #[test]
    fn test_update_leaves_unspecified_fields_unchanged() {
        let mut job = stored(CreateJobRequest::new("Acme", "Engineer"));
        let before = job.clone();

        let update = UpdateJobRequest {
            salary: Some("18LPA".to_string()),
            is_active: Some(false),
            ..Default::default()
        };
        job.apply_update(&update).unwrap();

        assert_eq!(job.salary, "18LPA");
        assert_eq!(job.salary_lpa, Some(18));
        assert!(!job.is_active);
        assert_eq!(job.company, before.company);
        assert_eq!(job.position, before.position);
        assert_eq!(job.description, before.description);
        assert_eq!(job.job_type, before.job_type);
        assert_eq!(job.created_at, before.created_at);
    }

    #[test]
    fn test_update_rejects_blank_required_field_without_mutating() {
        let mut job = stored(CreateJobRequest::new("Acme", "Engineer"));
        let before = job.clone();

        let update = UpdateJobRequest {
            company: Some(String::new()),
            job_type: Some("Weekend".to_string()),
            ..Default::default()
        };
        let errors = job.apply_update(&update).unwrap_err();

        assert_eq!(errors.missing_fields(), ["company"]);
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(job, before);
    }

    #[test]
    fn test_job_id_round_trips_through_text() {
        let id = JobId::new();
        let parsed: JobId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-an-id".parse::<JobId>().is_err());
    }

    #[test]
    fn test_job_serializes_camel_case() {
        let job = stored(CreateJobRequest::new("Acme", "Engineer"));
        let value = serde_json::to_value(&job).unwrap();

        assert_eq!(value["postedTime"], "Just now");
        assert_eq!(value["isActive"], true);
        assert_eq!(value["jobType"], "Full Time");
        assert_eq!(value["salaryLpa"], 12);
        assert!(value.get("id").is_some());
    }
}
