// src/presentation/form.rs
//! Create-job modal state and its submission payload

use crate::presentation::filters::{option_label, LOCATION_OPTIONS};
use crate::types::{CreateJobRequest, JobType};

const SALARY_STEP: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Job title and company name are required")]
    MissingRequired,
    #[error("`{0}` is not a valid job type")]
    UnknownJobType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryField {
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateJobForm {
    pub title: String,
    pub company: String,
    /// Location dropdown value, e.g. "bangalore"
    pub location: Option<String>,
    /// Job type dropdown value, e.g. "fulltime"
    pub job_type: String,
    pub experience: String,
    min_salary: String,
    max_salary: String,
    pub description: String,
    pub deadline: String,
}

impl Default for CreateJobForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            location: None,
            job_type: "fulltime".to_string(),
            experience: String::new(),
            min_salary: String::new(),
            max_salary: String::new(),
            description: String::new(),
            deadline: String::new(),
        }
    }
}

impl CreateJobForm {
    pub fn salary(&self, field: SalaryField) -> &str {
        match field {
            SalaryField::Min => &self.min_salary,
            SalaryField::Max => &self.max_salary,
        }
    }

    fn salary_mut(&mut self, field: SalaryField) -> &mut String {
        match field {
            SalaryField::Min => &mut self.min_salary,
            SalaryField::Max => &mut self.max_salary,
        }
    }

    /// Keeps digits only; commas and anything else typed are dropped
    pub fn set_salary(&mut self, field: SalaryField, input: &str) {
        *self.salary_mut(field) = input.chars().filter(char::is_ascii_digit).collect();
    }

    fn salary_value(&self, field: SalaryField) -> Option<u64> {
        self.salary(field).parse::<u64>().ok()
    }

    pub fn increment_salary(&mut self, field: SalaryField) {
        let next = self.salary_value(field).unwrap_or(0).saturating_add(SALARY_STEP);
        *self.salary_mut(field) = next.to_string();
    }

    /// Never goes below zero
    pub fn decrement_salary(&mut self, field: SalaryField) {
        let next = self.salary_value(field).unwrap_or(0).saturating_sub(SALARY_STEP);
        *self.salary_mut(field) = next.to_string();
    }

    fn salary_text(&self) -> Option<String> {
        match (
            self.salary_value(SalaryField::Min),
            self.salary_value(SalaryField::Max),
        ) {
            (Some(min), Some(max)) => Some(format!("{}-{}LPA", min, max)),
            (Some(single), None) | (None, Some(single)) => Some(format!("{}LPA", single)),
            (None, None) => None,
        }
    }

    /// Build the API payload; blank optional fields are left to server defaults
    pub fn submit(&self) -> Result<CreateJobRequest, FormError> {
        let title = self.title.trim();
        let company = self.company.trim();
        if title.is_empty() || company.is_empty() {
            return Err(FormError::MissingRequired);
        }

        let job_type = self
            .job_type
            .parse::<JobType>()
            .map_err(|e| FormError::UnknownJobType(e.0))?;

        let location_type = self.location.as_deref().map(|value| {
            option_label(&LOCATION_OPTIONS, value)
                .map(str::to_string)
                .unwrap_or_else(|| value.trim().to_string())
        });

        Ok(CreateJobRequest {
            company: Some(company.to_string()),
            position: Some(title.to_string()),
            description: non_blank(&self.description),
            experience: non_blank(&self.experience),
            location_type: location_type.filter(|l| !l.is_empty()),
            salary: self.salary_text(),
            job_type: Some(job_type.label().to_string()),
            application_deadline: non_blank(&self.deadline),
            ..CreateJobRequest::default()
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CreateJobForm {
        CreateJobForm {
            title: " Engineer ".to_string(),
            company: "Acme".to_string(),
            ..CreateJobForm::default()
        }
    }

    #[test]
    fn test_title_and_company_are_required() {
        let mut form = filled();
        form.company = "   ".to_string();
        assert_eq!(form.submit(), Err(FormError::MissingRequired));

        assert_eq!(
            CreateJobForm::default().submit().unwrap_err().to_string(),
            "Job title and company name are required"
        );
    }

    #[test]
    fn test_minimal_form_leaves_defaults_to_server() {
        let request = filled().submit().unwrap();

        assert_eq!(request.company.as_deref(), Some("Acme"));
        assert_eq!(request.position.as_deref(), Some("Engineer"));
        assert_eq!(request.job_type.as_deref(), Some("Full Time"));
        assert!(request.salary.is_none());
        assert!(request.description.is_none());
        assert!(request.location_type.is_none());

        let job = request.validate().unwrap();
        assert_eq!(job.salary, "12LPA");
    }

    #[test]
    fn test_salary_input_is_sanitized() {
        let mut form = filled();
        form.set_salary(SalaryField::Min, "1,2a");
        assert_eq!(form.salary(SalaryField::Min), "12");

        form.decrement_salary(SalaryField::Max);
        assert_eq!(form.salary(SalaryField::Max), "0");
        form.increment_salary(SalaryField::Max);
        form.increment_salary(SalaryField::Max);
        assert_eq!(form.salary(SalaryField::Max), "2");
    }

    #[test]
    fn test_salary_formatting() {
        let mut form = filled();
        form.set_salary(SalaryField::Min, "10");
        form.set_salary(SalaryField::Max, "15");
        assert_eq!(form.submit().unwrap().salary.as_deref(), Some("10-15LPA"));

        form.set_salary(SalaryField::Min, "");
        assert_eq!(form.submit().unwrap().salary.as_deref(), Some("15LPA"));

        let job = form.submit().unwrap().validate().unwrap();
        assert_eq!(job.into_job(Default::default(), chrono::Utc::now()).salary_lpa, Some(15));
    }

    #[test]
    fn test_dropdowns_map_to_labels() {
        let mut form = filled();
        form.location = Some("bangalore".to_string());
        form.job_type = "internship".to_string();

        let request = form.submit().unwrap();
        assert_eq!(request.location_type.as_deref(), Some("Bangalore"));
        assert_eq!(request.job_type.as_deref(), Some("Internship"));

        form.job_type = "freelance".to_string();
        assert!(matches!(form.submit(), Err(FormError::UnknownJobType(_))));

        form.reset();
        assert_eq!(form, CreateJobForm::default());
    }
}
