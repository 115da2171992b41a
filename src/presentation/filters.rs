// src/presentation/filters.rs
//! Search bar state: free text, dropdowns and a salary slider in LPA

use crate::core::JobQuery;
use crate::provider::ClientFilter;
use crate::types::JobType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl DropdownOption {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

pub const LOCATION_OPTIONS: [DropdownOption; 5] = [
    DropdownOption::new("remote", "Remote"),
    DropdownOption::new("bangalore", "Bangalore"),
    DropdownOption::new("mumbai", "Mumbai"),
    DropdownOption::new("delhi", "Delhi"),
    DropdownOption::new("hyderabad", "Hyderabad"),
];

pub const JOB_TYPE_OPTIONS: [DropdownOption; 5] = [
    DropdownOption::new("fulltime", "Full Time"),
    DropdownOption::new("parttime", "Part Time"),
    DropdownOption::new("contract", "Contract"),
    DropdownOption::new("internship", "Internship"),
    DropdownOption::new("remote", "Remote"),
];

pub const SALARY_SLIDER_MIN: i64 = 0;
pub const SALARY_SLIDER_MAX: i64 = 100;

pub fn option_label(options: &[DropdownOption], value: &str) -> Option<&'static str> {
    options
        .iter()
        .find(|option| option.value.eq_ignore_ascii_case(value.trim()))
        .map(|option| option.label)
}

/// Slider label, e.g. "12LPA"
pub fn format_salary_bound(value: i64) -> String {
    format!("{}LPA", value)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub text: String,
    /// Dropdown value, e.g. "remote"
    pub location: Option<String>,
    /// Dropdown value, e.g. "fulltime"
    pub job_type: Option<String>,
    pub salary_range: Option<(i64, i64)>,
}

impl SearchFilters {
    /// Clamp to the slider bounds and keep min <= max
    pub fn set_salary_range(&mut self, min: i64, max: i64) {
        let min = min.clamp(SALARY_SLIDER_MIN, SALARY_SLIDER_MAX);
        let max = max.clamp(SALARY_SLIDER_MIN, SALARY_SLIDER_MAX);
        self.salary_range = Some((min.min(max), min.max(max)));
    }

    pub fn salary_labels(&self) -> Option<(String, String)> {
        self.salary_range
            .map(|(min, max)| (format_salary_bound(min), format_salary_bound(max)))
    }

    fn job_type(&self) -> Option<JobType> {
        self.job_type
            .as_deref()
            .and_then(|value| value.parse::<JobType>().ok())
    }

    fn location_label(&self) -> Option<String> {
        self.location.as_deref().map(|value| {
            option_label(&LOCATION_OPTIONS, value)
                .map(str::to_string)
                .unwrap_or_else(|| value.trim().to_string())
        })
    }

    pub fn to_client_filter(&self) -> ClientFilter {
        ClientFilter {
            text: Some(self.text.trim().to_string()).filter(|t| !t.is_empty()),
            location: self.location_label(),
            job_type: self.job_type(),
            min_salary: self.salary_range.map(|(min, _)| min),
            max_salary: self.salary_range.map(|(_, max)| max),
        }
    }

    pub fn to_query(&self, page: u32, limit: u32) -> JobQuery {
        let filter = self.to_client_filter();
        JobQuery {
            search: filter.text,
            location: filter.location,
            job_type: filter.job_type.map(|job_type| job_type.label().to_string()),
            min_salary: filter.min_salary,
            max_salary: filter.max_salary,
            page: Some(page),
            limit: Some(limit),
            ..JobQuery::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_cover_every_job_type() {
        for job_type in JobType::ALL {
            let option = JOB_TYPE_OPTIONS
                .iter()
                .find(|option| option.label == job_type.label())
                .unwrap();
            assert_eq!(option.value.parse::<JobType>().unwrap(), job_type);
        }
        assert_eq!(option_label(&LOCATION_OPTIONS, "Mumbai"), Some("Mumbai"));
        assert_eq!(option_label(&LOCATION_OPTIONS, "pune"), None);
    }

    #[test]
    fn test_salary_slider() {
        let mut filters = SearchFilters::default();
        filters.set_salary_range(30, 8);
        assert_eq!(filters.salary_range, Some((8, 30)));

        filters.set_salary_range(-5, 500);
        assert_eq!(filters.salary_range, Some((0, 100)));
        assert_eq!(
            filters.salary_labels(),
            Some(("0LPA".to_string(), "100LPA".to_string()))
        );
    }

    #[test]
    fn test_conversions() {
        let mut filters = SearchFilters {
            text: "  rust ".to_string(),
            location: Some("remote".to_string()),
            job_type: Some("parttime".to_string()),
            salary_range: None,
        };
        filters.set_salary_range(10, 15);

        let client = filters.to_client_filter();
        assert_eq!(client.text.as_deref(), Some("rust"));
        assert_eq!(client.location.as_deref(), Some("Remote"));
        assert_eq!(client.job_type, Some(JobType::PartTime));
        assert_eq!((client.min_salary, client.max_salary), (Some(10), Some(15)));

        let query = filters.to_query(2, 20);
        assert_eq!(query.search.as_deref(), Some("rust"));
        assert_eq!(query.location.as_deref(), Some("Remote"));
        assert_eq!(query.job_type.as_deref(), Some("Part Time"));
        assert_eq!(query.min_salary, Some(10));
        assert_eq!(query.page, Some(2));
        assert_eq!(query.limit, Some(20));
    }

    #[test]
    fn test_empty_filters_constrain_nothing() {
        let filters = SearchFilters::default();
        assert_eq!(filters.to_client_filter(), ClientFilter::default());
        assert_eq!(filters.to_query(1, 10), JobQuery::page(1, 10));
    }
}
