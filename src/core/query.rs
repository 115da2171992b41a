// src/core/query.rs
//! Translates list-request parameters into a job predicate and page window

use rocket::FromForm;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite};
use std::fmt;

use crate::types::JobType;

pub const ALL_LOCATIONS: &str = "All Locations";
pub const ALL_TYPES: &str = "All Types";
pub const ALL_EXPERIENCE: &str = "All Experience";

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Raw list parameters as they arrive on the query string.
///
/// Numeric fields that fail to parse are dropped by Rocket's `Option` form
/// handling, so a malformed `minSalary` simply imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, FromForm, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[field(name = "jobType")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[field(name = "minSalary")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<i64>,
    #[field(name = "maxSalary")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_salary: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl JobQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Default::default()
        }
    }
}

// ===== Predicate =====

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    search_terms: Vec<String>,
    location_type: Option<String>,
    job_type: Option<String>,
    experience: Option<String>,
    company: Option<String>,
    min_salary: Option<i64>,
    max_salary: Option<i64>,
}

impl JobFilter {
    pub fn from_query(query: &JobQuery) -> Self {
        let search_terms = query
            .search
            .as_deref()
            .map(|text| {
                text.split_whitespace()
                    .map(fold_case)
                    .collect()
            })
            .unwrap_or_default();

        // Accept dropdown spellings ("fulltime") as well as stored labels
        let job_type = selected(&query.job_type, ALL_TYPES).map(|raw| {
            raw.parse::<JobType>()
                .map(|parsed| parsed.label().to_string())
                .unwrap_or(raw)
        });

        Self {
            search_terms,
            location_type: selected(&query.location, ALL_LOCATIONS),
            job_type,
            experience: selected(&query.experience, ALL_EXPERIENCE),
            company: query
                .company
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(fold_case),
            min_salary: query.min_salary,
            max_salary: query.max_salary,
        }
    }

    pub fn has_salary_bounds(&self) -> bool {
        self.min_salary.is_some() || self.max_salary.is_some()
    }

    /// Append the `WHERE` clause; every value goes through a bind parameter.
    pub fn push_where<'args>(&self, builder: &mut QueryBuilder<'args, Sqlite>) {
        builder.push(" WHERE is_active = 1");

        if !self.search_terms.is_empty() {
            builder.push(" AND (");
            for (index, term) in self.search_terms.iter().enumerate() {
                if index > 0 {
                    builder.push(" OR ");
                }
                builder
                    .push("instr(search_text, ")
                    .push_bind(term.clone())
                    .push(") > 0");
            }
            builder.push(")");
        }

        if let Some(location_type) = &self.location_type {
            builder
                .push(" AND location_type = ")
                .push_bind(location_type.clone());
        }
        if let Some(job_type) = &self.job_type {
            builder.push(" AND job_type = ").push_bind(job_type.clone());
        }
        if let Some(experience) = &self.experience {
            builder
                .push(" AND experience = ")
                .push_bind(experience.clone());
        }
        if let Some(company) = &self.company {
            builder
                .push(" AND instr(company_folded, ")
                .push_bind(company.clone())
                .push(") > 0");
        }

        if self.has_salary_bounds() {
            builder.push(" AND salary_lpa IS NOT NULL");
        }
        if let Some(min) = self.min_salary {
            builder.push(" AND salary_lpa >= ").push_bind(min);
        }
        if let Some(max) = self.max_salary {
            builder.push(" AND salary_lpa <= ").push_bind(max);
        }
    }
}

impl fmt::Display for JobFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.search_terms.is_empty() {
            parts.push(format!("search={:?}", self.search_terms));
        }
        if let Some(v) = &self.location_type {
            parts.push(format!("location={}", v));
        }
        if let Some(v) = &self.job_type {
            parts.push(format!("jobType={}", v));
        }
        if let Some(v) = &self.experience {
            parts.push(format!("experience={}", v));
        }
        if let Some(v) = &self.company {
            parts.push(format!("company~{}", v));
        }
        if let Some(v) = self.min_salary {
            parts.push(format!("salary>={}", v));
        }
        if let Some(v) = self.max_salary {
            parts.push(format!("salary<={}", v));
        }

        if parts.is_empty() {
            f.write_str("active jobs")
        } else {
            write!(f, "active jobs where {}", parts.join(", "))
        }
    }
}

/// Unicode lowercase used for both the stored search columns and the query terms
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Exact-match selection, ignoring blanks and the "All ..." sentinel.
fn selected(value: &Option<String>, sentinel: &str) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != sentinel)
        .map(str::to_string)
}

// ===== Pagination =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Any positive `limit` is honoured as given; zero or absent falls back to the default
    pub fn from_query(query: &JobQuery, default_limit: u32) -> Self {
        Self {
            page: query.page.filter(|p| *p >= 1).unwrap_or(1),
            limit: query
                .limit
                .filter(|l| *l >= 1)
                .unwrap_or_else(|| default_limit.max(1)),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn where_clause(query: &JobQuery) -> String {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT id FROM jobs");
        JobFilter::from_query(query).push_where(&mut builder);
        builder.sql().to_string()
    }

    #[test]
    fn test_empty_query_only_restricts_to_active() {
        let filter = JobFilter::from_query(&JobQuery::default());
        assert_eq!(filter, JobFilter::default());
        assert_eq!(
            where_clause(&JobQuery::default()),
            "SELECT id FROM jobs WHERE is_active = 1"
        );
    }

    #[test]
    fn test_sentinels_and_blanks_impose_no_constraint() {
        let query = JobQuery {
            location: Some(ALL_LOCATIONS.to_string()),
            job_type: Some(ALL_TYPES.to_string()),
            experience: Some("  ".to_string()),
            company: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(JobFilter::from_query(&query), JobFilter::default());
    }

    #[test]
    fn test_exact_filters_and_company_substring() {
        let query = JobQuery {
            location: Some("Remote".to_string()),
            job_type: Some("parttime".to_string()),
            experience: Some("1-3 yr Exp".to_string()),
            company: Some("AcMe".to_string()),
            ..Default::default()
        };
        let filter = JobFilter::from_query(&query);
        assert_eq!(filter.job_type.as_deref(), Some("Part Time"));
        assert_eq!(filter.company.as_deref(), Some("acme"));

        let sql = where_clause(&query);
        assert!(sql.contains("location_type = ?"));
        assert!(sql.contains("job_type = ?"));
        assert!(sql.contains("experience = ?"));
        assert!(sql.contains("instr(company_folded, ?) > 0"));
        assert!(!sql.contains("salary_lpa"));
    }

    #[test]
    fn test_search_terms_are_ored() {
        let query = JobQuery {
            search: Some("Rust  Backend".to_string()),
            ..Default::default()
        };
        let filter = JobFilter::from_query(&query);
        assert_eq!(filter.search_terms, vec!["rust", "backend"]);
        assert!(where_clause(&query).contains(") > 0 OR instr("));
    }

    #[test]
    fn test_salary_bounds_require_numeric_salary() {
        let query = JobQuery {
            min_salary: Some(10),
            ..Default::default()
        };
        let sql = where_clause(&query);
        assert!(sql.contains("salary_lpa IS NOT NULL"));
        assert!(sql.contains("salary_lpa >= ?"));
        assert!(!sql.contains("salary_lpa <= ?"));
    }

    #[test]
    fn test_pagination_defaults_and_bounds() {
        let default = Pagination::from_query(&JobQuery::default(), DEFAULT_PAGE_SIZE);
        assert_eq!(default, Pagination { page: 1, limit: 10 });
        assert_eq!(default.offset(), 0);

        let third = Pagination::from_query(&JobQuery::page(3, 5), DEFAULT_PAGE_SIZE);
        assert_eq!(third.offset(), 10);

        let large = Pagination::from_query(&JobQuery::page(0, 1000), DEFAULT_PAGE_SIZE);
        assert_eq!(large, Pagination { page: 1, limit: 1000 });

        let zero_limit = Pagination::from_query(&JobQuery::page(2, 0), 25);
        assert_eq!(zero_limit.limit, 25);
    }

    #[test]
    fn test_filter_summary_for_logs() {
        let query = JobQuery {
            company: Some("Acme".to_string()),
            max_salary: Some(15),
            ..Default::default()
        };
        assert_eq!(
            JobFilter::from_query(&query).to_string(),
            "active jobs where company~acme, salary<=15"
        );
        assert_eq!(JobFilter::default().to_string(), "active jobs");
    }
}
