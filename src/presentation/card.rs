// src/presentation/card.rs
use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::presentation::relative_time::format_relative_time;
use crate::provider::{JobKey, JobOrigin, ProviderEntry};

const DESCRIPTION_LINES: usize = 2;
const NEW_BADGE_MINUTES: i64 = 5;

/// Display fields of one job card; `apply_target` identifies the job to apply to
#[derive(Debug, Clone, PartialEq)]
pub struct JobCard {
    pub apply_target: JobKey,
    pub company: String,
    pub logo: String,
    pub position: String,
    pub experience: String,
    pub location_type: String,
    pub salary: String,
    pub posted_label: String,
    pub description_lines: Vec<String>,
    pub is_new: bool,
}

impl JobCard {
    pub fn from_entry(entry: &ProviderEntry, now: DateTime<Utc>) -> Self {
        let job = &entry.job;

        let (posted_label, is_new) = match entry.origin {
            JobOrigin::Api => (
                format_relative_time(job.created_at, now),
                now - job.created_at < Duration::minutes(NEW_BADGE_MINUTES),
            ),
            JobOrigin::Fallback => (job.posted_time.clone(), false),
            JobOrigin::Pending => (job.posted_time.clone(), true),
        };

        Self {
            apply_target: entry.key,
            company: job.company.clone(),
            logo: job.logo.clone(),
            position: job.position.clone(),
            experience: job.experience.clone(),
            location_type: job.location_type.clone(),
            salary: job.salary.clone(),
            posted_label,
            description_lines: description_lines(&job.description),
            is_new,
        }
    }
}

fn description_lines(description: &str) -> Vec<String> {
    description
        .lines()
        .map(|line| line.trim().trim_start_matches('•').trim_start().to_string())
        .filter(|line| !line.is_empty())
        .take(DESCRIPTION_LINES)
        .collect()
}

impl fmt::Display for JobCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} [{}]", self.position, self.company, self.posted_label)?;
        if self.is_new {
            write!(f, " (new)")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "  {} | {} | {}",
            self.experience, self.location_type, self.salary
        )?;
        for line in &self.description_lines {
            writeln!(f, "  • {}", line)?;
        }
        match self.apply_target {
            JobKey::Saved(id) => write!(f, "  Apply: {}", id),
            JobKey::Pending(_) => write!(f, "  Apply: pending"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::sample_jobs;
    use crate::types::{CreateJobRequest, JobId};

    fn api_entry(created_minutes_ago: i64, now: DateTime<Utc>) -> ProviderEntry {
        let mut job = CreateJobRequest::new("Acme", "Engineer")
            .validate()
            .unwrap()
            .into_job(JobId::new(), now - Duration::minutes(created_minutes_ago));
        job.description = "• First line\n• Second line\nThird line".to_string();
        ProviderEntry {
            key: JobKey::Saved(job.id),
            origin: JobOrigin::Api,
            job,
        }
    }

    #[test]
    fn test_api_card_uses_creation_time() {
        let now = Utc::now();
        let card = JobCard::from_entry(&api_entry(3, now), now);

        assert_eq!(card.posted_label, "3 minutes ago");
        assert!(card.is_new);
        assert_eq!(card.description_lines, ["First line", "Second line"]);
        assert_eq!(card.salary, "12LPA");

        let older = JobCard::from_entry(&api_entry(120, now), now);
        assert_eq!(older.posted_label, "2 hours ago");
        assert!(!older.is_new);
    }

    #[test]
    fn test_fallback_card_keeps_stored_label() {
        let job = sample_jobs().remove(0);
        let entry = ProviderEntry {
            key: JobKey::Saved(job.id),
            origin: JobOrigin::Fallback,
            job,
        };
        let card = JobCard::from_entry(&entry, Utc::now());

        assert_eq!(card.posted_label, "24h Ago");
        assert_eq!(card.company, "Amazon");
        assert_eq!(card.description_lines.len(), 2);

        let text = card.to_string();
        assert!(text.starts_with("Full Stack Developer at Amazon [24h Ago]"));
        assert!(text.contains("1-3 yr Exp | Onsite | 12LPA"));
    }
}
