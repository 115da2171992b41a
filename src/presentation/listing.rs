// src/presentation/listing.rs
use chrono::{DateTime, Utc};

use crate::client::JobsApi;
use crate::presentation::card::JobCard;
use crate::provider::{ClientFilter, JobsProvider};

pub const EMPTY_TITLE: &str = "No jobs found";
pub const EMPTY_HINT: &str = "Try adjusting your search or filter to find what you're looking for.";

/// What the listing grid shows
#[derive(Debug, Clone, PartialEq)]
pub enum ListingView {
    Loading,
    /// A failure with nothing to fall back on
    Error(String),
    Empty,
    /// Cards, with a banner message when they come from a fallback after an error
    Cards {
        cards: Vec<JobCard>,
        notice: Option<String>,
    },
}

impl ListingView {
    pub fn build<A: JobsApi>(
        provider: &JobsProvider<A>,
        filter: &ClientFilter,
        now: DateTime<Utc>,
    ) -> Self {
        if provider.is_loading() {
            return ListingView::Loading;
        }

        let cards: Vec<JobCard> = provider
            .filter(filter)
            .into_iter()
            .map(|entry| JobCard::from_entry(entry, now))
            .collect();

        match (provider.error(), cards.is_empty()) {
            (Some(message), true) => ListingView::Error(message.to_string()),
            (None, true) => ListingView::Empty,
            (notice, false) => ListingView::Cards {
                cards,
                notice: notice.map(str::to_string),
            },
        }
    }

    pub fn cards(&self) -> &[JobCard] {
        match self {
            ListingView::Cards { cards, .. } => cards,
            _ => &[],
        }
    }

    /// Plain-text rendering used by the command line
    pub fn render(&self) -> String {
        match self {
            ListingView::Loading => "Loading jobs...".to_string(),
            ListingView::Error(message) => format!("Error: {}", message),
            ListingView::Empty => format!("{}\n{}", EMPTY_TITLE, EMPTY_HINT),
            ListingView::Cards { cards, notice } => {
                let mut out = String::new();
                if let Some(notice) = notice {
                    out.push_str(&format!("Warning: {}\n\n", notice));
                }
                let rendered: Vec<String> = cards.iter().map(JobCard::to_string).collect();
                out.push_str(&rendered.join("\n\n"));
                out
            }
        }
    }
}
