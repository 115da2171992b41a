// src/presentation/mod.rs
//! View-models for the job board screens. Rendering is left to the caller.

pub mod card;
pub mod filters;
pub mod form;
pub mod listing;
pub mod relative_time;

pub use card::JobCard;
pub use filters::{format_salary_bound, DropdownOption, SearchFilters};
pub use form::{CreateJobForm, FormError, SalaryField};
pub use listing::ListingView;
pub use relative_time::format_relative_time;
