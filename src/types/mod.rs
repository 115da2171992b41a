pub mod job;
pub mod response;

pub use job::{
    parse_salary_lpa, CreateJobRequest, FieldError, Job, JobId, JobType, NewJob,
    UpdateJobRequest, ValidationErrors,
};
pub use response::{
    DataResponse, ErrorResponse, JobListResponse, JobTypeStats, MessageResponse,
};
