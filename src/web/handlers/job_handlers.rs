// src/web/handlers/job_handlers.rs

use crate::app_log;
use crate::core::{Database, JobFilter, JobQuery, Pagination};
use crate::types::{
    CreateJobRequest, DataResponse, Job, JobId, JobListResponse, JobTypeStats, MessageResponse,
    UpdateJobRequest,
};
use crate::web::error::{ApiError, SERVER_ERROR};
use crate::web::types::{ServerConfig, StatsParams};

use anyhow::Context;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

/// Malformed ids are reported like any other unclassified failure
fn parse_job_id(raw: &str) -> Result<JobId, ApiError> {
    raw.parse::<JobId>()
        .with_context(|| format!("Invalid job id '{}'", raw))
        .map_err(|e| ApiError::internal(SERVER_ERROR, e))
}

pub async fn list_jobs_handler(
    params: JobQuery,
    db: &State<Database>,
    config: &State<ServerConfig>,
) -> Result<Json<JobListResponse>, ApiError> {
    let filter = JobFilter::from_query(&params);
    let page = Pagination::from_query(&params, config.default_page_size);

    app_log!(
        info,
        "Listing {} (page {}, limit {})",
        filter,
        page.page,
        page.limit
    );

    let (jobs, total) = db
        .jobs()
        .list(&filter, page)
        .await
        .map_err(|e| ApiError::internal(SERVER_ERROR, e))?;

    app_log!(info, "Returning {} of {} matching jobs", jobs.len(), total);
    Ok(Json(JobListResponse::new(jobs, total, page.page, page.limit)))
}

pub async fn get_job_handler(
    id: &str,
    db: &State<Database>,
) -> Result<Json<DataResponse<Job>>, ApiError> {
    let id = parse_job_id(id)?;

    match db
        .jobs()
        .get(id)
        .await
        .map_err(|e| ApiError::internal(SERVER_ERROR, e))?
    {
        Some(job) => Ok(Json(DataResponse::success(job))),
        None => {
            app_log!(info, "Job {} not found", id);
            Err(ApiError::job_not_found())
        }
    }
}

pub async fn create_job_handler(
    request: Json<CreateJobRequest>,
    db: &State<Database>,
) -> Result<(Status, Json<DataResponse<Job>>), ApiError> {
    let request = request.into_inner();
    app_log!(
        info,
        "Received job: company={:?} position={:?}",
        request.company,
        request.position
    );

    let new_job = request.validate().map_err(|errors| {
        app_log!(info, "Rejected job: {}", errors);
        ApiError::from(errors)
    })?;

    let job = db
        .jobs()
        .insert(new_job)
        .await
        .map_err(|e| ApiError::from_write(SERVER_ERROR, e))?;

    Ok((Status::Created, Json(DataResponse::success(job))))
}

pub async fn update_job_handler(
    id: &str,
    request: Json<UpdateJobRequest>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Job>>, ApiError> {
    const UPDATE_ERROR: &str = "Error updating job";

    let id = parse_job_id(id)?;
    let jobs = db.jobs();

    let mut job = jobs
        .get(id)
        .await
        .map_err(|e| ApiError::internal(UPDATE_ERROR, e))?
        .ok_or_else(ApiError::job_not_found)?;

    job.apply_update(&request)?;

    if !jobs
        .save(&job)
        .await
        .map_err(|e| ApiError::from_write(UPDATE_ERROR, e))?
    {
        return Err(ApiError::job_not_found());
    }

    app_log!(info, "Updated job {}", id);
    Ok(Json(DataResponse::success(job)))
}

pub async fn delete_job_handler(
    id: &str,
    db: &State<Database>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_job_id(id)?;

    let deleted = db
        .jobs()
        .delete(id)
        .await
        .map_err(|e| ApiError::internal("Error deleting job", e))?;

    if deleted {
        Ok(Json(MessageResponse::success("Job deleted successfully")))
    } else {
        app_log!(info, "Delete requested for unknown job {}", id);
        Err(ApiError::job_not_found())
    }
}

pub async fn job_stats_handler(
    params: StatsParams,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<JobTypeStats>>>, ApiError> {
    let active_only = params.active_only.unwrap_or(false);

    let stats = db
        .jobs()
        .stats(active_only)
        .await
        .map_err(|e| ApiError::internal("Error getting job statistics", e))?;

    app_log!(
        info,
        "Computed stats for {} job types (active only: {})",
        stats.len(),
        active_only
    );
    Ok(Json(DataResponse::success(stats)))
}
