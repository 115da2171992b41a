// src/web/mod.rs

pub mod error;
pub mod handlers;
pub mod types;

pub use error::ApiError;
pub use types::*;

use crate::core::{Database, JobQuery};
use crate::environment::EnvironmentConfig;
use crate::types::{
    CreateJobRequest, DataResponse, ErrorResponse, Job, JobListResponse, JobTypeStats,
    MessageResponse, UpdateJobRequest,
};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{
    catchers, delete, get, options, patch, post, put, routes, Build, Data, Request, Response,
    Rocket, State,
};
use tracing::{error, info};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, PATCH, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

/// One log line per request and per response
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request logging",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _data: &mut Data<'_>) {
        info!("{} {}", request.method(), request.uri());
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        info!(
            "{} {} -> {}",
            request.method(),
            request.uri(),
            response.status()
        );
    }
}

// Job routes

#[get("/jobs?<params..>")]
pub async fn list_jobs(
    params: JobQuery,
    db: &State<Database>,
    config: &State<ServerConfig>,
) -> Result<Json<JobListResponse>, ApiError> {
    handlers::list_jobs_handler(params, db, config).await
}

#[get("/jobs/stats?<params..>")]
pub async fn job_stats(
    params: StatsParams,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<JobTypeStats>>>, ApiError> {
    handlers::job_stats_handler(params, db).await
}

#[get("/jobs/<id>")]
pub async fn get_job(
    id: &str,
    db: &State<Database>,
) -> Result<Json<DataResponse<Job>>, ApiError> {
    handlers::get_job_handler(id, db).await
}

#[post("/jobs", data = "<request>")]
pub async fn create_job(
    request: Json<CreateJobRequest>,
    db: &State<Database>,
) -> Result<(Status, Json<DataResponse<Job>>), ApiError> {
    handlers::create_job_handler(request, db).await
}

#[put("/jobs/<id>", data = "<request>")]
pub async fn update_job(
    id: &str,
    request: Json<UpdateJobRequest>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Job>>, ApiError> {
    handlers::update_job_handler(id, request, db).await
}

#[patch("/jobs/<id>", data = "<request>")]
pub async fn patch_job(
    id: &str,
    request: Json<UpdateJobRequest>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Job>>, ApiError> {
    handlers::update_job_handler(id, request, db).await
}

#[delete("/jobs/<id>")]
pub async fn delete_job(
    id: &str,
    db: &State<Database>,
) -> Result<Json<MessageResponse>, ApiError> {
    handlers::delete_job_handler(id, db).await
}

#[get("/health")]
pub async fn health(db: &State<Database>) -> Result<Json<MessageResponse>, ApiError> {
    handlers::health_handler(db).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Invalid request format"))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Resource not found"))
}

#[rocket::catch(422)]
pub fn unprocessable_entity() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Invalid request body"))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(error::SERVER_ERROR))
}

/// Assemble the API without launching it
pub fn build_rocket(db: Database, config: ServerConfig) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.address.clone()))
        .merge(("port", config.port))
        .merge(("log_level", "critical"));

    rocket::custom(figment)
        .attach(Cors)
        .attach(RequestLogger)
        .manage(db)
        .manage(config)
        .register(
            "/",
            catchers![bad_request, not_found, unprocessable_entity, internal_error],
        )
        .mount(
            "/api",
            routes![
                list_jobs,
                job_stats,
                get_job,
                create_job,
                update_job,
                patch_job,
                delete_job,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(environment: EnvironmentConfig) -> Result<()> {
    let db = match Database::new(&environment.database_path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to initialize database: {:#}", e);
            return Err(e);
        }
    };

    let server_config = ServerConfig::from_environment(&environment);

    info!("Starting job board API server ({:?})", server_config.mode);
    info!("Database: {}", environment.database_path.display());
    info!(
        "Listening on {}:{}",
        server_config.address, server_config.port
    );

    if let Err(e) = build_rocket(db, server_config).launch().await {
        error!("Server stopped with error: {}", e);
        anyhow::bail!("Server stopped with error: {}", e);
    }

    Ok(())
}
