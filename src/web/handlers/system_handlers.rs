// src/web/handlers/system_handlers.rs
use crate::core::Database;
use crate::types::MessageResponse;
use crate::web::error::ApiError;

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn health_handler(db: &State<Database>) -> Result<Json<MessageResponse>, ApiError> {
    db.health_check()
        .await
        .map_err(|e| ApiError::internal("Database unavailable", e))?;

    info!("Health check passed");
    Ok(Json(MessageResponse::success("OK")))
}
