//! Static serving of uploaded images.

use std::io;

use actix_web::{HttpResponse, http::header, web};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /uploads/{file_name}
pub async fn serve_upload(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let file_name = path.into_inner();
    let not_found = || AppError::NotFound(format!("Image {} not found", file_name));

    let file_path = state.images.resolve(&file_name).ok_or_else(not_found)?;

    let bytes = match tokio::fs::read(&file_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => {
            tracing::error!(error = %e, file = %file_name, "Failed to read stored image");
            return Err(AppError::Internal("Failed to read image.".to_string()));
        }
    };

    let mime = mime_guess::from_path(&file_path).first_or_octet_stream();

    // Stored names are unique and never rewritten.
    Ok(HttpResponse::Ok()
        .content_type(mime.to_string())
        .insert_header((header::CACHE_CONTROL, "public, max-age=31536000, immutable"))
        .body(bytes))
}
