//! Hashtag suggestion handler.

use actix_web::{HttpRequest, HttpResponse, web};

use vibe_shared::dto::{SuggestHashtagsRequest, SuggestHashtagsResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/hashtags/suggestions
///
/// Always answers with a (possibly empty) list unless the caller is rate limited.
pub async fn suggest_hashtags(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<SuggestHashtagsRequest>,
) -> AppResult<HttpResponse> {
    if let Some(limiter) = &state.rate_limiter {
        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        match limiter.check(&key).await {
            Ok(result) if !result.allowed => {
                tracing::warn!("Suggestion rate limit exceeded for key: {}", key);
                return Err(AppError::TooManyRequests {
                    retry_after: result.retry_after,
                });
            }
            Ok(_) => {}
            // Fail open
            Err(e) => tracing::error!("Rate limiter error: {}", e),
        }
    }

    let hashtags = state.suggestions.suggest(&body.text).await;

    Ok(HttpResponse::Ok().json(SuggestHashtagsResponse { hashtags }))
}
