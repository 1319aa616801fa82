//! Feed and post submission handlers.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use chrono::SecondsFormat;
use futures::TryStreamExt;

use vibe_core::domain::{ImageUpload, MAX_IMAGE_BYTES, MAX_TEXT_CHARS, Post, SubmitPost};
use vibe_shared::ApiResponse;
use vibe_shared::dto::{FeedResponse, PostResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Upper bound for plain text form fields, in bytes.
const TEXT_FIELD_LIMIT: usize = 64 * 1024;

// Any UTF-8 prefix of the limit still holds more characters than allowed.
const _: () = assert!(TEXT_FIELD_LIMIT / 4 > MAX_TEXT_CHARS);

pub(crate) fn to_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.clone(),
        text: post.text.clone(),
        image_url: post.image_url.clone(),
        hashtags: post.hashtags.clone(),
        timestamp: post.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> HttpResponse {
    let posts = state.posts.feed().await;

    HttpResponse::Ok().json(FeedResponse {
        posts: posts.iter().map(to_response).collect(),
    })
}

/// POST /api/posts (multipart/form-data: text, hashtags, image)
pub async fn create_post(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let input = read_submission(&mut payload).await?;
    let submitted = state.posts.submit(input).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        to_response(&submitted.post),
        submitted.message,
    )))
}

async fn read_submission(payload: &mut Multipart) -> AppResult<SubmitPost> {
    let mut input = SubmitPost::default();

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" => input.text = read_mood_text(&mut field).await?,
            "hashtags" => input.hashtags = Some(read_text(&mut field).await?),
            "image" => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();
                // One byte past the limit is enough for validation to reject it.
                let bytes = read_capped(&mut field, MAX_IMAGE_BYTES + 1).await?;
                input.image = Some(ImageUpload::new(file_name, bytes));
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown form field");
                read_capped(&mut field, 0).await?;
            }
        }
    }

    Ok(input)
}

/// Read the mood text, keeping at most `TEXT_FIELD_LIMIT` bytes.
///
/// A kept prefix is still far past `MAX_TEXT_CHARS`, so oversized text
/// fails validation on the `text` field like any other long mood.
async fn read_mood_text(field: &mut Field) -> AppResult<String> {
    let mut bytes = read_capped(field, TEXT_FIELD_LIMIT).await?;
    if let Err(e) = std::str::from_utf8(&bytes) {
        // The cut may split the last character; anything else is bad input.
        if e.error_len().is_some() || bytes.len() < TEXT_FIELD_LIMIT {
            return Err(not_utf8());
        }
        bytes.truncate(e.valid_up_to());
    }
    String::from_utf8(bytes).map_err(|_| not_utf8())
}

async fn read_text(field: &mut Field) -> AppResult<String> {
    let bytes = read_capped(field, TEXT_FIELD_LIMIT + 1).await?;
    if bytes.len() > TEXT_FIELD_LIMIT {
        return Err(AppError::BadRequest("Form field is too large".to_string()));
    }
    String::from_utf8(bytes).map_err(|_| not_utf8())
}

fn not_utf8() -> AppError {
    AppError::BadRequest("Form field is not valid UTF-8".to_string())
}

/// Buffer at most `limit` bytes of a field; the rest is read and discarded.
async fn read_capped(field: &mut Field, limit: usize) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        let room = limit.saturating_sub(buf.len());
        buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }
    Ok(buf)
}

fn malformed(err: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed form data: {}", err))
}
