//! Feed refresh signal as Server-Sent Events.

use std::convert::Infallible;

use actix_web::{HttpResponse, http::header, web};
use futures::{StreamExt, stream};
use tokio::sync::broadcast::error::RecvError;

use vibe_core::ports::FeedEvent;

use super::posts::to_response;
use crate::state::AppState;

/// GET /api/feed/events
pub async fn feed_events(state: web::Data<AppState>) -> HttpResponse {
    let receiver = state.feed.subscribe();
    tracing::debug!(subscribers = state.feed.subscriber_count(), "Feed subscriber connected");

    let hello = stream::once(async {
        Ok::<_, Infallible>(web::Bytes::from_static(b": connected\n\n"))
    });

    let events = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Some(frame) = sse_frame(&event) {
                        return Some((Ok::<_, Infallible>(web::Bytes::from(frame)), receiver));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Feed subscriber lagged behind");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(hello.chain(events))
}

fn sse_frame(event: &FeedEvent) -> Option<String> {
    match serde_json::to_string(&to_response(event.post())) {
        Ok(data) => Some(format!("event: {}\ndata: {}\n\n", event.name(), data)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode feed event");
            None
        }
    }
}
