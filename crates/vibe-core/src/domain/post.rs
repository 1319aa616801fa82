use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - one mood entry in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// A post that has not been stored yet - no id, no timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostDraft {
    pub text: String,
    pub image_url: Option<String>,
    pub hashtags: Vec<String>,
}

impl Post {
    /// Finalize a draft with a fresh time-ordered id and the given timestamp.
    pub fn from_draft(draft: PostDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            text: draft.text,
            image_url: draft.image_url,
            hashtags: draft.hashtags,
            timestamp,
        }
    }
}

/// Creation time for the next post of a store.
///
/// Millisecond precision, and always strictly after `latest`.
pub fn next_timestamp(now: DateTime<Utc>, latest: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = now.trunc_subsecs(3);
    match latest {
        Some(latest) if now <= latest => latest.trunc_subsecs(3) + Duration::milliseconds(1),
        _ => now,
    }
}

/// Sort newest first. Stable, so equal timestamps keep their stored order.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_millis(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn post(id: &str, ms: i64) -> Post {
        Post {
            id: id.to_string(),
            text: "hello".to_string(),
            image_url: None,
            hashtags: vec![],
            timestamp: at_millis(ms),
        }
    }

    #[test]
    fn test_next_timestamp_uses_now_when_ahead() {
        let now = at_millis(2_000);
        assert_eq!(next_timestamp(now, Some(at_millis(1_000))), now);
        assert_eq!(next_timestamp(now, None), now);
    }

    #[test]
    fn test_next_timestamp_bumps_past_latest() {
        let latest = at_millis(5_000);
        assert_eq!(next_timestamp(at_millis(5_000), Some(latest)), at_millis(5_001));
        assert_eq!(next_timestamp(at_millis(4_000), Some(latest)), at_millis(5_001));
    }

    #[test]
    fn test_next_timestamp_truncates_to_millis() {
        let now = Utc.timestamp_opt(10, 123_456_789).unwrap();
        assert_eq!(next_timestamp(now, None), at_millis(10_123));
    }

    #[test]
    fn test_sort_newest_first_is_stable_for_ties() {
        let mut posts = vec![post("a", 1), post("b", 3), post("c", 3), post("d", 2)];
        sort_newest_first(&mut posts);
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "d", "a"]);
    }

    #[test]
    fn test_serializes_camel_case_and_omits_missing_image() {
        let json = serde_json::to_value(post("1", 1_714_564_800_123)).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00.123Z");
        assert!(json.get("imageUrl").is_none());

        let mut with_image = post("2", 0);
        with_image.image_url = Some("/uploads/1-a.png".into());
        let json = serde_json::to_value(with_image).unwrap();
        assert_eq!(json["imageUrl"], "/uploads/1-a.png");
    }

    #[test]
    fn test_reads_legacy_records() {
        let raw = r#"{"id":"1714564800123","text":"sunny","timestamp":"2024-05-01T12:00:00.123Z"}"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.id, "1714564800123");
        assert!(post.hashtags.is_empty());
        assert_eq!(post.image_url, None);
    }
}
