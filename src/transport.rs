//! External collaborators: where messages and author names come from.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use review_types::Message;
use serde::Deserialize;

use crate::error::TransportError;

/// Bounded batch of recent channel messages.
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn fetch_recent_messages(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<Message>, TransportError>;
}

/// Author id → human-readable name.
#[async_trait]
pub trait AuthorDirectory: Send + Sync {
    async fn resolve_author_display_name(&self, author_id: &str) -> Result<String, TransportError>;
}

// ── File-backed message log ──────────────────────────────────────────

/// Channel history exported as `<dir>/<channel>.json`.
///
/// The file holds either a bare array of messages or a history export
/// object with a `messages` array.
#[derive(Debug, Clone)]
pub struct JsonMessageLog {
    dir: PathBuf,
}

#[derive(Deserialize)]
struct HistoryExport {
    messages: Vec<Message>,
}

impl JsonMessageLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonMessageLog { dir: dir.into() }
    }

    fn channel_path(&self, channel: &str) -> PathBuf {
        self.dir.join(format!("{channel}.json"))
    }
}

/// Parse a history file body, keeping file order.
///
/// The shape is picked from the first token so a bad message reports its
/// own field and position.
pub fn parse_history(raw: &str) -> Result<Vec<Message>, TransportError> {
    if raw.trim_start().starts_with('[') {
        Ok(serde_json::from_str::<Vec<Message>>(raw)?)
    } else {
        Ok(serde_json::from_str::<HistoryExport>(raw)?.messages)
    }
}

#[async_trait]
impl MessageSource for JsonMessageLog {
    async fn fetch_recent_messages(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<Message>, TransportError> {
        let raw = tokio::fs::read_to_string(self.channel_path(channel)).await?;
        let mut messages = parse_history(&raw)?;
        messages.truncate(limit);
        Ok(messages)
    }
}

// ── Static author directory ──────────────────────────────────────────

/// Author names taken from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthorDirectory {
    names: BTreeMap<String, String>,
}

impl StaticAuthorDirectory {
    pub fn new(names: BTreeMap<String, String>) -> Self {
        StaticAuthorDirectory { names }
    }
}

#[async_trait]
impl AuthorDirectory for StaticAuthorDirectory {
    async fn resolve_author_display_name(&self, author_id: &str) -> Result<String, TransportError> {
        self.names
            .get(author_id)
            .cloned()
            .ok_or_else(|| TransportError::UnknownAuthor(author_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_history_both_shapes() {
        let bare = parse_history(r#"[{"ts":"1.5","text":"a"}]"#).unwrap();
        assert_eq!(bare.len(), 1);
        assert_eq!(bare[0].ts, 1.5);

        let export =
            parse_history(r#"{"ok":true,"messages":[{"ts":"2","text":"b","user":"U1"}]}"#).unwrap();
        assert_eq!(export[0].user.as_deref(), Some("U1"));
    }

    #[test]
    fn test_parse_history_malformed() {
        assert!(matches!(
            parse_history("{\"messages\": 3}"),
            Err(TransportError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_history_reports_offending_field() {
        let err = parse_history(r#"[{"ts":"1","text":"a"},{"ts":"yesterday"}]"#).unwrap_err();
        let TransportError::Parse(e) = err else {
            panic!("expected parse error, got {err:?}");
        };
        assert!(e.to_string().contains("invalid float literal"), "{e}");

        let err = parse_history(r#"{"ok":true}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `messages`"), "{err}");
    }

    #[test]
    fn test_parse_history_null_text_keeps_batch() {
        let messages =
            parse_history(r#"[{"ts":"1","text":null,"user":"U1"},{"ts":"2","text":"b"}]"#).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "");
        assert_eq!(messages[1].text, "b");
    }

    #[tokio::test]
    async fn test_json_log_reads_channel_file_with_limit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("C1.json"),
            r#"[{"ts":"1","text":"a"},{"ts":"2","text":"b"},{"ts":"3","text":"c"}]"#,
        )
        .unwrap();
        let log = JsonMessageLog::new(dir.path());
        let messages = log.fetch_recent_messages("C1", 2).await.unwrap();
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_json_log_missing_channel_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonMessageLog::new(dir.path());
        let err = log.fetch_recent_messages("nope", 10).await.unwrap_err();
        assert!(matches!(err, TransportError::Io(_)));
    }

    #[tokio::test]
    async fn test_static_directory_lookup() {
        let dir = StaticAuthorDirectory::new(BTreeMap::from([(
            "U1".to_string(),
            "Reviewer One".to_string(),
        )]));
        assert_eq!(
            dir.resolve_author_display_name("U1").await.unwrap(),
            "Reviewer One"
        );
        assert!(matches!(
            dir.resolve_author_display_name("U2").await,
            Err(TransportError::UnknownAuthor(id)) if id == "U2"
        ));
    }
}
