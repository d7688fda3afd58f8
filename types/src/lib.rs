use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// ── Message ──────────────────────────────────────────────────────────────

/// One message from the review channel, as the transport hands it over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Fractional epoch seconds. Exports carry this as a string ("1760486400.000200").
    #[serde(deserialize_with = "deserialize_ts")]
    pub ts: f64,
    /// Exports write `null` for attachment-only messages; read as empty.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub text: String,
    /// Author id; absent for bot or system messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Message {
    pub fn new(ts: f64, text: impl Into<String>, user: Option<&str>) -> Self {
        Message {
            ts,
            text: text.into(),
            user: user.map(str::to_string),
        }
    }
}

fn deserialize_ts<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTs {
        Number(f64),
        Text(String),
    }

    match RawTs::deserialize(deserializer)? {
        RawTs::Number(n) => Ok(n),
        RawTs::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Extraction results ───────────────────────────────────────────────────

/// The part of one message attributed to one roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSpan {
    pub name: String,
    pub author: String,
    pub text: String,
    pub ts: f64,
    pub period: u32,
}

/// Spans for one resolved name, bucketed by period number.
///
/// Buckets iterate in ascending period order; spans within a bucket keep
/// the order in which their messages were scanned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub name: String,
    pub periods: BTreeMap<u32, Vec<ExtractedSpan>>,
}

impl ResultSet {
    pub fn new(name: impl Into<String>) -> Self {
        ResultSet {
            name: name.into(),
            periods: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, span: ExtractedSpan) {
        self.periods.entry(span.period).or_default().push(span);
    }

    pub fn is_empty(&self) -> bool {
        self.periods.values().all(Vec::is_empty)
    }

    pub fn span_count(&self) -> usize {
        self.periods.values().map(Vec::len).sum()
    }
}

// ── Display payload ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        TextObject::PlainText { text: text.into() }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        TextObject::Mrkdwn { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            TextObject::PlainText { text } | TextObject::Mrkdwn { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "button")]
pub struct Button {
    pub text: TextObject,
    pub action_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Section { text: TextObject },
    Divider,
    Actions { elements: Vec<Button> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Ephemeral,
    InChannel,
}

/// What the command surface sends back to the chat client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_original: Option<bool>,
}

impl CommandResponse {
    pub fn ephemeral_text(text: impl Into<String>) -> Self {
        CommandResponse {
            text: Some(text.into()),
            response_type: Some(ResponseType::Ephemeral),
            ..Default::default()
        }
    }

    pub fn ephemeral_blocks(blocks: Vec<Block>) -> Self {
        CommandResponse {
            blocks: Some(blocks),
            response_type: Some(ResponseType::Ephemeral),
            ..Default::default()
        }
    }

    pub fn delete_original() -> Self {
        CommandResponse {
            delete_original: Some(true),
            ..Default::default()
        }
    }
}
