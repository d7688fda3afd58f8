//! Turn a result set into the chat display payload, or into terminal text.

use review_types::{Block, Button, ResultSet, TextObject};

use crate::config::AppConfig;

pub const DISMISS_ACTION_ID: &str = "dismiss_reviews";

/// Wording of the per-period headings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub period_label: String,
    pub period_title: String,
}

impl Presentation {
    pub fn from_config(config: &AppConfig) -> Self {
        Presentation {
            period_label: config.period_label.clone(),
            period_title: config.period_title.clone(),
        }
    }

    /// "Week 2 Coffee Chats"
    pub fn period_heading(&self, number: u32) -> String {
        format!("{} {} {}", self.period_label, number, self.period_title)
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

pub fn header_text(rs: &ResultSet) -> String {
    format!("Found Reviews for {}", rs.name)
}

pub fn dismiss_button() -> Button {
    Button {
        text: TextObject::plain("Dismiss"),
        action_id: DISMISS_ACTION_ID.to_string(),
        style: Some("danger".to_string()),
    }
}

/// Header, then per period: heading with the reviewer list, a divider and
/// one section per span; a spacer between periods; a dismiss button last.
pub fn review_blocks(rs: &ResultSet, presentation: &Presentation) -> Vec<Block> {
    let mut blocks = vec![Block::Header {
        text: TextObject::plain(header_text(rs)),
    }];

    let period_count = rs.periods.len();
    for (i, (number, spans)) in rs.periods.iter().enumerate() {
        let reviewers: Vec<&str> = spans.iter().map(|s| s.author.as_str()).collect();
        blocks.push(Block::Section {
            text: TextObject::mrkdwn(format!(
                "*{}:*\n{}",
                presentation.period_heading(*number),
                reviewers.join(", ")
            )),
        });
        blocks.push(Block::Divider);

        for (j, span) in spans.iter().enumerate() {
            blocks.push(Block::Section {
                text: TextObject::mrkdwn(format!("*{}:*\n{}", span.author, span.text)),
            });
            if j + 1 < spans.len() {
                blocks.push(Block::Divider);
            }
        }

        if i + 1 < period_count {
            blocks.push(Block::Section {
                text: TextObject::mrkdwn(" "),
            });
        }
    }

    blocks.push(Block::Actions {
        elements: vec![dismiss_button()],
    });
    blocks
}

/// Same structure as [`review_blocks`], as plain terminal text.
pub fn plain_text(rs: &ResultSet, presentation: &Presentation) -> String {
    let mut out = header_text(rs);
    out.push('\n');
    for (number, spans) in &rs.periods {
        let reviewers: Vec<&str> = spans.iter().map(|s| s.author.as_str()).collect();
        out.push_str(&format!(
            "\n== {} ==\n{}\n",
            presentation.period_heading(*number),
            reviewers.join(", ")
        ));
        for span in spans {
            out.push_str(&format!("\n-- {} --\n{}\n", span.author, span.text));
        }
    }
    out
}
