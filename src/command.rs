//! The `/review <name>` command and its dismiss action.

use review_types::{CommandResponse, ResultSet};
use tracing::{error, info};

use crate::aggregate::Aggregator;
use crate::config::AppConfig;
use crate::error::{ConfigError, Result, ReviewError};
use crate::render::{DISMISS_ACTION_ID, Presentation, review_blocks};
use crate::transport::{AuthorDirectory, MessageSource};

pub const USAGE: &str = "Please provide a pledge name. Usage: `/review Sophia` or `/review Jack M`";
pub const TRANSPORT_APOLOGY: &str =
    "Sorry, there was an error searching for reviews. Please try again.";

/// One configured review command. Holds no per-request state; each query
/// builds and discards its own result set.
pub struct ReviewCommand<S, A> {
    aggregator: Aggregator,
    presentation: Presentation,
    channel: String,
    history_limit: usize,
    source: S,
    authors: A,
}

impl<S: MessageSource, A: AuthorDirectory> ReviewCommand<S, A> {
    pub fn new(
        config: &AppConfig,
        source: S,
        authors: A,
    ) -> std::result::Result<Self, ConfigError> {
        Ok(ReviewCommand {
            aggregator: Aggregator::from_config(config)?,
            presentation: Presentation::from_config(config),
            channel: config.channel.clone(),
            history_limit: config.history_limit,
            source,
            authors,
        })
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Run a query through the pipeline. Every non-result outcome comes back
    /// as a [`ReviewError`]; an empty result set becomes `NoReviewsFound`.
    pub async fn run(&self, query: &str) -> Result<ResultSet> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ReviewError::EmptyQuery);
        }

        // Resolve before fetching so an unknown name costs no transport call.
        let resolution = self.aggregator.resolver().resolve_or_err(query)?;
        let name = resolution.entry;
        if resolution.tier.is_ambiguous() {
            info!(
                query,
                name = name.full_name(),
                tier = ?resolution.tier,
                "ambiguous query resolved"
            );
        }

        let messages = self
            .source
            .fetch_recent_messages(&self.channel, self.history_limit)
            .await?;

        let rs = self.aggregator.aggregate(name, &messages, &self.authors).await;
        if rs.is_empty() {
            return Err(ReviewError::NoReviewsFound {
                name: name.full_name().to_string(),
            });
        }
        Ok(rs)
    }

    /// Run a query and render whatever happened as a user-facing response.
    pub async fn handle_query(&self, query: &str) -> CommandResponse {
        let outcome = self.run(query).await;
        match &outcome {
            Ok(rs) => info!(query, name = %rs.name, spans = rs.span_count(), "reviews found"),
            Err(ReviewError::Transport(err)) => {
                error!(query, error = %err, "fetching reviews failed")
            }
            Err(err) => info!(query, outcome = %err, "no reviews to show"),
        }
        respond(outcome, &self.presentation)
    }

    /// Button clicks on a displayed payload. Only dismiss is known.
    pub fn handle_action(&self, action_id: &str) -> Option<CommandResponse> {
        (action_id == DISMISS_ACTION_ID).then(CommandResponse::delete_original)
    }
}

/// User-facing response for a pipeline outcome. All responses are ephemeral.
pub fn respond(outcome: Result<ResultSet>, presentation: &Presentation) -> CommandResponse {
    match outcome {
        Ok(rs) => CommandResponse::ephemeral_blocks(review_blocks(&rs, presentation)),
        Err(ReviewError::EmptyQuery) => CommandResponse::ephemeral_text(USAGE),
        Err(ReviewError::NameNotFound { query }) => CommandResponse::ephemeral_text(format!(
            "Could not find pledge matching \"{query}\". Try using their first name or full name."
        )),
        Err(ReviewError::NoReviewsFound { name }) => {
            CommandResponse::ephemeral_text(format!("No reviews found for {name}"))
        }
        Err(ReviewError::Transport(_) | ReviewError::Config(_)) => {
            CommandResponse::ephemeral_text(TRANSPORT_APOLOGY)
        }
    }
}
