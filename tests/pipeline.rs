use std::collections::BTreeMap;

use review_search::command::ReviewCommand;
use review_search::transport::{JsonMessageLog, StaticAuthorDirectory};
use review_search::types::{Block, Message};
use review_search::{AppConfig, Aggregator, MatchTier, Period, ReviewError};

// 2025-10-14T15:00:00Z
const OCT_14: f64 = 1_760_454_000.0;

fn two_jacks_config() -> AppConfig {
    AppConfig {
        roster: vec!["Jack Martin".into(), "Jack Dougenis".into()],
        authors: BTreeMap::from([("U1".to_string(), "Reviewer One".to_string())]),
        ..AppConfig::default()
    }
}

fn period_containing(config: &AppConfig, ts: f64) -> u32 {
    config.period_table().unwrap().classify(ts).unwrap()
}

#[tokio::test]
async fn test_two_jacks_end_to_end() {
    let config = two_jacks_config();
    let aggregator = Aggregator::from_config(&config).unwrap();

    let resolution = aggregator.resolver().resolve("Jack M").unwrap();
    assert_eq!(resolution.entry.full_name(), "Jack Martin");
    assert_eq!(resolution.tier, MatchTier::Substring);

    let messages = vec![Message::new(
        OCT_14,
        "Date: 10/14\nJack M\nGreat chat!\nJack D\nAlso good.",
        Some("U1"),
    )];
    let authors = StaticAuthorDirectory::new(config.authors.clone());
    let rs = aggregator
        .build_result_set("Jack M", &messages, &authors)
        .await
        .unwrap();

    let week = period_containing(&config, OCT_14);
    assert_eq!(week, 1);
    assert_eq!(rs.name, "Jack Martin");
    assert_eq!(rs.periods.len(), 1);
    let span = &rs.periods[&week][0];
    assert_eq!(span.text, "Date: 10/14\nJack M\nGreat chat!");
    assert_eq!(span.author, "Reviewer One");
    assert_eq!(span.period, week);
}

#[test]
fn test_bare_shared_first_name_pins_first_in_roster() {
    let config = two_jacks_config();
    let aggregator = Aggregator::from_config(&config).unwrap();
    let r = aggregator.resolver().resolve("jack").unwrap();
    // Roster order, not alphabetical.
    assert_eq!(r.entry.full_name(), "Jack Martin");
    assert!(r.tier.is_ambiguous());
}

#[tokio::test]
async fn test_spans_outside_periods_are_dropped() {
    let config = AppConfig {
        periods: vec![Period {
            number: 7,
            start: "2025-10-20T00:00:00".parse().unwrap(),
            end: "2025-10-26T23:59:59".parse().unwrap(),
        }],
        ..two_jacks_config()
    };
    let aggregator = Aggregator::from_config(&config).unwrap();
    let authors = StaticAuthorDirectory::default();
    let messages = vec![
        Message::new(OCT_14, "Jack Martin\nearly", None),
        Message::new(OCT_14 + 7.0 * 86_400.0, "Jack Martin\non time", None),
    ];
    let rs = aggregator
        .build_result_set("Jack Martin", &messages, &authors)
        .await
        .unwrap();
    assert_eq!(rs.periods.keys().copied().collect::<Vec<_>>(), vec![7]);
    assert_eq!(rs.periods[&7][0].text, "Jack Martin\non time");
}

#[tokio::test]
async fn test_command_over_json_export() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_jacks_config();
    std::fs::write(
        dir.path().join(format!("{}.json", config.channel)),
        r#"{"ok": true, "messages": [
            {"ts": "1760454000.000100", "user": "U1", "text": "Date: 10/14\nJack M\nGreat chat!\nJack D\nAlso good."},
            {"ts": "1760454100.000100", "user": "U9", "text": "Jack Dougenis\nquiet but sharp"}
        ]}"#,
    )
    .unwrap();

    let command = ReviewCommand::new(
        &config,
        JsonMessageLog::new(dir.path()),
        StaticAuthorDirectory::new(config.authors.clone()),
    )
    .unwrap();

    let rs = command.run("Jack Dougenis").await.unwrap();
    let spans = &rs.periods[&1];
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].text, "Great chat!\nJack D\nAlso good.");
    assert_eq!(spans[1].author, review_search::UNKNOWN_AUTHOR);

    let resp = command.handle_query("Jack Dougenis").await;
    let blocks = resp.blocks.unwrap();
    assert!(matches!(
        &blocks[1],
        Block::Section { text } if text.text() == "*Week 1 Coffee Chats:*\nReviewer One, Unknown"
    ));
}

#[tokio::test]
async fn test_command_error_kinds() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_jacks_config();
    let command = ReviewCommand::new(
        &config,
        JsonMessageLog::new(dir.path()),
        StaticAuthorDirectory::default(),
    )
    .unwrap();

    assert!(matches!(command.run("").await, Err(ReviewError::EmptyQuery)));
    assert!(matches!(
        command.run("Nobody").await,
        Err(ReviewError::NameNotFound { query }) if query == "Nobody"
    ));
    // No history file for the channel.
    assert!(matches!(
        command.run("Jack").await,
        Err(ReviewError::Transport(_))
    ));
}
