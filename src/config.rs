//! Static configuration: roster, period table, channel and author names.
//!
//! Loaded once at start-up from TOML. Every field has a default, so a file
//! only needs the keys it overrides.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::period::{Period, PeriodTable};
use crate::roster::Roster;

const DEFAULT_CHANNEL: &str = "C09K90ZEWV7";
const DEFAULT_HISTORY_LIMIT: usize = 1000;

const DEFAULT_ROSTER: &[&str] = &[
    "Adrina Khatchikyan", "Aidan Sogorka", "Alexia Barron", "Allyson Bender",
    "Ana Benito", "Aryan Pusuluri", "Asher Laynor", "Audrey Chiang",
    "Blake Wanders", "Brandon Garrity", "Brent Pearson", "Bryanna Jacinto-Vazquez",
    "Calista Clay", "Chelsea Reilly", "Darren Panettiere", "Dina Schoengarth",
    "Donya Adibi", "Elianna Pineda", "Ellen Rieger", "Franky Ruiz",
    "Gary Chavarria", "Grace Hoffman", "Hannah Just Milender", "Jack Dougenis",
    "Jack Martin", "Jaden Chima", "Jena Reilich", "Jeremiah Simmons",
    "Jeswin Ovelil", "Jonathan Park", "Jordanne Arabe", "Kosei van Doorn",
    "Lana den Hartog", "Liam Cringan", "Louis Addeo", "Makena Willis",
    "Nick Rankin", "Olivia Kuhl", "Payton Lourenco", "Raihan Budhwani",
    "Samuel Fausto", "Sanne Smidt", "Sirak Tesfahunegn", "Solly Taub",
    "Sophia Colley", "Tarek Aried", "Zhanna Paredes", "Zyanya Alarcon-Khorram",
];

/// Five consecutive Monday-to-Sunday weeks starting 2025-10-13.
fn default_periods() -> Vec<Period> {
    let first_monday = NaiveDate::from_ymd_opt(2025, 10, 13)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid calendar date");
    (0..5)
        .map(|i| {
            let start = first_monday + Duration::weeks(i);
            Period {
                number: i as u32 + 1,
                start,
                end: start + Duration::weeks(1) - Duration::seconds(1),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Channel the reviews are posted in.
    pub channel: String,
    /// How many recent messages one query scans.
    pub history_limit: usize,
    /// Offset of the period bounds from UTC, in minutes east.
    pub utc_offset_minutes: i32,
    /// "Week" in "Week 2 Coffee Chats".
    pub period_label: String,
    /// "Coffee Chats" in "Week 2 Coffee Chats".
    pub period_title: String,
    pub roster: Vec<String>,
    pub periods: Vec<Period>,
    /// Author id → display name.
    pub authors: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            channel: DEFAULT_CHANNEL.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            utc_offset_minutes: 0,
            period_label: "Week".to_string(),
            period_title: "Coffee Chats".to_string(),
            roster: DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect(),
            periods: default_periods(),
            authors: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.roster()?;
        self.period_table()?;
        Ok(())
    }

    pub fn roster(&self) -> Result<Roster, ConfigError> {
        Roster::new(&self.roster)
    }

    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .ok_or(ConfigError::InvalidOffset(self.utc_offset_minutes))
    }

    pub fn period_table(&self) -> Result<PeriodTable, ConfigError> {
        PeriodTable::new(self.periods.clone(), self.offset()?)
    }
}
