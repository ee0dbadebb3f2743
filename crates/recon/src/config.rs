use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ReconError;
use crate::similarity::MIN_SCORE;

/// Default forward-looking window for the priority list, today inclusive.
pub const PRIORITY_WINDOW_DAYS: u32 = 14;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    /// Roster export file (`.json` or `.csv`), relative to the config file.
    pub roster: String,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub priority: PriorityConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub website: Option<WebsiteConfig>,
    pub groups: Vec<GroupConfig>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_score: MIN_SCORE,
        }
    }
}

fn default_min_score() -> f64 {
    MIN_SCORE
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriorityConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            window_days: PRIORITY_WINDOW_DAYS,
        }
    }
}

fn default_window_days() -> u32 {
    PRIORITY_WINDOW_DAYS
}

/// The members-only listing every group is checked against.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_listing_label")]
    pub label: String,
    #[serde(default = "default_listing_title")]
    pub title: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            label: default_listing_label(),
            title: default_listing_title(),
        }
    }
}

fn default_listing_label() -> String {
    "members site".into()
}

fn default_listing_title() -> String {
    "Scheduled event".into()
}

/// The public website listing. Optional: without it there are no
/// `External website` slots and no website annotation.
#[derive(Debug, Clone, Deserialize)]
pub struct WebsiteConfig {
    pub file: String,
    #[serde(default = "default_website_label")]
    pub label: String,
    #[serde(default = "default_website_title")]
    pub title: String,
}

fn default_website_label() -> String {
    "public site".into()
}

fn default_website_title() -> String {
    "Public website event".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupConfig {
    /// Name shown in reports; unique across groups.
    pub display: String,
    /// Value of the roster's `name` column for this group (case-insensitive).
    pub roster_name: String,
    /// Members-listing file for this group, relative to the config file.
    pub listing: String,
    #[serde(default)]
    pub url: String,
    /// Group label used on the public website; defaults to `roster_name`.
    #[serde(default)]
    pub website_label: Option<String>,
}

impl GroupConfig {
    pub fn website_label(&self) -> &str {
        self.website_label.as_deref().unwrap_or(&self.roster_name)
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if !(self.matching.min_score > 0.0 && self.matching.min_score <= 1.0) {
            return Err(ReconError::ConfigValidation(format!(
                "min_score must be in (0, 1], got {}",
                self.matching.min_score
            )));
        }

        if self.groups.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least 1 group is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for (i, group) in self.groups.iter().enumerate() {
            if group.display.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "groups[{i}]: display must not be empty"
                )));
            }
            if group.roster_name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "group '{}': roster_name must not be empty",
                    group.display
                )));
            }
            if !seen.insert(group.display.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "duplicate group '{}'",
                    group.display
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
