//! Data models for flashcards.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scheduler::{ScheduleError, DEFAULT_EASE};

/// How well a card was remembered during review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Again,
    Good,
}

impl Rating {
    pub const ALL: [Rating; 2] = [Rating::Again, Rating::Good];

    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::Again),
            '2' => Some(Self::Good),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Again => "Again",
            Self::Good => "Good",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rating {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "again" | "1" => Ok(Self::Again),
            "good" | "2" => Ok(Self::Good),
            _ => Err(ScheduleError::InvalidRating(s.to_string())),
        }
    }
}

/// A single flashcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    // Scheduling
    pub interval: u32,
    pub ease: f64,
    pub due_date: NaiveDate,
}

impl Card {
    /// A fresh card becomes due the day after it is written.
    pub fn new(question: String, answer: String, category: Option<String>, today: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string()[..8].to_string(),
            question,
            answer,
            category: normalize_category(category),
            interval: 0,
            ease: DEFAULT_EASE,
            due_date: today.checked_add_days(Days::new(1)).unwrap_or(today),
        }
    }

    pub fn is_new(&self) -> bool {
        self.interval == 0
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        crate::scheduler::is_due(self.due_date, today)
    }

    pub fn in_category(&self, filter: &CategoryFilter) -> bool {
        match filter {
            CategoryFilter::All => true,
            CategoryFilter::Category(name) => self.category.as_deref() == Some(name.as_str()),
        }
    }
}

/// Trim a category label, mapping blank input to no category.
pub fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Which cards the list and review views show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All Categories",
            Self::Category(name) => name,
        }
    }

    /// Step to the next filter: All, then each category in order, then back to All.
    pub fn next(&self, categories: &[String]) -> Self {
        let next_index = match self {
            Self::All => 0,
            Self::Category(name) => match categories.iter().position(|c| c == name) {
                Some(i) => i + 1,
                None => categories.len(),
            },
        };
        categories
            .get(next_index)
            .map(|c| Self::Category(c.clone()))
            .unwrap_or(Self::All)
    }
}
