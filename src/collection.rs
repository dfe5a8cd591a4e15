//! The card collection and the operations the UI performs on it.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{normalize_category, Card, CategoryFilter, Rating};
use crate::scheduler::{self, Schedule, ScheduleError};
use crate::storage::{CardStore, StorageError};

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("answer must not be empty")]
    EmptyAnswer,
    #[error("no card with id {0}")]
    NotFound(String),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("failed to save cards: {0}")]
    Storage(#[from] StorageError),
}

/// Owns the in-memory cards and writes a full snapshot to its store after
/// every change.
pub struct Collection {
    cards: Vec<Card>,
    store: Box<dyn CardStore>,
}

impl Collection {
    pub fn open(store: Box<dyn CardStore>) -> Result<Self, StorageError> {
        let cards = store.load()?;
        Ok(Self { cards, store })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Card, CollectionError> {
        self.cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))
    }

    fn persist(&self) -> Result<(), CollectionError> {
        self.store.save(&self.cards).map_err(|e| {
            tracing::warn!(error = %e, "could not persist cards");
            CollectionError::from(e)
        })
    }

    /// Create a card and put it at the front of the collection.
    pub fn add(
        &mut self,
        question: &str,
        answer: &str,
        category: Option<String>,
        today: NaiveDate,
    ) -> Result<String, CollectionError> {
        let (question, answer) = validate_text(question, answer)?;
        let card = Card::new(question, answer, category, today);
        let id = card.id.clone();
        tracing::info!(id = %id, "added card");
        self.cards.insert(0, card);
        self.persist()?;
        Ok(id)
    }

    pub fn edit(
        &mut self,
        id: &str,
        question: &str,
        answer: &str,
        category: Option<String>,
    ) -> Result<(), CollectionError> {
        let (question, answer) = validate_text(question, answer)?;
        let card = self.get_mut(id)?;
        card.question = question;
        card.answer = answer;
        card.category = normalize_category(category);
        tracing::info!(id, "edited card");
        self.persist()
    }

    pub fn delete(&mut self, id: &str) -> Result<(), CollectionError> {
        let index = self
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;
        self.cards.remove(index);
        tracing::info!(id, "deleted card");
        self.persist()
    }

    /// Make a card due today with a one day interval.
    pub fn mark_for_review(&mut self, id: &str, today: NaiveDate) -> Result<(), CollectionError> {
        let card = self.get_mut(id)?;
        card.due_date = today;
        card.interval = 1;
        tracing::info!(id, "marked card for review");
        self.persist()
    }

    pub fn review(&mut self, id: &str, rating: Rating, today: NaiveDate) -> Result<Schedule, CollectionError> {
        let card = self.get_mut(id)?;
        let schedule = scheduler::review_card(card, rating, today)?;
        tracing::debug!(
            id,
            %rating,
            interval = schedule.interval,
            ease = schedule.ease,
            due = %schedule.due_date,
            "reviewed card"
        );
        self.persist()?;
        Ok(schedule)
    }

    /// Distinct categories in the order they first appear.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for category in self.cards.iter().filter_map(|c| c.category.as_ref()) {
            if !categories.contains(category) {
                categories.push(category.clone());
            }
        }
        categories
    }

    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.in_category(filter)).collect()
    }

    pub fn due(&self, filter: &CategoryFilter, today: NaiveDate) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|c| c.in_category(filter) && c.is_due(today))
            .collect()
    }
}

fn validate_text(question: &str, answer: &str) -> Result<(String, String), CollectionError> {
    let question = question.trim();
    let answer = answer.trim();
    if question.is_empty() {
        return Err(CollectionError::EmptyQuestion);
    }
    if answer.is_empty() {
        return Err(CollectionError::EmptyAnswer);
    }
    Ok((question.to_string(), answer.to_string()))
}
