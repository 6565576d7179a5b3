//! Search header: debounced input, suggestion dropdown, selection and submit.

use std::time::Duration;
use tokio::sync::watch;

use crate::{
    error::{Result, WeatherError},
    geocode::Geocoder,
    model::Place,
    state::SearchState,
};

/// Input side of a [`Debounce`].
pub type InputSender = watch::Sender<String>;

/// Forwards raw input once it has been quiet for `delay`.
#[derive(Debug)]
pub struct Debounce {
    rx: watch::Receiver<String>,
    delay: Duration,
}

impl Debounce {
    pub fn channel(delay: Duration) -> (InputSender, Self) {
        let (tx, rx) = watch::channel(String::new());
        (tx, Self { rx, delay })
    }

    /// Waits for the next settled input and returns it trimmed.
    ///
    /// Every change restarts the timer. Dropping the sender flushes the pending
    /// value; after that, `None`.
    pub async fn next(&mut self) -> Option<String> {
        self.rx.changed().await.ok()?;

        loop {
            match tokio::time::timeout(self.delay, self.rx.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) | Err(_) => break,
            }
        }

        Some(self.rx.borrow_and_update().trim().to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchBox {
    query: String,
    debounced: String,
    choices: Vec<Place>,
    open: bool,
    /// Settled query whose geocoder answer has been applied.
    answered: String,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn debounced_query(&self) -> &str {
        &self.debounced
    }

    pub fn choices(&self) -> &[Place] {
        &self.choices
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the suggestions on hand answer exactly `query` (trimmed).
    pub fn has_answer_for(&self, query: &str) -> bool {
        let query = query.trim();
        !query.is_empty() && self.answered == query
    }

    /// Dropdown labels, in candidate order.
    pub fn labels(&self) -> Vec<String> {
        self.choices
            .iter()
            .map(|p| p.custom_label.clone().unwrap_or_else(|| p.label()))
            .collect()
    }

    /// Raw text changed. Blank input clears the suggestions and closes the dropdown.
    pub fn set_query(&mut self, text: &str) {
        self.query = text.to_string();
        if text.trim().is_empty() {
            self.debounced.clear();
            self.answered.clear();
            self.choices.clear();
            self.open = false;
        }
    }

    /// Records a settled query. Returns whether it is worth sending to the geocoder.
    pub fn settle(&mut self, debounced: &str) -> bool {
        self.debounced = debounced.trim().to_string();
        !self.debounced.is_empty()
    }

    /// Applies a geocoder answer for `query`. Answers for anything but the
    /// current settled query are dropped.
    pub fn apply_suggestions(
        &mut self,
        query: &str,
        outcome: Result<Vec<Place>>,
        state: &mut SearchState,
    ) {
        if query != self.debounced {
            tracing::debug!(query, current = %self.debounced, "dropping stale suggestions");
            return;
        }

        self.answered = self.debounced.clone();
        match outcome {
            Ok(places) => {
                state.clear_error();
                self.open = !places.is_empty();
                self.choices = places;
            }
            Err(err) => {
                tracing::warn!(query, error = %err, "place search failed");
                self.choices.clear();
                self.open = false;
                state.set_error(err.user_message());
            }
        }
    }

    /// Settles `text`, queries the geocoder and applies the answer.
    pub async fn refresh<G: Geocoder + ?Sized>(
        &mut self,
        text: &str,
        geocoder: &G,
        count: u8,
        state: &mut SearchState,
    ) {
        self.set_query(text);
        if !self.settle(text) {
            return;
        }

        state.clear_error();
        let query = self.debounced.clone();
        let outcome = geocoder.search(&query, count).await;
        self.apply_suggestions(&query, outcome, state);
    }

    /// A dropdown entry was picked.
    pub fn select(&mut self, place: Place, state: &mut SearchState) {
        state.clear_error();
        state.set_location(Some(place));
        self.choices.clear();
        self.open = false;
    }

    /// Picks the dropdown entry at `index`, if any.
    pub fn select_index(&mut self, index: usize, state: &mut SearchState) -> bool {
        match self.choices.get(index).cloned() {
            Some(place) => {
                self.select(place, state);
                true
            }
            None => false,
        }
    }

    /// Enter pressed on free text: select the candidate named exactly like
    /// the settled query, or report that nothing matched.
    pub fn submit(&mut self, state: &mut SearchState) -> Result<()> {
        state.clear_error();
        self.open = false;

        let found = self
            .choices
            .iter()
            .find(|choice| choice.name_matches(&self.debounced))
            .cloned();

        match found {
            Some(place) => {
                state.set_location(Some(place));
                Ok(())
            }
            None => {
                let err = WeatherError::PlaceNotFound(self.debounced.clone());
                state.set_error(err.user_message());
                Err(err)
            }
        }
    }
}
