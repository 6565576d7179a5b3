//! Interactive mode: search header with live suggestions, then a tab picker.

use std::{
    fmt, io,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use crossterm::event;
use inquire::{
    CustomUserError, InquireError, Select, Text,
    autocompletion::{Autocomplete, Replacement},
};
use meteo_core::{
    Debounce, FixedPosition, Geocoder, SearchBox, SearchState, Tab, search::InputSender,
};

use crate::cli::App;

/// Search box and location state as seen by both the prompt and the lookup task.
#[derive(Debug, Default)]
struct Shared {
    search: SearchBox,
    state: SearchState,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// How often the prompt checks for the lookup answer or further typing.
const POLL_STEP: Duration = Duration::from_millis(25);

/// Upper bound on waiting for a geocoder answer beyond the debounce delay.
const LOOKUP_GRACE: Duration = Duration::from_secs(3);

/// Feeds keystrokes to the debouncer and offers the suggestions answering the
/// current input.
///
/// inquire only asks for suggestions when the input changes, so the prompt
/// waits here until the lookup task has answered this exact input. A pending
/// keystroke ends the wait early; the next call covers the new text.
#[derive(Clone)]
struct Suggestions {
    input: Arc<InputSender>,
    shared: Arc<Mutex<Shared>>,
    wait: Duration,
    key_pending: fn(Duration) -> io::Result<bool>,
}

impl Suggestions {
    fn new(input: InputSender, shared: Arc<Mutex<Shared>>, debounce: Duration) -> Self {
        Self {
            input: Arc::new(input),
            shared,
            wait: debounce + LOOKUP_GRACE,
            key_pending: event::poll,
        }
    }

    fn answered(&self, query: &str) -> Option<Vec<String>> {
        let shared = lock(&self.shared);
        if !shared.search.has_answer_for(query) {
            return None;
        }
        Some(if shared.search.is_open() { shared.search.labels() } else { Vec::new() })
    }
}

impl Autocomplete for Suggestions {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        lock(&self.shared).search.set_query(input);
        self.input.send_replace(input.to_string());

        if input.trim().is_empty() {
            return Ok(Vec::new());
        }

        let deadline = Instant::now() + self.wait;
        loop {
            if let Some(labels) = self.answered(input) {
                return Ok(labels);
            }
            if Instant::now() >= deadline || (self.key_pending)(POLL_STEP)? {
                return Ok(Vec::new());
            }
        }
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Show(Tab),
    Search,
    MyPosition,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Show(tab) => write!(f, "{tab}"),
            Action::Search => f.write_str("New search"),
            Action::MyPosition => f.write_str("Use my position"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

fn actions() -> Vec<Action> {
    Tab::all()
        .iter()
        .map(|tab| Action::Show(*tab))
        .chain([Action::Search, Action::MyPosition, Action::Quit])
        .collect()
}

pub async fn run(app: &mut App) -> anyhow::Result<()> {
    // try the configured position first, like a phone would on launch
    let position = FixedPosition::from_settings(&app.config.geolocation);
    let mut next = if app.locate(&position).await {
        Action::Show(Tab::Currently)
    } else {
        app.print_error();
        Action::Search
    };

    loop {
        match next {
            Action::Show(tab) => app.show_tab(tab, true).await,
            Action::Search => {
                if !search(app).await? {
                    return Ok(());
                }
                if app.state.location().is_some() && app.state.error_message().is_none() {
                    app.show_tab(Tab::Currently, true).await;
                } else {
                    app.print_error();
                }
            }
            Action::MyPosition => {
                let position = FixedPosition::from_settings(&app.config.geolocation);
                if app.locate(&position).await {
                    app.show_tab(Tab::Currently, true).await;
                } else {
                    app.print_error();
                }
            }
            Action::Quit => return Ok(()),
        }

        let picked = tokio::task::block_in_place(|| Select::new("Go to:", actions()).prompt());
        next = match picked {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Action::Quit
            }
            Err(e) => return Err(e.into()),
        };
    }
}

/// One round of the search header. Returns `false` when the user backed out.
async fn search(app: &mut App) -> anyhow::Result<bool> {
    let count = app.config.search.result_count;
    let (input, mut debounce) = Debounce::channel(app.config.search.debounce());
    let shared = Arc::new(Mutex::new(Shared {
        search: SearchBox::new(),
        state: app.state.clone(),
    }));

    let lookup = tokio::spawn({
        let shared = Arc::clone(&shared);
        let geocoder = app.geocoder.clone();
        async move {
            while let Some(query) = debounce.next().await {
                if !lock(&shared).search.settle(&query) {
                    continue;
                }
                let outcome = geocoder.search(&query, count).await;
                let mut guard = lock(&shared);
                let Shared { search, state } = &mut *guard;
                search.apply_suggestions(&query, outcome, state);
            }
        }
    });

    let completer = Suggestions::new(input, Arc::clone(&shared), app.config.search.debounce());
    let answer = tokio::task::block_in_place(|| {
        Text::new("Search location:")
            .with_placeholder("Enter a location...")
            .with_help_message("Type to search, ↑↓ to pick a suggestion, Enter to confirm")
            .with_autocomplete(completer)
            .prompt()
    });
    lookup.abort();

    let answer = match answer {
        Ok(answer) => answer,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    let (mut search, state) = {
        let mut guard = lock(&shared);
        (std::mem::take(&mut guard.search), std::mem::take(&mut guard.state))
    };
    app.state = state;

    if let Some(index) = search.labels().iter().position(|label| *label == answer) {
        search.select_index(index, &mut app.state);
        return Ok(true);
    }

    // free text: make sure the candidates belong to exactly this query, then submit
    search.refresh(&answer, &app.geocoder, count, &mut app.state).await;
    if answer.trim().is_empty() || app.state.error_message().is_some() {
        return Ok(true);
    }
    if let Err(err) = search.submit(&mut app.state) {
        tracing::info!(query = %answer.trim(), error = %err, "no exact match");
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_core::Place;

    #[test]
    fn menu_offers_every_tab_then_navigation() {
        let labels: Vec<String> = actions().iter().map(ToString::to_string).collect();
        assert_eq!(
            labels,
            ["Currently", "Today", "Weekly", "New search", "Use my position", "Quit"]
        );
    }

    fn idle(wait: Duration) -> io::Result<bool> {
        std::thread::sleep(wait);
        Ok(false)
    }

    fn typing(_wait: Duration) -> io::Result<bool> {
        Ok(true)
    }

    fn completer(
        shared: &Arc<Mutex<Shared>>,
        wait: Duration,
        key_pending: fn(Duration) -> io::Result<bool>,
    ) -> Suggestions {
        let (input, _debounce) = Debounce::channel(Duration::from_millis(350));
        Suggestions { wait, key_pending, ..Suggestions::new(input, Arc::clone(shared), Duration::ZERO) }
    }

    fn answer(shared: &Mutex<Shared>, query: &str, places: Vec<Place>) {
        let mut guard = lock(shared);
        let Shared { search, state } = &mut *guard;
        search.settle(query);
        search.apply_suggestions(query, Ok(places), state);
    }

    #[test]
    fn completer_clears_suggestions_on_blank_input() {
        let shared = Arc::new(Mutex::new(Shared::default()));
        answer(&shared, "Nice", vec![Place::at(43.7, 7.26).with_label()]);
        let mut completer = completer(&shared, Duration::from_millis(50), idle);

        assert_eq!(completer.get_suggestions("Nice").unwrap().len(), 1);
        assert!(completer.get_suggestions("   ").unwrap().is_empty());
        assert!(!lock(&shared).search.is_open());
    }

    #[test]
    fn completer_waits_for_the_lookup_of_the_current_input() {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let lookup = std::thread::spawn({
            let shared = Arc::clone(&shared);
            move || {
                std::thread::sleep(Duration::from_millis(50));
                answer(&shared, "Paris", vec![Place::at(48.85, 2.35).with_label()]);
            }
        });
        let mut completer = completer(&shared, Duration::from_secs(5), idle);

        let labels = completer.get_suggestions("Paris").unwrap();
        lookup.join().unwrap();

        assert_eq!(labels, ["48.8500, 2.3500"]);
    }

    #[test]
    fn completer_never_shows_the_previous_query_candidates() {
        let shared = Arc::new(Mutex::new(Shared::default()));
        answer(&shared, "Paris", vec![Place::at(48.85, 2.35).with_label()]);

        let mut busy = completer(&shared, Duration::from_secs(5), typing);
        assert!(busy.get_suggestions("Paris!").unwrap().is_empty());

        let mut quiet = completer(&shared, Duration::from_millis(50), idle);
        assert!(quiet.get_suggestions("Paris!").unwrap().is_empty());
        assert_eq!(quiet.get_suggestions("Paris").unwrap().len(), 1);
    }

    #[test]
    fn completion_takes_the_highlighted_suggestion() {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let mut completer = completer(&shared, Duration::ZERO, typing);
        assert_eq!(
            completer.get_completion("Ni", Some("Nice".to_string())).unwrap(),
            Some("Nice".to_string())
        );
    }
}
