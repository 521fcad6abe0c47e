//! Application state management.
//!
//! Owns the executive list, the fetch lifecycle, tab selection, and grid
//! selection. Every event has one transition method; methods that need a side
//! effect return a [`Command`] for the fetcher to execute.

use crate::config::Config;
use crate::executives::models::{CURRENT_SESSION, PAST_SESSION};
use crate::executives::{Executive, FetchError};
use crate::fetcher::FetchEvent;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::time::Duration;

/// Session tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Executives of the running session
    Current,
    /// Executives of the previous session
    Past,
}

impl Tab {
    /// Session token sent to the API for this tab.
    pub fn session(self) -> &'static str {
        match self {
            Tab::Current => CURRENT_SESSION,
            Tab::Past => PAST_SESSION,
        }
    }

    /// Year range label shown alongside results.
    pub fn year_range(self) -> &'static str {
        match self {
            Tab::Current => "2023 - 2024",
            Tab::Past => "2022 - 2023",
        }
    }

    /// Tab title.
    pub fn label(self) -> &'static str {
        match self {
            Tab::Current => "Current Executives",
            Tab::Past => "Past Executives",
        }
    }

    /// Whether selecting this tab can change the active tab.
    ///
    /// The current-session tab is inert: only the past session is reachable.
    pub fn is_selectable(self) -> bool {
        matches!(self, Tab::Past)
    }
}

/// What the body of the screen shows.
///
/// Exactly one applies, by priority loading > error > empty > grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Loading,
    Error,
    Empty,
    Grid,
}

/// State of the executives view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Executives from the last successful fetch, in received order
    pub executives: Vec<Executive>,
    /// True while a fetch attempt is outstanding
    pub loading: bool,
    /// Failure of the last settled attempt
    pub error: Option<FetchError>,
    /// Selected session tab
    pub active_tab: Tab,
    /// Label derived from `active_tab`
    pub year_range: &'static str,
}

impl ViewState {
    fn new(active_tab: Tab) -> Self {
        Self {
            executives: Vec::new(),
            loading: true,
            error: None,
            active_tab,
            year_range: active_tab.year_range(),
        }
    }

    /// Decide which view to render.
    pub fn view_kind(&self) -> ViewKind {
        if self.loading {
            ViewKind::Loading
        } else if self.error.is_some() {
            ViewKind::Error
        } else if self.executives.is_empty() {
            ViewKind::Empty
        } else {
            ViewKind::Grid
        }
    }
}

/// Automatic retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt
    pub max_auto_retries: u32,
    /// Delay before each retry
    pub delay: Duration,
}

impl RetryPolicy {
    /// Build the policy from the configured retry count and delay.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_auto_retries: config.max_auto_retries,
            delay: config.retry_delay(),
        }
    }
}

/// One fetch attempt to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Fetch chain this attempt belongs to
    pub generation: u64,
    /// 0 for the first attempt, incremented by each automatic retry
    pub attempt: u32,
    /// Session token to request
    pub session: &'static str,
    /// Wait before starting the attempt
    pub delay: Option<Duration>,
}

/// Side effect requested by the application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a fetch attempt, superseding any attempt in flight
    Fetch(FetchRequest),
    /// Check which of these image URLs load
    ProbeAvatars(Vec<String>),
}

/// Resolution state of an avatar image URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarStatus {
    Pending,
    Loaded,
    Failed,
}

/// Avatar to display on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Avatar<'a> {
    /// Not resolved yet
    Loading,
    /// Image URL to show (the executive's own or the placeholder)
    Image(&'a str),
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Executives view state
    pub state: ViewState,
    /// Generation of the newest fetch chain
    generation: u64,
    /// Automatic retry settings
    retry_policy: RetryPolicy,
    /// Selected card index (in `state.executives`)
    pub selected_index: usize,
    /// Cards per grid row, updated from the rendered width
    pub grid_columns: usize,
    /// Avatar resolution keyed by image URL
    avatars: HashMap<String, AvatarStatus>,
    /// Image shown when an avatar fails to load
    placeholder_image_url: String,
    /// Status message to display
    pub status_message: Option<String>,
    /// Time of the last successful fetch
    pub last_updated: Option<DateTime<Local>>,
}

impl App {
    /// Create a new application state.
    ///
    /// # Arguments
    /// * `retry_policy` - Automatic retry settings
    /// * `placeholder_image_url` - Image shown for avatars that fail to load
    ///
    /// # Returns
    /// * `App` - New application state on the past-session tab, loading
    pub fn new(retry_policy: RetryPolicy, placeholder_image_url: String) -> Self {
        Self {
            state: ViewState::new(Tab::Past),
            generation: 0,
            retry_policy,
            selected_index: 0,
            grid_columns: 1,
            avatars: HashMap::new(),
            placeholder_image_url,
            status_message: None,
            last_updated: None,
        }
    }

    /// Decide which view to render.
    pub fn view_kind(&self) -> ViewKind {
        self.state.view_kind()
    }

    /// Start the first fetch when the view becomes active.
    pub fn mount(&mut self) -> Command {
        self.start_fetch()
    }

    /// Handle a tab selection.
    ///
    /// # Arguments
    /// * `tab` - Tab the user selected
    ///
    /// # Returns
    /// * `Option<Command>` - Fetch for the new session, or None if nothing changed
    ///
    /// # Details
    /// Selecting the active tab or an inert tab is a no-op.
    pub fn select_tab(&mut self, tab: Tab) -> Option<Command> {
        if !tab.is_selectable() || tab == self.state.active_tab {
            tracing::debug!(?tab, "tab selection ignored");
            return None;
        }

        self.state.active_tab = tab;
        self.state.year_range = tab.year_range();
        self.selected_index = 0;
        Some(self.start_fetch())
    }

    /// Handle the error view's retry action.
    ///
    /// Starts a fresh fetch chain (attempt 0) for the active tab.
    pub fn retry(&mut self) -> Command {
        tracing::info!(session = self.state.active_tab.session(), "manual retry");
        self.start_fetch()
    }

    fn start_fetch(&mut self) -> Command {
        self.generation += 1;
        self.state.loading = true;
        self.state.error = None;

        let session = self.state.active_tab.session();
        tracing::info!(generation = self.generation, session, "starting fetch");

        Command::Fetch(FetchRequest {
            generation: self.generation,
            attempt: 0,
            session,
            delay: None,
        })
    }

    fn is_current(&self, generation: u64, attempt: u32) -> bool {
        if generation == self.generation {
            return true;
        }
        tracing::debug!(
            generation,
            attempt,
            current = self.generation,
            "discarding event from superseded fetch"
        );
        false
    }

    /// Mark the start of a fetch attempt.
    ///
    /// # Returns
    /// * `bool` - False if the attempt belongs to a superseded generation
    pub fn begin_attempt(&mut self, generation: u64, attempt: u32) -> bool {
        if !self.is_current(generation, attempt) {
            return false;
        }
        self.state.loading = true;
        self.state.error = None;
        true
    }

    /// Apply the outcome of a fetch attempt.
    ///
    /// # Arguments
    /// * `generation` - Generation the attempt belongs to
    /// * `attempt` - Attempt number within the generation
    /// * `result` - Executives or the classified failure
    ///
    /// # Returns
    /// * `Option<Command>` - Avatar probes after a success, an automatic retry
    ///   after a failure, or None
    ///
    /// # Details
    /// Outcomes from superseded generations are dropped without touching state.
    /// A failure schedules another attempt after the retry delay while
    /// `attempt` is below the retry limit.
    pub fn complete_attempt(
        &mut self,
        generation: u64,
        attempt: u32,
        result: Result<Vec<Executive>, FetchError>,
    ) -> Option<Command> {
        if !self.is_current(generation, attempt) {
            return None;
        }
        self.state.loading = false;

        match result {
            Ok(executives) => {
                tracing::info!(generation, attempt, count = executives.len(), "fetch succeeded");
                self.set_executives(executives);
                self.state.error = None;
                self.last_updated = Some(Local::now());
                self.avatar_probes()
            }
            Err(err) => {
                tracing::warn!(generation, attempt, kind = err.kind(), error = %err, "fetch failed");
                self.state.error = Some(err);

                if attempt < self.retry_policy.max_auto_retries {
                    Some(Command::Fetch(FetchRequest {
                        generation,
                        attempt: attempt + 1,
                        session: self.state.active_tab.session(),
                        delay: Some(self.retry_policy.delay),
                    }))
                } else {
                    None
                }
            }
        }
    }

    /// Record the result of an avatar probe.
    pub fn avatar_probed(&mut self, url: String, loaded: bool) {
        if !loaded {
            tracing::debug!(%url, "avatar failed to load, using placeholder");
        }
        let status = if loaded {
            AvatarStatus::Loaded
        } else {
            AvatarStatus::Failed
        };
        self.avatars.insert(url, status);
    }

    /// Route a fetcher event to its transition.
    pub fn handle_fetch_event(&mut self, event: FetchEvent) -> Option<Command> {
        match event {
            FetchEvent::AttemptStarted {
                generation,
                attempt,
            } => {
                self.begin_attempt(generation, attempt);
                None
            }
            FetchEvent::AttemptFinished {
                generation,
                attempt,
                result,
            } => self.complete_attempt(generation, attempt, result),
            FetchEvent::AvatarProbed { url, loaded } => {
                self.avatar_probed(url, loaded);
                None
            }
        }
    }

    /// Replace the list, keeping the selected executive selected if still present.
    fn set_executives(&mut self, executives: Vec<Executive>) {
        let selected_email = self.selected_executive().map(|e| e.email.clone());
        self.state.executives = executives;
        self.selected_index = selected_email
            .and_then(|email| self.state.executives.iter().position(|e| e.email == email))
            .unwrap_or(0);
    }

    /// Collect image URLs that have not been resolved yet.
    ///
    /// Blank URLs are marked failed immediately.
    fn avatar_probes(&mut self) -> Option<Command> {
        let mut urls = Vec::new();
        for executive in &self.state.executives {
            if self.avatars.contains_key(&executive.image_url) {
                continue;
            }
            if executive.image_url.trim().is_empty() {
                self.avatars
                    .insert(executive.image_url.clone(), AvatarStatus::Failed);
                continue;
            }
            self.avatars
                .insert(executive.image_url.clone(), AvatarStatus::Pending);
            urls.push(executive.image_url.clone());
        }

        if urls.is_empty() {
            None
        } else {
            Some(Command::ProbeAvatars(urls))
        }
    }

    /// Get the avatar to display for an executive.
    pub fn avatar<'a>(&'a self, executive: &'a Executive) -> Avatar<'a> {
        match self.avatars.get(&executive.image_url) {
            Some(AvatarStatus::Loaded) => Avatar::Image(&executive.image_url),
            Some(AvatarStatus::Failed) => Avatar::Image(&self.placeholder_image_url),
            Some(AvatarStatus::Pending) | None => Avatar::Loading,
        }
    }

    /// Get the currently selected executive.
    ///
    /// # Returns
    /// * `Option<&Executive>` - Selected executive or None if the list is empty
    pub fn selected_executive(&self) -> Option<&Executive> {
        self.state.executives.get(self.selected_index)
    }

    /// Select the card at `index` if it exists.
    pub fn select(&mut self, index: usize) {
        if index < self.state.executives.len() {
            self.selected_index = index;
        }
    }

    /// Move selection one card left, wrapping to the last card.
    pub fn move_left(&mut self) {
        let len = self.state.executives.len();
        if len == 0 {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            len - 1
        } else {
            self.selected_index - 1
        };
    }

    /// Move selection one card right, wrapping to the first card.
    pub fn move_right(&mut self) {
        let len = self.state.executives.len();
        if len == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
    }

    /// Move selection one row up; stays put on the first row.
    pub fn move_up(&mut self) {
        let columns = self.grid_columns.max(1);
        if self.selected_index >= columns {
            self.selected_index -= columns;
        }
    }

    /// Move selection one row down; stays put on the last row.
    pub fn move_down(&mut self) {
        let columns = self.grid_columns.max(1);
        if self.selected_index + columns < self.state.executives.len() {
            self.selected_index += columns;
        }
    }

    /// Set status message.
    ///
    /// # Arguments
    /// * `message` - Status message to display
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_executive(email: &str) -> Executive {
        Executive {
            email: email.to_string(),
            name: format!("Name of {}", email),
            position: "Treasurer".to_string(),
            student_id: "170001".to_string(),
            session: PAST_SESSION.to_string(),
            image_url: format!("https://img.example.org/{}.png", email),
            linkedin_url: None,
        }
    }

    fn create_app() -> App {
        App::new(
            RetryPolicy {
                max_auto_retries: 2,
                delay: Duration::from_millis(2_000),
            },
            "https://placeholder.example.org/150".to_string(),
        )
    }

    fn fetch_request(command: Command) -> FetchRequest {
        match command {
            Command::Fetch(request) => request,
            other => panic!("expected fetch command, got {:?}", other),
        }
    }

    #[test]
    fn test_app_new() {
        let app = create_app();
        assert_eq!(app.state.active_tab, Tab::Past);
        assert_eq!(app.state.year_range, "2022 - 2023");
        assert_eq!(app.view_kind(), ViewKind::Loading);
        assert_eq!(app.generation, 0);
    }

    #[test]
    fn test_mount_fetches_past_session() {
        let mut app = create_app();
        let request = fetch_request(app.mount());
        assert_eq!(
            request,
            FetchRequest {
                generation: 1,
                attempt: 0,
                session: "2022-2023",
                delay: None,
            }
        );
        assert!(app.state.loading);
    }

    #[test]
    fn test_view_kind_priority() {
        let mut state = ViewState::new(Tab::Past);
        state.executives = vec![create_test_executive("a@x.org")];
        state.error = Some(FetchError::Timeout);
        assert_eq!(state.view_kind(), ViewKind::Loading);

        state.loading = false;
        assert_eq!(state.view_kind(), ViewKind::Error);

        state.error = None;
        assert_eq!(state.view_kind(), ViewKind::Grid);

        state.executives.clear();
        assert_eq!(state.view_kind(), ViewKind::Empty);
    }

    #[test]
    fn test_tab_change_issues_one_fetch_for_new_session() {
        let mut app = create_app();
        app.mount();
        app.state.active_tab = Tab::Current;
        app.state.year_range = Tab::Current.year_range();

        let request = fetch_request(app.select_tab(Tab::Past).unwrap());
        assert_eq!(request.session, PAST_SESSION);
        assert_eq!(request.attempt, 0);
        assert_eq!(request.generation, 2);
        assert_eq!(app.state.active_tab, Tab::Past);
        assert_eq!(app.state.year_range, "2022 - 2023");
        assert_eq!(app.view_kind(), ViewKind::Loading);
    }

    #[test]
    fn test_select_active_tab_is_noop() {
        let mut app = create_app();
        app.mount();
        assert!(app.select_tab(Tab::Past).is_none());
        assert_eq!(app.generation, 1);
    }

    #[test]
    fn test_current_tab_is_inert() {
        let mut app = create_app();
        app.mount();
        app.complete_attempt(1, 0, Ok(vec![create_test_executive("a@x.org")]));

        assert!(app.select_tab(Tab::Current).is_none());
        assert_eq!(app.state.active_tab, Tab::Past);
        assert_eq!(app.state.year_range, "2022 - 2023");
        assert_eq!(app.view_kind(), ViewKind::Grid);
    }

    #[test]
    fn test_success_replaces_list_in_order() {
        let mut app = create_app();
        app.mount();
        let executives = vec![
            create_test_executive("c@x.org"),
            create_test_executive("a@x.org"),
            create_test_executive("b@x.org"),
        ];
        app.complete_attempt(1, 0, Ok(executives.clone()));

        assert_eq!(app.state.executives, executives);
        assert!(!app.state.loading);
        assert!(app.state.error.is_none());
        assert!(app.last_updated.is_some());
        assert_eq!(app.view_kind(), ViewKind::Grid);
    }

    #[test]
    fn test_empty_success_shows_empty_state() {
        let mut app = create_app();
        app.mount();
        assert!(app.complete_attempt(1, 0, Ok(Vec::new())).is_none());
        assert_eq!(app.view_kind(), ViewKind::Empty);
    }

    #[test]
    fn test_failure_schedules_two_automatic_retries() {
        let mut app = create_app();
        app.mount();

        let retry = fetch_request(app.complete_attempt(1, 0, Err(FetchError::Timeout)).unwrap());
        assert_eq!(retry.attempt, 1);
        assert_eq!(retry.generation, 1);
        assert_eq!(retry.delay, Some(Duration::from_millis(2_000)));
        assert_eq!(app.view_kind(), ViewKind::Error);

        assert!(app.begin_attempt(1, 1));
        assert_eq!(app.view_kind(), ViewKind::Loading);
        assert!(app.state.error.is_none());

        let retry = fetch_request(app.complete_attempt(1, 1, Err(FetchError::Timeout)).unwrap());
        assert_eq!(retry.attempt, 2);

        assert!(app.begin_attempt(1, 2));
        assert!(app.complete_attempt(1, 2, Err(FetchError::Timeout)).is_none());
        assert_eq!(app.view_kind(), ViewKind::Error);
        assert_eq!(app.state.error, Some(FetchError::Timeout));
    }

    #[test]
    fn test_retry_restarts_at_attempt_zero() {
        let mut app = create_app();
        app.mount();
        app.complete_attempt(1, 2, Err(FetchError::UnexpectedShape));

        let request = fetch_request(app.retry());
        assert_eq!(request.attempt, 0);
        assert_eq!(request.session, PAST_SESSION);
        assert_eq!(request.generation, 2);
        assert_eq!(app.view_kind(), ViewKind::Loading);
        assert!(app.state.error.is_none());
    }

    #[test]
    fn test_superseded_generation_is_discarded() {
        let mut app = create_app();
        app.mount();
        app.complete_attempt(1, 0, Err(FetchError::Timeout));
        app.retry();

        // A pending automatic retry of generation 1 settles after the manual retry.
        assert!(!app.begin_attempt(1, 1));
        assert!(app.complete_attempt(1, 1, Err(FetchError::Timeout)).is_none());
        assert!(app.state.loading);
        assert!(app.state.error.is_none());

        app.complete_attempt(2, 0, Ok(vec![create_test_executive("a@x.org")]));
        assert!(app.complete_attempt(1, 2, Ok(Vec::new())).is_none());
        assert_eq!(app.state.executives.len(), 1);
    }

    #[test]
    fn test_avatar_probes_and_placeholder() {
        let mut app = create_app();
        app.mount();
        let mut blank = create_test_executive("blank@x.org");
        blank.image_url = String::new();
        let first = create_test_executive("a@x.org");
        let mut shared = create_test_executive("b@x.org");
        shared.image_url = first.image_url.clone();

        let command = app.complete_attempt(1, 0, Ok(vec![first.clone(), shared, blank.clone()]));
        assert_eq!(
            command,
            Some(Command::ProbeAvatars(vec![first.image_url.clone()]))
        );
        assert_eq!(app.avatar(&first), Avatar::Loading);
        assert_eq!(
            app.avatar(&blank),
            Avatar::Image("https://placeholder.example.org/150")
        );

        app.handle_fetch_event(FetchEvent::AvatarProbed {
            url: first.image_url.clone(),
            loaded: false,
        });
        assert_eq!(
            app.avatar(&first),
            Avatar::Image("https://placeholder.example.org/150")
        );

        app.avatar_probed(first.image_url.clone(), true);
        assert_eq!(app.avatar(&first), Avatar::Image(first.image_url.as_str()));

        // Already resolved URLs are not probed again.
        app.retry();
        assert!(app.complete_attempt(2, 0, Ok(vec![first])).is_none());
    }

    #[test]
    fn test_selection_follows_email_across_refresh() {
        let mut app = create_app();
        app.mount();
        app.complete_attempt(
            1,
            0,
            Ok(vec![
                create_test_executive("a@x.org"),
                create_test_executive("b@x.org"),
            ]),
        );
        app.select(1);

        app.retry();
        app.complete_attempt(
            2,
            0,
            Ok(vec![
                create_test_executive("z@x.org"),
                create_test_executive("y@x.org"),
                create_test_executive("b@x.org"),
            ]),
        );
        assert_eq!(app.selected_executive().unwrap().email, "b@x.org");

        app.retry();
        app.complete_attempt(3, 0, Ok(vec![create_test_executive("q@x.org")]));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_grid_movement() {
        let mut app = create_app();
        app.mount();
        let executives = (0..5)
            .map(|i| create_test_executive(&format!("{}@x.org", i)))
            .collect();
        app.complete_attempt(1, 0, Ok(executives));
        app.grid_columns = 2;

        app.move_down();
        assert_eq!(app.selected_index, 2);
        app.move_down();
        assert_eq!(app.selected_index, 4);
        app.move_down();
        assert_eq!(app.selected_index, 4);
        app.move_up();
        assert_eq!(app.selected_index, 2);
        app.move_right();
        assert_eq!(app.selected_index, 3);
        app.move_right();
        app.move_right();
        assert_eq!(app.selected_index, 0);
        app.move_left();
        assert_eq!(app.selected_index, 4);
        app.select(9);
        assert_eq!(app.selected_index, 4);
    }
}
