use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::Config;
use crate::hotkey::{HotkeyBinding, KeyChord};
use crate::model::{normalize_for_search, SearchFilter};
use crate::navigation::{NavigationTarget, Navigator};
use crate::orchestrator::SearchOrchestrator;
use crate::palette::{footer_hints, Direction, HotkeyAction, PaletteMode, PaletteState};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteEvent {
    Hotkey(KeyChord),
    Escape,
    Up,
    Down,
    Enter,
    QueryChanged(String),
    SearchButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerAction {
    Opened,
    Closed,
    Cleared,
    SearchScheduled,
    ServerSearchStarted,
    SelectionMoved(usize),
    Navigated(NavigationTarget),
    Ignored,
}

/// Drives the palette from keyboard and input events. Must be used from
/// inside a tokio runtime.
pub struct PaletteController {
    orchestrator: Arc<SearchOrchestrator>,
    navigator: Arc<dyn Navigator>,
    binding: HotkeyBinding,
    debounce: Duration,
    palette: PaletteState,
    filters: Option<SearchFilter>,
    active_task: Option<JoinHandle<()>>,
    seen_generation: u64,
}

impl PaletteController {
    pub fn new(orchestrator: Arc<SearchOrchestrator>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            orchestrator,
            navigator,
            binding: HotkeyBinding::default(),
            debounce: DEFAULT_DEBOUNCE,
            palette: PaletteState::default(),
            filters: None,
            active_task: None,
            seen_generation: 0,
        }
    }

    pub fn from_config(
        config: &Config,
        orchestrator: Arc<SearchOrchestrator>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, String> {
        let binding = HotkeyBinding::parse(&config.hotkey)?;
        Ok(Self::new(orchestrator, navigator)
            .with_binding(binding)
            .with_debounce(Duration::from_millis(config.debounce_ms)))
    }

    pub fn with_binding(mut self, binding: HotkeyBinding) -> Self {
        self.binding = binding;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn set_filters(&mut self, filters: Option<SearchFilter>) {
        self.orchestrator
            .store()
            .set_filters(filters.clone().unwrap_or_default());
        self.filters = filters;
    }

    pub fn mode(&self) -> PaletteMode {
        PaletteMode::from_state(&self.orchestrator.store().snapshot())
    }

    pub fn selected_index(&self) -> usize {
        self.palette.selected_index()
    }

    pub fn footer_hints(&self) -> [String; 4] {
        footer_hints(&self.binding)
    }

    pub fn handle(&mut self, event: PaletteEvent) -> ControllerAction {
        match event {
            PaletteEvent::Hotkey(chord) => {
                if !self.binding.matches(&chord) {
                    return ControllerAction::Ignored;
                }
                match self.palette.on_hotkey() {
                    HotkeyAction::Show => {
                        self.orchestrator.store().open();
                        ControllerAction::Opened
                    }
                    HotkeyAction::Hide => {
                        self.close_session();
                        ControllerAction::Closed
                    }
                }
            }
            PaletteEvent::Escape => {
                if self.palette.on_escape() {
                    self.close_session();
                    ControllerAction::Closed
                } else {
                    ControllerAction::Ignored
                }
            }
            PaletteEvent::Up => self.move_selection(Direction::Up),
            PaletteEvent::Down => self.move_selection(Direction::Down),
            PaletteEvent::Enter => self.activate_selection(),
            PaletteEvent::QueryChanged(query) => self.on_query_changed(query),
            PaletteEvent::SearchButton => self.force_server_search(),
        }
    }

    fn on_query_changed(&mut self, query: String) -> ControllerAction {
        if !self.palette.is_visible() {
            return ControllerAction::Ignored;
        }

        self.cancel_active_task();
        self.palette.reset_selection();
        let store = self.orchestrator.store();
        store.set_query(&query);

        if normalize_for_search(&query).is_empty() {
            store.clear_results();
            return ControllerAction::Cleared;
        }

        let orchestrator = Arc::clone(&self.orchestrator);
        let filters = self.filters.clone();
        let delay = self.debounce;
        self.active_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            orchestrator.perform_search(&query, filters.as_ref()).await;
        }));
        ControllerAction::SearchScheduled
    }

    fn force_server_search(&mut self) -> ControllerAction {
        if !self.palette.is_visible() {
            return ControllerAction::Ignored;
        }
        let query = self.orchestrator.store().snapshot().query;
        if normalize_for_search(&query).is_empty() {
            return ControllerAction::Ignored;
        }

        self.cancel_active_task();
        self.palette.reset_selection();
        let orchestrator = Arc::clone(&self.orchestrator);
        let filters = self.filters.clone();
        self.active_task = Some(tokio::spawn(async move {
            orchestrator
                .force_server_search(&query, filters.as_ref())
                .await;
        }));
        ControllerAction::ServerSearchStarted
    }

    fn move_selection(&mut self, direction: Direction) -> ControllerAction {
        let state = self.orchestrator.store().snapshot();
        self.sync_selection(state.results_generation);
        let len = state.results.len();
        if !self.palette.is_visible() || len == 0 {
            return ControllerAction::Ignored;
        }
        ControllerAction::SelectionMoved(self.palette.move_selection(direction, len))
    }

    fn activate_selection(&mut self) -> ControllerAction {
        if !self.palette.is_visible() {
            return ControllerAction::Ignored;
        }
        let state = self.orchestrator.store().snapshot();
        self.sync_selection(state.results_generation);
        let results = state.results;
        if results.is_empty() {
            return ControllerAction::Ignored;
        }

        let index = self.palette.selected_index().min(results.len() - 1);
        let target = NavigationTarget::for_result(&results[index]);
        tracing::info!(route = %target.route, "palette navigation");
        self.navigator.navigate(&target);

        self.palette.on_escape();
        self.close_session();
        ControllerAction::Navigated(target)
    }

    fn sync_selection(&mut self, generation: u64) {
        if generation != self.seen_generation {
            self.seen_generation = generation;
            self.palette.reset_selection();
        }
    }

    fn cancel_active_task(&mut self) {
        if let Some(task) = self.active_task.take() {
            task.abort();
            self.orchestrator.cancel();
        }
    }

    fn close_session(&mut self) {
        self.cancel_active_task();
        self.orchestrator.cancel();
        self.orchestrator.store().close();
    }
}

impl Drop for PaletteController {
    fn drop(&mut self) {
        if let Some(task) = self.active_task.take() {
            task.abort();
        }
    }
}
