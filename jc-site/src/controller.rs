//! Page controller: the single owner of page state
//!
//! Holds the catalog being shown, the filter state, the active view, the
//! theme and the deck state. Every interaction goes through
//! [`PageController::handle`], which reports whether the views must be
//! re-rendered or only shown/hidden.

use jc_common::filter::{filter_sessions, FilterQuery};
use jc_common::{FilterState, Selection, Session};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::Catalog;
use crate::deck::{focus_transform, CardRect, DeckChange, DeckKey, DeckState, FocusTransform, Viewport};

/// Browser storage key for the theme preference
pub const THEME_STORAGE_KEY: &str = "journal-club-theme";

/// Mutually exclusive presentations of the filtered list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Timeline,
    Deck,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::List, ViewMode::Timeline, ViewMode::Deck];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::List => "list",
            ViewMode::Timeline => "timeline",
            ViewMode::Deck => "deck",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::List => "Cards",
            ViewMode::Timeline => "Timeline",
            ViewMode::Deck => "Deck",
        }
    }

    /// DOM id of the view's container
    pub fn container_id(&self) -> &'static str {
        match self {
            ViewMode::List => "list-view",
            ViewMode::Timeline => "timeline-view",
            ViewMode::Deck => "deck-view",
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" | "cards" => Ok(ViewMode::List),
            "timeline" => Ok(ViewMode::Timeline),
            "deck" | "flip" => Ok(ViewMode::Deck),
            other => Err(format!("unknown view mode: {other}")),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored preference first, then the platform dark-mode preference, then light
    pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Self {
        match stored.map(str::trim) {
            Some("dark") => Theme::Dark,
            Some("light") => Theme::Light,
            _ if prefers_dark => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Interactions the page understands
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    SetYear(Selection<i32>),
    SetMonth(Selection<u32>),
    SetJournal(Selection<String>),
    SetPresenter(Selection<String>),
    SetSubject(Selection<String>),
    Search(String),
    SetView(ViewMode),
    ToggleTheme,
    ActivateCard(usize),
    CardKey(usize, DeckKey),
    DismissFocus,
    Resize { viewport: Viewport, card: CardRect },
}

/// What the page has to do after an event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Filtered list changed: render every view again
    Rerender,
    /// Only the visible container changes
    ToggleVisibility,
    /// Theme attribute changes
    Restyle,
    /// Deck card faces / focus overlay change
    Deck(DeckChange),
    /// Focused card must be repositioned
    Reposition(FocusTransform),
    None,
}

/// Query-string form of the whole page state:
/// `?year=&month=&journal=&presenter=&subject=&q=&view=&theme=&focus=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(flatten)]
    pub filter: FilterQuery,
    pub view: Option<String>,
    pub theme: Option<String>,
    /// Deck card id to open in focus mode
    pub focus: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PageController {
    catalog: Arc<Catalog>,
    filter: FilterState,
    view: ViewMode,
    theme: Theme,
    deck: DeckState,
    /// Catalog ids passing the filter, ascending (catalog order)
    filtered: Vec<usize>,
}

impl PageController {
    pub fn new(catalog: Arc<Catalog>, view: ViewMode, theme: Theme) -> Self {
        let mut controller = Self {
            catalog,
            filter: FilterState::default(),
            view,
            theme,
            deck: DeckState::default(),
            filtered: Vec::new(),
        };
        controller.refilter();
        controller
    }

    /// Rebuild page state from a request query.
    ///
    /// The query is replayed as page events, so a request reaches the same
    /// state as the equivalent interactions would. Unknown view names fall
    /// back to `default_view`; a focus id outside the filtered list is ignored.
    pub fn from_query(catalog: Arc<Catalog>, query: &PageQuery, default_view: ViewMode) -> Self {
        let theme = Theme::resolve(query.theme.as_deref(), false);
        let mut page = Self::new(catalog, default_view, theme);

        let requested = page.catalog.options.reconcile(FilterState::from(&query.filter));
        let mut events = vec![
            PageEvent::SetYear(requested.year),
            PageEvent::SetMonth(requested.month),
            PageEvent::SetJournal(requested.journal),
            PageEvent::SetPresenter(requested.presenter),
            PageEvent::SetSubject(requested.subject),
            PageEvent::Search(requested.search),
        ];
        if let Some(view) = query.view.as_deref().and_then(|view| view.parse().ok()) {
            events.push(PageEvent::SetView(view));
        }
        if let Some(card) = query.focus.as_deref().and_then(|id| id.trim().parse::<usize>().ok()) {
            events.push(PageEvent::ActivateCard(card));
        }

        for event in events {
            let effect = page.handle(event.clone());
            if effect != Effect::None {
                debug!("Query event {:?}: {:?}", event, effect);
            }
        }
        page
    }

    /// Apply a requested filter state, reconciled against the catalog's options
    pub fn with_filter(mut self, filter: FilterState) -> Self {
        self.filter = self.catalog.options.reconcile(filter);
        self.refilter();
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn deck(&self) -> &DeckState {
        &self.deck
    }

    /// Whether a catalog session passes the current filter
    pub fn is_shown(&self, id: usize) -> bool {
        self.filtered.binary_search(&id).is_ok()
    }

    /// Sessions passing the current filter, newest first
    pub fn filtered(&self) -> Vec<&Session> {
        self.filtered
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .collect()
    }

    pub fn handle(&mut self, event: PageEvent) -> Effect {
        match event {
            PageEvent::SetYear(year) => self.update_filter(|f| f.year = year),
            PageEvent::SetMonth(month) => self.update_filter(|f| f.month = month),
            PageEvent::SetJournal(journal) => self.update_filter(|f| f.journal = journal),
            PageEvent::SetPresenter(presenter) => self.update_filter(|f| f.presenter = presenter),
            PageEvent::SetSubject(subject) => self.update_filter(|f| f.subject = subject),
            PageEvent::Search(term) => self.update_filter(|f| f.search = term.trim().to_string()),
            PageEvent::SetView(view) => {
                if view == self.view {
                    return Effect::None;
                }
                self.view = view;
                Effect::ToggleVisibility
            }
            PageEvent::ToggleTheme => {
                self.theme = self.theme.toggled();
                Effect::Restyle
            }
            PageEvent::ActivateCard(card) => {
                if !self.is_shown(card) {
                    return Effect::None;
                }
                Effect::Deck(self.deck.activate(card))
            }
            PageEvent::CardKey(card, key) => {
                if key != DeckKey::Escape && !self.is_shown(card) {
                    return Effect::None;
                }
                Effect::Deck(self.deck.key(card, key))
            }
            PageEvent::DismissFocus => Effect::Deck(self.deck.dismiss()),
            PageEvent::Resize { viewport, card } => match self.deck.focused() {
                Some(_) => Effect::Reposition(focus_transform(viewport, card)),
                None => Effect::None,
            },
        }
    }

    /// Swap in a rebuilt catalog, keeping selections that still exist.
    ///
    /// Card ids are catalog positions, so deck state does not carry over.
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) -> Effect {
        self.catalog = catalog;
        self.deck = DeckState::default();
        self.filter = self.catalog.options.reconcile(std::mem::take(&mut self.filter));
        self.refilter();
        Effect::Rerender
    }

    fn update_filter(&mut self, change: impl FnOnce(&mut FilterState)) -> Effect {
        let mut next = self.filter.clone();
        change(&mut next);
        if next == self.filter {
            return Effect::None;
        }
        self.filter = next;
        self.refilter();
        Effect::Rerender
    }

    fn refilter(&mut self) {
        self.filtered = filter_sessions(&self.catalog.sessions, &self.filter)
            .into_iter()
            .map(|session| session.id)
            .collect();
        let filtered = &self.filtered;
        self.deck.retain(|card| filtered.binary_search(&card).is_ok());
    }
}
