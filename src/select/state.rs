// SPDX-License-Identifier: MPL-2.0

//! State management for the paged select engine.

use tracing::{debug, warn};

use super::message::{Effect, Listing, SelectMessage, SourcePage};
use super::option::{OptionValue, SelectOption, TreeNode, flatten};

/// Loading state for one listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingPhase {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// First page fetch in flight.
    Loading,
    /// At least one page loaded; more may be available.
    Loaded,
    /// A follow-up page fetch in flight.
    LoadingMore,
    /// The source reported no further pages.
    Exhausted,
}

impl ListingPhase {
    /// Returns true if a fetch for this listing is in flight.
    pub fn is_fetching(&self) -> bool {
        matches!(self, ListingPhase::Loading | ListingPhase::LoadingMore)
    }
}

/// Paging state for one listing.
#[derive(Debug, Clone)]
pub struct ListingState {
    pub phase: ListingPhase,
    /// Last successfully loaded page; 0 before the first load.
    pub current_page: u32,
    /// Whether another page can be fetched.
    pub has_more: bool,
    /// Sequence number of the latest issued fetch. Responses carrying an
    /// older number are discarded on arrival.
    pub seq: u64,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            phase: ListingPhase::Idle,
            current_page: 0,
            has_more: true,
            seq: 0,
        }
    }
}

impl ListingState {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

/// The select engine's model.
///
/// All state changes flow through [`SelectModel::update`], which returns
/// the effects (fetches, timers, notifications) the caller should carry
/// out. The model itself never performs IO, which keeps every guard and
/// transition unit-testable.
#[derive(Debug, Clone)]
pub struct SelectModel<R> {
    /// Accumulated unfiltered options, in page-arrival order.
    options: Vec<SelectOption<R>>,
    /// Results for the active search term. Never merged into `options`.
    candidates: Vec<SelectOption<R>>,
    baseline: ListingState,
    search: ListingState,
    /// Latest raw search input.
    term: String,
    /// Ticket of the most recent debounce timer; earlier timers that still
    /// fire are ignored.
    debounce_seq: u64,
    selected: Option<OptionValue>,
    disabled: bool,
}

impl<R: TreeNode + Clone> Default for SelectModel<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TreeNode + Clone> SelectModel<R> {
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            candidates: Vec::new(),
            baseline: ListingState::default(),
            search: ListingState::default(),
            term: String::new(),
            debounce_seq: 0,
            selected: None,
            disabled: false,
        }
    }

    /// Kicks off the initial unfiltered load (page 1, empty term).
    ///
    /// A no-op unless the baseline is still idle.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.baseline.phase != ListingPhase::Idle {
            return Vec::new();
        }
        self.baseline.phase = ListingPhase::Loading;
        let seq = self.baseline.next_seq();
        vec![Effect::Load {
            listing: Listing::Baseline,
            seq,
            term: String::new(),
            page: 1,
        }]
    }

    /// Applies one message and returns the effects to carry out.
    pub fn update(&mut self, message: SelectMessage<R>) -> Vec<Effect> {
        match message {
            SelectMessage::SearchInput(term) => self.search_input(term),
            SelectMessage::DebounceElapsed { seq } => self.debounce_elapsed(seq),
            SelectMessage::ScrolledToBottom => self.scrolled_to_bottom(),
            SelectMessage::PageLoaded {
                listing,
                seq,
                page,
                result,
            } => self.page_loaded(listing, seq, page, result),
            SelectMessage::Select(value) => {
                self.selected = Some(value.clone());
                vec![Effect::SelectionChanged(Some(value))]
            }
            SelectMessage::Clear => {
                self.selected = None;
                vec![Effect::SelectionChanged(None)]
            }
            SelectMessage::SetDisabled(disabled) => {
                self.disabled = disabled;
                Vec::new()
            }
        }
    }

    fn search_input(&mut self, term: String) -> Vec<Effect> {
        if self.disabled {
            return Vec::new();
        }
        self.term = term;
        if self.term.trim().is_empty() {
            // Empty term short-circuits to the cached baseline: invalidate
            // any pending timer and in-flight search fetch, no network.
            self.debounce_seq += 1;
            self.search.next_seq();
            self.candidates.clear();
            return Vec::new();
        }
        self.debounce_seq += 1;
        vec![Effect::Debounce {
            seq: self.debounce_seq,
        }]
    }

    fn debounce_elapsed(&mut self, seq: u64) -> Vec<Effect> {
        if seq != self.debounce_seq {
            // A newer keystroke superseded this timer.
            return Vec::new();
        }
        // The control may have been disabled while the timer was pending;
        // only fetches already issued are allowed to finish.
        if self.disabled {
            return Vec::new();
        }
        if self.term.trim().is_empty() {
            return Vec::new();
        }
        self.search.current_page = 0;
        self.search.has_more = true;
        self.search.phase = ListingPhase::Loading;
        let seq = self.search.next_seq();
        vec![Effect::Load {
            listing: Listing::Search,
            seq,
            term: self.term.clone(),
            page: 1,
        }]
    }

    fn scrolled_to_bottom(&mut self) -> Vec<Effect> {
        if self.disabled {
            return Vec::new();
        }
        // The only concurrency-correctness obligation: never issue a second
        // pagination fetch while one is outstanding or pages are exhausted.
        if !self.baseline.has_more || self.baseline.phase.is_fetching() {
            return Vec::new();
        }
        self.baseline.phase = ListingPhase::LoadingMore;
        let seq = self.baseline.next_seq();
        vec![Effect::Load {
            listing: Listing::Baseline,
            seq,
            term: String::new(),
            page: self.baseline.current_page + 1,
        }]
    }

    fn page_loaded(
        &mut self,
        listing: Listing,
        seq: u64,
        page: u32,
        result: Result<SourcePage<R>, String>,
    ) -> Vec<Effect> {
        let state = match listing {
            Listing::Baseline => &self.baseline,
            Listing::Search => &self.search,
        };
        if seq != state.seq {
            debug!(?listing, seq, latest = state.seq, "discarding stale page response");
            return Vec::new();
        }

        match result {
            Ok(source_page) => {
                let flattened = flatten(&source_page.records);
                match listing {
                    Listing::Baseline => {
                        if page <= 1 {
                            self.options = flattened;
                        } else {
                            self.options.extend(flattened);
                        }
                        self.baseline.current_page = page;
                        self.baseline.has_more = source_page.meta.has_more;
                        self.baseline.phase = if source_page.meta.has_more {
                            ListingPhase::Loaded
                        } else {
                            ListingPhase::Exhausted
                        };
                    }
                    Listing::Search => {
                        self.candidates = flattened;
                        self.search.current_page = page;
                        self.search.has_more = source_page.meta.has_more;
                        self.search.phase = if source_page.meta.has_more {
                            ListingPhase::Loaded
                        } else {
                            ListingPhase::Exhausted
                        };
                    }
                }
            }
            Err(error) => {
                warn!(?listing, page, %error, "failed to load options");
                match listing {
                    Listing::Baseline => {
                        // Accumulated options stay as they were; just stop
                        // further pagination attempts.
                        self.baseline.has_more = false;
                        self.baseline.phase = ListingPhase::Exhausted;
                    }
                    Listing::Search => {
                        self.candidates.clear();
                        self.search.has_more = false;
                        self.search.phase = ListingPhase::Loaded;
                    }
                }
            }
        }
        Vec::new()
    }

    /// The accumulated unfiltered options.
    pub fn options(&self) -> &[SelectOption<R>] {
        &self.options
    }

    /// Results for the active search term.
    pub fn candidates(&self) -> &[SelectOption<R>] {
        &self.candidates
    }

    /// The option list the menu should display right now: the search
    /// candidates while a term is entered, the baseline otherwise.
    pub fn visible_options(&self) -> &[SelectOption<R>] {
        if self.term.trim().is_empty() {
            &self.options
        } else {
            &self.candidates
        }
    }

    /// Sets the externally controlled selection without emitting a
    /// selection-changed effect.
    pub fn set_selected(&mut self, value: Option<OptionValue>) {
        self.selected = value;
    }

    pub fn selected_value(&self) -> Option<&OptionValue> {
        self.selected.as_ref()
    }

    /// Resolves the selected value against the accumulated options.
    ///
    /// Scan order is insertion order and the first match wins, so if the
    /// source ever returns duplicate values the earliest-loaded entry is
    /// the one displayed. Returns `None` (display-empty) when the value is
    /// not in the loaded set yet; the value itself is preserved.
    pub fn selected_option(&self) -> Option<&SelectOption<R>> {
        let value = self.selected.as_ref()?;
        self.options.iter().find(|opt| &opt.value == value)
    }

    pub fn is_loading_more(&self) -> bool {
        self.baseline.phase == ListingPhase::LoadingMore
    }

    pub fn has_more(&self) -> bool {
        self.baseline.has_more
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn search_term(&self) -> &str {
        &self.term
    }

    pub fn baseline(&self) -> &ListingState {
        &self.baseline
    }

    pub fn search(&self) -> &ListingState {
        &self.search
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::message::PageMeta;

    #[derive(Debug, Clone)]
    struct Rec {
        id: u32,
        name: String,
        children: Vec<Rec>,
    }

    impl Rec {
        fn leaf(id: u32) -> Self {
            Self {
                id,
                name: format!("record {id}"),
                children: Vec::new(),
            }
        }
    }

    impl TreeNode for Rec {
        fn key(&self) -> OptionValue {
            self.id.to_string()
        }

        fn label(&self) -> &str {
            &self.name
        }

        fn children(&self) -> &[Self] {
            &self.children
        }
    }

    fn page(ids: &[u32], has_more: bool, current_page: u32) -> SourcePage<Rec> {
        SourcePage {
            records: ids.iter().copied().map(Rec::leaf).collect(),
            meta: PageMeta {
                current_page,
                last_page: if has_more { current_page + 1 } else { current_page },
                has_more,
            },
        }
    }

    /// Builds a model with page 1 already loaded.
    fn loaded_model(ids: &[u32], has_more: bool) -> SelectModel<Rec> {
        let mut model = SelectModel::new();
        let effects = model.start();
        let Effect::Load { seq, .. } = effects[0].clone() else {
            panic!("expected a load effect");
        };
        model.update(SelectMessage::PageLoaded {
            listing: Listing::Baseline,
            seq,
            page: 1,
            result: Ok(page(ids, has_more, 1)),
        });
        model
    }

    fn load_effect(effects: &[Effect]) -> (Listing, u64, String, u32) {
        assert_eq!(effects.len(), 1, "expected exactly one effect");
        let Effect::Load {
            listing,
            seq,
            ref term,
            page,
        } = effects[0]
        else {
            panic!("expected a load effect, got {:?}", effects[0]);
        };
        (listing, seq, term.clone(), page)
    }

    #[test]
    fn test_initial_load_replaces_options() {
        let model = loaded_model(&[1, 2, 3], true);
        let values: Vec<&str> = model.options().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["1", "2", "3"]);
        assert_eq!(model.baseline().current_page, 1);
        assert!(model.has_more());
    }

    #[test]
    fn test_empty_search_short_circuits() {
        let mut model = loaded_model(&[1, 2, 3], true);
        let effects = model.update(SelectMessage::SearchInput("".to_string()));
        assert!(effects.is_empty());
        assert_eq!(model.visible_options().len(), 3);
    }

    #[test]
    fn test_debounce_coalesces_keystrokes() {
        let mut model = loaded_model(&[1], true);

        let first = model.update(SelectMessage::SearchInput("a".to_string()));
        let second = model.update(SelectMessage::SearchInput("ab".to_string()));
        let third = model.update(SelectMessage::SearchInput("abc".to_string()));

        let Effect::Debounce { seq: seq1 } = first[0] else {
            panic!("expected debounce");
        };
        let Effect::Debounce { seq: seq2 } = second[0] else {
            panic!("expected debounce");
        };
        let Effect::Debounce { seq: seq3 } = third[0] else {
            panic!("expected debounce");
        };

        // Superseded timers fire into the void.
        assert!(model.update(SelectMessage::DebounceElapsed { seq: seq1 }).is_empty());
        assert!(model.update(SelectMessage::DebounceElapsed { seq: seq2 }).is_empty());

        let effects = model.update(SelectMessage::DebounceElapsed { seq: seq3 });
        let (listing, _, term, page) = load_effect(&effects);
        assert_eq!(listing, Listing::Search);
        assert_eq!(term, "abc");
        assert_eq!(page, 1);
    }

    #[test]
    fn test_pagination_guard_is_idempotent() {
        let mut model = loaded_model(&[1, 2], true);

        let effects = model.update(SelectMessage::ScrolledToBottom);
        let (listing, _, term, page) = load_effect(&effects);
        assert_eq!(listing, Listing::Baseline);
        assert_eq!(term, "");
        assert_eq!(page, 2);
        assert!(model.is_loading_more());

        // Second trigger while the first request is outstanding: no-op.
        assert!(model.update(SelectMessage::ScrolledToBottom).is_empty());
    }

    #[test]
    fn test_pagination_appends_in_order() {
        let mut model = loaded_model(&[1, 2], true);
        let effects = model.update(SelectMessage::ScrolledToBottom);
        let (_, seq, _, page_no) = load_effect(&effects);

        model.update(SelectMessage::PageLoaded {
            listing: Listing::Baseline,
            seq,
            page: page_no,
            result: Ok(page(&[3, 4], false, 2)),
        });

        let values: Vec<&str> = model.options().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["1", "2", "3", "4"]);
        assert_eq!(model.baseline().current_page, 2);
        assert!(!model.is_loading_more());
    }

    #[test]
    fn test_exhaustion_stops_pagination() {
        let mut model = loaded_model(&[1, 2], false);
        assert!(!model.has_more());
        assert!(model.update(SelectMessage::ScrolledToBottom).is_empty());
    }

    #[test]
    fn test_pagination_failure_leaves_options_untouched() {
        let mut model = loaded_model(&[1, 2], true);
        let effects = model.update(SelectMessage::ScrolledToBottom);
        let (_, seq, _, page_no) = load_effect(&effects);

        model.update(SelectMessage::PageLoaded {
            listing: Listing::Baseline,
            seq,
            page: page_no,
            result: Err("connection refused".to_string()),
        });

        assert_eq!(model.options().len(), 2);
        assert!(!model.has_more());
        assert!(model.update(SelectMessage::ScrolledToBottom).is_empty());
    }

    #[test]
    fn test_stale_search_response_is_discarded() {
        let mut model = loaded_model(&[1], true);

        let effects = model.update(SelectMessage::SearchInput("a".to_string()));
        let Effect::Debounce { seq } = effects[0] else {
            panic!("expected debounce");
        };
        let effects = model.update(SelectMessage::DebounceElapsed { seq });
        let (_, stale_seq, _, _) = load_effect(&effects);

        let effects = model.update(SelectMessage::SearchInput("ab".to_string()));
        let Effect::Debounce { seq } = effects[0] else {
            panic!("expected debounce");
        };
        let effects = model.update(SelectMessage::DebounceElapsed { seq });
        let (_, fresh_seq, _, _) = load_effect(&effects);

        // The slower first fetch arrives after the second was issued.
        model.update(SelectMessage::PageLoaded {
            listing: Listing::Search,
            seq: stale_seq,
            page: 1,
            result: Ok(page(&[9], false, 1)),
        });
        assert!(model.candidates().is_empty());

        model.update(SelectMessage::PageLoaded {
            listing: Listing::Search,
            seq: fresh_seq,
            page: 1,
            result: Ok(page(&[5, 6], false, 1)),
        });
        let values: Vec<&str> = model.candidates().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["5", "6"]);
    }

    #[test]
    fn test_search_failure_surfaces_empty_result() {
        let mut model = loaded_model(&[1, 2], true);

        let effects = model.update(SelectMessage::SearchInput("x".to_string()));
        let Effect::Debounce { seq } = effects[0] else {
            panic!("expected debounce");
        };
        let effects = model.update(SelectMessage::DebounceElapsed { seq });
        let (_, seq, _, _) = load_effect(&effects);

        model.update(SelectMessage::PageLoaded {
            listing: Listing::Search,
            seq,
            page: 1,
            result: Err("boom".to_string()),
        });

        assert!(model.candidates().is_empty());
        assert!(!model.search().has_more);
        // The baseline is unaffected.
        assert_eq!(model.options().len(), 2);
    }

    #[test]
    fn test_selection_round_trip() {
        let mut model = loaded_model(&[1, 2, 3], true);

        model.set_selected(Some("2".to_string()));
        assert_eq!(model.selected_option().unwrap().value, "2");

        // A value not in the loaded set displays empty but is preserved.
        model.set_selected(Some("42".to_string()));
        assert!(model.selected_option().is_none());
        assert_eq!(model.selected_value().map(String::as_str), Some("42"));
    }

    #[test]
    fn test_select_and_clear_emit_one_change_each() {
        let mut model = loaded_model(&[1], true);

        let effects = model.update(SelectMessage::Select("1".to_string()));
        assert_eq!(
            effects,
            vec![Effect::SelectionChanged(Some("1".to_string()))]
        );

        let effects = model.update(SelectMessage::Clear);
        assert_eq!(effects, vec![Effect::SelectionChanged(None)]);
        assert!(model.selected_value().is_none());
    }

    #[test]
    fn test_disabled_suppresses_loading_triggers() {
        let mut model = loaded_model(&[1], true);
        model.update(SelectMessage::SetDisabled(true));

        assert!(model.update(SelectMessage::SearchInput("a".to_string())).is_empty());
        assert!(model.update(SelectMessage::ScrolledToBottom).is_empty());
    }

    #[test]
    fn test_disabling_during_debounce_window_stops_the_fetch() {
        let mut model = loaded_model(&[1], true);

        let effects = model.update(SelectMessage::SearchInput("a".to_string()));
        let Effect::Debounce { seq } = effects[0] else {
            panic!("expected debounce");
        };

        // Disabled before the window elapsed: the timer fires into a
        // control that no longer wants a search fetch.
        model.update(SelectMessage::SetDisabled(true));
        assert!(model.update(SelectMessage::DebounceElapsed { seq }).is_empty());
    }

    #[test]
    fn test_duplicate_values_resolve_to_first_loaded() {
        let mut model = loaded_model(&[7, 7], true);
        assert_eq!(model.options().len(), 2);

        model.set_selected(Some("7".to_string()));
        let resolved = model.selected_option().unwrap();
        assert_eq!(resolved.value, "7");
        assert!(std::ptr::eq(resolved, &model.options()[0]));
    }
}
