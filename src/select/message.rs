// SPDX-License-Identifier: MPL-2.0

//! Messages consumed by the select engine and effects it emits.

use super::option::OptionValue;

/// Identifies which listing a fetch belongs to.
///
/// The unfiltered baseline and the active search results page
/// independently; responses are routed back to the listing that issued
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// The accumulated, unfiltered option set.
    Baseline,
    /// Results for the current search term.
    Search,
}

/// Paging metadata reported by the listing source.
///
/// `has_more` is the authoritative signal for whether another page can be
/// fetched; the page numbers are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub has_more: bool,
}

/// One page of raw records from the listing source.
#[derive(Debug, Clone)]
pub struct SourcePage<R> {
    pub records: Vec<R>,
    pub meta: PageMeta,
}

/// Input events for the select engine.
///
/// User interaction and fetch completions are both delivered as messages;
/// the model's `update` function is the only place state changes.
#[derive(Debug, Clone)]
pub enum SelectMessage<R> {
    /// Raw keystroke in the search box, before debouncing.
    SearchInput(String),
    /// The debounce window elapsed for the given ticket.
    DebounceElapsed { seq: u64 },
    /// The option menu was scrolled to its bottom edge.
    ScrolledToBottom,
    /// A page fetch completed (successfully or not).
    PageLoaded {
        listing: Listing,
        seq: u64,
        page: u32,
        result: Result<SourcePage<R>, String>,
    },
    /// User picked an option.
    Select(OptionValue),
    /// User cleared the selection.
    Clear,
    /// Enable or disable user-initiated loading triggers.
    SetDisabled(bool),
}

/// Work requested by the model in response to a message.
///
/// The model never performs IO or starts timers itself; it describes what
/// should happen and the provider executes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start (or restart) the debounce timer for the latest search input.
    Debounce { seq: u64 },
    /// Fetch one page from the listing source.
    Load {
        listing: Listing,
        seq: u64,
        term: String,
        page: u32,
    },
    /// The selection changed through user action.
    SelectionChanged(Option<OptionValue>),
}
