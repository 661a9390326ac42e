// SPDX-License-Identifier: MPL-2.0

//! Tokio-driven runtime for the select engine.
//!
//! [`OptionProvider`] owns a [`SelectModel`] and a listing source, and
//! carries out the effects the model requests: debounce timers become
//! sleeping tasks, load effects become fetch tasks, and every completion is
//! fed back through [`SelectModel::update`]. All outstanding tasks live in
//! a [`JoinSet`] owned by the provider, so dropping the provider aborts the
//! timer and any in-flight feedback with it.

use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::task::{AbortHandle, JoinSet};

use super::message::{Effect, SelectMessage, SourcePage};
use super::option::{OptionValue, SelectOption, TreeNode};
use super::state::SelectModel;

/// A paged listing the engine can fetch options from.
///
/// An empty `term` requests the unfiltered listing. Implementations must be
/// safe to call concurrently with different arguments; the engine does not
/// serialize distinct term/page combinations against each other. The
/// returned future must not borrow from the source, so implementations
/// typically clone a cheap handle (such as a `reqwest::Client`) into it.
pub trait OptionSource<R>: Send + Sync {
    fn load(&self, term: &str, page: u32) -> BoxFuture<'static, Result<SourcePage<R>, String>>;
}

/// Drives a [`SelectModel`] against an [`OptionSource`].
///
/// Must be created inside a tokio runtime. User interaction arrives through
/// the synchronous methods (`search_input`, `scrolled_to_bottom`, ...);
/// [`OptionProvider::step`] or [`OptionProvider::run_until_idle`] applies
/// the completions of the work those triggered.
pub struct OptionProvider<R, S> {
    model: SelectModel<R>,
    source: S,
    debounce_window: Duration,
    tasks: JoinSet<SelectMessage<R>>,
    /// Handle of the pending debounce timer; replaced (and the old timer
    /// aborted) on every keystroke.
    debounce: Option<AbortHandle>,
    on_change: Option<Box<dyn FnMut(Option<OptionValue>) + Send>>,
}

impl<R, S> OptionProvider<R, S>
where
    R: TreeNode + Clone + Send + 'static,
    S: OptionSource<R>,
{
    /// Creates the provider and issues the initial unfiltered page-1 load.
    pub fn new(source: S, debounce_window: Duration) -> Self {
        let mut provider = Self {
            model: SelectModel::new(),
            source,
            debounce_window,
            tasks: JoinSet::new(),
            debounce: None,
            on_change: None,
        };
        let effects = provider.model.start();
        provider.run_effects(effects);
        provider
    }

    /// Registers a listener invoked once per user selection or clear.
    pub fn on_selection_change(&mut self, listener: impl FnMut(Option<OptionValue>) + Send + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    /// Raw keystroke in the search box.
    pub fn search_input(&mut self, term: impl Into<String>) {
        self.dispatch(SelectMessage::SearchInput(term.into()));
    }

    /// The option menu was scrolled to its bottom edge.
    pub fn scrolled_to_bottom(&mut self) {
        self.dispatch(SelectMessage::ScrolledToBottom);
    }

    /// User picked an option.
    pub fn select(&mut self, value: impl Into<OptionValue>) {
        self.dispatch(SelectMessage::Select(value.into()));
    }

    /// User cleared the selection.
    pub fn clear(&mut self) {
        self.dispatch(SelectMessage::Clear);
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.dispatch(SelectMessage::SetDisabled(disabled));
    }

    /// Sets the externally controlled selection (no listener invocation).
    pub fn set_selected(&mut self, value: Option<OptionValue>) {
        self.model.set_selected(value);
    }

    pub fn model(&self) -> &SelectModel<R> {
        &self.model
    }

    /// The option list the menu should display right now.
    pub fn visible_options(&self) -> &[SelectOption<R>] {
        self.model.visible_options()
    }

    /// The selected value resolved against the accumulated options.
    pub fn selected_option(&self) -> Option<&SelectOption<R>> {
        self.model.selected_option()
    }

    fn dispatch(&mut self, message: SelectMessage<R>) {
        let effects = self.model.update(message);
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Debounce { seq } => {
                    if let Some(handle) = self.debounce.take() {
                        handle.abort();
                    }
                    let window = self.debounce_window;
                    let handle = self.tasks.spawn(async move {
                        tokio::time::sleep(window).await;
                        SelectMessage::DebounceElapsed { seq }
                    });
                    self.debounce = Some(handle);
                }
                Effect::Load {
                    listing,
                    seq,
                    term,
                    page,
                } => {
                    let fut = self.source.load(&term, page);
                    self.tasks.spawn(async move {
                        let result = fut.await;
                        SelectMessage::PageLoaded {
                            listing,
                            seq,
                            page,
                            result,
                        }
                    });
                }
                Effect::SelectionChanged(value) => {
                    if let Some(listener) = self.on_change.as_mut() {
                        listener(value);
                    }
                }
            }
        }
    }

    /// Waits for the next outstanding timer or fetch and applies it.
    ///
    /// Returns false when nothing is outstanding. Aborted debounce timers
    /// surface here as cancelled joins and are skipped.
    pub async fn step(&mut self) -> bool {
        match self.tasks.join_next().await {
            Some(Ok(message)) => {
                self.dispatch(message);
                true
            }
            Some(Err(_)) => true,
            None => false,
        }
    }

    /// Drives outstanding work, including work scheduled by completions,
    /// until the provider is quiescent.
    pub async fn run_until_idle(&mut self) {
        while self.step().await {}
    }
}
