// SPDX-License-Identifier: MPL-2.0

//! Paginated, searchable, hierarchical option selection engine.
//!
//! The engine backs a select control whose option set comes from a
//! server-paged listing: the unfiltered baseline accumulates pages as the
//! menu is scrolled, keystrokes are debounced into search fetches, and any
//! nesting in the response is flattened into a level-annotated flat list
//! for display indentation.
//!
//! # Example
//!
//! ```ignore
//! use paged_select::select::{OptionProvider, OptionSource, TreeNode};
//!
//! // Build the provider inside a tokio runtime. `source` is anything
//! // implementing `OptionSource`, e.g. `api::PagedEndpoint`.
//! let mut provider = OptionProvider::new(source, Duration::from_millis(500));
//! provider.on_selection_change(|value| {
//!     // Forward the new value to whatever owns the selection.
//! });
//!
//! // Wire UI events to the provider...
//! provider.search_input("databa");
//! provider.scrolled_to_bottom();
//!
//! // ...and drive completions from your event loop.
//! provider.run_until_idle().await;
//!
//! for opt in provider.visible_options() {
//!     // `opt.level` drives menu indentation.
//! }
//! ```

mod message;
mod option;
mod provider;
mod state;

pub use message::{Effect, Listing, PageMeta, SelectMessage, SourcePage};
pub use option::{OptionValue, SelectOption, TreeNode, flatten};
pub use provider::{OptionProvider, OptionSource};
pub use state::{ListingPhase, ListingState, SelectModel};
