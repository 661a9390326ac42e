// SPDX-License-Identifier: MPL-2.0

//! Paginated, searchable, hierarchical option selection, fed by a
//! server-paged REST listing.
//!
//! The [`select`] module holds the engine: a pure model with explicit
//! messages and effects, plus a tokio-driven provider that runs the
//! debounce timer and the fetches. The [`api`] module speaks the paged
//! listing wire format and adapts it to the engine's source trait.

pub mod api;
pub mod config;
pub mod helpers;
pub mod select;

pub use api::{ApiError, ListingClient, PagedEndpoint, TaxonomyRecord};
pub use config::Config;
pub use select::{
    Effect, Listing, ListingPhase, OptionProvider, OptionSource, OptionValue, PageMeta,
    SelectMessage, SelectModel, SelectOption, SourcePage, TreeNode, flatten,
};
