// SPDX-License-Identifier: MPL-2.0

//! HTTP access to server-paged listing endpoints.

pub mod listing;

pub use listing::{ApiError, ListingClient, PagedEndpoint, TaxonomyRecord};
