// SPDX-License-Identifier: MPL-2.0

//! Convenience constructors wiring configuration, API client, and select
//! engine together.

use crate::api::{ApiError, ListingClient, PagedEndpoint, TaxonomyRecord};
use crate::config::Config;
use crate::select::OptionProvider;

/// Helper to create a listing client from configuration
pub fn create_client(config: &Config) -> Result<ListingClient, ApiError> {
    ListingClient::new(&config.server_url, &config.auth_token, &config.auth_header_type)
}

/// Builds an option provider for a hierarchical taxonomy listing endpoint
/// (e.g. "/v1/misc/field-taxonomies"). Must be called inside a tokio
/// runtime; the initial unfiltered load is issued immediately.
pub fn taxonomy_provider(
    config: &Config,
    path: &str,
) -> Result<OptionProvider<TaxonomyRecord, PagedEndpoint<TaxonomyRecord>>, ApiError> {
    let client = create_client(config)?;
    let endpoint = PagedEndpoint::new(client, path, config.page_size);
    Ok(OptionProvider::new(endpoint, config.debounce_window()))
}
