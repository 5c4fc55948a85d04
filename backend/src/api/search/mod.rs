//! Search transport and the Solr implementation of it.

use common::{search_query::SearchRequest, search_result::SearchResponse};

mod search_for_results;
pub use search_for_results::{SolrTransport, build_select_params, transform_solr_doc};

mod search_facets;
pub use search_facets::{facet_params, parse_facet_fields};

/// Sends one page request to the engine. Failures are reported, not retried.
#[allow(async_fn_in_trait)]
pub trait SearchTransport {
    async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse>;
}
