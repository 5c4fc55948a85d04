//! Common library exports shared between the search session and its collaborators.

extern crate serde;


pub mod search_const;
pub mod field_registry;
pub mod query_escape;
pub mod criteria;
pub mod filter_form;
pub mod applied_filters;
pub mod facet_selection;
pub mod search_query;
pub mod search_result;
pub mod page_state;
pub mod session_snapshot;
