//! Low-level search engine access.

pub mod solr_utils;
