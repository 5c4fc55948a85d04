//! Search session engine: configuration, engine transport, result cache and pagination.

pub mod config;
pub mod clock;
pub mod db_utils;
pub mod api;
pub mod result_cache;
pub mod pagination;
pub mod session;
