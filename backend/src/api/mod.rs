//! Search engine API surface.

pub mod search;
