//! Flutter-facing bindings for the Assignboard core.

pub mod api;
