//! Flutter-facing bindings for tagnote core.

pub mod api;
