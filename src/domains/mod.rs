//! Domains module containing business logic organized by bounded contexts.
//!
//! The server exposes a single domain: the tool catalog for the Holded API.

pub mod tools;
