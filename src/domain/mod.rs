//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Domain types and query building
//! - `wire.rs` — Raw serde structs matching backend responses, plus normalisation
//! - `client.rs` — Sub-client issuing requests through a [`Transport`](crate::transport::Transport)

pub mod profile;
