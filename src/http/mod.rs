//! HTTP client layer — `IntersightHttp`, the signed transport.

pub mod client;

pub use client::{interpret, IntersightHttp, PreparedRequest};
