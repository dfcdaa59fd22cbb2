//! Thin wrapper over `reqwest` shared by every remote call.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
