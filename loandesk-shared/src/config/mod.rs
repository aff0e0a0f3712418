//! # Configuration
//!
//! Client-side configuration for talking to a LoanDesk server: where it lives,
//! how often to poll, and how chatty to be.

pub mod client;

pub use client::ClientConfig;
