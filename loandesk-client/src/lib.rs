//! LoanDesk client core.
//!
//! This crate is the client-side synchronization layer of the LoanDesk
//! helpdesk platform: a typed REST facade over the server plus the state
//! controllers that fetch, cache, reconcile, and periodically refresh
//! conversation, message, and notification state. It has no presentation
//! dependencies; a UI (or the `loandesk` CLI) feeds user intents in and
//! renders the snapshots it exposes.
//!
//! Controllers own their state slice exclusively, never hold a lock across an
//! await point, and tag every fetch with a sequence number so a response that
//! arrives after the selection has moved on is discarded instead of clobbering
//! newer state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod error;
pub mod gateway;
pub mod state;

pub use api::LoanDeskClient;
pub use error::ApiError;
pub use gateway::{MessagesGateway, NotificationsGateway};
pub use state::ActorContext;
