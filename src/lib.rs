//! Client-side core for the Brainman chat service.
//!
//! The UI layer (out of tree) consumes this crate: the [`store::SessionStore`]
//! for conversation state, [`chat::ChatClient`] for the remote chat API,
//! [`auth`] for the PocketBase-backed account flows, and [`storage`] for the
//! key-value persistence collaborator behind the stores.

pub mod auth;
pub mod chat;
pub mod config;
pub mod history;
pub mod storage;
pub mod store;

pub use history::{ChatMessage, ChatSession, Sender};
pub use store::SessionStore;
