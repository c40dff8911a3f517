//! flowscope-app - Application state and orchestration for Flowscope
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: the navigation state with its history, the flow list and
//! flow detail controllers, the message/update cycle, and the action
//! executor that spawns retrieval tasks.

pub mod config;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod nav;
pub mod process;
pub mod state;

// Re-export primary types
pub use config::Settings;
pub use handler::{update, UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use nav::{NavParams, NavigationState, TagFilter};
pub use state::{AppState, Focus, InputMode, ListRow, RawFocus, RawTab};
