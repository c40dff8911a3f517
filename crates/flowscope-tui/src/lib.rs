//! flowscope-tui - Terminal UI for Flowscope
//!
//! This crate provides the ratatui-based terminal interface: event polling,
//! the main update/render loop, and the pure view widgets for the flow list
//! and flow detail panes.

pub mod event;
pub mod layout;
pub mod markup;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

// Re-export main entry point
pub use runner::run;
