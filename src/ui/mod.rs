// src/ui/mod.rs
//! UI module - terminal rendering and input.

pub mod icons;
pub mod keybindings;
pub mod layout;
pub mod tui;
pub mod widgets;

pub use tui::{frame_interval, run};
