// src/app/mod.rs
//! Application module - host state and the adapter from analysis to visuals.

pub mod headless;
pub mod state;
pub mod throttle;
pub mod uniforms;

pub use headless::run_headless;
pub use state::App;
pub use throttle::FrameThrottle;
pub use uniforms::{Preset, ReactiveUniforms, VisualSettings};
