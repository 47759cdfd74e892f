// src/ui/widgets/mod.rs
//! Custom widgets for the beatscope UI.

pub mod file_list;
pub mod meter;
pub mod ranges;
pub mod status;

pub use file_list::render_file_list;
pub use meter::BandMeter;
pub use ranges::{render_ranges_panel, RangesView};
pub use status::{render_status, StatusView};
