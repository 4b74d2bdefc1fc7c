//! Native host glue
//!
//! - `input`: crossterm events normalized to `InputEvent`, drained per frame
//! - `terminal`: draw commands rasterized to the terminal
//! - `storage`: data directory and file locations

pub mod input;
pub mod storage;
pub mod terminal;

pub use terminal::TerminalPainter;
