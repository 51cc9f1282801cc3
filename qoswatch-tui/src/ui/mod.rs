//! Terminal rendering.
//!
//! One submodule per view plus shared chrome:
//!
//! - [`common`]: header bar, tab bar, status bar, help overlay
//! - [`overview`]: the four per-scheduler metric charts
//! - [`traffic`]: traffic-type catalog table and per-second counts chart
//! - [`streams`]: stream table, per-stream detail chart, status log
//! - [`dialog`]: the add-stream overlay
//! - [`theme`]: colors and styles, with terminal background detection

pub mod common;
pub mod dialog;
pub mod overview;
pub mod streams;
pub mod theme;
pub mod traffic;

pub use theme::Theme;
