//! Pixel grid server library.
//!
//! Resamples drawings to a fixed LED grid, reorders the cells into the
//! serpentine wiring order of the panel and forwards them to its controller.

pub mod config;
pub mod image_proc;
pub mod web;
