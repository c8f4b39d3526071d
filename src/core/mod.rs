//! Core process discovery and tree rendering
//!
//! snapshot -> matcher -> process_tree -> render

pub mod matcher;
pub mod models;
pub mod process_tree;
pub mod render;
pub mod snapshot;
