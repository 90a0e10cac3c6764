//! Linker snapshot visualizer.
//!
//! This library turns dumps of a linker's in-memory state into diagrams and reports.
//! It is organized into several modules:
//! - `config`: CLI configuration.
//! - `snapshot`: The decoded snapshot model.
//! - `decode`: Reading snapshot documents into the model.
//! - `symbol`: Address-based symbol attribution.
//! - `layout`: Geometry of the section/atom diagram.
//! - `render`: Output backends (HTML diagram, text report).
//! - `logging`: Tracing subscriber setup.

pub mod config;
pub mod decode;
pub mod layout;
pub mod logging;
pub mod render;
pub mod snapshot;
pub mod symbol;
