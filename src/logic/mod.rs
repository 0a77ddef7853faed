//! Logic modules — turns a module universe into a required-module closure.
//!
//! # Modules
//!
//! - `index` — name and capability lookup tables
//! - `resolver` — worklist traversal from the root set

pub mod index;
pub mod resolver;
