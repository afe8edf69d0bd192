//! Test helpers shared across the argtree workspace.
//!
//! [`env`] serialises process environment mutations behind RAII guards;
//! [`output`] captures what an application writes to its help stream.

pub mod env;
pub mod output;
