//! Procedural generation for the chase arena: noise terrain and the
//! walkability grid used for pursuer placement.

pub mod nav_grid;
pub mod terrain;

pub use nav_grid::*;
pub use terrain::*;
