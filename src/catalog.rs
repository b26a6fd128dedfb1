//! Track catalog: the ordered, immutable list of tracks shown in the carousel.
//!
//! Tracks come either from a TOML manifest (a static track list with artwork
//! and audio references) or from scanning a music directory. Catalog order is
//! the carousel order.

mod load;
mod manifest;
mod model;
mod scan;

pub use load::load;
pub use model::*;

#[cfg(test)]
mod tests;
