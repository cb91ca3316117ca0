//! Format implementations
//!
//! Each format reads one representation of a zettel body and renders it with the matching
//! encoder.

pub mod sz;
pub mod zjson;

pub use sz::SzFormat;
pub use zjson::ZjsonFormat;
