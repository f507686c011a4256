pub mod bounds;
pub mod geo;

// Foundation crate: small, well-tested geographic primitives only.
pub use bounds::*;
pub use geo::*;
