pub mod catalog;
pub mod loader;
pub mod locator;
pub mod residency;
pub mod source;

pub use catalog::*;
pub use loader::*;
pub use locator::*;
pub use residency::*;
pub use source::*;
