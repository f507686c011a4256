pub mod camera;
pub mod filter;
pub mod focus;
pub mod regions;

pub use camera::*;
pub use filter::*;
pub use focus::*;
pub use regions::*;
