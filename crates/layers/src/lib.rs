pub mod fill;
pub mod render;
pub mod symbology;

pub use fill::*;
pub use render::*;
pub use symbology::*;
