pub mod aggregate;
pub mod dataset;
pub mod hexgrid;
pub mod normalize;
pub mod record;
pub mod table;
pub mod value;

pub use aggregate::*;
pub use dataset::*;
pub use hexgrid::*;
pub use normalize::*;
pub use record::*;
pub use table::*;
pub use value::*;
