pub mod event;
pub mod highlight;
pub mod layer;
pub mod selection;
pub mod state;
pub mod view;

pub use event::*;
pub use highlight::*;
pub use layer::*;
pub use selection::*;
pub use state::*;
pub use view::*;
