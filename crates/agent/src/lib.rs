pub mod client;
pub mod command;
pub mod interpreter;
pub mod protocol;
pub mod session;

pub use client::*;
pub use command::*;
pub use interpreter::*;
pub use protocol::*;
pub use session::*;
