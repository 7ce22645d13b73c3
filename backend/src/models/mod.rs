pub mod event;
pub mod macros;
pub mod records;
pub mod resource;

pub use event::*;
pub use records::*;
pub use resource::*;
