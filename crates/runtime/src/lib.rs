pub mod host;
pub mod ticker;

pub use host::*;
pub use ticker::*;
