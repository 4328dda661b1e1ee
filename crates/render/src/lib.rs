pub mod color;
pub mod frame;
pub mod recording;
pub mod surface;

pub use color::*;
pub use frame::*;
pub use recording::*;
pub use surface::*;
