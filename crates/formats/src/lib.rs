pub mod footprint;
pub mod winding;

pub use footprint::*;
pub use winding::*;
