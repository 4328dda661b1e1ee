pub mod config;
pub mod controller;
pub mod extrude;
pub mod fade;
pub mod layer;
pub mod overlay;
pub mod scale;
pub mod symbology;
pub mod viewport;

pub use config::*;
pub use controller::*;
pub use extrude::*;
pub use fade::*;
pub use layer::*;
pub use overlay::*;
pub use scale::*;
pub use symbology::*;
pub use viewport::*;
