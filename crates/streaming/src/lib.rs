pub mod protocol;
pub mod request;
pub mod slot;
pub mod template;
pub mod transport;

pub use protocol::*;
pub use request::*;
pub use slot::*;
pub use template::*;
pub use transport::*;
