pub mod capacity;
pub mod color;
pub mod error;
pub mod metadata;
pub mod mode;

pub use capacity::*;
pub use color::parse_color;
pub use error::*;
pub use metadata::*;
pub use mode::*;
