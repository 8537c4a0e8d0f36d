//! Core data types: REST resources, stream payloads and request shapes.

pub mod enums;
pub mod market_data;
pub mod requests;
pub mod resources;

pub use enums::*;
pub use market_data::*;
pub use requests::*;
pub use resources::*;
