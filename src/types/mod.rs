pub mod attributes;
pub mod capture;
pub mod frame;
pub mod position;

pub use attributes::*;
pub use capture::*;
pub use frame::*;
pub use position::*;
