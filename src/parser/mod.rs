pub mod ack;
pub mod alarm;
pub mod classifier;
pub mod cursor;
pub mod date;
pub mod decoder;
pub mod input;
pub mod telemetry;

pub use ack::*;
pub use alarm::*;
pub use classifier::*;
pub use date::*;
pub use decoder::*;
pub use input::*;
pub use telemetry::*;
