pub mod input;

pub use input::{MoveKey, MovementInput};
