pub mod base;
pub mod components;
pub mod node;
pub mod outputs;
pub mod shared;
pub mod traits;
pub mod validators;
