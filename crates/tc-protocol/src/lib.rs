pub mod chat;
pub mod engine;

pub use chat::*;
pub use engine::*;
