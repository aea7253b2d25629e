pub mod classify;
pub mod client;
pub mod prompts;

pub use classify::*;
pub use client::*;
pub use prompts::*;
