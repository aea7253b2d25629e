pub mod dialogue;
pub mod intent;
pub mod page;

pub use dialogue::*;
pub use intent::*;
pub use page::*;
