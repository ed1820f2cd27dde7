pub mod resolver;
pub mod slots;

pub use resolver::*;
pub use slots::*;
