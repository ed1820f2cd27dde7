pub mod booking;
pub mod conflict;
pub mod recurrence;

pub use booking::*;
pub use conflict::*;
pub use recurrence::*;
