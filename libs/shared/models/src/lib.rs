pub mod availability;
pub mod booking;
pub mod error;
pub mod interval;
pub mod waitlist;
pub mod weekday;

pub use availability::*;
pub use booking::*;
pub use error::*;
pub use interval::*;
pub use waitlist::*;
pub use weekday::*;
