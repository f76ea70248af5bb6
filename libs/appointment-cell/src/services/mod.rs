pub mod book;
pub mod booking;
pub mod intake;

pub use book::*;
pub use booking::*;
pub use intake::*;
