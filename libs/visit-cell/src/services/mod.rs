pub mod transition;
pub mod reorder;
pub mod filter;
pub mod calendar;

pub use transition::*;
pub use reorder::*;
pub use filter::*;
pub use calendar::*;
