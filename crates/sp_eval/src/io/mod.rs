pub mod images;
pub mod charts;

pub use images::*;
pub use charts::*;
