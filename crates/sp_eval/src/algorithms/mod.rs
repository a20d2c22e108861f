pub mod search;
pub mod metrics;

pub use search::*;
pub use metrics::*;
