//! # Superpixel Boundary Evaluation Library
//!
//! Scores superpixel segmentations against ground-truth edge maps and charts
//! the results across grid-step values.
//!
//! ## Core Features
//!
//! - **Nearest-edge search**: expanding square-ring lookup of the closest marked
//!   superpixel border pixel, behind the [`NearestBoundarySearch`] trait
//! - **Metrics**: boundary recall, mean and median closest distance per
//!   `(image, step)` pair
//! - **Charts**: scatter-plus-line graphs drawn with `imageproc`, behind the
//!   [`ChartRenderer`] trait
//! - **Configuration**: TOML/JSON configuration whose defaults reproduce the
//!   classic five-image, six-step sweep
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sp_eval::Evaluation;
//!
//! // Reads imgs/ and build/, writes graphs/
//! let evaluation = Evaluation::builder().build()?;
//! let report = evaluation.run()?;
//! for (label, record) in report.results.iter() {
//!     println!("{label}: {:.3}", record.boundary_recall);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Metrics Only
//!
//! ```rust
//! use sp_eval::{BoundaryMap, GroundTruth, MetricAggregator};
//!
//! let ground_truth = GroundTruth::from_fn(5, 5, |x, y| x == 2 && y == 2);
//! let boundary = BoundaryMap::from_fn(5, 5, |x, y| x == 2 && y == 2);
//!
//! let record = MetricAggregator::default().evaluate("unit_5", &ground_truth, &boundary)?;
//! assert_eq!(record.boundary_recall, 1.0);
//! # Ok::<(), sp_eval::EvalError>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod results;
pub mod config;
pub mod io;
pub mod pipeline;

// Re-exports for convenience
pub use error::{EvalError, Result};
pub use types::{BoundaryMap, GroundTruth, MetricRecord, NearestMatch, BOUNDARY_RED};
pub use traits::*;
pub use algorithms::*;
pub use results::{EvaluationResults, metric_label};
pub use config::{EvaluationConfig, SearchStrategy, DEFAULT_IMAGES, DEFAULT_STEPS};
pub use io::*;
pub use pipeline::{Evaluation, EvaluationReport, RenderedChart, builder::EvaluationBuilder};
