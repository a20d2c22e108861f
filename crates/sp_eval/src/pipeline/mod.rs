pub mod builder;

use std::{fs, path::PathBuf};

use strum::IntoEnumIterator;
use tracing::info;

use crate::{
    algorithms::MetricAggregator,
    config::EvaluationConfig,
    error::Result,
    io::{ChartKind, ChartSeries, load_boundary_map, load_ground_truth},
    results::{EvaluationResults, metric_label},
    traits::ChartRenderer,
    types::GroundTruth,
};

/// A chart written to disk together with the data it shows
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub path: PathBuf,
    pub series: ChartSeries,
}

/// Everything a full run produced
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub results: EvaluationResults,
    pub charts: Vec<RenderedChart>,
}

/// Sequential evaluation over every configured image and grid step
pub struct Evaluation {
    config: EvaluationConfig,
    aggregator: MetricAggregator,
    renderer: Box<dyn ChartRenderer>,
}

impl Evaluation {
    /// Create a new evaluation builder
    pub fn builder() -> builder::EvaluationBuilder {
        builder::EvaluationBuilder::new()
    }

    pub fn new(
        config: EvaluationConfig,
        aggregator: MetricAggregator,
        renderer: Box<dyn ChartRenderer>,
    ) -> Self {
        Self {
            config,
            aggregator,
            renderer,
        }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Score one contour image against an already loaded ground truth
    pub fn evaluate_step(
        &self,
        image: &str,
        step: u32,
        ground_truth: &GroundTruth,
        results: &mut EvaluationResults,
    ) -> Result<()> {
        let label = metric_label(image, step);
        let boundary = load_boundary_map(self.config.contour_path(image, step))?;
        let record = self.aggregator.evaluate(&label, ground_truth, &boundary)?;
        info!(
            "{}: boundary recall {:.3}, mean {:.3}, median {:.3}",
            label, record.boundary_recall, record.mean_distance, record.median_distance
        );
        results.insert(image, step, record);
        Ok(())
    }

    /// Score every configured step of one image
    pub fn evaluate_image(&self, image: &str, results: &mut EvaluationResults) -> Result<()> {
        info!("Computing image: {}", image);
        let ground_truth = load_ground_truth(self.config.ground_truth_path(image))?;
        for &step in &self.config.steps {
            self.evaluate_step(image, step, &ground_truth, results)?;
        }
        Ok(())
    }

    /// Write the three charts of an image, every step must already be evaluated
    pub fn render_image(&self, image: &str, results: &EvaluationResults) -> Result<Vec<RenderedChart>> {
        let dir = self.config.graphs_path(image);
        fs::create_dir_all(&dir)?;

        ChartKind::iter()
            .map(|kind| -> Result<RenderedChart> {
                let series = ChartSeries::from_results(kind, image, &self.config.steps, results)?;
                let path = dir.join(kind.file_name(image));
                self.renderer.render(&series, &path)?;
                Ok(RenderedChart { path, series })
            })
            .collect()
    }

    /// Evaluate and chart all images; the first failure aborts the run
    pub fn run(&self) -> Result<EvaluationReport> {
        let mut results = EvaluationResults::new();
        let mut charts = Vec::new();

        for image in &self.config.images {
            self.evaluate_image(image, &mut results)?;
            charts.extend(self.render_image(image, &results)?);
        }

        if let Some(path) = &self.config.summary_path {
            results.save_json(path)?;
            info!("Metric summary saved to {:?}", path);
        }

        info!(
            "Evaluated {} image(s) over {} grid step(s), {} chart(s) written",
            self.config.images.len(),
            self.config.steps.len(),
            charts.len()
        );

        Ok(EvaluationReport { results, charts })
    }

    /// Get information about the evaluation configuration
    pub fn info(&self) -> String {
        format!(
            "Evaluation: {} images, {} steps, {} search, recall tolerance {}px",
            self.config.images.len(),
            self.config.steps.len(),
            self.aggregator.search_name(),
            self.aggregator.tolerance()
        )
    }
}
