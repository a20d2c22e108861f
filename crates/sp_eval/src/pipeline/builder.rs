use crate::{
    algorithms::MetricAggregator,
    config::EvaluationConfig,
    error::Result,
    io::ImageprocChartRenderer,
    pipeline::Evaluation,
    traits::{ChartRenderer, NearestBoundarySearch},
};

/// Builder for evaluations with a fluent API
pub struct EvaluationBuilder {
    config: EvaluationConfig,
    search: Option<Box<dyn NearestBoundarySearch>>,
    renderer: Option<Box<dyn ChartRenderer>>,
}

impl EvaluationBuilder {
    pub fn new() -> Self {
        Self {
            config: EvaluationConfig::default(),
            search: None,
            renderer: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: EvaluationConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom search instead of the configured strategy
    pub fn set_search<S>(mut self, search: S) -> Self
    where
        S: NearestBoundarySearch + 'static,
    {
        self.search = Some(Box::new(search));
        self
    }

    /// Use a custom chart renderer instead of the imageproc one
    pub fn set_renderer<R>(mut self, renderer: R) -> Self
    where
        R: ChartRenderer + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn with_recall_tolerance(mut self, tolerance: u32) -> Self {
        self.config.recall_tolerance = tolerance;
        self
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.images = images.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_steps(mut self, steps: Vec<u32>) -> Self {
        self.config.steps = steps;
        self
    }

    /// Validate the configuration and fill in default components
    pub fn build(self) -> Result<Evaluation> {
        self.config.validate()?;

        let search = self.search.unwrap_or_else(|| self.config.search.searcher());
        let aggregator = MetricAggregator::new(search, self.config.recall_tolerance);

        let renderer = match self.renderer {
            Some(renderer) => renderer,
            None => Box::new(ImageprocChartRenderer::from_font_path(
                self.config.font_path.as_deref(),
            )?),
        };

        Ok(Evaluation::new(self.config, aggregator, renderer))
    }
}

impl Default for EvaluationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algorithms::ExactRingSearch, config::SearchStrategy, error::EvalError, io::ChartSeries};
    use std::path::Path;

    struct NullRenderer;

    impl ChartRenderer for NullRenderer {
        fn render(&self, _series: &ChartSeries, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_defaults() {
        let evaluation = Evaluation::builder()
            .set_renderer(NullRenderer)
            .build()
            .expect("Should build");
        assert_eq!(evaluation.config(), &EvaluationConfig::default());
        assert_eq!(
            evaluation.info(),
            "Evaluation: 5 images, 6 steps, ring search, recall tolerance 3px"
        );
    }

    #[test]
    fn test_overrides() {
        let evaluation = Evaluation::builder()
            .with_images(["tiger"])
            .with_steps(vec![5, 10])
            .with_recall_tolerance(2)
            .set_search(ExactRingSearch)
            .set_renderer(NullRenderer)
            .build()
            .expect("Should build");
        assert_eq!(
            evaluation.info(),
            "Evaluation: 1 images, 2 steps, exact search, recall tolerance 2px"
        );
    }

    #[test]
    fn test_configured_strategy_is_used() {
        let config = EvaluationConfig {
            search: SearchStrategy::Exact,
            ..EvaluationConfig::default()
        };
        let evaluation = Evaluation::builder()
            .config(config)
            .set_renderer(NullRenderer)
            .build()
            .expect("Should build");
        assert!(evaluation.info().contains("exact search"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Evaluation::builder().with_steps(vec![]).build();
        assert!(matches!(result, Err(EvalError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_font_file_is_an_error() {
        let config = EvaluationConfig {
            font_path: Some("no/such/font.ttf".into()),
            ..EvaluationConfig::default()
        };
        let result = Evaluation::builder().config(config).build();
        assert!(matches!(result, Err(EvalError::Io(_))));
    }
}
