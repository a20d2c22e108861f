use std::{
    fs,
    path::{Path, PathBuf},
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::{
    algorithms::{DEFAULT_RECALL_TOLERANCE, ExactRingSearch, RingSearch},
    error::{EvalError, Result},
    traits::NearestBoundarySearch,
};

/// Test images evaluated by default
pub const DEFAULT_IMAGES: [&str; 5] = ["landscape", "tiger", "eskimo", "fish", "elephant"];

/// Grid steps swept by default
pub const DEFAULT_STEPS: [u32; 6] = [5, 10, 15, 20, 25, 30];

#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SearchStrategy {
    /// Stop at the first ring holding a boundary pixel
    #[default]
    Ring,
    /// Expand until the Euclidean nearest pixel is certain
    Exact,
}

impl SearchStrategy {
    pub fn searcher(self) -> Box<dyn NearestBoundarySearch> {
        match self {
            Self::Ring => Box::new(RingSearch),
            Self::Exact => Box::new(ExactRingSearch),
        }
    }
}

/// Inputs, outputs and parameters of an evaluation run
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Image identifiers, each with one ground truth and one contour image per step
    pub images: Vec<String>,
    /// Grid-step values swept for every image
    pub steps: Vec<u32>,
    /// Directory holding `<image><ground_truth_suffix>`
    pub imgs_dir: PathBuf,
    /// Directory holding `<image>/<image>_<step>/<contour_file>`
    pub build_dir: PathBuf,
    /// Charts are written to `<graphs_dir>/<image>/`
    pub graphs_dir: PathBuf,
    pub ground_truth_suffix: String,
    pub contour_file: String,
    /// Distances strictly below this count as boundary-recall hits
    pub recall_tolerance: u32,
    pub search: SearchStrategy,
    /// TrueType font for chart text, the bundled font is used when unset
    pub font_path: Option<PathBuf>,
    /// Optional JSON dump of every metric record
    pub summary_path: Option<PathBuf>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            images: DEFAULT_IMAGES.iter().map(|s| s.to_string()).collect(),
            steps: DEFAULT_STEPS.to_vec(),
            imgs_dir: PathBuf::from("imgs"),
            build_dir: PathBuf::from("build"),
            graphs_dir: PathBuf::from("graphs"),
            ground_truth_suffix: "_groundTruth.png".to_string(),
            contour_file: "contours.jpg".to_string(),
            recall_tolerance: DEFAULT_RECALL_TOLERANCE,
            search: SearchStrategy::Ring,
            font_path: None,
            summary_path: None,
        }
    }
}

impl EvaluationConfig {
    pub fn ground_truth_path(&self, image: &str) -> PathBuf {
        self.imgs_dir.join(format!("{image}{}", self.ground_truth_suffix))
    }

    pub fn contour_path(&self, image: &str, step: u32) -> PathBuf {
        self.build_dir
            .join(image)
            .join(format!("{image}_{step}"))
            .join(&self.contour_file)
    }

    pub fn graphs_path(&self, image: &str) -> PathBuf {
        self.graphs_dir.join(image)
    }

    /// Resolve relative directories against `root`
    pub fn with_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        let root = root.as_ref();
        self.imgs_dir = root.join(&self.imgs_dir);
        self.build_dir = root.join(&self.build_dir);
        self.graphs_dir = root.join(&self.graphs_dir);
        self.summary_path = self.summary_path.map(|p| root.join(p));
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.images.is_empty() {
            return Err(EvalError::InvalidConfig("no images configured".to_string()));
        }
        if self.steps.is_empty() {
            return Err(EvalError::InvalidConfig("no grid steps configured".to_string()));
        }
        if self.recall_tolerance == 0 {
            return Err(EvalError::InvalidConfig(
                "recall_tolerance must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(EvaluationConfig)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path_ref),
            Some("json") => Self::from_json_file(path_ref),
            _ => Err(EvalError::UnsupportedConfigFormat(path_ref.to_path_buf())),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save in the format matching the file extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path_ref = path.as_ref();
        let content = match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(EvalError::UnsupportedConfigFormat(path_ref.to_path_buf())),
        };
        fs::write(path_ref, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = EvaluationConfig::default();
        assert_eq!(config.ground_truth_path("tiger"), PathBuf::from("imgs/tiger_groundTruth.png"));
        assert_eq!(
            config.contour_path("tiger", 15),
            PathBuf::from("build/tiger/tiger_15/contours.jpg")
        );
        assert_eq!(config.graphs_path("tiger"), PathBuf::from("graphs/tiger"));
        assert_eq!(config.steps, vec![5, 10, 15, 20, 25, 30]);
        assert_eq!(config.images.len(), 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EvaluationConfig::from_toml(
            r#"
            images = ["fish"]
            recall_tolerance = 2
            search = "exact"
            "#,
        )
        .expect("Should parse TOML");

        assert_eq!(config.images, vec!["fish".to_string()]);
        assert_eq!(config.recall_tolerance, 2);
        assert_eq!(config.search, SearchStrategy::Exact);
        assert_eq!(config.steps, DEFAULT_STEPS.to_vec());
        assert_eq!(config.contour_file, "contours.jpg");
    }

    #[test]
    fn test_toml_and_json_agree() {
        let config = EvaluationConfig {
            summary_path: Some(PathBuf::from("graphs/summary.json")),
            ..EvaluationConfig::default()
        };
        let from_toml = EvaluationConfig::from_toml(&config.to_toml().expect("Should write TOML"))
            .expect("Should parse TOML");
        let from_json = EvaluationConfig::from_json(&config.to_json().expect("Should write JSON"))
            .expect("Should parse JSON");
        assert_eq!(from_toml, config);
        assert_eq!(from_json, config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = EvaluationConfig::from_file("settings.yaml");
        assert!(matches!(result, Err(EvalError::UnsupportedConfigFormat(_))));
    }

    #[test]
    fn test_validate() {
        assert!(EvaluationConfig::default().validate().is_ok());

        let no_steps = EvaluationConfig { steps: vec![], ..EvaluationConfig::default() };
        assert!(matches!(no_steps.validate(), Err(EvalError::InvalidConfig(_))));

        let zero_tolerance = EvaluationConfig { recall_tolerance: 0, ..EvaluationConfig::default() };
        assert!(zero_tolerance.validate().is_err());
    }

    #[test]
    fn test_with_root() {
        let config = EvaluationConfig::default().with_root("/data/run");
        assert_eq!(
            config.ground_truth_path("fish"),
            PathBuf::from("/data/run/imgs/fish_groundTruth.png")
        );
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(SearchStrategy::Exact.to_string(), "exact");
        assert_eq!(SearchStrategy::Ring.searcher().name(), "ring");
        assert_eq!(<SearchStrategy as VariantNames>::VARIANTS, &["ring", "exact"]);
        assert_eq!("exact".parse::<SearchStrategy>().ok(), Some(SearchStrategy::Exact));
    }
}
