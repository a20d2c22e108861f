use std::{fs, path::Path};

use ab_glyph::{FontArc, FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut, text_size},
    rect::Rect,
};
use serde::Serialize;
use strum::{Display, EnumIter};
use tracing::debug;

use crate::{
    error::{EvalError, Result},
    results::EvaluationResults,
    traits::ChartRenderer,
    types::MetricRecord,
};

/// DejaVu Sans, used when no font path is configured
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    BoundaryRecall,
    AverageDistance,
    MedianDistance,
}

impl ChartKind {
    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::BoundaryRecall => "boundary_recall",
            Self::AverageDistance => "avg_closest_dist_SP_GT",
            Self::MedianDistance => "med_closest_dist_SP_GT",
        }
    }

    /// `<image>_<suffix>.png`
    pub fn file_name(self, image: &str) -> String {
        format!("{image}_{}.png", self.file_suffix())
    }

    pub fn title(self, image: &str) -> String {
        match self {
            Self::BoundaryRecall => format!("{image} image\nboundary-recall"),
            Self::AverageDistance => {
                format!("{image} image\nsuperpixel border average distance to ground truth border")
            }
            Self::MedianDistance => {
                format!("{image} image\nsuperpixel border median distance to ground truth border")
            }
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            Self::BoundaryRecall => "boundary-recall",
            Self::AverageDistance => "average closest distance",
            Self::MedianDistance => "median closest distance",
        }
    }

    pub fn value(self, record: &MetricRecord) -> f64 {
        match self {
            Self::BoundaryRecall => record.boundary_recall,
            Self::AverageDistance => record.mean_distance,
            Self::MedianDistance => record.median_distance,
        }
    }
}

/// Point annotation, integer step and value to three decimals
pub fn point_label(step: u32, value: f64) -> String {
    format!("({step}, {value:.3})")
}

/// One metric plotted against grid step for a single image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(u32, f64)>,
}

impl ChartSeries {
    /// Every step must have a record in `results`
    pub fn from_results(
        kind: ChartKind,
        image: &str,
        steps: &[u32],
        results: &EvaluationResults,
    ) -> Result<Self> {
        let points = steps
            .iter()
            .map(|&step| -> Result<(u32, f64)> { Ok((step, kind.value(results.get(image, step)?))) })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            kind,
            title: kind.title(image),
            x_label: "grid step".to_string(),
            y_label: kind.y_label().to_string(),
            points,
        })
    }

    pub fn labels(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|&(step, value)| point_label(step, value))
            .collect()
    }
}

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const SERIES: Rgb<u8> = Rgb([31, 119, 180]);
const Y_TICKS: usize = 5;

const MARGIN_LEFT: f32 = 90.0;
const MARGIN_RIGHT: f32 = 40.0;
const MARGIN_TOP: f32 = 80.0;
const MARGIN_BOTTOM: f32 = 60.0;

/// Smallest canvas that still leaves a non-empty plot area
pub const MIN_CHART_WIDTH: u32 = (MARGIN_LEFT + MARGIN_RIGHT) as u32 + 1;
pub const MIN_CHART_HEIGHT: u32 = (MARGIN_TOP + MARGIN_BOTTOM) as u32 + 1;

/// Offset of a point label from its marker
const LABEL_OFFSET: (i32, i32) = (6, -20);

/// Scatter-plus-line chart drawn with imageproc primitives
pub struct ImageprocChartRenderer {
    width: u32,
    height: u32,
    marker_radius: i32,
    font: FontArc,
}

impl ImageprocChartRenderer {
    /// 800x600 renderer using the bundled font
    pub fn new() -> Result<Self> {
        let font = FontArc::try_from_slice(BUNDLED_FONT)
            .map_err(|e| EvalError::Font(format!("bundled font: {e}")))?;
        Ok(Self {
            width: 800,
            height: 600,
            marker_radius: 4,
            font,
        })
    }

    /// Load the given font, or fall back to the bundled one when `None`
    pub fn from_font_path(path: Option<&Path>) -> Result<Self> {
        let renderer = Self::new()?;
        match path {
            Some(path) => Ok(renderer.with_font(load_font(path)?)),
            None => Ok(renderer),
        }
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = FontArc::new(font);
        self
    }

    /// Resize the canvas, rejecting sizes that leave no room for the plot area
    pub fn with_size(mut self, width: u32, height: u32) -> Result<Self> {
        if width < MIN_CHART_WIDTH || height < MIN_CHART_HEIGHT {
            return Err(EvalError::InvalidConfig(format!(
                "chart size {width}x{height} is below the {MIN_CHART_WIDTH}x{MIN_CHART_HEIGHT} minimum"
            )));
        }
        self.width = width;
        self.height = height;
        Ok(self)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Top-left corner of each point label, in series order
    pub fn label_origins(&self, series: &ChartSeries) -> Vec<(i32, i32)> {
        let area = PlotArea::new(self.width, self.height, &series.points);
        series
            .points
            .iter()
            .map(|&(step, value)| {
                (
                    area.x(step as f64) as i32 + LABEL_OFFSET.0,
                    area.y(value) as i32 + LABEL_OFFSET.1,
                )
            })
            .collect()
    }

    pub fn draw(&self, series: &ChartSeries) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        let area = PlotArea::new(self.width, self.height, &series.points);

        for &(step, _) in &series.points {
            let x = area.x(step as f64);
            draw_line_segment_mut(&mut canvas, (x, area.top), (x, area.bottom), GRID);
        }
        for tick in area.y_ticks() {
            let y = area.y(tick);
            draw_line_segment_mut(&mut canvas, (area.left, y), (area.right, y), GRID);
        }
        draw_hollow_rect_mut(
            &mut canvas,
            Rect::at(area.left as i32, area.top as i32)
                .of_size((area.right - area.left) as u32, (area.bottom - area.top) as u32),
            AXIS,
        );

        let pixels: Vec<(f32, f32)> = series
            .points
            .iter()
            .map(|&(step, value)| (area.x(step as f64), area.y(value)))
            .collect();
        for pair in pixels.windows(2) {
            draw_line_segment_mut(&mut canvas, pair[0], pair[1], SERIES);
        }
        for &(x, y) in &pixels {
            draw_filled_circle_mut(&mut canvas, (x as i32, y as i32), self.marker_radius, SERIES);
        }

        self.draw_text(&mut canvas, series, &area);
        canvas
    }

    fn draw_text(&self, canvas: &mut RgbImage, series: &ChartSeries, area: &PlotArea) {
        let font = &self.font;
        let title_scale = PxScale::from(20.0);
        let label_scale = PxScale::from(15.0);
        let tick_scale = PxScale::from(13.0);

        let mut y = 8;
        for line in series.title.lines() {
            let (w, h) = text_size(title_scale, font, line);
            let x = (self.width as i32 - w as i32) / 2;
            draw_text_mut(canvas, AXIS, x.max(0), y, title_scale, font, line);
            y += h as i32 + 6;
        }

        let (w, _) = text_size(label_scale, font, &series.x_label);
        draw_text_mut(
            canvas,
            AXIS,
            ((area.left + area.right) as i32 - w as i32) / 2,
            self.height as i32 - 28,
            label_scale,
            font,
            &series.x_label,
        );
        draw_text_mut(canvas, AXIS, 8, area.top as i32 - 22, label_scale, font, &series.y_label);

        for &(step, _) in &series.points {
            let text = step.to_string();
            let (w, _) = text_size(tick_scale, font, &text);
            let x = area.x(step as f64) as i32 - w as i32 / 2;
            draw_text_mut(canvas, AXIS, x, area.bottom as i32 + 6, tick_scale, font, &text);
        }
        for tick in area.y_ticks() {
            let text = format!("{tick:.2}");
            let (w, h) = text_size(tick_scale, font, &text);
            let x = area.left as i32 - w as i32 - 6;
            let y = area.y(tick) as i32 - h as i32 / 2;
            draw_text_mut(canvas, AXIS, x, y, tick_scale, font, &text);
        }

        for (label, (x, y)) in series.labels().iter().zip(self.label_origins(series)) {
            draw_text_mut(canvas, AXIS, x, y, tick_scale, font, label);
        }
    }
}

impl ChartRenderer for ImageprocChartRenderer {
    fn render(&self, series: &ChartSeries, path: &Path) -> Result<()> {
        debug!("Rendering {} chart to {:?}", series.kind, path);
        self.draw(series).save(path)?;
        Ok(())
    }
}

pub fn load_font(path: &Path) -> Result<FontVec> {
    let data = fs::read(path)?;
    FontVec::try_from_vec(data).map_err(|e| EvalError::Font(format!("{path:?}: {e}")))
}

/// Pixel-space layout of the data rectangle
struct PlotArea {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl PlotArea {
    fn new(width: u32, height: u32, points: &[(u32, f64)]) -> Self {
        let (x_min, x_max) = padded_range(points.iter().map(|&(s, _)| s as f64), 0.05, 1.0);
        let (y_min, y_max) = padded_range(points.iter().map(|&(_, v)| v), 0.1, 0.5);
        Self {
            left: MARGIN_LEFT,
            right: width as f32 - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: height as f32 - MARGIN_BOTTOM,
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    fn x(&self, value: f64) -> f32 {
        let t = (value - self.x_min) / (self.x_max - self.x_min);
        self.left + (t as f32) * (self.right - self.left)
    }

    fn y(&self, value: f64) -> f32 {
        let t = (value - self.y_min) / (self.y_max - self.y_min);
        self.bottom - (t as f32) * (self.bottom - self.top)
    }

    fn y_ticks(&self) -> impl Iterator<Item = f64> + '_ {
        let step = (self.y_max - self.y_min) / (Y_TICKS - 1) as f64;
        (0..Y_TICKS).map(move |i| self.y_min + step * i as f64)
    }
}

/// Range of `values` widened by `ratio` of its span, or by `flat` when the span is zero
fn padded_range(values: impl Iterator<Item = f64>, ratio: f64, flat: f64) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span <= f64::EPSILON {
        (min - flat, max + flat)
    } else {
        (min - span * ratio, max + span * ratio)
    }
}

/// Dark, text-coloured pixels in the box a point label starts in
#[cfg(test)]
pub(crate) fn label_ink(canvas: &RgbImage, origin: (i32, i32)) -> usize {
    let (x0, y0) = origin;
    (y0..y0 + 16)
        .flat_map(|y| (x0..x0 + 20).map(move |x| (x, y)))
        .filter(|&(x, y)| x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height())
        .filter(|&(x, y)| canvas.get_pixel(x as u32, y as u32).0.iter().all(|&c| c < 160))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn results_for(image: &str, steps: &[u32]) -> EvaluationResults {
        let mut results = EvaluationResults::new();
        for (i, &step) in steps.iter().enumerate() {
            results.insert(
                image,
                step,
                MetricRecord {
                    boundary_recall: 1.0 - i as f64 * 0.1,
                    mean_distance: 0.5 + i as f64,
                    median_distance: i as f64,
                    boundary_pixels: 10,
                    hits: 10 - i,
                },
            );
        }
        results
    }

    #[test]
    fn test_file_names() {
        let names: Vec<String> = ChartKind::iter().map(|k| k.file_name("tiger")).collect();
        assert_eq!(
            names,
            vec![
                "tiger_boundary_recall.png",
                "tiger_avg_closest_dist_SP_GT.png",
                "tiger_med_closest_dist_SP_GT.png",
            ]
        );
    }

    #[test]
    fn test_point_label_format() {
        assert_eq!(point_label(5, 0.98765), "(5, 0.988)");
        assert_eq!(point_label(30, 2.0), "(30, 2.000)");
    }

    #[test]
    fn test_series_from_results() {
        let steps = [5, 10, 15, 20, 25, 30];
        let results = results_for("fish", &steps);
        let series = ChartSeries::from_results(ChartKind::MedianDistance, "fish", &steps, &results)
            .expect("Should build series");

        assert_eq!(series.points.len(), 6);
        assert_eq!(series.points[2], (15, 2.0));
        assert_eq!(series.labels()[0], "(5, 0.000)");
        assert!(series.title.starts_with("fish image\n"));
    }

    #[test]
    fn test_series_missing_step_is_fatal() {
        let results = results_for("fish", &[5, 10]);
        let result = ChartSeries::from_results(ChartKind::BoundaryRecall, "fish", &[5, 10, 15], &results);
        assert!(matches!(result, Err(EvalError::MissingMetric { label }) if label == "fish_15"));
    }

    #[test]
    fn test_draw_marks_points() {
        let steps = [5, 10, 15, 20, 25, 30];
        let results = results_for("eskimo", &steps);
        let series = ChartSeries::from_results(ChartKind::AverageDistance, "eskimo", &steps, &results)
            .expect("Should build series");

        let renderer = ImageprocChartRenderer::new().expect("Should load bundled font");
        let canvas = renderer.draw(&series);
        assert_eq!(canvas.dimensions(), renderer.dimensions());

        let area = PlotArea::new(renderer.width, renderer.height, &series.points);
        for &(step, value) in &series.points {
            let px = canvas.get_pixel(area.x(step as f64) as u32, area.y(value) as u32);
            assert_eq!(*px, SERIES);
        }
    }

    #[test]
    fn test_default_renderer_draws_point_labels() {
        let steps = [5, 10, 15, 20, 25, 30];
        let results = results_for("tiger", &steps);
        let series = ChartSeries::from_results(ChartKind::BoundaryRecall, "tiger", &steps, &results)
            .expect("Should build series");

        let renderer = ImageprocChartRenderer::from_font_path(None).expect("Should load bundled font");
        let canvas = renderer.draw(&series);

        let origins = renderer.label_origins(&series);
        assert_eq!(origins.len(), 6);
        for (label, origin) in series.labels().iter().zip(origins) {
            assert!(label_ink(&canvas, origin) > 0, "no text drawn for {label}");
        }
    }

    #[test]
    fn test_small_canvas_is_rejected() {
        let renderer = ImageprocChartRenderer::new().expect("Should load bundled font");
        assert!(matches!(
            ImageprocChartRenderer::new().expect("Should load bundled font").with_size(100, 100),
            Err(EvalError::InvalidConfig(_))
        ));

        let smallest = renderer
            .with_size(MIN_CHART_WIDTH, MIN_CHART_HEIGHT)
            .expect("Should accept the minimum size");
        let series = ChartSeries::from_results(ChartKind::MedianDistance, "fish", &[5, 10], &results_for("fish", &[5, 10]))
            .expect("Should build series");
        assert_eq!(smallest.draw(&series).dimensions(), (MIN_CHART_WIDTH, MIN_CHART_HEIGHT));
    }

    #[test]
    fn test_flat_series_has_usable_range() {
        let (lo, hi) = padded_range([1.0, 1.0, 1.0].into_iter(), 0.1, 0.5);
        assert_eq!((lo, hi), (0.5, 1.5));
    }
}
