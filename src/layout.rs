//! Turns ratios into a backend-independent chart description.
//!
//! Coordinates are in data units: node `i` is centred on `x = i`, the
//! aggregate pair on `x = N`, and heights are latencies relative to the
//! node's own ARCANE total.

use crate::error::Result;
use crate::profile::{CpuOnlySample, Dataset, ProfilingSample};
use crate::ratio::RatioResult;
use crate::style::{ChartStyle, LegendStyle, Rgb};
use tracing::{debug, info};

pub const TITLE: &str = "ARCANE vs CPU-Only Profiling per Node";
pub const X_LABEL: &str = "Nodes";
pub const Y_LABEL: &str = "Latency w.r.t. ARCANE";

/// Horizontal shift of an annotation's left edge relative to its bar centre.
const ANNOTATION_X_SHIFT: f64 = -0.1;
const NODE_ANNOTATION_LIFT: f64 = 0.15;
const TOTAL_ANNOTATION_LIFT: f64 = 0.1;
/// Fraction of the tallest bar added above it so annotations stay in frame.
const Y_HEADROOM: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    ArcaneNmc,
    ArcaneCpu,
    CpuOnly,
}

impl Series {
    pub const ALL: [Series; 3] = [Series::ArcaneNmc, Series::ArcaneCpu, Series::CpuOnly];

    pub fn label(self) -> &'static str {
        match self {
            Series::ArcaneNmc => "ARCANE NMC",
            Series::ArcaneCpu => "ARCANE CPU",
            Series::CpuOnly => "CPU-Only",
        }
    }

    pub fn color(self, style: &ChartStyle) -> Rgb {
        match self {
            Series::ArcaneNmc => style.palette.arcane_nmc,
            Series::ArcaneCpu => style.palette.arcane_cpu,
            Series::CpuOnly => style.palette.cpu_only,
        }
    }
}

/// One filled rectangle. Stacked segments have a non-zero `bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub series: Series,
    pub center: f64,
    pub width: f64,
    pub bottom: f64,
    pub height: f64,
}

impl Bar {
    pub fn left(&self) -> f64 {
        self.center - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }
}

/// Bold text whose left edge and vertical centre sit at `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
}

/// Double-headed vertical arrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub x: f64,
    pub from: f64,
    pub to: f64,
}

impl Arrow {
    /// Shaft plus one chevron at each end, as polylines in data units.
    /// Heads point away from each other; a zero-length arrow gets flat heads.
    pub fn polylines(&self, head_width: f64, head_height: f64) -> [Vec<(f64, f64)>; 3] {
        let dir = if self.to > self.from {
            1.0
        } else if self.to < self.from {
            -1.0
        } else {
            0.0
        };
        let head = |tip: f64, sign: f64| {
            let base = tip - sign * dir * head_height;
            vec![
                (self.x - head_width / 2.0, base),
                (self.x, tip),
                (self.x + head_width / 2.0, base),
            ]
        };
        [
            vec![(self.x, self.from), (self.x, self.to)],
            head(self.to, 1.0),
            head(self.from, -1.0),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub series: Series,
    pub label: &'static str,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub bars: Vec<Bar>,
    pub annotations: Vec<Annotation>,
    pub arrow: Arrow,
    /// Tick position and label, one per node followed by "Total".
    pub x_ticks: Vec<(f64, String)>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub legend: Vec<LegendEntry>,
    pub legend_style: LegendStyle,
    pub ratios: RatioResult,
}

impl ChartLayout {
    pub fn tick_label(&self, x: f64) -> Option<&str> {
        self.x_ticks
            .iter()
            .find(|(pos, _)| (pos - x).abs() < 1e-6)
            .map(|(_, label)| label.as_str())
    }
}

pub fn format_ratio(value: f64) -> String {
    format!("{:.2}x", value)
}

pub struct RatioChartBuilder<'s> {
    style: &'s ChartStyle,
}

impl<'s> RatioChartBuilder<'s> {
    pub fn new(style: &'s ChartStyle) -> Self {
        Self { style }
    }

    /// Validate the raw tables and lay out the chart for them.
    pub fn build_from(
        &self,
        profiling: &[ProfilingSample],
        cpu_only: &[CpuOnlySample],
    ) -> Result<ChartLayout> {
        let dataset = Dataset::new(profiling, cpu_only)?;
        Ok(self.build(&dataset))
    }

    pub fn build(&self, dataset: &Dataset<'_>) -> ChartLayout {
        let style = self.style;
        let half = style.bar_width / 2.0;
        let ratios = RatioResult::compute(dataset);
        let n = ratios.nodes.len();
        debug!(nodes = n, bar_width = style.bar_width, "laying out chart");

        let mut bars = Vec::with_capacity(3 * n + 2);
        let mut annotations = Vec::with_capacity(n + 1);

        for (i, node) in ratios.nodes.iter().enumerate() {
            let x = i as f64;
            bars.push(Bar {
                series: Series::ArcaneNmc,
                center: x - half,
                width: style.bar_width,
                bottom: 0.0,
                height: node.normalized_arcane,
            });
            bars.push(Bar {
                series: Series::ArcaneCpu,
                center: x - half,
                width: style.bar_width,
                bottom: node.normalized_arcane,
                height: node.normalized_cpu_easy,
            });
            bars.push(Bar {
                series: Series::CpuOnly,
                center: x + half,
                width: style.bar_width,
                bottom: 0.0,
                height: node.normalized_cpu_only,
            });
            annotations.push(Annotation {
                text: format_ratio(node.normalized_cpu_only),
                x: x + half + ANNOTATION_X_SHIFT,
                y: node.normalized_cpu_only + NODE_ANNOTATION_LIFT,
                color: style.palette.node_annotation,
            });
        }

        let total_x = n as f64;
        let improvement = ratios.improvement;
        bars.push(Bar {
            series: Series::ArcaneNmc,
            center: total_x - half,
            width: style.bar_width,
            bottom: 0.0,
            height: 1.0,
        });
        bars.push(Bar {
            series: Series::CpuOnly,
            center: total_x + half,
            width: style.bar_width,
            bottom: 0.0,
            height: improvement,
        });
        let arrow = Arrow {
            x: total_x - half,
            from: 1.0,
            to: improvement,
        };
        annotations.push(Annotation {
            text: format_ratio(improvement),
            x: total_x - half + ANNOTATION_X_SHIFT,
            y: improvement + TOTAL_ANNOTATION_LIFT,
            color: style.palette.total_annotation,
        });
        info!(improvement = %format_ratio(improvement), "aggregate CPU-only slowdown");

        let x_ticks = (0..n)
            .map(|i| (i as f64, format!("Node {}", i)))
            .chain(std::iter::once((total_x, "Total".to_string())))
            .collect();

        let y_top = bars
            .iter()
            .map(Bar::top)
            .chain(annotations.iter().map(|a| a.y))
            .fold(1.0_f64, f64::max);
        let y_range = (0.0, y_top * (1.0 + Y_HEADROOM));
        let x_range = (-0.5 - half, total_x + 0.5 + half);

        let legend = Series::ALL
            .iter()
            .map(|&s| LegendEntry {
                series: s,
                label: s.label(),
                color: s.color(style),
            })
            .collect();

        ChartLayout {
            title: TITLE,
            x_label: X_LABEL,
            y_label: Y_LABEL,
            bars,
            annotations,
            arrow,
            x_ticks,
            x_range,
            y_range,
            legend,
            legend_style: style.legend,
            ratios,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChartError, InvalidInput};

    fn builtin_layout(style: &ChartStyle) -> ChartLayout {
        RatioChartBuilder::new(style).build(&Dataset::builtin())
    }

    #[test]
    fn bar_counts_and_positions() {
        let style = ChartStyle::classic();
        let layout = builtin_layout(&style);

        // three bars per node plus the Total pair
        assert_eq!(layout.bars.len(), 3 * 3 + 2);
        assert_eq!(layout.bars[0].center, -0.25);
        assert_eq!(layout.bars[1].center, -0.25);
        assert_eq!(layout.bars[2].center, 0.25);
        assert_eq!(layout.bars[9].center, 2.75);
        assert_eq!(layout.bars[10].center, 3.25);
        assert!(layout.bars.iter().all(|b| b.width == 0.5));
    }

    #[test]
    fn arcane_stack_reaches_one() {
        let style = ChartStyle::classic();
        let layout = builtin_layout(&style);
        for pair in layout.bars[..9].chunks(3) {
            let (nmc, cpu) = (&pair[0], &pair[1]);
            assert_eq!(nmc.series, Series::ArcaneNmc);
            assert_eq!(cpu.series, Series::ArcaneCpu);
            assert_eq!(cpu.bottom, nmc.top());
            assert!((cpu.top() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn total_pair_and_arrow() {
        let style = ChartStyle::classic();
        let layout = builtin_layout(&style);
        let baseline = &layout.bars[9];
        let total = &layout.bars[10];

        assert_eq!(baseline.height, 1.0);
        assert_eq!(total.series, Series::CpuOnly);
        assert_eq!(total.height, layout.ratios.improvement);
        assert_eq!(layout.arrow.x, baseline.center);
        assert_eq!(layout.arrow.from, 1.0);
        assert_eq!(layout.arrow.to, layout.ratios.improvement);
    }

    #[test]
    fn annotations_match_source_offsets() {
        let style = ChartStyle::classic();
        let layout = builtin_layout(&style);
        let texts: Vec<&str> = layout.annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, ["6.26x", "3.20x", "0.87x", "5.45x"]);

        let first = &layout.annotations[0];
        assert!((first.x - 0.15).abs() < 1e-9);
        assert!((first.y - (layout.ratios.nodes[0].normalized_cpu_only + 0.15)).abs() < 1e-9);
        assert_eq!(first.color, style.palette.node_annotation);

        let total = &layout.annotations[3];
        assert!((total.x - 2.65).abs() < 1e-9);
        assert!((total.y - (layout.ratios.improvement + 0.1)).abs() < 1e-9);
        assert_eq!(total.color, style.palette.total_annotation);
    }

    #[test]
    fn arrow_heads_point_outward() {
        let arrow = Arrow {
            x: 2.75,
            from: 1.0,
            to: 5.0,
        };
        let [shaft, top, bottom] = arrow.polylines(0.1, 0.2);
        assert_eq!(shaft, vec![(2.75, 1.0), (2.75, 5.0)]);
        assert_eq!(top[1], (2.75, 5.0));
        assert!((top[0].1 - 4.8).abs() < 1e-9);
        assert_eq!(bottom[1], (2.75, 1.0));
        assert!((bottom[0].1 - 1.2).abs() < 1e-9);
        assert!((top[2].0 - top[0].0 - 0.1).abs() < 1e-9);
    }

    #[test]
    fn axis_text_and_ticks() {
        let style = ChartStyle::classic();
        let layout = builtin_layout(&style);
        assert_eq!(layout.y_label, "Latency w.r.t. ARCANE");
        assert_eq!(layout.tick_label(0.0), Some("Node 0"));
        assert_eq!(layout.tick_label(2.0), Some("Node 2"));
        assert_eq!(layout.tick_label(3.0), Some("Total"));
        assert_eq!(layout.tick_label(0.5), None);
    }

    #[test]
    fn y_range_covers_tallest_annotation() {
        let style = ChartStyle::classic();
        let layout = builtin_layout(&style);
        let highest = layout.annotations.iter().map(|a| a.y).fold(0.0, f64::max);
        assert!(layout.y_range.1 > highest);
        assert_eq!(layout.y_range.0, 0.0);
    }

    #[test]
    fn legend_follows_style() {
        let style = ChartStyle::compact();
        let layout = builtin_layout(&style);
        let labels: Vec<&str> = layout.legend.iter().map(|e| e.label).collect();
        assert_eq!(labels, ["ARCANE NMC", "ARCANE CPU", "CPU-Only"]);
        assert_eq!(layout.legend[2].color, style.palette.cpu_only);
        assert_eq!(layout.legend_style, LegendStyle::Rectangle);
        assert_eq!(layout.bars[0].width, 0.35);
    }

    #[test]
    fn single_node_gives_one_pair_plus_total() {
        let style = ChartStyle::classic();
        let layout = RatioChartBuilder::new(&style)
            .build_from(&[ProfilingSample::new(9, 1)], &[CpuOnlySample::new(30)])
            .unwrap();
        assert_eq!(layout.bars.len(), 5);
        assert_eq!(layout.x_ticks.len(), 2);
        assert_eq!(layout.bars[4].height, layout.bars[2].height);
    }

    #[test]
    fn build_from_rejects_zero_node() {
        let style = ChartStyle::classic();
        let err = RatioChartBuilder::new(&style)
            .build_from(
                &[ProfilingSample::new(5, 5), ProfilingSample::new(0, 0)],
                &[CpuOnlySample::new(1), CpuOnlySample::new(1)],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ChartError::InvalidInput(InvalidInput::ZeroTotal { node: 1 })
        ));
    }

    #[test]
    fn build_is_deterministic() {
        let style = ChartStyle::classic();
        assert_eq!(builtin_layout(&style), builtin_layout(&style));
    }
}
