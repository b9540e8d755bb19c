//! Relative-latency bar chart of ARCANE vs. CPU-only profiling runs.
//!
//! Every node's costs are normalized by its own ARCANE total, so the stacked
//! ARCANE bar is always 1.0 high and the CPU-only bar shows the slowdown
//! without acceleration. A final "Total" pair shows the aggregate factor.

pub mod error;
pub mod layout;
pub mod profile;
pub mod ratio;
pub mod render;
pub mod style;

pub use error::{ChartError, InvalidInput, Result};
pub use layout::{ChartLayout, RatioChartBuilder, Series};
pub use profile::{CpuOnlySample, Dataset, ProfilingSample, ARCANE_PROFILING, CPU_ONLY_PROFILING};
pub use ratio::{NodeRatio, RatioResult};
pub use render::{build_and_draw, build_and_render, render_to_file, render_to_svg_string};
pub use style::{ChartStyle, LegendStyle, Rgb};
