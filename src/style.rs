//! Presentation settings for the ratio chart.
//!
//! Everything that only changes how the chart looks lives here, so the
//! layout code has a single path regardless of palette or legend flavour.

use crate::error::{ChartError, Result};
use plotters::style::RGBColor;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// `#rrggbb` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| format!("expected #rrggbb, got {:?}", s))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("{:?}: {}", s, e))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

pub const INDIAN_RED: Rgb = Rgb(205, 92, 92);
pub const MAROON: Rgb = Rgb(128, 0, 0);
pub const NAVAJO_WHITE: Rgb = Rgb(255, 222, 173);
pub const DARK_GOLDENROD: Rgb = Rgb(184, 134, 11);
pub const FIREBRICK: Rgb = Rgb(178, 34, 34);

/// How legend swatches are drawn and where the legend sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendStyle {
    /// Short line swatches in the upper-right corner.
    Line,
    /// Filled squares, centred along the top edge.
    Rectangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub arcane_nmc: Rgb,
    pub arcane_cpu: Rgb,
    pub cpu_only: Rgb,
    /// Text color of the per-node CPU-only annotations.
    pub node_annotation: Rgb,
    /// Text color of the Total improvement annotation.
    pub total_annotation: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub palette: Palette,
    /// Width of one bar in x-axis units; a pair spans twice this.
    pub bar_width: f64,
    pub legend: LegendStyle,
    pub annotation_font_size: u32,
    pub label_font_size: u32,
    pub title_font_size: u32,
}

impl ChartStyle {
    pub fn classic() -> Self {
        Self {
            palette: Palette {
                arcane_nmc: INDIAN_RED,
                arcane_cpu: MAROON,
                cpu_only: NAVAJO_WHITE,
                node_annotation: DARK_GOLDENROD,
                total_annotation: FIREBRICK,
            },
            bar_width: 0.5,
            legend: LegendStyle::Line,
            annotation_font_size: 12,
            label_font_size: 14,
            title_font_size: 18,
        }
    }

    /// Narrower bars, cooler palette and a filled legend above the bars.
    pub fn compact() -> Self {
        Self {
            palette: Palette {
                arcane_nmc: Rgb(70, 130, 180),
                arcane_cpu: Rgb(25, 25, 112),
                cpu_only: Rgb(192, 192, 192),
                node_annotation: Rgb(105, 105, 105),
                total_annotation: Rgb(25, 25, 112),
            },
            bar_width: 0.35,
            legend: LegendStyle::Rectangle,
            annotation_font_size: 12,
            label_font_size: 14,
            title_font_size: 18,
        }
    }

    /// Overlay the fields set in a TOML style file on top of `self`.
    pub fn with_file(self, path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let overrides: StyleOverrides =
            toml::from_str(&text).map_err(|source| ChartError::Style {
                path: path.to_path_buf(),
                source,
            })?;
        let style = overrides.apply(self);
        style.validate()?;
        Ok(style)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.bar_width > 0.0 && self.bar_width <= 0.5) {
            return Err(ChartError::InvalidStyle(format!(
                "bar_width must be in (0, 0.5], got {}",
                self.bar_width
            )));
        }
        if self.annotation_font_size == 0 || self.label_font_size == 0 || self.title_font_size == 0
        {
            return Err(ChartError::InvalidStyle("font sizes must be positive".into()));
        }
        Ok(())
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::classic()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PaletteOverrides {
    arcane_nmc: Option<Rgb>,
    arcane_cpu: Option<Rgb>,
    cpu_only: Option<Rgb>,
    node_annotation: Option<Rgb>,
    total_annotation: Option<Rgb>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StyleOverrides {
    palette: PaletteOverrides,
    bar_width: Option<f64>,
    legend: Option<LegendStyle>,
    annotation_font_size: Option<u32>,
    label_font_size: Option<u32>,
    title_font_size: Option<u32>,
}

impl StyleOverrides {
    fn apply(self, mut style: ChartStyle) -> ChartStyle {
        let p = &mut style.palette;
        p.arcane_nmc = self.palette.arcane_nmc.unwrap_or(p.arcane_nmc);
        p.arcane_cpu = self.palette.arcane_cpu.unwrap_or(p.arcane_cpu);
        p.cpu_only = self.palette.cpu_only.unwrap_or(p.cpu_only);
        p.node_annotation = self.palette.node_annotation.unwrap_or(p.node_annotation);
        p.total_annotation = self.palette.total_annotation.unwrap_or(p.total_annotation);

        style.bar_width = self.bar_width.unwrap_or(style.bar_width);
        style.legend = self.legend.unwrap_or(style.legend);
        style.annotation_font_size = self
            .annotation_font_size
            .unwrap_or(style.annotation_font_size);
        style.label_font_size = self.label_font_size.unwrap_or(style.label_font_size);
        style.title_font_size = self.title_font_size.unwrap_or(style.title_font_size);
        style
    }
}
