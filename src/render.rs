//! Draws a [`ChartLayout`] with plotters.

use crate::error::{ChartError, Result};
use crate::layout::{ChartLayout, RatioChartBuilder};
use crate::profile::{CpuOnlySample, ProfilingSample};
use crate::style::{ChartStyle, LegendStyle};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::{debug, info};

const FONT: &str = "sans-serif";
/// Arrow head size as fractions of bar width and of the y span.
const ARROW_HEAD_WIDTH: f64 = 0.3;
const ARROW_HEAD_HEIGHT: f64 = 0.03;
/// Pixels between the x axis and the top of a tick label.
const TICK_LABEL_GAP: i32 = 5;
const SWATCH: i32 = 12;
const SWATCH_GAP: i32 = 6;
const ENTRY_SPACING: i32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Bitmap,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("svg") => Ok(Self::Svg),
            Some("png" | "bmp" | "jpg" | "jpeg") => Ok(Self::Bitmap),
            _ => Err(ChartError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

fn font(size: u32) -> FontDesc<'static> {
    (FONT, f64::from(size)).into_font()
}

fn render_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Draw `layout` onto `root` and flush it.
///
/// The line legend sits inside the plot, upper-right. The rectangle legend
/// gets its own strip between the title and the plot so it never covers bars.
pub fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &ChartLayout,
    style: &ChartStyle,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let body = root.titled(layout.title, font(style.title_font_size))?;

    let plot_area = match layout.legend_style {
        LegendStyle::Line => body,
        LegendStyle::Rectangle => {
            let (strip, rest) = body.split_vertically(legend_strip_height(style));
            draw_legend_strip(&strip, layout, style)?;
            rest
        }
    };

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            layout.x_range.0..layout.x_range.1,
            layout.y_range.0..layout.y_range.1,
        )?;

    // Ticks are drawn by hand below so they sit exactly under each bar pair.
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc(layout.x_label)
        .y_desc(layout.y_label)
        .axis_desc_style(font(style.label_font_size))
        .draw()?;

    let tick_style = font(style.label_font_size)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    chart.draw_series(layout.x_ticks.iter().map(|(x, label)| {
        EmptyElement::at((*x, layout.y_range.0))
            + Text::new(label.clone(), (0, TICK_LABEL_GAP), tick_style.clone())
    }))?;

    for entry in &layout.legend {
        let color = RGBColor::from(entry.color);
        let series = entry.series;
        let anno = chart.draw_series(
            layout
                .bars
                .iter()
                .filter(move |b| b.series == series)
                .map(move |b| {
                    Rectangle::new([(b.left(), b.bottom), (b.right(), b.top())], color.filled())
                }),
        )?;
        if layout.legend_style == LegendStyle::Line {
            anno.label(entry.label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        }
    }

    let y_span = layout.y_range.1 - layout.y_range.0;
    let arrow = layout.arrow.polylines(
        style.bar_width * ARROW_HEAD_WIDTH,
        y_span * ARROW_HEAD_HEIGHT,
    );
    chart.draw_series(
        arrow
            .into_iter()
            .map(|points| PathElement::new(points, BLACK.stroke_width(1))),
    )?;

    let bold = font(style.annotation_font_size).style(FontStyle::Bold);
    chart.draw_series(layout.annotations.iter().map(|a| {
        Text::new(
            a.text.clone(),
            (a.x, a.y),
            bold.color(&RGBColor::from(a.color))
                .pos(Pos::new(HPos::Left, VPos::Center)),
        )
    }))?;

    if layout.legend_style == LegendStyle::Line {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(font(style.label_font_size))
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Pixel height reserved above the plot for the rectangle legend.
pub fn legend_strip_height(style: &ChartStyle) -> u32 {
    style.label_font_size * 2
}

/// Filled swatches with their labels, centred horizontally in `area`.
fn draw_legend_strip<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    layout: &ChartLayout,
    style: &ChartStyle,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let label_style = font(style.label_font_size)
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    let mut widths = Vec::with_capacity(layout.legend.len());
    for entry in &layout.legend {
        let (w, _) = area.estimate_text_size(entry.label, &label_style)?;
        widths.push(SWATCH + SWATCH_GAP + w as i32);
    }
    let total: i32 =
        widths.iter().sum::<i32>() + ENTRY_SPACING * (widths.len() as i32 - 1).max(0);

    let (width, height) = area.dim_in_pixel();
    let y = height as i32 / 2;
    let mut x = (width as i32 - total).max(0) / 2;
    for (entry, w) in layout.legend.iter().zip(widths) {
        let color = RGBColor::from(entry.color);
        area.draw(&Rectangle::new(
            [(x, y - SWATCH / 2), (x + SWATCH, y + SWATCH / 2)],
            color.filled(),
        ))?;
        area.draw(&Text::new(
            entry.label,
            (x + SWATCH + SWATCH_GAP, y),
            label_style.clone(),
        ))?;
        x += w + ENTRY_SPACING;
    }
    Ok(())
}

/// Write the chart to `path`; the backend is picked from the extension.
pub fn render_to_file(
    layout: &ChartLayout,
    style: &ChartStyle,
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    let format = OutputFormat::from_path(path)?;
    debug!(?format, ?size, path = %path.display(), "rendering chart");
    match format {
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw(&root, layout, style).map_err(render_error)?;
        }
        OutputFormat::Bitmap => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw(&root, layout, style).map_err(render_error)?;
        }
    }
    info!(path = %path.display(), "chart written");
    Ok(())
}

/// Render to an in-memory SVG document, for embedding.
pub fn render_to_svg_string(
    layout: &ChartLayout,
    style: &ChartStyle,
    size: (u32, u32),
) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        draw(&root, layout, style).map_err(render_error)?;
    }
    Ok(buf)
}

/// Validate the tables, lay them out, then draw onto `root`.
///
/// Nothing touches `root` unless validation succeeds.
pub fn build_and_draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    profiling: &[ProfilingSample],
    cpu_only: &[CpuOnlySample],
    style: &ChartStyle,
) -> Result<ChartLayout> {
    let layout = RatioChartBuilder::new(style).build_from(profiling, cpu_only)?;
    draw(root, &layout, style).map_err(render_error)?;
    Ok(layout)
}

/// Validate, lay out and write the chart to `path`.
pub fn build_and_render(
    profiling: &[ProfilingSample],
    cpu_only: &[CpuOnlySample],
    style: &ChartStyle,
    path: &Path,
    size: (u32, u32),
) -> Result<ChartLayout> {
    let layout = RatioChartBuilder::new(style).build_from(profiling, cpu_only)?;
    render_to_file(&layout, style, path, size)?;
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("chart.svg")).unwrap(),
            OutputFormat::Svg
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("out/Chart.PNG")).unwrap(),
            OutputFormat::Bitmap
        );
        assert!(matches!(
            OutputFormat::from_path(Path::new("chart.pdf")),
            Err(ChartError::UnsupportedFormat(_))
        ));
        assert!(OutputFormat::from_path(Path::new("chart")).is_err());
    }

    #[test]
    fn legend_strip_follows_label_font() {
        let mut style = ChartStyle::compact();
        assert_eq!(legend_strip_height(&style), 28);
        style.label_font_size = 20;
        assert_eq!(legend_strip_height(&style), 40);
    }

    #[test]
    fn unsupported_format_fails_before_creating_file() {
        let path = std::env::temp_dir().join("arcane_plot_never_written.gif");
        let layout =
            RatioChartBuilder::new(&ChartStyle::classic()).build(&crate::Dataset::builtin());
        let err = render_to_file(&layout, &ChartStyle::classic(), &path, (100, 100)).unwrap_err();
        assert!(matches!(err, ChartError::UnsupportedFormat(_)));
        assert!(!path.exists());
    }
}
