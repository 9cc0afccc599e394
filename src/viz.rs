use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::catalog::ChartSpec;
use crate::charts::{Bar, Chart, ChartData, Orientation};
use crate::stats::Histogram;
use crate::utils::{format_compact, truncate_label};

pub const COLOR_BLUE: RGBColor = RGBColor(59, 130, 246);
pub const COLOR_GREEN: RGBColor = RGBColor(16, 185, 129);
pub const COLOR_RED: RGBColor = RGBColor(244, 63, 94);
pub const COLOR_PURPLE: RGBColor = RGBColor(139, 92, 246);
pub const COLOR_TEAL: RGBColor = RGBColor(20, 184, 166);
pub const COLOR_ORANGE: RGBColor = RGBColor(249, 115, 22);
const COLOR_GRAY_LIGHT: RGBColor = RGBColor(243, 244, 246);

const MAGMA: [RGBColor; 5] = [
    RGBColor(0, 0, 4),
    RGBColor(81, 18, 124),
    RGBColor(183, 55, 121),
    RGBColor(252, 137, 97),
    RGBColor(252, 253, 191),
];
const MAKO: [RGBColor; 5] = [
    RGBColor(11, 4, 5),
    RGBColor(53, 43, 98),
    RGBColor(54, 109, 156),
    RGBColor(62, 174, 168),
    RGBColor(222, 245, 229),
];
const CIVIDIS: [RGBColor; 5] = [
    RGBColor(0, 34, 78),
    RGBColor(64, 76, 108),
    RGBColor(124, 123, 120),
    RGBColor(188, 175, 111),
    RGBColor(254, 232, 56),
];
const VIRIDIS: [RGBColor; 5] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
];
const INFERNO: [RGBColor; 5] = [
    RGBColor(0, 0, 4),
    RGBColor(87, 16, 110),
    RGBColor(188, 55, 84),
    RGBColor(249, 142, 9),
    RGBColor(252, 255, 164),
];
const ICEFIRE: [RGBColor; 5] = [
    RGBColor(189, 231, 240),
    RGBColor(59, 130, 200),
    RGBColor(30, 30, 40),
    RGBColor(200, 60, 40),
    RGBColor(250, 220, 160),
];
const BRIGHT: [RGBColor; 10] = [
    RGBColor(2, 62, 255),
    RGBColor(255, 124, 0),
    RGBColor(26, 201, 56),
    RGBColor(232, 0, 11),
    RGBColor(139, 43, 226),
    RGBColor(159, 72, 0),
    RGBColor(241, 76, 193),
    RGBColor(163, 163, 163),
    RGBColor(255, 196, 0),
    RGBColor(0, 215, 255),
];
// Sequential palettes run dark to light so the largest bar is the darkest
const PURPLES: [RGBColor; 3] = [RGBColor(63, 0, 125), RGBColor(158, 154, 200), RGBColor(239, 237, 245)];
const GREENS: [RGBColor; 3] = [RGBColor(0, 68, 27), RGBColor(65, 171, 93), RGBColor(229, 245, 224)];
const BLUES: [RGBColor; 3] = [RGBColor(8, 48, 107), RGBColor(66, 146, 198), RGBColor(222, 235, 247)];
const REDS: [RGBColor; 3] = [RGBColor(103, 0, 13), RGBColor(239, 59, 44), RGBColor(254, 224, 210)];
const ORANGES: [RGBColor; 3] = [RGBColor(127, 39, 4), RGBColor(241, 105, 19), RGBColor(254, 230, 206)];

/// Longest bar label drawn before truncation
const LABEL_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Palette {
    Magma,
    Mako,
    Cividis,
    Viridis,
    Inferno,
    Icefire,
    Bright,
    Purples,
    Greens,
    Blues,
    Reds,
    Oranges,
    Solid(RGBColor),
}

impl Palette {
    fn stops(self) -> &'static [RGBColor] {
        match self {
            Palette::Magma => &MAGMA,
            Palette::Mako => &MAKO,
            Palette::Cividis => &CIVIDIS,
            Palette::Viridis => &VIRIDIS,
            Palette::Inferno => &INFERNO,
            Palette::Icefire => &ICEFIRE,
            Palette::Bright => &BRIGHT,
            Palette::Purples => &PURPLES,
            Palette::Greens => &GREENS,
            Palette::Blues => &BLUES,
            Palette::Reds => &REDS,
            Palette::Oranges => &ORANGES,
            Palette::Solid(_) => &[],
        }
    }

    /// Colour at position `t` in `[0, 1]` along the palette
    pub fn at(self, t: f64) -> RGBColor {
        if let Palette::Solid(color) = self {
            return color;
        }
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if self == Palette::Bright {
            let idx = (t * (stops.len() - 1) as f64).round() as usize;
            return stops[idx];
        }

        let pos = t * (stops.len() - 1) as f64;
        let idx = (pos.floor() as usize).min(stops.len() - 2);
        let frac = pos - idx as f64;
        let (a, b) = (stops[idx], stops[idx + 1]);
        let lerp = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * frac).round() as u8;
        RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    /// Colour of item `index` out of `count`. Gradients are sampled at bin
    /// centres so neither extreme is used; `Bright` cycles.
    pub fn color(self, index: usize, count: usize) -> RGBColor {
        match self {
            Palette::Solid(color) => color,
            Palette::Bright => BRIGHT[index % BRIGHT.len()],
            _ => self.at((index as f64 + 0.5) / count.max(1) as f64),
        }
    }
}

/// Where and how large the rendered chart is
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Draw `chart` to an SVG file, replacing any previous chart at that path
pub fn render_chart(chart: &Chart, options: &RenderOptions) -> Result<PathBuf> {
    if let Some(parent) = options.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }
    }

    let root = SVGBackend::new(&options.output_path, (options.width, options.height))
        .into_drawing_area();
    root.fill(&WHITE)?;

    match &chart.data {
        ChartData::Distribution {
            histogram,
            density,
            color,
        } => draw_distribution(&root, chart.spec, histogram, density.as_deref(), *color)?,
        ChartData::Correlation {
            labels,
            matrix,
            palette,
        } => draw_heatmap(&root, chart.spec, labels, matrix, *palette)?,
        ChartData::Bars {
            bars,
            orientation: Orientation::Horizontal,
            palette,
        } => draw_horizontal_bars(&root, chart.spec, bars, *palette)?,
        ChartData::Bars {
            bars,
            orientation: Orientation::Vertical,
            palette,
        } => draw_vertical_bars(&root, chart.spec, bars, *palette)?,
        ChartData::Scatter { points, color } => draw_scatter(&root, chart.spec, points, *color)?,
    }

    root.present()
        .with_context(|| format!("Failed to write {}", options.output_path.display()))?;
    info!(chart = chart.spec.label, path = %options.output_path.display(), "Rendered chart");
    Ok(options.output_path.clone())
}

/// Upper bound for a zero-based value axis, with headroom for value labels
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.15
    } else {
        1.0
    }
}

/// Data range padded by 5% on each side
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn draw_distribution(
    root: &Area,
    spec: &ChartSpec,
    histogram: &Histogram,
    density: Option<&[(f64, f64)]>,
    color: RGBColor,
) -> Result<()> {
    let (x_lo, x_hi) = match (histogram.edges.first(), histogram.edges.last()) {
        (Some(lo), Some(hi)) => (*lo, *hi),
        _ => (0.0, 1.0),
    };
    let y_hi = axis_max(std::iter::once(histogram.max_count() as f64));

    let mut chart = ChartBuilder::on(root)
        .caption(spec.title, ("sans-serif", 28).into_font().color(&BLACK))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .x_label_formatter(&|x| format_compact(*x))
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    chart.draw_series(
        histogram
            .edges
            .windows(2)
            .zip(&histogram.counts)
            .map(|(edge, count)| {
                Rectangle::new([(edge[0], 0.0), (edge[1], *count as f64)], color.mix(0.6).filled())
            }),
    )?;

    if let Some(curve) = density {
        chart.draw_series(LineSeries::new(curve.iter().copied(), color.stroke_width(2)))?;
    }

    Ok(())
}

fn draw_heatmap(
    root: &Area,
    spec: &ChartSpec,
    labels: &[&str; 3],
    matrix: &[[f64; 3]; 3],
    palette: Palette,
) -> Result<()> {
    let (width, height) = root.dim_in_pixel();
    let (width, height) = (width as i32, height as i32);

    root.draw_text(
        spec.title,
        &("sans-serif", 28)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top)),
        (width / 2, 20),
    )?;

    let left = 160;
    let top = 80;
    let grid = (width - left - 140).min(height - top - 80).max(90);
    let cell = grid / 3;

    let label_style = ("sans-serif", 16).into_font().color(&BLACK);
    for (i, row) in matrix.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let x0 = left + j as i32 * cell;
            let y0 = top + i as i32 * cell;
            let fill = if value.is_nan() {
                COLOR_GRAY_LIGHT
            } else {
                palette.at((value + 1.0) / 2.0)
            };
            root.draw(&Rectangle::new([(x0, y0), (x0 + cell, y0 + cell)], fill.filled()))?;
            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + cell, y0 + cell)],
                WHITE.stroke_width(2),
            ))?;

            let text = if value.is_nan() {
                "nan".to_string()
            } else {
                format!("{:.2}", value)
            };
            let ink = if luminance(fill) < 128.0 { WHITE } else { BLACK };
            root.draw_text(
                &text,
                &("sans-serif", 20)
                    .into_font()
                    .color(&ink)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
                (x0 + cell / 2, y0 + cell / 2),
            )?;
        }

        let y = top + i as i32 * cell + cell / 2;
        root.draw_text(
            labels[i],
            &label_style.pos(Pos::new(HPos::Right, VPos::Center)),
            (left - 10, y),
        )?;
        let x = left + i as i32 * cell + cell / 2;
        root.draw_text(
            labels[i],
            &label_style.pos(Pos::new(HPos::Center, VPos::Top)),
            (x, top + 3 * cell + 10),
        )?;
    }

    // Colour bar from -1 at the bottom to 1 at the top
    let bar_x = left + 3 * cell + 30;
    let steps = 50;
    for step in 0..steps {
        let t = 1.0 - step as f64 / (steps - 1) as f64;
        let y0 = top + step * 3 * cell / steps;
        let y1 = top + (step + 1) * 3 * cell / steps;
        root.draw(&Rectangle::new([(bar_x, y0), (bar_x + 20, y1)], palette.at(t).filled()))?;
    }
    let tick_style = ("sans-serif", 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (label, y) in [("1.0", top), ("0.0", top + 3 * cell / 2), ("-1.0", top + 3 * cell)] {
        root.draw_text(label, &tick_style, (bar_x + 28, y))?;
    }

    Ok(())
}

fn luminance(color: RGBColor) -> f64 {
    0.299 * f64::from(color.0) + 0.587 * f64::from(color.1) + 0.114 * f64::from(color.2)
}

fn draw_horizontal_bars(root: &Area, spec: &ChartSpec, bars: &[Bar], palette: Palette) -> Result<()> {
    let n = bars.len();
    let x_hi = axis_max(bars.iter().filter_map(|b| b.value));

    let mut chart = ChartBuilder::on(root)
        .caption(spec.title, ("sans-serif", 28).into_font().color(&BLACK))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(320)
        .build_cartesian_2d(0f64..x_hi, 0f64..n.max(1) as f64)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .x_label_formatter(&|x| format_compact(*x))
        .y_label_formatter(&|_| String::new())
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    let label_style = ("sans-serif", 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    let value_style = ("sans-serif", 12)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    // First bar at the top
    for (i, bar) in bars.iter().enumerate() {
        let upper = (n - i) as f64;
        let center = upper - 0.5;

        if let Some(value) = bar.value {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(0.0, upper - 0.1), (value, upper - 0.9)],
                palette.color(i, n).filled(),
            )))?;
            let (px, py) = chart.backend_coord(&(value, center));
            root.draw_text(&format_compact(value), &value_style, (px + 5, py))?;
        }

        let (px, py) = chart.backend_coord(&(0.0, center));
        root.draw_text(&truncate_label(&bar.label, LABEL_CHARS), &label_style, (px - 8, py))?;
    }

    Ok(())
}

fn draw_vertical_bars(root: &Area, spec: &ChartSpec, bars: &[Bar], palette: Palette) -> Result<()> {
    let n = bars.len();
    let y_hi = axis_max(bars.iter().filter_map(|b| b.value));

    let mut chart = ChartBuilder::on(root)
        .caption(spec.title, ("sans-serif", 28).into_font().color(&BLACK))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..n.max(1) as f64, 0f64..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|y| format_compact(*y))
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    let label_style = ("sans-serif", 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));

    for (i, bar) in bars.iter().enumerate() {
        let left = i as f64;
        if let Some(value) = bar.value {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(left + 0.1, 0.0), (left + 0.9, value)],
                palette.color(i, n).filled(),
            )))?;
        }
        let (px, py) = chart.backend_coord(&(left + 0.5, 0.0));
        root.draw_text(&bar.label, &label_style, (px, py + 6))?;
    }

    Ok(())
}

fn draw_scatter(root: &Area, spec: &ChartSpec, points: &[(f64, f64)], color: RGBColor) -> Result<()> {
    let (x_lo, x_hi) = padded_range(points.iter().map(|p| p.0));
    let y_hi = axis_max(points.iter().map(|p| p.1));

    let mut chart = ChartBuilder::on(root)
        .caption(spec.title, ("sans-serif", 28).into_font().color(&BLACK))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .y_label_formatter(&|y| format_compact(*y))
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.6).filled())),
    )?;

    Ok(())
}
