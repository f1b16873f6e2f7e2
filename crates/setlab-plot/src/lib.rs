use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use setlab::visual::{BAR_BASE, BAR_SCALE, Bar, VennRegions};
use setlab_utils::braced;

pub struct ChartOptions {
    pub size: (u32, u32),
    pub caption: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            size: (640, 480),
            caption: "Cardinality".to_owned(),
        }
    }
}

pub struct VennOptions {
    pub size: (u32, u32),
    pub left_name: String,
    pub right_name: String,
}

impl Default for VennOptions {
    fn default() -> Self {
        Self {
            size: (800, 500),
            left_name: "A".to_owned(),
            right_name: "B".to_owned(),
        }
    }
}

fn rgb(hex: &str) -> RGBColor {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
            .unwrap_or(0)
    };
    RGBColor(channel(1..3), channel(3..5), channel(5..7))
}

/// Writes a bar per set, labelled with its name below and its cardinality above.
pub fn draw_cardinality_chart(
    path: &Path,
    bars: &[Bar],
    opts: &ChartOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, opts.size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&opts.caption, ("sans-serif", 40).into_font())
        .margin(10)
        .build_cartesian_2d(
            0f64..bars.len().max(1) as f64,
            -20f64..BAR_BASE + BAR_SCALE + 30.0,
        )?;

    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        let x = i as f64;
        Rectangle::new(
            [(x + 0.15, 0.0), (x + 0.85, bar.height)],
            rgb(bar.color).filled(),
        )
    }))?;

    let value_style = TextStyle::from(("sans-serif", 18).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        Text::new(
            bar.cardinality.to_string(),
            (i as f64 + 0.5, bar.height + 4.0),
            value_style.clone(),
        )
    }))?;

    let name_style = TextStyle::from(("sans-serif", 18).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        Text::new(
            bar.name.clone(),
            (i as f64 + 0.5, -4.0),
            name_style.clone(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Writes two overlapping circles with the elements of each region printed inside.
pub fn draw_venn(
    path: &Path,
    regions: &VennRegions,
    opts: &VennOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, opts.size).into_drawing_area();
    root.fill(&WHITE)?;

    let (width, height) = opts.size;
    let (width, height) = (width as i32, height as i32);
    let radius = height / 3;
    let center_y = height / 2 + 20;
    let left_x = width / 2 - radius * 3 / 5;
    let right_x = width / 2 + radius * 3 / 5;
    let left_color = rgb("#4c8bff");
    let right_color = rgb("#28a745");

    for (x, color) in [(left_x, left_color), (right_x, right_color)] {
        root.draw(&Circle::new(
            (x, center_y),
            radius,
            color.mix(0.25).filled(),
        ))?;
        root.draw(&Circle::new(
            (x, center_y),
            radius,
            ShapeStyle::from(&color).stroke_width(2),
        ))?;
    }

    let centered = Pos::new(HPos::Center, VPos::Center);
    let title_style = TextStyle::from(("sans-serif", 28).into_font()).pos(centered);
    let region_style = TextStyle::from(("sans-serif", 16).into_font()).pos(centered);

    let title_y = center_y - radius - 20;
    root.draw(&Text::new(
        opts.left_name.clone(),
        (left_x - radius / 2, title_y),
        title_style.clone(),
    ))?;
    root.draw(&Text::new(
        opts.right_name.clone(),
        (right_x + radius / 2, title_y),
        title_style,
    ))?;

    let placed = [
        (&regions.only_left, left_x - radius / 2),
        (&regions.both, width / 2),
        (&regions.only_right, right_x + radius / 2),
    ];
    for (elements, x) in placed {
        root.draw(&Text::new(
            braced(elements),
            (x, center_y),
            region_style.clone(),
        ))?;
    }

    root.present()?;
    Ok(())
}
