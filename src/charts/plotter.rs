//! Chart Plotter Module
//! Interactive views of aggregate buckets using egui_plot and the egui painter.

use crate::aggregate::{AggregateBucket, Dimension};
use crate::charts::captions::Captions;
use crate::charts::palette::{count_level, descending_level, rank_level, reds, to_egui};
use egui::{Align2, Color32, FontId, RichText, Sense, Shape, Stroke};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};
use std::f64::consts::TAU;

/// Line and marker colour of the time views.
pub const LINE_COLOR: Color32 = Color32::from_rgb(220, 20, 20);

const BUBBLE_SPACING: f64 = 0.8;
const BUBBLE_MAX_RADIUS: f32 = 60.0;
const PIE_SEGMENT_STEP: f64 = TAU / 180.0;

/// Shade of every bucket, scaled by count between the smallest and largest.
fn count_shades(buckets: &[AggregateBucket]) -> Vec<Color32> {
    let min = buckets.iter().map(|b| b.count).min().unwrap_or(0);
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0);
    buckets
        .iter()
        .map(|b| to_egui(reds(0.15 + 0.85 * count_level(b.count, min, max))))
        .collect()
}

/// Shade of every bucket from its count rank, darkest for rank 1.
pub fn rank_shades(buckets: &[AggregateBucket]) -> Vec<Color32> {
    let ranks = buckets.len();
    buckets
        .iter()
        .map(|b| to_egui(reds(rank_level(b.rank.unwrap_or(1), ranks))))
        .collect()
}

/// Index formatter for category axes.
fn label_at(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Creates the dashboard's interactive charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// One bubble per category in a row; size and shade follow the count.
    pub fn draw_bubble_chart(
        ui: &mut egui::Ui,
        buckets: &[AggregateBucket],
        captions: &Captions,
        height: f32,
    ) {
        let max = buckets.iter().map(|b| b.count).max().unwrap_or(1).max(1);
        let shades = count_shades(buckets);
        let labels: Vec<String> = buckets.iter().map(|b| b.label.clone()).collect();

        Plot::new("bubble_category")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_y(false)
            .show_grid(false)
            .include_x(-0.6)
            .include_x((buckets.len().max(1) as f64 - 1.0) * BUBBLE_SPACING + 0.6)
            .include_y(0.0)
            .include_y(2.0)
            .y_axis_formatter(|_mark, _range| String::new())
            .x_axis_formatter(move |mark, _range| label_at(&labels, mark.value / BUBBLE_SPACING))
            .label_formatter(|name, _point| name.to_string())
            .show(ui, |plot_ui| {
                for (i, (bucket, shade)) in buckets.iter().zip(&shades).enumerate() {
                    let radius = BUBBLE_MAX_RADIUS * (bucket.count as f32 / max as f32).sqrt();
                    plot_ui.points(
                        Points::new(vec![[i as f64 * BUBBLE_SPACING, 1.0]])
                            .radius(radius.max(3.0))
                            .color(*shade)
                            .name(format!(
                                "{}: {}\n{}: {}",
                                captions.dimension(Dimension::Category),
                                bucket.label,
                                captions.count,
                                bucket.count
                            )),
                    );
                }
            });
    }

    /// Horizontal bars, first bucket on top and darkest.
    pub fn draw_premises_bars(
        ui: &mut egui::Ui,
        buckets: &[AggregateBucket],
        captions: &Captions,
        height: f32,
    ) {
        let n = buckets.len();
        // Row 0 is drawn at the top.
        let labels: Vec<String> = buckets.iter().rev().map(|b| b.label.clone()).collect();

        let bars: Vec<Bar> = buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| {
                Bar::new((n - 1 - i) as f64, bucket.count as f64)
                    .name(format!(
                        "{}: {}\n{}: {}",
                        captions.dimension(Dimension::PremisesType),
                        bucket.label,
                        captions.count,
                        bucket.count
                    ))
                    .fill(to_egui(reds(descending_level(i, n))))
                    .width(0.7)
            })
            .collect();

        Plot::new("bars_premises")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label(captions.incidents_axis)
            .y_axis_label(captions.dimension(Dimension::PremisesType))
            .y_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().element_formatter(Box::new(
                    |bar, _chart| bar.name.clone(),
                )));
            });
    }

    /// Year pie drawn clockwise from twelve o'clock; slice shade follows rank.
    pub fn draw_year_pie(
        ui: &mut egui::Ui,
        buckets: &[AggregateBucket],
        captions: &Captions,
        size: f32,
    ) {
        let total: u64 = buckets.iter().map(|b| b.count).sum();
        let shades = rank_shades(buckets);

        let (response, painter) = ui.allocate_painter(egui::vec2(size, size), Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.45;

        let point_at = |angle: f64, r: f32| {
            center + egui::vec2(angle.sin() as f32 * r, -(angle.cos() as f32) * r)
        };

        let mut slices = Vec::with_capacity(buckets.len());
        let mut start = 0.0;
        for (bucket, shade) in buckets.iter().zip(&shades) {
            let sweep = if total == 0 { 0.0 } else { bucket.count as f64 / total as f64 * TAU };
            let end = start + sweep;

            let mut a = start;
            while a < end {
                let b = (a + PIE_SEGMENT_STEP).min(end);
                painter.add(Shape::convex_polygon(
                    vec![center, point_at(a, radius), point_at(b, radius)],
                    *shade,
                    Stroke::NONE,
                ));
                a = b;
            }
            painter.line_segment([center, point_at(start, radius)], Stroke::new(1.0, Color32::WHITE));
            slices.push((start, end));
            start = end;
        }

        for ((bucket, &(from, to)), shade) in buckets.iter().zip(&slices).zip(&shades) {
            let share = bucket.count as f64 / total.max(1) as f64;
            if share < 0.03 {
                continue;
            }
            let text_color = if shade.r() as u32 + shade.g() as u32 + shade.b() as u32 > 450 {
                Color32::BLACK
            } else {
                Color32::WHITE
            };
            painter.text(
                point_at((from + to) / 2.0, radius * 0.7),
                Align2::CENTER_CENTER,
                format!("{:.1}%", share * 100.0),
                FontId::proportional(12.0),
                text_color,
            );
        }

        if let Some(pos) = response.hover_pos() {
            let offset = pos - center;
            if offset.length() <= radius {
                let angle = (offset.x as f64).atan2(-(offset.y as f64)).rem_euclid(TAU);
                let hovered = slices
                    .iter()
                    .position(|&(from, to)| angle >= from && angle < to);
                if let Some(idx) = hovered {
                    let bucket = &buckets[idx];
                    response.on_hover_text_at_pointer(format!(
                        "{} {}\n{}: {} ({:.1}%)",
                        captions.dimension(Dimension::Year),
                        bucket.label,
                        captions.count,
                        bucket.count,
                        bucket.count as f64 / total.max(1) as f64 * 100.0
                    ));
                }
            }
        }

        Self::draw_legend(ui, buckets, &shades);
    }

    /// Colour swatches with bucket labels.
    pub fn draw_legend(ui: &mut egui::Ui, buckets: &[AggregateBucket], shades: &[Color32]) {
        ui.horizontal_wrapped(|ui| {
            for (bucket, shade) in buckets.iter().zip(shades) {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                ui.painter().rect_filled(rect, 2.0, *shade);
                ui.label(RichText::new(&bucket.label).size(12.0));
                ui.add_space(8.0);
            }
        });
    }

    /// Radial hour-of-day view, midnight at the top, clockwise.
    ///
    /// Expects the closed sequence from the hour aggregation.
    pub fn draw_hour_radar(
        ui: &mut egui::Ui,
        buckets: &[AggregateBucket],
        captions: &Captions,
        height: f32,
    ) {
        let max = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;
        let distinct = buckets.len().saturating_sub(1).max(1);

        let polar: Vec<[f64; 2]> = buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| {
                let hour = bucket.label.parse::<f64>().unwrap_or((i % distinct) as f64);
                let angle = hour / 24.0 * TAU;
                let r = bucket.count as f64 / max;
                [r * angle.sin(), r * angle.cos()]
            })
            .collect();

        Plot::new("radar_hour")
            .height(height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(-1.2)
            .include_x(1.2)
            .include_y(-1.2)
            .include_y(1.2)
            .label_formatter(|name, _point| name.to_string())
            .show(ui, |plot_ui| {
                let guide = Color32::from_gray(120);
                for ring in [0.25, 0.5, 0.75, 1.0] {
                    let circle: PlotPoints = (0..=96)
                        .map(|k| {
                            let a = k as f64 / 96.0 * TAU;
                            [ring * a.sin(), ring * a.cos()]
                        })
                        .collect();
                    plot_ui.line(Line::new(circle).color(guide).width(0.5));
                }
                for hour in (0..24).step_by(3) {
                    let a = hour as f64 / 24.0 * TAU;
                    plot_ui.line(
                        Line::new(vec![[0.0, 0.0], [a.sin(), a.cos()]])
                            .color(guide)
                            .width(0.5),
                    );
                    plot_ui.text(
                        Text::new(PlotPoint::new(1.12 * a.sin(), 1.12 * a.cos()), hour.to_string())
                            .color(guide),
                    );
                }

                for pair in polar.windows(2) {
                    plot_ui.polygon(
                        Polygon::new(vec![[0.0, 0.0], pair[0], pair[1]])
                            .fill_color(LINE_COLOR.gamma_multiply(0.25))
                            .stroke(Stroke::NONE),
                    );
                }
                plot_ui.line(Line::new(polar.clone()).color(LINE_COLOR).width(2.0));
                for (point, bucket) in polar.iter().zip(buckets).take(distinct) {
                    plot_ui.points(
                        Points::new(vec![*point])
                            .radius(3.0)
                            .color(LINE_COLOR)
                            .name(format!(
                                "{}: {}\n{}: {}",
                                captions.dimension(Dimension::Hour),
                                bucket.label,
                                captions.count,
                                bucket.count
                            )),
                    );
                }
            });
    }

    /// Line with markers over the buckets in their given order.
    pub fn draw_time_series(
        ui: &mut egui::Ui,
        dimension: Dimension,
        buckets: &[AggregateBucket],
        captions: &Captions,
        height: f32,
    ) {
        let labels: Vec<String> = buckets.iter().map(|b| b.label.clone()).collect();
        let points: Vec<[f64; 2]> = buckets
            .iter()
            .enumerate()
            .map(|(i, b)| [i as f64, b.count as f64])
            .collect();
        let axis = captions.dimension(dimension);
        let value_axis = captions.crimes_axis;
        let hover_labels = labels.clone();

        Plot::new(format!("series_{}", dimension.slug()))
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label(axis)
            .y_axis_label(value_axis)
            .x_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
            .label_formatter(move |_name, point| {
                let label = label_at(&hover_labels, point.x);
                if label.is_empty() {
                    return String::new();
                }
                format!("{}: {}\n{}: {:.0}", axis, label, value_axis, point.y)
            })
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(points.clone()).color(LINE_COLOR).width(2.0));
                plot_ui.points(Points::new(points).radius(3.5).color(LINE_COLOR));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_labels_only_on_whole_positions() {
        let labels = vec!["Assault".to_string(), "Theft".to_string()];
        assert_eq!(label_at(&labels, 1.0), "Theft");
        assert_eq!(label_at(&labels, 0.5), "");
        assert_eq!(label_at(&labels, -1.0), "");
        assert_eq!(label_at(&labels, 7.0), "");
    }

    #[test]
    fn top_ranked_slice_is_darkest() {
        let mut buckets = vec![
            AggregateBucket::new("2019", 10),
            AggregateBucket::new("2020", 30),
            AggregateBucket::new("Others", 2),
        ];
        crate::aggregate::calculator::assign_min_ranks(&mut buckets);
        let shades = rank_shades(&buckets);
        let brightness = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(brightness(shades[1]) < brightness(shades[0]));
        assert!(brightness(shades[0]) < brightness(shades[2]));
    }
}
