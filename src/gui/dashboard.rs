//! Dashboard Widget
//! Central scrollable page: every chart slot, the time tabs and the map.

use crime_dashboard::aggregate::{AggregateBucket, AggregateError, Aggregator, Dimension, TimeBreakdown};
use crime_dashboard::charts::{palette, Captions, ChartPlotter, ChoroplethMap};
use crime_dashboard::DataContext;
use egui::{Color32, ComboBox, RichText, ScrollArea, Sense, TextureHandle};

const ROW_HEIGHT: f32 = 380.0;
const MAP_SIZE: (u32, u32) = (1200, 700);

/// Which half of the "time of occurrence" section is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeTab {
    #[default]
    YearAndHour,
    DayAndMonth,
}

enum MapState {
    Pending,
    Ready {
        texture: TextureHandle,
        map: ChoroplethMap,
    },
    Empty,
    Failed(String),
}

pub struct Dashboard {
    tab: TimeTab,
    breakdown: TimeBreakdown,
    map: MapState,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            tab: TimeTab::default(),
            breakdown: TimeBreakdown::default(),
            map: MapState::Pending,
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterise the choropleth once the data context is available.
    pub fn prepare_map(&mut self, ctx: &egui::Context, data: &DataContext, aggregator: &Aggregator) {
        self.map = match aggregator.aggregate_spatial(data) {
            Ok(regions) if regions.is_empty() => MapState::Empty,
            Ok(regions) => match ChoroplethMap::render(&regions, MAP_SIZE.0, MAP_SIZE.1) {
                Ok(map) => {
                    let image = egui::ColorImage::from_rgb(
                        [map.width as usize, map.height as usize],
                        &map.pixels,
                    );
                    let texture = ctx.load_texture("choropleth", image, egui::TextureOptions::LINEAR);
                    MapState::Ready { texture, map }
                }
                Err(e) => MapState::Failed(e.to_string()),
            },
            Err(e) => MapState::Failed(e.to_string()),
        };
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        data: &DataContext,
        aggregator: &Aggregator,
        captions: &Captions,
    ) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(6.0);
                ui.label(RichText::new(format!("📊 {}", captions.title)).size(28.0).strong());
                ui.label(RichText::new(captions.subtitle).color(Color32::GRAY));
                ui.add_space(12.0);

                ui.columns(2, |columns| {
                    Self::heading(&mut columns[0], "🔴", captions.category_heading);
                    Self::chart_slot(
                        &mut columns[0],
                        aggregator.aggregate(data, Dimension::Category),
                        captions,
                        |ui, buckets| ChartPlotter::draw_bubble_chart(ui, buckets, captions, ROW_HEIGHT),
                    );

                    Self::heading(&mut columns[1], "🏠", captions.premises_heading);
                    Self::chart_slot(
                        &mut columns[1],
                        aggregator.aggregate(data, Dimension::PremisesType),
                        captions,
                        |ui, buckets| ChartPlotter::draw_premises_bars(ui, buckets, captions, ROW_HEIGHT),
                    );
                });

                ui.add_space(16.0);
                Self::heading(ui, "🕒", captions.time_heading);
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.tab, TimeTab::YearAndHour, format!("📅 {}", captions.tab_year_hour));
                    ui.selectable_value(&mut self.tab, TimeTab::DayAndMonth, format!("📈 {}", captions.tab_day_month));
                });
                ui.separator();

                match self.tab {
                    TimeTab::YearAndHour => self.show_year_and_hour(ui, data, aggregator, captions),
                    TimeTab::DayAndMonth => self.show_breakdown(ui, data, aggregator, captions),
                }

                ui.add_space(16.0);
                Self::heading(ui, "🗺", captions.map_heading);
                self.show_map(ui, captions);

                ui.add_space(24.0);
                ui.separator();
                ui.label(RichText::new(captions.footer).size(12.0).color(Color32::GRAY));
            });
    }

    fn show_year_and_hour(
        &self,
        ui: &mut egui::Ui,
        data: &DataContext,
        aggregator: &Aggregator,
        captions: &Captions,
    ) {
        ui.columns(2, |columns| {
            Self::chart_slot(
                &mut columns[0],
                aggregator.aggregate(data, Dimension::Year),
                captions,
                |ui, buckets| {
                    let size = ui.available_width().min(ROW_HEIGHT);
                    ChartPlotter::draw_year_pie(ui, buckets, captions, size);
                },
            );
            Self::chart_slot(
                &mut columns[1],
                aggregator.aggregate(data, Dimension::Hour),
                captions,
                |ui, buckets| ChartPlotter::draw_hour_radar(ui, buckets, captions, ROW_HEIGHT),
            );
        });
    }

    fn show_breakdown(
        &mut self,
        ui: &mut egui::Ui,
        data: &DataContext,
        aggregator: &Aggregator,
        captions: &Captions,
    ) {
        ui.horizontal(|ui| {
            ui.label(captions.breakdown_prompt);
            ComboBox::from_id_salt("time_breakdown")
                .width(220.0)
                .selected_text(captions.breakdown(self.breakdown))
                .show_ui(ui, |ui| {
                    for option in TimeBreakdown::ALL {
                        ui.selectable_value(&mut self.breakdown, option, captions.breakdown(option));
                    }
                });
        });
        ui.add_space(6.0);

        let dimension = self.breakdown.dimension();
        Self::chart_slot(
            ui,
            aggregator.aggregate(data, dimension),
            captions,
            |ui, buckets| ChartPlotter::draw_time_series(ui, dimension, buckets, captions, ROW_HEIGHT),
        );
    }

    fn show_map(&self, ui: &mut egui::Ui, captions: &Captions) {
        match &self.map {
            MapState::Pending => {
                ui.spinner();
            }
            MapState::Empty => Self::placeholder(ui, captions.no_data),
            MapState::Failed(message) => Self::error_label(ui, message),
            MapState::Ready { texture, map } => {
                let scale = ui.available_width() / map.width as f32;
                let size = egui::vec2(map.width as f32, map.height as f32) * scale;
                let response = ui.add(egui::Image::new((texture.id(), size)).sense(Sense::hover()));

                if let Some(pos) = response.hover_pos() {
                    let local = (pos - response.rect.min) / scale;
                    if let Some(region) = map.region_at(local.x as f64, local.y as f64) {
                        response.on_hover_text_at_pointer(format!(
                            "{}\n{}: {}",
                            region.name, captions.total_crimes, region.count
                        ));
                    }
                }

                Self::color_bar(ui, map.min_count, map.max_count, captions);
            }
        }
    }

    fn color_bar(ui: &mut egui::Ui, min: u64, max: u64, captions: &Captions) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(captions.total_crimes).size(12.0));
            ui.label(RichText::new(min.to_string()).size(12.0));
            for step in 0..=20 {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 12.0), Sense::hover());
                let level = 0.1 + 0.9 * step as f64 / 20.0;
                ui.painter().rect_filled(rect, 0.0, palette::to_egui(palette::reds(level)));
            }
            ui.label(RichText::new(max.to_string()).size(12.0));
        });
    }

    fn heading(ui: &mut egui::Ui, icon: &str, text: &str) {
        ui.label(RichText::new(format!("{} {}", icon, text)).size(18.0).strong());
        ui.add_space(4.0);
    }

    /// One chart's frame: its error, an empty placeholder, or the chart.
    fn chart_slot(
        ui: &mut egui::Ui,
        result: Result<Vec<AggregateBucket>, AggregateError>,
        captions: &Captions,
        draw: impl FnOnce(&mut egui::Ui, &[AggregateBucket]),
    ) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(10.0)
            .show(ui, |ui| match result {
                Ok(buckets) if buckets.is_empty() => Self::placeholder(ui, captions.no_data),
                Ok(buckets) => draw(ui, &buckets),
                Err(e) => Self::error_label(ui, &e.to_string()),
            });
    }

    fn placeholder(ui: &mut egui::Ui, text: &str) {
        ui.allocate_ui(egui::vec2(ui.available_width(), 120.0), |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(text).size(16.0).color(Color32::GRAY));
            });
        });
    }

    fn error_label(ui: &mut egui::Ui, message: &str) {
        ui.label(
            RichText::new(format!("⚠ {}", message))
                .size(14.0)
                .color(Color32::from_rgb(220, 53, 69)),
        );
    }
}
