//! Painters for the three view variants. Everything here reads view state;
//! nothing mutates it.

use std::time::Instant;

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke, Vec2};
use egui_plot::{Legend, Line, Plot, PlotPoints, Polygon};
use shared::settings::ChartKind;
use views::{ChartView, StateDiagramView, StateNode, TransitionEdgesView};

const SERIES_COLORS: [Color32; 10] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
    Color32::from_rgb(127, 127, 127),
    Color32::from_rgb(188, 189, 34),
    Color32::from_rgb(23, 190, 207),
];

const NODE_MIN_RADIUS: f32 = 6.0;
const NODE_MAX_RADIUS: f32 = 28.0;
const AGENT_RADIUS: f32 = 3.0;
const EDGE_MIN_WIDTH: f32 = 0.5;
const EDGE_MAX_WIDTH: f32 = 8.0;
const EDGE_LOW: Color32 = Color32::from_rgb(198, 219, 239);
const EDGE_HIGH: Color32 = Color32::from_rgb(8, 48, 107);

pub fn series_color(index: usize) -> Color32 {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// Maps a layout position on the unit square into `rect`.
pub fn node_position(rect: Rect, node: &StateNode) -> Pos2 {
    rect.min + Vec2::new(node.x as f32 * rect.width(), node.y as f32 * rect.height())
}

/// Area-proportional radius so that node size tracks population.
pub fn node_radius(count: u64, max_count: u64) -> f32 {
    if max_count == 0 {
        return NODE_MIN_RADIUS;
    }
    let share = (count as f32 / max_count as f32).sqrt();
    NODE_MIN_RADIUS + share * (NODE_MAX_RADIUS - NODE_MIN_RADIUS)
}

pub fn edge_width(weight: u32, max_weight: u32) -> f32 {
    if max_weight == 0 {
        return EDGE_MIN_WIDTH;
    }
    EDGE_MIN_WIDTH + (weight as f32 / max_weight as f32) * (EDGE_MAX_WIDTH - EDGE_MIN_WIDTH)
}

pub fn edge_color(weight: u32, max_weight: u32) -> Color32 {
    let t = if max_weight == 0 {
        0.0
    } else {
        weight as f32 / max_weight as f32
    };
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color32::from_rgb(
        mix(EDGE_LOW.r(), EDGE_HIGH.r()),
        mix(EDGE_LOW.g(), EDGE_HIGH.g()),
        mix(EDGE_LOW.b(), EDGE_HIGH.b()),
    )
}

fn diagram_canvas(ui: &mut egui::Ui, title: &str) -> (Rect, egui::Painter) {
    ui.label(egui::RichText::new(title).strong());
    let width = ui.available_width();
    let height = (ui.available_height() / 2.0 - 24.0).clamp(160.0, width);
    let (response, painter) = ui.allocate_painter(Vec2::new(width, height), egui::Sense::hover());
    let rect = response.rect.shrink(NODE_MAX_RADIUS + 24.0);
    (rect, painter)
}

pub fn state_diagram(ui: &mut egui::Ui, view: &StateDiagramView, now: Instant) {
    let (rect, painter) = diagram_canvas(ui, "States");
    let nodes = view.catalogue().nodes();
    let counts = view.counts();
    let max_count = counts.iter().copied().max().unwrap_or(0);
    let text_color = ui.visuals().text_color();
    let positions: Vec<Pos2> = nodes.iter().map(|node| node_position(rect, node)).collect();

    for (i, (node, &pos)) in nodes.iter().zip(&positions).enumerate() {
        let radius = if view.options().animate_states {
            node_radius(counts[i], max_count)
        } else {
            NODE_MAX_RADIUS / 2.0
        };
        painter.circle(
            pos,
            radius,
            series_color(i).gamma_multiply(0.6),
            Stroke::new(1.0, series_color(i)),
        );
        painter.text(
            pos + Vec2::new(0.0, radius + 4.0),
            Align2::CENTER_TOP,
            format!("{}\n{}", node.name, counts[i]),
            FontId::proportional(11.0),
            text_color,
        );
    }

    for flight in view.flights() {
        if let Some(progress) = flight.progress(now) {
            let (Some(&from), Some(&to)) = (positions.get(flight.from), positions.get(flight.to))
            else {
                continue;
            };
            painter.circle_filled(from.lerp(to, progress), AGENT_RADIUS, text_color);
        }
    }
}

pub fn transition_edges(ui: &mut egui::Ui, view: &TransitionEdgesView) {
    let (rect, painter) = diagram_canvas(ui, "Transitions");
    let nodes = view.catalogue().nodes();
    let positions: Vec<Pos2> = nodes.iter().map(|node| node_position(rect, node)).collect();
    let max_weight = view
        .edges()
        .iter()
        .map(|edge| view.weight(edge))
        .max()
        .unwrap_or(0);

    for edge in view.edges() {
        let weight = view.weight(edge);
        if weight == 0 {
            continue;
        }
        let (from, to) = (positions[edge.source], positions[edge.target]);
        let along = (to - from).normalized();
        // Opposite directions run side by side instead of overlapping.
        let offset = along.rot90() * 3.0;
        let start = from + along * NODE_MIN_RADIUS + offset;
        let end = to - along * NODE_MIN_RADIUS + offset;
        painter.arrow(
            start,
            end - start,
            Stroke::new(edge_width(weight, max_weight), edge_color(weight, max_weight)),
        );
    }

    let text_color = ui.visuals().text_color();
    for (i, (node, &pos)) in nodes.iter().zip(&positions).enumerate() {
        painter.circle_filled(pos, NODE_MIN_RADIUS, series_color(i));
        painter.text(
            pos + Vec2::new(0.0, NODE_MIN_RADIUS + 4.0),
            Align2::CENTER_TOP,
            format!("{}\n{}", node.name, view.counts()[i]),
            FontId::proportional(11.0),
            text_color,
        );
    }
}

pub fn chart(ui: &mut egui::Ui, view: &ChartView, height: f32) {
    ui.label(egui::RichText::new(view.title()).strong());
    let last_tick = view.len().saturating_sub(1) as f64;

    Plot::new(view.title())
        .height(height)
        .legend(Legend::default())
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .include_x(0.0)
        .include_x(last_tick)
        .include_y(0.0)
        .include_y(view.y_max())
        .x_axis_label("Tick")
        .y_axis_label(view.y_label())
        .show(ui, |plot_ui| match view.kind() {
            ChartKind::Line => {
                for (i, series) in view.series().iter().enumerate() {
                    plot_ui.line(
                        Line::new(series.name.clone(), PlotPoints::from(view.visible_points(i)))
                            .color(series_color(i)),
                    );
                }
            }
            ChartKind::Area => {
                for (i, (series, (lower, upper))) in
                    view.series().iter().zip(view.stacked_bands()).enumerate()
                {
                    let color = series_color(i);
                    for (lo, hi) in lower.windows(2).zip(upper.windows(2)) {
                        plot_ui.polygon(
                            Polygon::new(
                                series.name.clone(),
                                PlotPoints::from(vec![lo[0], lo[1], hi[1], hi[0]]),
                            )
                            .fill_color(color.gamma_multiply(0.7))
                            .stroke(Stroke::NONE),
                        );
                    }
                    plot_ui.line(Line::new(series.name.clone(), PlotPoints::from(upper)).color(color));
                }
            }
        });
}
