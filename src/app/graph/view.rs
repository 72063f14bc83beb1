use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use super::super::ViewModel;
use super::super::render_utils::{dim_color, edge_width, to_color32, world_to_screen};

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
const NODE_FILL: Color32 = Color32::from_rgb(30, 36, 45);
const NODE_BORDER: Color32 = Color32::from_rgb(120, 170, 220);
const NODE_BORDER_FOCUS: Color32 = Color32::from_rgb(240, 200, 110);
const LABEL: Color32 = Color32::from_rgb(220, 226, 232);

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        if self.payload.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No relationships pass the current threshold.",
                FontId::proportional(15.0),
                Color32::GRAY,
            );
            return;
        }

        let neutral = to_color32(self.config.colors.neutral);
        let zoom_scale = self.zoom.powf(0.4);

        let screen_nodes = self
            .payload
            .nodes
            .iter()
            .map(|node| {
                let position = world_to_screen(rect, self.pan, self.zoom, self.positions[node.id]);
                let radius = (self.node_radii[node.id] * zoom_scale).clamp(3.0, 40.0);
                (node.id, position, radius)
            })
            .collect::<Vec<_>>();
        let segments = self
            .payload
            .edges
            .iter()
            .map(|edge| {
                (
                    world_to_screen(rect, self.pan, self.zoom, self.positions[edge.from]),
                    world_to_screen(rect, self.pan, self.zoom, self.positions[edge.to]),
                    edge_width(edge.weight, self.max_weight) * zoom_scale,
                )
            })
            .collect::<Vec<_>>();

        let hovered = self.hovered_node(ui, &screen_nodes);
        let hovered_edge = match hovered {
            Some(_) => None,
            None => self.hovered_edge(ui, &segments),
        };
        let focus = hovered.or(self.selected);
        let focus_neighbors = focus
            .map(|focus_id| {
                self.payload
                    .edges
                    .iter()
                    .filter_map(|edge| {
                        if edge.from == focus_id {
                            Some(edge.to)
                        } else if edge.to == focus_id {
                            Some(edge.from)
                        } else {
                            None
                        }
                    })
                    .collect::<HashSet<_>>()
            })
            .unwrap_or_default();

        for (index, (edge, &(start, end, width))) in
            self.payload.edges.iter().zip(&segments).enumerate()
        {
            let base = edge.color.map(to_color32).unwrap_or(neutral);
            let touches_focus = focus.is_none_or(|id| id == edge.from || id == edge.to);
            let color = if hovered_edge == Some(index) {
                NODE_BORDER_FOCUS
            } else if touches_focus {
                base
            } else {
                dim_color(base, 0.35)
            };

            painter.line_segment([start, end], Stroke::new(width, color));
        }

        let font = FontId::proportional((12.0 * zoom_scale).clamp(9.0, 18.0));
        for (node, &(id, position, radius)) in self.payload.nodes.iter().zip(&screen_nodes) {
            let in_focus = focus.is_none_or(|focus_id| focus_id == id || focus_neighbors.contains(&id));
            let border = if focus == Some(id) {
                NODE_BORDER_FOCUS
            } else {
                NODE_BORDER
            };
            let (fill, border, label) = if in_focus {
                (NODE_FILL, border, LABEL)
            } else {
                (
                    dim_color(NODE_FILL, 0.5),
                    dim_color(border, 0.4),
                    dim_color(LABEL, 0.4),
                )
            };

            painter.circle_filled(position, radius, fill);
            painter.circle_stroke(position, radius, Stroke::new(2.0, border));
            painter.text(
                position + vec2(0.0, radius + 3.0),
                Align2::CENTER_TOP,
                node.label.as_str(),
                font.clone(),
                label,
            );
        }

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if response.clicked() {
            self.selected = hovered;
        }

        let tooltip = hovered
            .and_then(|id| self.payload.nodes.iter().find(|node| node.id == id))
            .map(|node| node.tooltip.as_str())
            .or_else(|| {
                hovered_edge
                    .and_then(|index| self.payload.edges.get(index))
                    .map(|edge| edge.tooltip.as_str())
            });
        if let Some(tooltip) = tooltip {
            response.on_hover_text_at_pointer(tooltip);
        }
    }
}
