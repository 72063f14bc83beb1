use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::render_utils::{distance_to_segment, screen_to_world};

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.1, 6.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged() {
            self.pan += response.drag_delta();
        }
    }

    /// Closest visible node under the pointer.
    pub(in crate::app) fn hovered_node(
        &self,
        ui: &Ui,
        screen_positions: &[(usize, Pos2, f32)],
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        screen_positions
            .iter()
            .filter_map(|&(id, position, radius)| {
                let distance = position.distance(pointer);
                (distance <= radius).then_some((id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Closest drawn edge within a few pixels of the pointer, as an index
    /// into `segments`.
    pub(in crate::app) fn hovered_edge(
        &self,
        ui: &Ui,
        segments: &[(Pos2, Pos2, f32)],
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        segments
            .iter()
            .enumerate()
            .filter_map(|(index, &(start, end, width))| {
                let distance = distance_to_segment(pointer, start, end);
                (distance <= width * 0.5 + 4.0).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}
