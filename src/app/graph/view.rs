use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::{Graph, NodeId};
use crate::util::short_label;

use super::super::highlight::{EdgeRole, NodeRole};
use super::super::render_utils::{
    Projected, Projection, blend_color, dim_color, draw_background, edge_visible, label_color,
};
use super::super::{SearchMatchCache, ViewModel};

/// World-space radius of a drawn node.
const NODE_RADIUS: f32 = 0.6;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

pub(in crate::app) fn search_matches(graph: &Graph, query: &str) -> HashSet<NodeId> {
    let query = query.trim();
    if query.is_empty() {
        return HashSet::new();
    }

    let matcher = SkimMatcherV2::default();
    graph
        .nodes()
        .iter()
        .filter(|node| fuzzy_match_score(&matcher, &node.label, query).is_some())
        .map(|node| node.id)
        .collect()
}

impl ViewModel {
    fn cached_search_matches(&mut self) -> Arc<HashSet<NodeId>> {
        let query = self.search.trim();
        if let Some(cached) = &self.search_match_cache
            && cached.query == query
        {
            return Arc::clone(&cached.matches);
        }

        let matches = Arc::new(search_matches(self.scene.graph(), query));
        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            matches: Arc::clone(&matches),
        });
        matches
    }

    pub(in crate::app) fn draw_scene(&mut self, ui: &mut Ui) {
        let matches = self.cached_search_matches();

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        let scene = &self.scene;
        let graph = scene.graph();
        let projection = Projection::new(scene.camera().pose(), scene.camera().config(), rect);
        let projected = scene
            .layout()
            .positions()
            .iter()
            .map(|position| projection.project(*position))
            .collect::<Vec<_>>();
        let radii = projected
            .iter()
            .map(|point| point.map_or(0.0, |point| (NODE_RADIUS * point.scale).clamp(2.0, 60.0)))
            .collect::<Vec<_>>();
        let highlight = scene.highlight();
        let search_active = !matches.is_empty();

        for (a, b) in graph.edges() {
            let (Some(Some(start)), Some(Some(end))) =
                (projected.get(a.index()), projected.get(b.index()))
            else {
                continue;
            };
            if !edge_visible(rect, start.screen, end.screen, 2.0) {
                continue;
            }

            let stroke = match highlight.edge_role(a, b) {
                EdgeRole::Focused => Stroke::new(3.2, Color32::from_rgb(246, 206, 104)),
                EdgeRole::Adjacent => Stroke::new(1.8, Color32::from_rgb(170, 184, 204)),
                EdgeRole::Distant => {
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(90, 96, 108, 150))
                }
            };
            painter.line_segment([start.screen, end.screen], stroke);
        }

        let mut draw_order = projected
            .iter()
            .enumerate()
            .filter_map(|(index, point)| point.map(|point| (index, point)))
            .collect::<Vec<(usize, Projected)>>();
        draw_order.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = if response.hovered() {
            Self::hovered_node(pointer, rect, &projected, &radii)
        } else {
            None
        };

        for (index, point) in draw_order {
            let id = NodeId::from_index(index);
            let Some(label) = graph.label(id) else {
                continue;
            };
            let radius = radii[index];
            let role = highlight.node_role(id);
            let is_match = matches.contains(&id);
            let is_hovered = hovered == Some(index);

            let base = label_color(label);
            let color = match role {
                NodeRole::Current => blend_color(base, Color32::WHITE, 0.45),
                NodeRole::Target => blend_color(base, Color32::from_rgb(246, 206, 104), 0.7),
                NodeRole::Neighbor => base,
                NodeRole::Unconnected if search_active && !is_match => dim_color(base, 0.3),
                NodeRole::Unconnected => dim_color(base, 0.6),
            };

            painter.circle_filled(point.screen, radius, color);
            let outline = if is_match {
                Stroke::new(2.0, Color32::from_rgb(103, 196, 255))
            } else if role == NodeRole::Current {
                Stroke::new(2.0, Color32::WHITE)
            } else {
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
            };
            painter.circle_stroke(point.screen, radius, outline);

            let show_label =
                role != NodeRole::Unconnected || is_match || is_hovered || radius > 14.0;
            if show_label {
                painter.text(
                    point.screen + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    short_label(label),
                    FontId::proportional(13.0),
                    Color32::from_gray(238),
                );
            }
        }

        if let Some(index) = hovered {
            let id = NodeId::from_index(index);
            let label = graph.label(id).unwrap_or_default();
            let mut text = format!("{label}  |  {} neighbors", graph.neighbors(id).len());
            if let Some(note) = self.notebook.note(label) {
                text.push('\n');
                text.push_str(note);
            }
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if graph.len() == 1 {
            painter.text(
                rect.center_bottom() - vec2(0.0, 16.0),
                Align2::CENTER_BOTTOM,
                "This graph has a single node; there is nowhere to go.",
                FontId::proportional(13.0),
                Color32::from_gray(180),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_is_fuzzy_and_case_insensitive() {
        let graph = Graph::from_labels::<&str>(&["Alpha", "Beta", "Lambda"], &[]);
        let matches = search_matches(&graph, "ALP");
        assert!(matches.contains(&NodeId::from_index(0)));
        assert!(!matches.contains(&NodeId::from_index(1)));

        let matches = search_matches(&graph, "la");
        assert!(matches.contains(&NodeId::from_index(2)));
    }

    #[test]
    fn blank_query_matches_nothing() {
        let graph = Graph::from_labels::<&str>(&["Alpha"], &[]);
        assert!(search_matches(&graph, "   ").is_empty());
    }
}
