// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pointer, wheel and resize input for one diagram.
//!
//! Pan drags update the view on every move but notify the server once, on release. Every wheel
//! event zooms and notifies on its own.

use serde::Deserialize;
use tracing::debug;

use crate::collab::{MenuAction, MenuItem};
use crate::graph::NetGraph;
use crate::model::Uid;
use crate::protocol::Outbound;
use crate::scene::{ObjectKind, SceneError};
use crate::transform::{pan_delta, zoom_about};

/// Wheel delta normalization constant; one "page" and the zoom-factor divisor.
const WHEEL_UNIT: f64 = 600.0;
/// Pixels per logarithmic line step.
const LINE_UNIT: f64 = 60.0;

/// Unit of a wheel event's delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Cursor position in main-view pixels.
    pub x: f64,
    pub y: f64,
    pub delta_y: f64,
    pub mode: DeltaMode,
}

impl WheelEvent {
    /// Delta in pixel-equivalent units.
    pub fn normalized_delta(&self) -> f64 {
        match self.mode {
            DeltaMode::Pixel => self.delta_y,
            DeltaMode::Line => (1.0 + self.delta_y.abs()).ln() * LINE_UNIT * self.delta_y.signum(),
            DeltaMode::Page => self.delta_y * WHEEL_UNIT,
        }
    }

    /// Multiplicative zoom; scrolling down (positive delta) zooms out.
    pub fn zoom_factor(&self) -> f64 {
        let delta = self.normalized_delta();
        let z = 1.0 + delta.abs() / WHEEL_UNIT;
        if delta > 0.0 {
            1.0 / z
        } else {
            z
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Drag {
    Pan { last: [f64; 2] },
    Move { uid: Uid, last: [f64; 2] },
    Resize { uid: Uid, last: [f64; 2] },
}

#[derive(Debug, Default)]
pub struct GestureController {
    drag: Option<Drag>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn pan_start(&mut self, graph: &mut NetGraph, x: f64, y: f64) {
        graph.menu.hide_any();
        self.drag = Some(Drag::Pan { last: [x, y] });
    }

    /// Applies one move tick of whichever drag is in progress.
    pub fn drag_move(&mut self, graph: &mut NetGraph, x: f64, y: f64) -> Result<(), SceneError> {
        let Some(drag) = self.drag.as_mut() else {
            return Ok(());
        };
        match drag {
            Drag::Pan { last } => {
                let [dx, dy] = pan_delta(&graph.view, x - last[0], y - last[1]);
                *last = [x, y];
                let [ox, oy] = graph.view.offset();
                graph.set_offset(ox + dx, oy + dy);
            }
            Drag::Move { uid, last } => {
                let delta = frame_delta(graph, uid, [x - last[0], y - last[1]])?;
                *last = [x, y];
                graph.scene.translate_item(uid, delta, &graph.view)?;
            }
            Drag::Resize { uid, last } => {
                let delta = frame_delta(graph, uid, [x - last[0], y - last[1]])?;
                *last = [x, y];
                graph.scene.grow_item(uid, delta, &graph.view)?;
            }
        }
        Ok(())
    }

    /// Finishes the drag in progress and sends its single notification.
    pub fn drag_end(&mut self, graph: &mut NetGraph) -> Result<(), SceneError> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        match drag {
            Drag::Pan { .. } => {
                let [x, y] = graph.view.offset();
                graph.notify(Outbound::Pan { x, y });
            }
            Drag::Move { uid, .. } => {
                let ([x, y], _) = settle_item(graph, &uid)?;
                graph.notify(Outbound::Pos { uid, x, y });
            }
            Drag::Resize { uid, .. } => {
                let ([x, y], [width, height]) = settle_item(graph, &uid)?;
                graph.notify(Outbound::PosSize {
                    uid,
                    x,
                    y,
                    width,
                    height,
                });
            }
        }
        Ok(())
    }

    pub fn item_drag_start(&mut self, graph: &mut NetGraph, uid: Uid, x: f64, y: f64) {
        graph.menu.hide_any();
        self.drag = Some(Drag::Move { uid, last: [x, y] });
    }

    pub fn item_resize_start(&mut self, graph: &mut NetGraph, uid: Uid, x: f64, y: f64) {
        graph.menu.hide_any();
        self.drag = Some(Drag::Resize { uid, last: [x, y] });
    }

    /// Zooms toward the cursor and notifies the server.
    pub fn wheel(&mut self, graph: &mut NetGraph, event: WheelEvent) {
        graph.menu.hide_any();
        let factor = event.zoom_factor();
        if factor == 1.0 {
            return;
        }
        let zoom = zoom_about(&graph.view, [event.x, event.y], factor);
        graph.view.offset_x = zoom.offset[0];
        graph.view.offset_y = zoom.offset[1];
        graph.set_scale(zoom.scale);
        graph
            .viewport
            .set_position(zoom.offset[0], zoom.offset[1]);
        debug!(scale = zoom.scale, "wheel zoom");
        graph.notify(Outbound::Zoom {
            scale: zoom.scale,
            x: zoom.offset[0],
            y: zoom.offset[1],
        });
    }

    pub fn resize(&mut self, graph: &mut NetGraph, width: f64, height: f64) {
        graph.resize(width, height);
    }

    /// User click on a network's expand/collapse control.
    pub fn toggle_expanded(&mut self, graph: &mut NetGraph, uid: &Uid) -> Result<(), SceneError> {
        let expanded = graph
            .scene
            .item(uid)
            .map(|pair| pair.main().is_expanded())
            .ok_or_else(|| SceneError::NotFound {
                kind: ObjectKind::Item,
                uid: uid.clone(),
            })?;
        if expanded {
            if graph.scene.collapse(uid, &mut graph.view)? {
                graph.notify(Outbound::Collapse { uid: uid.clone() });
            }
        } else if graph.scene.expand(uid, &graph.view)? {
            graph.notify(Outbound::Expand { uid: uid.clone() });
        }
        Ok(())
    }

    /// Opens the background context menu at a main-view pixel position.
    pub fn context_menu(&mut self, graph: &mut NetGraph, x: f64, y: f64) {
        let minimap_label = if graph.view.show_minimap() {
            "Hide minimap"
        } else {
            "Show minimap"
        };
        let items = [
            MenuItem::new("Auto-layout", MenuAction::AutoLayout),
            MenuItem::new(minimap_label, MenuAction::ToggleMinimap),
        ];
        graph.menu.hide_any();
        graph.menu.show(x, y, &items);
    }

    pub fn menu_action(&mut self, graph: &mut NetGraph, action: MenuAction) {
        graph.menu.hide_any();
        match action {
            MenuAction::AutoLayout => graph.notify(Outbound::FeedforwardLayout { uid: None }),
            MenuAction::ToggleMinimap => {
                let visible = graph.view.show_minimap();
                graph.set_show_minimap(!visible);
            }
        }
    }

    pub fn background_click(&mut self, graph: &mut NetGraph) {
        graph.menu.hide_any();
    }
}

/// Converts a pixel delta into the coordinate frame the item's position is expressed in.
fn frame_delta(graph: &NetGraph, uid: &Uid, [dx, dy]: [f64; 2]) -> Result<[f64; 2], SceneError> {
    let [sx, sy] = graph
        .scene
        .frame_scale(uid, &graph.view)
        .ok_or_else(|| SceneError::NotFound {
            kind: ObjectKind::Item,
            uid: uid.clone(),
        })?;
    Ok([dx / sx, dy / sy])
}

/// Constrains a dragged item, refreshes the minimap, and returns the final geometry.
fn settle_item(graph: &mut NetGraph, uid: &Uid) -> Result<([f64; 2], [f64; 2]), SceneError> {
    graph.scene.constrain_item(uid, &graph.view)?;
    graph.scene.refresh_minimap(&mut graph.view);
    let item = graph
        .scene
        .item(uid)
        .ok_or_else(|| SceneError::NotFound {
            kind: ObjectKind::Item,
            uid: uid.clone(),
        })?
        .main();
    Ok((item.pos(), item.size()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tokio::sync::mpsc;

    use super::{DeltaMode, GestureController, WheelEvent};
    use crate::collab::MenuAction;
    use crate::config::NetGraphConfig;
    use crate::graph::NetGraph;
    use crate::model::{ItemKind, ItemSpec, Uid};
    use crate::protocol::Outbound;

    fn graph_500x400() -> (NetGraph, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = NetGraphConfig {
            width: 500.0,
            height: 400.0,
            ..NetGraphConfig::default()
        };
        (NetGraph::new(&config).with_outbound(tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Outbound>) -> Vec<Outbound> {
        let mut out = Vec::new();
        while let Ok(message) = rx.try_recv() {
            out.push(message);
        }
        out
    }

    #[test]
    fn pan_drag_notifies_once_on_release() {
        let (mut graph, mut rx) = graph_500x400();
        graph.set_scale(2.0);
        let mut gestures = GestureController::new();

        gestures.pan_start(&mut graph, 100.0, 100.0);
        gestures.drag_move(&mut graph, 104.0, 98.0).unwrap();
        gestures.drag_move(&mut graph, 110.0, 95.0).unwrap();
        assert!(drain(&mut rx).is_empty());

        let [ox, oy] = graph.view().offset();
        assert!((ox - 10.0 / 1000.0).abs() < 1e-12);
        assert!((oy - -5.0 / 800.0).abs() < 1e-12);

        gestures.drag_end(&mut graph).unwrap();
        assert_eq!(drain(&mut rx), vec![Outbound::Pan { x: ox, y: oy }]);
        assert!(!gestures.is_dragging());
    }

    #[test]
    fn viewbox_follows_each_pan_tick_and_wheel_event() {
        let (mut graph, _rx) = graph_500x400();
        graph.scene.create_item(
            ItemSpec::new("a", ItemKind::Node, [0.5, 0.5], [0.2, 0.2]),
            &mut graph.view,
        );
        let mut gestures = GestureController::new();
        let initial = graph.view().viewbox().expect("viewbox");

        gestures.pan_start(&mut graph, 100.0, 100.0);
        gestures.drag_move(&mut graph, 120.0, 100.0).unwrap();
        let panned = graph.view().viewbox().expect("viewbox");
        assert!(panned.x < initial.x, "{panned:?} vs {initial:?}");
        assert_eq!(panned.y, initial.y);
        assert_eq!(panned.width, initial.width);
        gestures.drag_end(&mut graph).unwrap();

        gestures.wheel(
            &mut graph,
            WheelEvent {
                x: 250.0,
                y: 200.0,
                delta_y: -300.0,
                mode: DeltaMode::Pixel,
            },
        );
        let zoomed = graph.view().viewbox().expect("viewbox");
        assert!(zoomed.width < panned.width, "{zoomed:?} vs {panned:?}");
    }

    #[rstest]
    #[case(DeltaMode::Pixel, 120.0, 120.0)]
    #[case(DeltaMode::Page, 1.0, 600.0)]
    #[case(DeltaMode::Pixel, -60.0, -60.0)]
    fn wheel_delta_modes_normalize(#[case] mode: DeltaMode, #[case] raw: f64, #[case] want: f64) {
        let event = WheelEvent {
            x: 0.0,
            y: 0.0,
            delta_y: raw,
            mode,
        };
        assert!((event.normalized_delta() - want).abs() < 1e-12);
    }

    #[test]
    fn line_mode_is_logarithmic() {
        let event = WheelEvent {
            x: 0.0,
            y: 0.0,
            delta_y: -3.0,
            mode: DeltaMode::Line,
        };
        assert!((event.normalized_delta() - -(4.0f64.ln() * 60.0)).abs() < 1e-12);
        assert!(event.zoom_factor() > 1.0);
    }

    #[test]
    fn each_wheel_event_zooms_and_notifies() {
        let (mut graph, mut rx) = graph_500x400();
        let mut gestures = GestureController::new();
        let down = WheelEvent {
            x: 250.0,
            y: 200.0,
            delta_y: 300.0,
            mode: DeltaMode::Pixel,
        };

        gestures.wheel(&mut graph, down);
        gestures.wheel(&mut graph, down);

        let sent = drain(&mut rx);
        assert_eq!(sent.len(), 2);
        let expected = (1.0f64 / 1.5) * (1.0 / 1.5);
        assert!((graph.view().scale() - expected).abs() < 1e-12);
        let Outbound::Zoom { scale, .. } = sent[1] else {
            panic!("expected zoom");
        };
        assert_eq!(scale, graph.view().scale());
    }

    #[test]
    fn item_drag_moves_in_parent_frame_and_reports_position() {
        let (mut graph, mut rx) = graph_500x400();
        graph.scene.create_item(
            ItemSpec::new("net", ItemKind::Net, [0.5, 0.5], [0.25, 0.25]).expanded(true),
            &mut graph.view,
        );
        graph.scene.create_item(
            ItemSpec::new("net.a", ItemKind::Node, [0.5, 0.5], [0.1, 0.1]).with_parent("net"),
            &mut graph.view,
        );
        let mut gestures = GestureController::new();

        // The parent spans 250 px, so 25 px is a tenth of its frame.
        gestures.item_drag_start(&mut graph, Uid::new("net.a"), 0.0, 0.0);
        gestures.drag_move(&mut graph, 25.0, 0.0).unwrap();
        gestures.drag_end(&mut graph).unwrap();

        let sent = drain(&mut rx);
        let [Outbound::Pos { uid, x, y }] = sent.as_slice() else {
            panic!("expected one pos notification, got {sent:?}");
        };
        assert_eq!(uid, &Uid::new("net.a"));
        assert!((x - 0.6).abs() < 1e-12);
        assert!((y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn item_resize_is_clamped_inside_parent() {
        let (mut graph, mut rx) = graph_500x400();
        graph.scene.create_item(
            ItemSpec::new("net", ItemKind::Net, [0.5, 0.5], [0.25, 0.25]).expanded(true),
            &mut graph.view,
        );
        graph.scene.create_item(
            ItemSpec::new("net.a", ItemKind::Node, [0.5, 0.5], [0.1, 0.1]).with_parent("net"),
            &mut graph.view,
        );
        let mut gestures = GestureController::new();

        gestures.item_resize_start(&mut graph, Uid::new("net.a"), 0.0, 0.0);
        gestures.drag_move(&mut graph, 1000.0, 0.0).unwrap();
        gestures.drag_end(&mut graph).unwrap();

        let sent = drain(&mut rx);
        let [Outbound::PosSize { width, height, .. }] = sent.as_slice() else {
            panic!("expected one pos_size notification, got {sent:?}");
        };
        assert_eq!(*width, 0.5);
        assert!((height - 0.1).abs() < 1e-12);
    }

    #[test]
    fn toggle_expanded_notifies_server() {
        let (mut graph, mut rx) = graph_500x400();
        graph.scene.create_item(
            ItemSpec::new("net", ItemKind::Net, [0.5, 0.5], [0.25, 0.25]),
            &mut graph.view,
        );
        let mut gestures = GestureController::new();
        let uid = Uid::new("net");

        gestures.toggle_expanded(&mut graph, &uid).unwrap();
        gestures.toggle_expanded(&mut graph, &uid).unwrap();

        assert_eq!(
            drain(&mut rx),
            vec![
                Outbound::Expand { uid: uid.clone() },
                Outbound::Collapse { uid: uid.clone() }
            ]
        );
        assert!(gestures.toggle_expanded(&mut graph, &Uid::new("x")).is_err());
    }

    #[test]
    fn context_menu_offers_layout_and_minimap_toggle() {
        let (mut graph, mut rx) = graph_500x400();
        let mut gestures = GestureController::new();

        gestures.context_menu(&mut graph, 10.0, 20.0);
        assert!(graph.menu().visible_any());

        gestures.menu_action(&mut graph, MenuAction::AutoLayout);
        assert!(!graph.menu().visible_any());
        assert_eq!(drain(&mut rx), vec![Outbound::FeedforwardLayout { uid: None }]);

        gestures.menu_action(&mut graph, MenuAction::ToggleMinimap);
        assert!(!graph.view().show_minimap());

        gestures.context_menu(&mut graph, 0.0, 0.0);
        gestures.background_click(&mut graph);
        assert!(!graph.menu().visible_any());
    }
}
