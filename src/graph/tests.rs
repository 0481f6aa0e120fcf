// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};
use serde_json::{json, Value};

use super::NetGraph;
use crate::collab::{Component, Viewport};
use crate::config::NetGraphConfig;
use crate::model::{End, Uid, View};
use crate::protocol::{Inbound, UiCommand};
use crate::scene::{ObjectKind, SceneError};

#[derive(Debug, Default, Clone)]
struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    fn push(&self, call: String) {
        self.0.lock().unwrap().push(call);
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

#[derive(Debug)]
struct FakeComponent(Calls);

impl Component for FakeComponent {
    fn update_layout(&mut self, config: &Value) {
        self.0.push(format!("layout {config}"));
    }

    fn remove(&mut self, notify_server: bool) {
        self.0.push(format!("remove {notify_server}"));
    }
}

#[derive(Debug)]
struct FakeViewport(Calls);

impl Viewport for FakeViewport {
    fn set_scale(&mut self, scale: f64) {
        self.0.push(format!("scale {scale}"));
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.0.push(format!("position {x} {y}"));
    }

    fn redraw_all(&mut self) {
        self.0.push("redraw".to_owned());
    }
}

#[fixture]
fn graph() -> NetGraph {
    NetGraph::new(&NetGraphConfig {
        width: 500.0,
        height: 400.0,
        ..NetGraphConfig::default()
    })
}

fn send(graph: &mut NetGraph, message: Value) -> bool {
    graph.handle_text(&message.to_string())
}

#[rstest]
fn deferred_connection_is_redrawn_once_when_endpoint_arrives(mut graph: NetGraph) {
    assert!(send(
        &mut graph,
        json!({"type": "net", "uid": "n1", "pos": [0.5, 0.5], "size": [0.2, 0.2]})
    ));
    let n1 = graph.scene().item(&Uid::new("n1")).expect("n1");
    assert_eq!(n1.main().pos(), [0.5, 0.5]);
    assert_eq!(n1.minimap().size(), [0.2, 0.2]);

    assert!(send(
        &mut graph,
        json!({"type": "conn", "uid": "c1", "pres": [["n1"]], "posts": [["n2"]]})
    ));
    let c1 = Uid::new("c1");
    let conn = graph.scene().connection(&c1).expect("c1");
    assert_eq!(conn.main().post(), None);
    assert_eq!(
        graph.scene().pending().waiting_on(&Uid::new("n2")).collect::<Vec<_>>(),
        vec![&c1]
    );
    let before = conn.main().redraws();
    let minimap_before = conn.minimap().redraws();

    assert!(send(
        &mut graph,
        json!({"type": "node", "uid": "n2", "pos": [1.5, 0.5], "size": [0.1, 0.1]})
    ));
    let conn = graph.scene().connection(&c1).expect("c1");
    assert_eq!(conn.main().post(), Some(&Uid::new("n2")));
    assert!(conn.main().is_exact(End::Post));
    assert!(conn.main().path().is_some());
    assert_eq!(conn.main().redraws(), before + 1);
    assert_eq!(conn.minimap().redraws(), minimap_before + 1);
    assert!(graph.scene().pending().is_empty());
}

#[rstest]
fn endpoint_inside_extent_redraws_only_its_own_connections(mut graph: NetGraph) {
    send(
        &mut graph,
        json!({"type": "net", "uid": "n1", "pos": [0.5, 0.5], "size": [0.2, 0.2]}),
    );
    send(
        &mut graph,
        json!({"type": "conn", "uid": "loop", "pres": [["n1"]], "posts": [["n1"]]}),
    );
    send(
        &mut graph,
        json!({"type": "conn", "uid": "c1", "pres": [["n1"]], "posts": [["n2"]]}),
    );
    let (c1, unrelated) = (Uid::new("c1"), Uid::new("loop"));
    let extent = graph.view().extent();
    let counts = |graph: &NetGraph, uid: &Uid| {
        let conn = graph.scene().connection(uid).expect("conn");
        (conn.main().redraws(), conn.minimap().redraws())
    };
    let (main_before, minimap_before) = counts(&graph, &c1);
    let unrelated_before = counts(&graph, &unrelated);

    assert!(send(
        &mut graph,
        json!({"type": "node", "uid": "n2", "pos": [0.5, 0.5], "size": [0.05, 0.05]})
    ));
    assert_eq!(graph.view().extent(), extent);
    assert_eq!(counts(&graph, &c1), (main_before + 1, minimap_before + 1));
    assert_eq!(counts(&graph, &unrelated), unrelated_before);
    assert!(graph.scene().connection(&c1).expect("c1").minimap().path().is_some());
}

#[rstest]
fn self_parented_network_can_be_removed(mut graph: NetGraph) {
    assert!(send(
        &mut graph,
        json!({"type": "net", "uid": "n", "parent": "n", "pos": [0.5, 0.5], "size": [0.2, 0.2]})
    ));
    let n = graph.scene().item(&Uid::new("n")).expect("n");
    assert_eq!(n.main().parent(), None);
    assert_eq!(n.main().depth(), 1);

    assert!(send(&mut graph, json!({"type": "remove", "uid": "n"})));
    assert!(graph.scene().items().is_empty());
}

#[rstest]
fn lookup_misses_are_skipped(mut graph: NetGraph) {
    assert!(!send(&mut graph, json!({"type": "remove", "uid": "ghost"})));
    assert!(!send(&mut graph, json!({"type": "rename", "uid": "ghost", "name": "x"})));
    assert!(!send(
        &mut graph,
        json!({"type": "pos_size", "uid": "ghost", "pos": [0, 0], "size": [1, 1]})
    ));
    assert_eq!(
        graph.dispatch(Inbound::Reconnect {
            uid: Uid::new("ghost"),
            pres: Default::default(),
            posts: Default::default(),
        }),
        Err(SceneError::NotFound {
            kind: ObjectKind::Connection,
            uid: Uid::new("ghost"),
        })
    );

    // The graph keeps working afterwards.
    assert!(send(
        &mut graph,
        json!({"type": "ens", "uid": "e", "pos": [0.5, 0.5], "size": [0.1, 0.1]})
    ));
    assert!(graph.scene().item(&Uid::new("e")).is_some());
}

#[rstest]
fn unknown_and_malformed_messages_change_nothing(mut graph: NetGraph) {
    let before = graph.view().clone();
    assert!(!send(&mut graph, json!({"type": "teleport", "uid": "x"})));
    assert!(!send(&mut graph, json!({"type": "pan", "x": "left"})));
    assert!(!graph.handle_text("{"));
    assert_eq!(graph.view(), &before);
    assert!(graph.scene().items().is_empty());
}

#[rstest]
fn remote_pan_and_zoom_update_view_and_viewport(graph: NetGraph) {
    let calls = Calls::default();
    let mut graph = graph.with_viewport(Box::new(FakeViewport(calls.clone())));

    send(&mut graph, json!({"type": "pan", "x": 0.25, "y": -0.5}));
    send(&mut graph, json!({"type": "zoom", "zoom": 2.0}));

    assert_eq!(graph.view().offset(), [0.25, -0.5]);
    assert_eq!(graph.view().scale(), 2.0);
    assert_eq!(calls.take(), vec!["position 0.25 -0.5", "scale 2"]);
}

#[rstest]
#[case(json!({"type": "zoom", "zoom": 0}))]
#[case(json!({"type": "zoom", "zoom": -2.0}))]
fn non_positive_zoom_is_rejected(graph: NetGraph, #[case] message: Value) {
    let calls = Calls::default();
    let mut graph = graph.with_viewport(Box::new(FakeViewport(calls.clone())));
    let before = graph.view().clone();

    assert!(!send(&mut graph, message));
    assert_eq!(graph.view(), &before);
    assert_eq!(graph.view().scale(), 1.0);
    assert!(calls.take().is_empty());
}

#[rstest]
fn non_finite_pan_and_zoom_are_rejected(mut graph: NetGraph) {
    let before = graph.view().clone();
    assert_eq!(
        graph.dispatch(Inbound::Pan {
            x: f64::INFINITY,
            y: 0.0,
        }),
        Ok(false)
    );
    assert_eq!(graph.dispatch(Inbound::Pan { x: 0.0, y: f64::NAN }), Ok(false));
    assert_eq!(graph.dispatch(Inbound::Zoom { zoom: f64::NAN }), Ok(false));
    assert_eq!(graph.dispatch(Inbound::Zoom { zoom: f64::INFINITY }), Ok(false));
    assert_eq!(graph.view(), &before);

    graph.set_scale(0.0);
    graph.set_offset(f64::NEG_INFINITY, 1.0);
    assert_eq!(graph.view(), &before);
}

#[rstest]
fn remote_expand_and_collapse(mut graph: NetGraph) {
    send(
        &mut graph,
        json!({"type": "net", "uid": "n", "pos": [0.5, 0.5], "size": [0.3, 0.3]}),
    );
    assert!(send(&mut graph, json!({"type": "expand", "uid": "n"})));
    send(
        &mut graph,
        json!({"type": "node", "uid": "n.a", "parent": "n", "pos": [0.5, 0.5], "size": [0.1, 0.1]}),
    );
    assert!(graph.scene().item(&Uid::new("n")).expect("n").main().is_expanded());

    assert!(send(&mut graph, json!({"type": "collapse", "uid": "n"})));
    assert!(graph.scene().item(&Uid::new("n.a")).is_none());
    assert!(!send(&mut graph, json!({"type": "collapse", "uid": "n"})));
}

#[rstest]
fn config_and_delete_graph_reach_components(mut graph: NetGraph) {
    let calls = Calls::default();
    graph
        .components_mut()
        .register(Uid::new("plot"), Box::new(FakeComponent(calls.clone())));

    assert!(send(
        &mut graph,
        json!({"type": "config", "uid": "plot", "config": {"x": 1}})
    ));
    assert!(send(
        &mut graph,
        json!({"type": "delete_graph", "uid": "plot", "notify_server": false})
    ));
    assert_eq!(calls.take(), vec![r#"layout {"x":1}"#, "remove false"]);
    assert!(graph.components_mut().is_empty());

    assert_eq!(
        graph.dispatch(Inbound::DeleteGraph {
            uid: Uid::new("plot"),
            notify_server: true,
        }),
        Err(SceneError::NotFound {
            kind: ObjectKind::Component,
            uid: Uid::new("plot"),
        })
    );
}

#[rstest]
fn ui_commands_drive_setters(mut graph: NetGraph) {
    assert!(send(
        &mut graph,
        json!({"type": "js", "code": {"cmd": "font_size", "percent": 150}})
    ));
    assert_eq!(graph.font_em(), 1.5);

    graph.run_command(UiCommand::ZoomFonts { enabled: true });
    graph.set_scale(2.0);
    assert_eq!(graph.font_em(), 6.0);

    graph.run_command(UiCommand::ResetView);
    assert_eq!(graph.view().scale(), 1.0);
    assert_eq!(graph.view().offset(), [0.0, 0.0]);
    assert_eq!(graph.font_em(), 3.0);

    graph.run_command(UiCommand::TransparentNets { enabled: true });
    assert!(graph.transparent_nets());
    assert!(!graph.run_command(UiCommand::Unsupported));
}

#[rstest]
fn aspect_resize_rescales_top_level_items(mut graph: NetGraph) {
    send(
        &mut graph,
        json!({"type": "net", "uid": "n", "pos": [0.5, 0.5], "size": [0.2, 0.2], "expanded": true}),
    );
    send(
        &mut graph,
        json!({"type": "node", "uid": "n.a", "parent": "n", "pos": [0.5, 0.5], "size": [0.1, 0.1]}),
    );
    let before = graph
        .scene()
        .item(&Uid::new("n"))
        .and_then(|pair| pair.main().screen())
        .expect("screen");

    graph.set_aspect_resize(true);
    graph.resize(1000.0, 400.0);

    let n = graph.scene().item(&Uid::new("n")).expect("n");
    assert_eq!(n.main().size(), [0.1, 0.2]);
    assert_eq!(n.minimap().size(), [0.1, 0.2]);
    let after = n.main().screen().expect("screen");
    assert!((after.width - before.width).abs() < 1e-9);
    assert_eq!(
        graph.scene().item(&Uid::new("n.a")).expect("n.a").main().size(),
        [0.1, 0.1]
    );
    assert_eq!(graph.view().size(), [1000.0, 400.0]);
}

#[rstest]
fn plain_resize_keeps_model_geometry(mut graph: NetGraph) {
    send(
        &mut graph,
        json!({"type": "node", "uid": "a", "pos": [0.5, 0.5], "size": [0.2, 0.2]}),
    );
    graph.resize(1000.0, 800.0);
    assert_eq!(
        graph.scene().item(&Uid::new("a")).expect("a").main().size(),
        [0.2, 0.2]
    );
}

#[rstest]
fn showing_minimap_reprojects_it(mut graph: NetGraph) {
    graph.set_show_minimap(false);
    send(
        &mut graph,
        json!({"type": "node", "uid": "a", "pos": [0.5, 0.5], "size": [0.2, 0.2]}),
    );
    let a = Uid::new("a");
    assert!(graph.scene().item(&a).expect("a").get(View::Minimap).screen().is_none());
    assert_eq!(graph.view().viewbox(), None);

    graph.set_show_minimap(true);
    assert!(graph.scene().item(&a).expect("a").minimap().screen().is_some());
    assert!(graph.view().viewbox().is_some());
}

#[rstest]
fn reconnect_and_rename_through_messages(mut graph: NetGraph) {
    for uid in ["a", "b"] {
        send(
            &mut graph,
            json!({"type": "node", "uid": uid, "pos": [0.5, 0.5], "size": [0.1, 0.1]}),
        );
    }
    send(
        &mut graph,
        json!({"type": "conn", "uid": "c", "pres": ["a"], "posts": ["b"]}),
    );
    assert!(send(
        &mut graph,
        json!({"type": "reconnect", "uid": "c", "pres": [["b"]], "posts": [["b"]]})
    ));
    let conn = graph.scene().connection(&Uid::new("c")).expect("c");
    assert!(conn.main().is_recurrent() && conn.minimap().is_recurrent());

    assert!(send(&mut graph, json!({"type": "rename", "uid": "a", "name": "Input"})));
    assert_eq!(
        graph.scene().item(&Uid::new("a")).expect("a").minimap().label(),
        "Input"
    );
}
