// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Line-delimited replay of a diagram session.
//!
//! Each non-blank line is either a server message (tagged by `type`) or a recorded local gesture
//! (tagged by `gesture`). Lines are applied strictly in order; bad lines are logged and skipped.

use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::collab::MenuAction;
use crate::gesture::{DeltaMode, GestureController, WheelEvent};
use crate::graph::NetGraph;
use crate::model::Uid;

/// A local input event, as captured for replay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "gesture", rename_all = "snake_case")]
pub enum GestureRecord {
    PanStart {
        x: f64,
        y: f64,
    },
    ItemDragStart {
        uid: Uid,
        x: f64,
        y: f64,
    },
    ItemResizeStart {
        uid: Uid,
        x: f64,
        y: f64,
    },
    DragMove { x: f64, y: f64 },
    DragEnd,
    Wheel {
        x: f64,
        y: f64,
        delta_y: f64,
        #[serde(default)]
        mode: DeltaMode,
    },
    Resize { width: f64, height: f64 },
    Toggle { uid: Uid },
    ContextMenu { x: f64, y: f64 },
    AutoLayout,
    ToggleMinimap,
    BackgroundClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayStats {
    pub lines: usize,
    pub applied: usize,
    pub skipped: usize,
}

/// Replays a session into `graph` until the reader is exhausted.
pub async fn replay_lines<R>(graph: &mut NetGraph, reader: R) -> std::io::Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut gestures = GestureController::new();
    let mut stats = ReplayStats::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.lines += 1;
        if apply_line(graph, &mut gestures, line) {
            stats.applied += 1;
        } else {
            stats.skipped += 1;
        }
    }

    debug!(?stats, "replay finished");
    Ok(stats)
}

fn apply_line(graph: &mut NetGraph, gestures: &mut GestureController, line: &str) -> bool {
    let is_gesture = serde_json::from_str::<Value>(line)
        .map(|value| value.get("gesture").is_some())
        .unwrap_or(false);
    if !is_gesture {
        return graph.handle_text(line);
    }

    match serde_json::from_str::<GestureRecord>(line) {
        Ok(record) => apply_gesture(graph, gestures, record),
        Err(err) => {
            warn!(%err, "dropping malformed gesture record");
            false
        }
    }
}

fn apply_gesture(
    graph: &mut NetGraph,
    gestures: &mut GestureController,
    record: GestureRecord,
) -> bool {
    let result = match record {
        GestureRecord::PanStart { x, y } => {
            gestures.pan_start(graph, x, y);
            Ok(())
        }
        GestureRecord::ItemDragStart { uid, x, y } => {
            gestures.item_drag_start(graph, uid, x, y);
            Ok(())
        }
        GestureRecord::ItemResizeStart { uid, x, y } => {
            gestures.item_resize_start(graph, uid, x, y);
            Ok(())
        }
        GestureRecord::DragMove { x, y } => gestures.drag_move(graph, x, y),
        GestureRecord::DragEnd => gestures.drag_end(graph),
        GestureRecord::Wheel {
            x,
            y,
            delta_y,
            mode,
        } => {
            gestures.wheel(
                graph,
                WheelEvent {
                    x,
                    y,
                    delta_y,
                    mode,
                },
            );
            Ok(())
        }
        GestureRecord::Resize { width, height } => {
            gestures.resize(graph, width, height);
            Ok(())
        }
        GestureRecord::Toggle { uid } => gestures.toggle_expanded(graph, &uid),
        GestureRecord::ContextMenu { x, y } => {
            gestures.context_menu(graph, x, y);
            Ok(())
        }
        GestureRecord::AutoLayout => {
            gestures.menu_action(graph, MenuAction::AutoLayout);
            Ok(())
        }
        GestureRecord::ToggleMinimap => {
            gestures.menu_action(graph, MenuAction::ToggleMinimap);
            Ok(())
        }
        GestureRecord::BackgroundClick => {
            gestures.background_click(graph);
            Ok(())
        }
    };
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(%err, "skipping gesture");
            false
        }
    }
}
