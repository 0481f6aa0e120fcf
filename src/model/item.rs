// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ids::Uid;
use super::view::{ScreenRect, View};

/// The type of simulation object an item stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Net,
    Ens,
    Node,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Net => "net",
            Self::Ens => "ens",
            Self::Node => "node",
        }
    }

    pub fn is_network(self) -> bool {
        matches!(self, Self::Net)
    }
}

/// Everything needed to materialize one item pair.
///
/// `x`/`y` is the center and `width`/`height` the half extents, both relative to the parent
/// network's unit square (or to model space for top-level items).
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSpec {
    pub uid: Uid,
    pub kind: ItemKind,
    pub label: String,
    pub parent: Option<Uid>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub expanded: bool,
}

impl ItemSpec {
    pub fn new(uid: impl Into<Uid>, kind: ItemKind, pos: [f64; 2], size: [f64; 2]) -> Self {
        Self {
            uid: uid.into(),
            kind,
            label: String::new(),
            parent: None,
            x: pos[0],
            y: pos[1],
            width: size[0],
            height: size[1],
            expanded: false,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<Uid>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }
}

/// One simulation object as drawn in one view.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualItem {
    uid: Uid,
    view: View,
    kind: ItemKind,
    label: String,
    parent: Option<Uid>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    depth: u32,
    expanded: bool,
    conn_in: BTreeSet<Uid>,
    conn_out: BTreeSet<Uid>,
    screen: Option<ScreenRect>,
}

impl VisualItem {
    pub(crate) fn from_spec(spec: &ItemSpec, view: View, depth: u32) -> Self {
        Self {
            uid: spec.uid.clone(),
            view,
            kind: spec.kind,
            label: spec.label.clone(),
            parent: spec.parent.clone(),
            x: spec.x,
            y: spec.y,
            width: spec.width,
            height: spec.height,
            depth,
            expanded: spec.kind.is_network() && spec.expanded,
            conn_in: BTreeSet::new(),
            conn_out: BTreeSet::new(),
            screen: None,
        }
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn parent(&self) -> Option<&Uid> {
        self.parent.as_ref()
    }

    pub fn pos(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn size(&self) -> [f64; 2] {
        [self.width, self.height]
    }

    pub(crate) fn set_geometry(&mut self, pos: [f64; 2], size: [f64; 2]) {
        self.x = pos[0];
        self.y = pos[1];
        self.width = size[0];
        self.height = size[1];
    }

    /// `[min_x, max_x, min_y, max_y]` of the item's box in its own coordinate frame.
    pub fn min_max_xy(&self) -> [f64; 4] {
        [
            self.x - self.width,
            self.x + self.width,
            self.y - self.height,
            self.y + self.height,
        ]
    }

    /// 1 for top-level items, parent depth + 1 below that.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub(crate) fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub(crate) fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    /// Connections currently drawn ending at this item.
    pub fn conn_in(&self) -> &BTreeSet<Uid> {
        &self.conn_in
    }

    /// Connections currently drawn starting at this item.
    pub fn conn_out(&self) -> &BTreeSet<Uid> {
        &self.conn_out
    }

    pub(crate) fn conn_in_mut(&mut self) -> &mut BTreeSet<Uid> {
        &mut self.conn_in
    }

    pub(crate) fn conn_out_mut(&mut self) -> &mut BTreeSet<Uid> {
        &mut self.conn_out
    }

    /// Device-pixel box from the last redraw, `None` until first drawn.
    pub fn screen(&self) -> Option<ScreenRect> {
        self.screen
    }

    pub(crate) fn set_screen(&mut self, screen: Option<ScreenRect>) {
        self.screen = screen;
    }
}

/// An item together with its twin in the other view.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPair {
    main: VisualItem,
    minimap: VisualItem,
}

impl ItemPair {
    pub(crate) fn new(spec: &ItemSpec, depth: u32) -> Self {
        Self {
            main: VisualItem::from_spec(spec, View::Main, depth),
            minimap: VisualItem::from_spec(spec, View::Minimap, depth),
        }
    }

    pub fn main(&self) -> &VisualItem {
        &self.main
    }

    pub fn minimap(&self) -> &VisualItem {
        &self.minimap
    }

    pub fn get(&self, view: View) -> &VisualItem {
        match view {
            View::Main => &self.main,
            View::Minimap => &self.minimap,
        }
    }

    pub(crate) fn get_mut(&mut self, view: View) -> &mut VisualItem {
        match view {
            View::Main => &mut self.main,
            View::Minimap => &mut self.minimap,
        }
    }

    /// The counterpart of `item` in the other view.
    pub fn twin(&self, item: &VisualItem) -> &VisualItem {
        self.get(item.view().other())
    }

    /// Applies a model-space mutation to both twins so they never drift apart.
    pub(crate) fn update(&mut self, mut f: impl FnMut(&mut VisualItem)) {
        f(&mut self.main);
        f(&mut self.minimap);
    }
}
