// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scene registry: every realized item and connection, each stored once as a main/minimap pair.
//!
//! All mutations keep the twins in lockstep, keep item `conn_in`/`conn_out` sets in sync with the
//! connections' resolved endpoints, and keep the pending-connection index in sync with unresolved
//! endpoints. Screen geometry is recomputed by the redraw methods from model state and the current
//! [`ViewState`]; redraws never touch model attributes.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::{debug, warn};

use crate::model::{
    ConnectionPair, ConnectionPath, ConnectionSpec, End, EndpointPath, ItemPair, ItemSpec, Uid,
    View, ViewState, VisualItem,
};
use crate::transform::{GlobalBox, Transform};

pub mod minimap;
pub mod resolver;

pub use resolver::{resolve_path, PendingConnections, Resolution};

/// Loops are drawn with this fraction of the item's smaller screen dimension as radius.
const LOOP_RADIUS: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Item,
    Connection,
    ItemOrConnection,
    Component,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    NotFound { kind: ObjectKind, uid: Uid },
    NotANetwork { uid: Uid },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, uid } => write!(f, "object not found ({kind:?}, uid={uid})"),
            Self::NotANetwork { uid } => write!(f, "item is not a network (uid={uid})"),
        }
    }
}

impl std::error::Error for SceneError {}

/// What `remove` took out of the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Removed {
    Item(ItemPair),
    Connection(ConnectionPair),
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    items: BTreeMap<Uid, ItemPair>,
    conns: BTreeMap<Uid, ConnectionPair>,
    pending: PendingConnections,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &BTreeMap<Uid, ItemPair> {
        &self.items
    }

    pub fn connections(&self) -> &BTreeMap<Uid, ConnectionPair> {
        &self.conns
    }

    pub fn item(&self, uid: &Uid) -> Option<&ItemPair> {
        self.items.get(uid)
    }

    pub fn connection(&self, uid: &Uid) -> Option<&ConnectionPair> {
        self.conns.get(uid)
    }

    pub fn pending(&self) -> &PendingConnections {
        &self.pending
    }

    /// Materializes an item in both views and retries connections that were waiting for it.
    pub fn create_item(&mut self, mut spec: ItemSpec, view: &mut ViewState) -> &ItemPair {
        if let Err(err) = spec.uid.check() {
            warn!(uid = %spec.uid, %err, "creating item with malformed uid");
        }
        if self.items.contains_key(&spec.uid) {
            warn!(uid = %spec.uid, "item already exists; replacing it");
            self.remove_item(&spec.uid, view);
        }
        if spec.parent.as_ref() == Some(&spec.uid) {
            warn!(uid = %spec.uid, "item names itself as parent; placing it at top level");
            spec.parent = None;
        }

        let depth = match &spec.parent {
            None => 1,
            Some(parent) => match self.items.get(parent) {
                Some(parent) => parent.main().depth() + 1,
                None => {
                    warn!(uid = %spec.uid, parent = %parent, "parent network is not realized");
                    1
                }
            },
        };

        let uid = spec.uid.clone();
        self.items.insert(uid.clone(), ItemPair::new(&spec, depth));
        self.refresh_depths(&uid);

        let retried = self.retry_pending(&uid);
        let minimap_stale =
            minimap::recompute_extent(view, self.items.values().map(ItemPair::main));
        self.redraw_tree(&uid, view, retried, minimap_stale);
        minimap::update_viewbox(view);

        &self.items[&uid]
    }

    /// Materializes a connection in both views, resolving each end against realized items.
    pub fn create_connection(
        &mut self,
        spec: ConnectionSpec,
        view: &ViewState,
    ) -> &ConnectionPair {
        if let Err(err) = spec.uid.check() {
            warn!(uid = %spec.uid, %err, "creating connection with malformed uid");
        }
        if spec.pre.is_empty() || spec.post.is_empty() {
            warn!(uid = %spec.uid, "connection has an empty endpoint path");
        }
        if self.conns.contains_key(&spec.uid) {
            warn!(uid = %spec.uid, "connection already exists; replacing it");
            self.remove_connection(&spec.uid);
        }

        let uid = spec.uid.clone();
        self.conns.insert(uid.clone(), ConnectionPair::new(&spec));
        self.resolve_connection(&uid);
        self.redraw_connection(&uid, view);

        &self.conns[&uid]
    }

    /// Removes an item (tried first) or a connection with the given uid.
    pub fn remove(&mut self, uid: &Uid, view: &mut ViewState) -> Result<Removed, SceneError> {
        if let Some(pair) = self.remove_item(uid, view) {
            return Ok(Removed::Item(pair));
        }
        if let Some(pair) = self.remove_connection(uid) {
            return Ok(Removed::Connection(pair));
        }
        Err(SceneError::NotFound {
            kind: ObjectKind::ItemOrConnection,
            uid: uid.clone(),
        })
    }

    /// Removes an item together with its realized descendants and the connections declared
    /// inside it. Connections drawn to any removed item fall back to the nearest realized
    /// ancestor on their path.
    pub fn remove_item(&mut self, uid: &Uid, view: &mut ViewState) -> Option<ItemPair> {
        if !self.items.contains_key(uid) {
            return None;
        }
        self.remove_contents(uid, view);
        let pair = self.detach_item(uid, view)?;
        self.refresh_minimap(view);
        Some(pair)
    }

    /// Removes a connection. The returned pair is flagged removed; pending registrations are
    /// dropped so a later creation of its blocker does not touch it.
    pub fn remove_connection(&mut self, uid: &Uid) -> Option<ConnectionPair> {
        let mut pair = self.conns.remove(uid)?;
        self.pending.unregister(uid);
        for end in [End::Pre, End::Post] {
            for target in View::ALL {
                if let Some(endpoint) = pair.get(target).endpoint(end).cloned() {
                    if let Some(item) = self.items.get_mut(&endpoint) {
                        endpoint_set(item.get_mut(target), end).remove(uid);
                    }
                }
            }
        }
        pair.mark_removed();
        Some(pair)
    }

    /// Marks a network expanded. Children arrive separately as item creations.
    ///
    /// Returns `Ok(false)` if it already was expanded.
    pub fn expand(&mut self, uid: &Uid, view: &ViewState) -> Result<bool, SceneError> {
        let pair = self.network_mut(uid)?;
        if pair.main().is_expanded() {
            warn!(uid = %uid, "expanded a network that was already expanded");
            return Ok(false);
        }
        pair.update(|item| item.set_expanded(true));
        self.redraw_item(uid, view);
        Ok(true)
    }

    /// Marks a network collapsed and removes everything realized inside it.
    ///
    /// Returns `Ok(false)` if it already was collapsed.
    pub fn collapse(&mut self, uid: &Uid, view: &mut ViewState) -> Result<bool, SceneError> {
        let pair = self.network_mut(uid)?;
        if !pair.main().is_expanded() {
            warn!(uid = %uid, "collapsed a network that was already collapsed");
            return Ok(false);
        }
        pair.update(|item| item.set_expanded(false));
        self.remove_contents(uid, view);
        self.redraw_item_tree(uid, view);
        Ok(true)
    }

    /// Replaces an item's position and size, then forces a minimap extent recompute.
    pub fn set_pos_size(
        &mut self,
        uid: &Uid,
        pos: [f64; 2],
        size: [f64; 2],
        view: &mut ViewState,
    ) -> Result<(), SceneError> {
        self.item_mut(uid)?.update(|item| item.set_geometry(pos, size));
        self.redraw_item_tree(uid, view);
        self.refresh_minimap(view);
        Ok(())
    }

    pub fn rename(&mut self, uid: &Uid, label: &str, view: &ViewState) -> Result<(), SceneError> {
        self.item_mut(uid)?.update(|item| item.set_label(label));
        self.redraw_item(uid, view);
        Ok(())
    }

    /// Replaces both endpoint paths of a connection and re-resolves it.
    pub fn reconnect(
        &mut self,
        uid: &Uid,
        pres: EndpointPath,
        posts: EndpointPath,
        view: &ViewState,
    ) -> Result<(), SceneError> {
        let Some(pair) = self.conns.get_mut(uid) else {
            return Err(SceneError::NotFound {
                kind: ObjectKind::Connection,
                uid: uid.clone(),
            });
        };
        pair.update(|conn| conn.set_paths(pres.clone(), posts.clone()));
        self.resolve_connection(uid);
        self.redraw_connection(uid, view);
        Ok(())
    }

    /// Moves an item by a model-space delta relative to its own frame. Does not refresh the
    /// minimap extent; callers do that once the gesture ends.
    pub fn translate_item(
        &mut self,
        uid: &Uid,
        delta: [f64; 2],
        view: &ViewState,
    ) -> Result<(), SceneError> {
        self.item_mut(uid)?.update(|item| {
            let [x, y] = item.pos();
            item.set_geometry([x + delta[0], y + delta[1]], item.size());
        });
        self.redraw_item_tree(uid, view);
        Ok(())
    }

    /// Grows an item's half extents by a model-space delta, never below zero.
    pub fn grow_item(
        &mut self,
        uid: &Uid,
        delta: [f64; 2],
        view: &ViewState,
    ) -> Result<(), SceneError> {
        self.item_mut(uid)?.update(|item| {
            let [w, h] = item.size();
            item.set_geometry(item.pos(), [(w + delta[0]).max(0.0), (h + delta[1]).max(0.0)]);
        });
        self.redraw_item_tree(uid, view);
        Ok(())
    }

    /// Keeps a nested item inside its parent's unit square: half extents at most 0.5 and the
    /// center at least one half extent away from every edge. Top-level items are unconstrained.
    pub fn constrain_item(&mut self, uid: &Uid, view: &ViewState) -> Result<(), SceneError> {
        let pair = self.item_mut(uid)?;
        if pair.main().parent().is_none() {
            return Ok(());
        }
        pair.update(|item| {
            let [w, h] = item.size();
            let (w, h) = (w.min(0.5), h.min(0.5));
            let [x, y] = item.pos();
            let x = x.min(1.0 - w).max(w);
            let y = y.min(1.0 - h).max(h);
            item.set_geometry([x, y], [w, h]);
        });
        self.redraw_item_tree(uid, view);
        Ok(())
    }

    /// Multiplies every top-level item's half extents by the given factors.
    pub fn rescale_top_level(&mut self, factor: [f64; 2]) {
        for pair in self.items.values_mut() {
            if pair.main().depth() != 1 {
                continue;
            }
            pair.update(|item| {
                let [w, h] = item.size();
                item.set_geometry(item.pos(), [w * factor[0], h * factor[1]]);
            });
        }
    }

    /// Pixels per unit of an item's own coordinate frame, per axis, in the main view.
    pub fn frame_scale(&self, uid: &Uid, view: &ViewState) -> Option<[f64; 2]> {
        let mut scale = [view.scaled_width(), view.scaled_height()];
        for [_, _, pw, ph] in self.ancestors(uid)? {
            scale[0] *= pw * 2.0;
            scale[1] *= ph * 2.0;
        }
        Some(scale)
    }

    /// The item's box in global model coordinates.
    pub fn global_box(&self, uid: &Uid) -> Option<GlobalBox> {
        let item = self.items.get(uid)?.main();
        let [x, y] = item.pos();
        let [w, h] = item.size();
        Some(GlobalBox::nest([x, y, w, h], self.ancestors(uid)?))
    }

    /// Recomputes screen geometry of every item and connection in every displayed view.
    pub fn redraw_all(&mut self, view: &ViewState) {
        for target in displayed_views(view) {
            self.redraw_view(target, view);
        }
    }

    pub fn redraw_view(&mut self, target: View, view: &ViewState) {
        let transform = Transform::for_view(target, view);
        let uids = self.items.keys().cloned().collect::<Vec<_>>();
        for uid in &uids {
            self.redraw_item_in(uid, target, &transform);
        }
        let conns = self.conns.keys().cloned().collect::<Vec<_>>();
        for uid in &conns {
            self.redraw_connection_in(uid, target);
        }
    }

    /// Retries every connection parked under `uid`, now that it is realized.
    pub fn notify_created(&mut self, uid: &Uid, view: &ViewState) {
        for conn in &self.retry_pending(uid) {
            self.redraw_connection(conn, view);
        }
    }

    /// Re-resolves the live connections parked under `uid` and returns them undrawn.
    fn retry_pending(&mut self, uid: &Uid) -> BTreeSet<Uid> {
        let mut retried = BTreeSet::new();
        for conn in self.pending.take(uid) {
            if !self.conns.get(&conn).is_some_and(|pair| !pair.main().is_removed()) {
                continue;
            }
            debug!(conn = %conn, created = %uid, "retrying deferred connection");
            self.resolve_connection(&conn);
            retried.insert(conn);
        }
        retried
    }

    fn item_mut(&mut self, uid: &Uid) -> Result<&mut ItemPair, SceneError> {
        self.items.get_mut(uid).ok_or_else(|| SceneError::NotFound {
            kind: ObjectKind::Item,
            uid: uid.clone(),
        })
    }

    fn network_mut(&mut self, uid: &Uid) -> Result<&mut ItemPair, SceneError> {
        let pair = self.item_mut(uid)?;
        if !pair.main().kind().is_network() {
            return Err(SceneError::NotANetwork { uid: uid.clone() });
        }
        Ok(pair)
    }

    /// `[x, y, half_w, half_h]` of each realized ancestor, innermost first.
    fn ancestors(&self, uid: &Uid) -> Option<Vec<[f64; 4]>> {
        let item = self.items.get(uid)?.main();
        let mut out = Vec::new();
        let mut cursor = item.parent();
        while let Some(parent_uid) = cursor {
            if out.len() >= self.items.len() {
                warn!(uid = %uid, "parent chain does not terminate");
                break;
            }
            let Some(parent) = self.items.get(parent_uid) else {
                break;
            };
            let parent = parent.main();
            let [x, y] = parent.pos();
            let [w, h] = parent.size();
            out.push([x, y, w, h]);
            cursor = parent.parent();
        }
        Some(out)
    }

    fn children_of(&self, uid: &Uid) -> Vec<Uid> {
        self.items
            .values()
            .filter(|pair| pair.main().parent() == Some(uid))
            .map(|pair| pair.main().uid().clone())
            .collect()
    }

    /// `uid` followed by all of its realized descendants.
    fn subtree(&self, uid: &Uid) -> Vec<Uid> {
        let mut out = vec![uid.clone()];
        let mut index = 0;
        while index < out.len() {
            let children = self.children_of(&out[index]);
            for child in children {
                if !out.contains(&child) {
                    out.push(child);
                }
            }
            index += 1;
        }
        out
    }

    /// Depth follows the parent chain; a child realized before its parent is nested once the
    /// parent shows up.
    fn refresh_depths(&mut self, uid: &Uid) {
        for member in self.subtree(uid).iter().skip(1) {
            let Some(parent) = self.items.get(member).and_then(|pair| pair.main().parent()) else {
                continue;
            };
            let depth = self
                .items
                .get(parent)
                .map_or(1, |parent| parent.main().depth() + 1);
            if let Some(pair) = self.items.get_mut(member) {
                pair.update(|item| item.set_depth(depth));
            }
        }
    }

    /// Removes the connections declared inside `uid` and all realized descendants, deepest
    /// first. `uid` itself stays.
    fn remove_contents(&mut self, uid: &Uid, view: &ViewState) {
        let members = self.subtree(uid);
        let inner_conns = self
            .conns
            .values()
            .filter(|pair| pair.main().parent().is_some_and(|parent| members.contains(parent)))
            .map(|pair| pair.main().uid().clone())
            .collect::<Vec<_>>();
        for conn in &inner_conns {
            self.remove_connection(conn);
        }
        for member in members.iter().skip(1).rev() {
            self.detach_item(member, view);
        }
    }

    /// Takes a single item out of the registry and falls its connections back to whatever is
    /// still realized on their paths.
    fn detach_item(&mut self, uid: &Uid, view: &ViewState) -> Option<ItemPair> {
        let pair = self.items.remove(uid)?;
        let attached = pair
            .main()
            .conn_in()
            .iter()
            .chain(pair.main().conn_out())
            .cloned()
            .collect::<BTreeSet<_>>();
        for conn in &attached {
            self.resolve_connection(conn);
            self.redraw_connection(conn, view);
        }
        Some(pair)
    }

    fn resolve_connection(&mut self, uid: &Uid) {
        let Some(pair) = self.conns.get_mut(uid) else {
            return;
        };
        self.pending.unregister(uid);

        for end in [End::Pre, End::Post] {
            let items = &self.items;
            let resolution = resolve_path(pair.main().path_for(end), |candidate| {
                items.contains_key(candidate)
            });
            if let Some(blocker) = &resolution.blocker {
                self.pending.register(uid, blocker);
            }

            for target in View::ALL {
                let previous = pair
                    .get_mut(target)
                    .set_endpoint(end, resolution.target.clone());
                if previous == resolution.target {
                    continue;
                }
                if let Some(item) = previous.and_then(|prev| self.items.get_mut(&prev)) {
                    endpoint_set(item.get_mut(target), end).remove(uid);
                }
                if let Some(item) = resolution
                    .target
                    .as_ref()
                    .and_then(|next| self.items.get_mut(next))
                {
                    endpoint_set(item.get_mut(target), end).insert(uid.clone());
                }
            }
        }
    }

    fn redraw_item(&mut self, uid: &Uid, view: &ViewState) {
        for target in displayed_views(view) {
            let transform = Transform::for_view(target, view);
            self.redraw_item_in(uid, target, &transform);
        }
    }

    fn redraw_item_in(&mut self, uid: &Uid, target: View, transform: &Transform) {
        let screen = self
            .global_box(uid)
            .map(|global| transform.project_box(&global));
        if let Some(pair) = self.items.get_mut(uid) {
            pair.get_mut(target).set_screen(screen);
        }
    }

    /// Redraws an item, its realized descendants, and every connection touching them.
    fn redraw_item_tree(&mut self, uid: &Uid, view: &ViewState) {
        self.redraw_tree(uid, view, BTreeSet::new(), false);
    }

    /// Like `redraw_item_tree`, also covering `conns`. A stale minimap is reprojected whole
    /// instead.
    fn redraw_tree(
        &mut self,
        uid: &Uid,
        view: &ViewState,
        mut conns: BTreeSet<Uid>,
        minimap_stale: bool,
    ) {
        let subtree = self.subtree(uid);
        for member in &subtree {
            if let Some(pair) = self.items.get(member) {
                conns.extend(pair.main().conn_in().iter().cloned());
                conns.extend(pair.main().conn_out().iter().cloned());
            }
        }
        for target in displayed_views(view) {
            if target == View::Minimap && minimap_stale {
                self.redraw_view(target, view);
                continue;
            }
            let transform = Transform::for_view(target, view);
            for member in &subtree {
                self.redraw_item_in(member, target, &transform);
            }
            for conn in &conns {
                self.redraw_connection_in(conn, target);
            }
        }
    }

    fn redraw_connection(&mut self, uid: &Uid, view: &ViewState) {
        for target in displayed_views(view) {
            self.redraw_connection_in(uid, target);
        }
    }

    fn redraw_connection_in(&mut self, uid: &Uid, target: View) {
        let Some(pair) = self.conns.get(uid) else {
            return;
        };
        let conn = pair.get(target);
        let screen_of = |endpoint: Option<&Uid>| {
            endpoint
                .and_then(|uid| self.items.get(uid))
                .and_then(|item| item.get(target).screen())
        };
        let path = match (conn.pre(), conn.post()) {
            (Some(pre), Some(post)) if pre == post => screen_of(Some(pre)).map(|rect| {
                ConnectionPath::Loop {
                    anchor: [rect.x + rect.width / 2.0, rect.y],
                    radius: rect.width.min(rect.height) * LOOP_RADIUS,
                }
            }),
            (pre, post) => match (screen_of(pre), screen_of(post)) {
                (Some(from), Some(to)) => Some(ConnectionPath::Line {
                    from: from.center(),
                    to: to.center(),
                }),
                _ => None,
            },
        };
        if let Some(pair) = self.conns.get_mut(uid) {
            pair.get_mut(target).set_path(path);
        }
    }

    /// Recomputes the minimap extent and re-projects the minimap when it is displayed and the
    /// extent moved.
    pub fn refresh_minimap(&mut self, view: &mut ViewState) {
        let changed = minimap::recompute_extent(view, self.items.values().map(ItemPair::main));
        if changed && view.show_minimap() {
            self.redraw_view(View::Minimap, view);
        }
        minimap::update_viewbox(view);
    }
}

fn displayed_views(view: &ViewState) -> impl Iterator<Item = View> {
    let show_minimap = view.show_minimap();
    View::ALL
        .into_iter()
        .filter(move |target| *target == View::Main || show_minimap)
}

fn endpoint_set(item: &mut VisualItem, end: End) -> &mut BTreeSet<Uid> {
    match end {
        End::Pre => item.conn_out_mut(),
        End::Post => item.conn_in_mut(),
    }
}
