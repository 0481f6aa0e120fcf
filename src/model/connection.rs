// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use super::ids::Uid;
use super::view::View;

/// Chain of uids from the outermost network down to the nominal endpoint object.
pub type EndpointPath = SmallVec<[Uid; 4]>;

/// Which side of a connection an endpoint sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum End {
    Pre,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSpec {
    pub uid: Uid,
    pub pre: EndpointPath,
    pub post: EndpointPath,
    /// Network the connection is declared inside, if any.
    pub parent: Option<Uid>,
}

impl ConnectionSpec {
    pub fn new<I, J>(uid: impl Into<Uid>, pre: I, post: J) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Uid>,
        J: IntoIterator,
        J::Item: Into<Uid>,
    {
        Self {
            uid: uid.into(),
            pre: pre.into_iter().map(Into::into).collect(),
            post: post.into_iter().map(Into::into).collect(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<Uid>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Both ends nominally target the same object.
pub fn is_recurrent(pre: &[Uid], post: &[Uid]) -> bool {
    match (pre.last(), post.last()) {
        (Some(pre), Some(post)) => pre == post,
        _ => false,
    }
}

/// Device-pixel geometry of a drawn connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectionPath {
    Line { from: [f64; 2], to: [f64; 2] },
    /// Self loop drawn on top of the item it starts and ends at.
    Loop { anchor: [f64; 2], radius: f64 },
}

/// One edge as drawn in one view.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualConnection {
    uid: Uid,
    view: View,
    pres: EndpointPath,
    posts: EndpointPath,
    parent: Option<Uid>,
    pre: Option<Uid>,
    post: Option<Uid>,
    recurrent: bool,
    removed: bool,
    path: Option<ConnectionPath>,
    redraws: u64,
}

impl VisualConnection {
    fn from_spec(spec: &ConnectionSpec, view: View) -> Self {
        Self {
            uid: spec.uid.clone(),
            view,
            pres: spec.pre.clone(),
            posts: spec.post.clone(),
            parent: spec.parent.clone(),
            pre: None,
            post: None,
            recurrent: is_recurrent(&spec.pre, &spec.post),
            removed: false,
            path: None,
            redraws: 0,
        }
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn pres(&self) -> &[Uid] {
        &self.pres
    }

    pub fn posts(&self) -> &[Uid] {
        &self.posts
    }

    pub fn path_for(&self, end: End) -> &[Uid] {
        match end {
            End::Pre => &self.pres,
            End::Post => &self.posts,
        }
    }

    pub(crate) fn set_paths(&mut self, pres: EndpointPath, posts: EndpointPath) {
        self.recurrent = is_recurrent(&pres, &posts);
        self.pres = pres;
        self.posts = posts;
    }

    pub fn parent(&self) -> Option<&Uid> {
        self.parent.as_ref()
    }

    /// Item currently drawn as the `pre` end (the nominal object or its nearest realized
    /// ancestor).
    pub fn pre(&self) -> Option<&Uid> {
        self.pre.as_ref()
    }

    pub fn post(&self) -> Option<&Uid> {
        self.post.as_ref()
    }

    pub fn endpoint(&self, end: End) -> Option<&Uid> {
        match end {
            End::Pre => self.pre.as_ref(),
            End::Post => self.post.as_ref(),
        }
    }

    pub(crate) fn set_endpoint(&mut self, end: End, target: Option<Uid>) -> Option<Uid> {
        match end {
            End::Pre => std::mem::replace(&mut self.pre, target),
            End::Post => std::mem::replace(&mut self.post, target),
        }
    }

    /// Whether the end is drawn at its nominal object rather than at an ancestor.
    pub fn is_exact(&self, end: End) -> bool {
        let path = self.path_for(end);
        match (self.endpoint(end), path.last()) {
            (Some(target), Some(nominal)) => target == nominal,
            _ => false,
        }
    }

    pub fn is_recurrent(&self) -> bool {
        self.recurrent
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn path(&self) -> Option<ConnectionPath> {
        self.path
    }

    pub(crate) fn set_path(&mut self, path: Option<ConnectionPath>) {
        self.path = path;
        self.redraws = self.redraws.saturating_add(1);
    }

    /// Number of times this connection has been redrawn.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}

/// A connection together with its twin in the other view.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPair {
    main: VisualConnection,
    minimap: VisualConnection,
}

impl ConnectionPair {
    pub(crate) fn new(spec: &ConnectionSpec) -> Self {
        Self {
            main: VisualConnection::from_spec(spec, View::Main),
            minimap: VisualConnection::from_spec(spec, View::Minimap),
        }
    }

    pub fn main(&self) -> &VisualConnection {
        &self.main
    }

    pub fn minimap(&self) -> &VisualConnection {
        &self.minimap
    }

    pub fn get(&self, view: View) -> &VisualConnection {
        match view {
            View::Main => &self.main,
            View::Minimap => &self.minimap,
        }
    }

    pub(crate) fn get_mut(&mut self, view: View) -> &mut VisualConnection {
        match view {
            View::Main => &mut self.main,
            View::Minimap => &mut self.minimap,
        }
    }

    pub fn twin(&self, conn: &VisualConnection) -> &VisualConnection {
        self.get(conn.view().other())
    }

    pub(crate) fn update(&mut self, mut f: impl FnMut(&mut VisualConnection)) {
        f(&mut self.main);
        f(&mut self.minimap);
    }

    pub(crate) fn mark_removed(&mut self) {
        self.update(|conn| conn.removed = true);
    }
}
