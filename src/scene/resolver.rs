// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Deferred endpoint resolution for connections into collapsed networks.
//!
//! A connection endpoint is a path of uids from the outermost network to the nominal object. Only
//! some prefix of that path may be realized (the rest hides inside a collapsed network, or has not
//! arrived yet). The connection is drawn to the deepest realized uid and parked under the next
//! uid down the path, so it gets another chance exactly when that uid is created.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::Uid;

/// Outcome of resolving one endpoint path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Deepest realized uid on the path.
    pub target: Option<Uid>,
    /// Uid whose creation could improve `target`; `None` once the nominal object is realized.
    pub blocker: Option<Uid>,
}

pub fn resolve_path(path: &[Uid], is_realized: impl Fn(&Uid) -> bool) -> Resolution {
    match path.iter().rposition(|uid| is_realized(uid)) {
        Some(index) => Resolution {
            target: Some(path[index].clone()),
            blocker: path.get(index + 1).cloned(),
        },
        None => Resolution {
            target: None,
            blocker: path.first().cloned(),
        },
    }
}

/// Index of connections waiting for a uid to be realized.
///
/// Kept in both directions so a connection can drop all of its registrations at once when it is
/// re-resolved or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingConnections {
    by_blocker: BTreeMap<Uid, BTreeSet<Uid>>,
    by_conn: BTreeMap<Uid, BTreeSet<Uid>>,
}

impl PendingConnections {
    /// Parks `conn` under `blocker`. Returns `false` if it was already parked there.
    pub fn register(&mut self, conn: &Uid, blocker: &Uid) -> bool {
        let inserted = self
            .by_blocker
            .entry(blocker.clone())
            .or_default()
            .insert(conn.clone());
        if inserted {
            self.by_conn
                .entry(conn.clone())
                .or_default()
                .insert(blocker.clone());
        }
        inserted
    }

    /// Drops every registration of `conn`.
    pub fn unregister(&mut self, conn: &Uid) {
        let Some(blockers) = self.by_conn.remove(conn) else {
            return;
        };
        for blocker in blockers {
            if let Some(waiting) = self.by_blocker.get_mut(&blocker) {
                waiting.remove(conn);
                if waiting.is_empty() {
                    self.by_blocker.remove(&blocker);
                }
            }
        }
    }

    /// Removes the whole entry for `blocker` and returns the connections that were waiting on it.
    pub fn take(&mut self, blocker: &Uid) -> BTreeSet<Uid> {
        let waiting = self.by_blocker.remove(blocker).unwrap_or_default();
        for conn in &waiting {
            if let Some(blockers) = self.by_conn.get_mut(conn) {
                blockers.remove(blocker);
                if blockers.is_empty() {
                    self.by_conn.remove(conn);
                }
            }
        }
        waiting
    }

    pub fn waiting_on(&self, blocker: &Uid) -> impl Iterator<Item = &Uid> {
        self.by_blocker.get(blocker).into_iter().flatten()
    }

    pub fn blockers_of(&self, conn: &Uid) -> impl Iterator<Item = &Uid> {
        self.by_conn.get(conn).into_iter().flatten()
    }

    pub fn is_pending(&self, conn: &Uid) -> bool {
        self.by_conn.contains_key(conn)
    }

    /// Number of distinct uids connections are waiting on.
    pub fn len(&self) -> usize {
        self.by_blocker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_blocker.is_empty()
    }
}
