// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interfaces of the collaborators a diagram drives but does not own: chart components living
//! on the same page, the page viewport, and the context-menu service.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::model::Uid;

/// A chart or widget that the server addresses by uid.
pub trait Component: fmt::Debug {
    fn update_layout(&mut self, config: &Value);
    fn remove(&mut self, notify_server: bool);
}

/// The page-level viewport hosting every component.
pub trait Viewport: fmt::Debug {
    fn set_scale(&mut self, scale: f64);
    fn set_position(&mut self, x: f64, y: f64);
    fn redraw_all(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    AutoLayout,
    ToggleMinimap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

pub trait MenuService: fmt::Debug {
    fn show(&mut self, x: f64, y: f64, items: &[MenuItem]);
    fn hide_any(&mut self);
    fn visible_any(&self) -> bool;
}

/// Components addressable by uid.
#[derive(Debug, Default)]
pub struct Components {
    by_uid: BTreeMap<Uid, Box<dyn Component>>,
}

impl Components {
    pub fn register(&mut self, uid: Uid, component: Box<dyn Component>) {
        self.by_uid.insert(uid, component);
    }

    pub fn by_uid(&mut self, uid: &Uid) -> Option<&mut (dyn Component + 'static)> {
        self.by_uid.get_mut(uid).map(|component| component.as_mut())
    }

    /// Unregisters a component, handing it back to the caller.
    pub fn detach(&mut self, uid: &Uid) -> Option<Box<dyn Component>> {
        self.by_uid.remove(uid)
    }

    pub fn len(&self) -> usize {
        self.by_uid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uid.is_empty()
    }
}

/// Viewport stand-in for a diagram rendered on its own.
#[derive(Debug, Default)]
pub struct DetachedViewport;

impl Viewport for DetachedViewport {
    fn set_scale(&mut self, _scale: f64) {}
    fn set_position(&mut self, _x: f64, _y: f64) {}
    fn redraw_all(&mut self) {}
}

/// Menu service that remembers what it was asked to show.
#[derive(Debug, Default)]
pub struct RecordedMenu {
    open: Option<(f64, f64, Vec<MenuItem>)>,
}

impl RecordedMenu {
    pub fn open(&self) -> Option<&(f64, f64, Vec<MenuItem>)> {
        self.open.as_ref()
    }
}

impl MenuService for RecordedMenu {
    fn show(&mut self, x: f64, y: f64, items: &[MenuItem]) {
        self.open = Some((x, y, items.to_vec()));
    }

    fn hide_any(&mut self) {
        self.open = None;
    }

    fn visible_any(&self) -> bool {
        self.open.is_some()
    }
}
