// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One diagram: the scene, its view state, display settings, and the collaborators it drives.
//!
//! Every display setting is changed through a setter that performs the dependent work right away
//! (font recompute, redraw, viewport notification).

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::collab::{Components, DetachedViewport, MenuService, RecordedMenu, Viewport};
use crate::config::NetGraphConfig;
use crate::model::{View, ViewState};
use crate::protocol::Outbound;
use crate::scene::{minimap, Scene};
use crate::transform::font_em;

mod dispatch;

#[cfg(test)]
mod tests;

#[derive(Debug)]
pub struct NetGraph {
    pub(crate) scene: Scene,
    pub(crate) view: ViewState,
    font_size: f64,
    zoom_fonts: bool,
    aspect_resize: bool,
    transparent_nets: bool,
    font_em: f64,
    outbound: Option<UnboundedSender<Outbound>>,
    pub(crate) components: Components,
    pub(crate) viewport: Box<dyn Viewport>,
    pub(crate) menu: Box<dyn MenuService>,
}

impl Default for NetGraph {
    fn default() -> Self {
        Self::new(&NetGraphConfig::default())
    }
}

impl NetGraph {
    pub fn new(config: &NetGraphConfig) -> Self {
        let mut view = ViewState::new(
            config.width,
            config.height,
            config.minimap_width,
            config.minimap_height,
        );
        view.show_minimap = config.show_minimap;
        Self {
            scene: Scene::new(),
            font_em: font_em(view.scale, config.font_size, config.zoom_fonts),
            view,
            font_size: config.font_size,
            zoom_fonts: config.zoom_fonts,
            aspect_resize: config.aspect_resize,
            transparent_nets: config.transparent_nets,
            outbound: None,
            components: Components::default(),
            viewport: Box::new(DetachedViewport),
            menu: Box::new(RecordedMenu::default()),
        }
    }

    pub fn with_outbound(mut self, tx: UnboundedSender<Outbound>) -> Self {
        self.outbound = Some(tx);
        self
    }

    pub fn with_viewport(mut self, viewport: Box<dyn Viewport>) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_menu(mut self, menu: Box<dyn MenuService>) -> Self {
        self.menu = menu;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn components_mut(&mut self) -> &mut Components {
        &mut self.components
    }

    pub fn menu(&self) -> &dyn MenuService {
        self.menu.as_ref()
    }

    /// Current label size in `em`.
    pub fn font_em(&self) -> f64 {
        self.font_em
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn zoom_fonts(&self) -> bool {
        self.zoom_fonts
    }

    pub fn aspect_resize(&self) -> bool {
        self.aspect_resize
    }

    pub fn transparent_nets(&self) -> bool {
        self.transparent_nets
    }

    /// Drops the outbound sender so the receiving side sees the channel close.
    pub fn disconnect(&mut self) {
        self.outbound = None;
    }

    /// Sends a notification to the server. A closed channel drops it.
    pub fn notify(&self, message: Outbound) {
        let Some(tx) = &self.outbound else {
            return;
        };
        if let Err(err) = tx.send(message) {
            debug!(message = ?err.0, "outbound channel closed; dropping notification");
        }
    }

    /// Zero, negative and non-finite scales are ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if !scale.is_finite() || scale <= 0.0 {
            debug!(scale, "ignoring degenerate scale");
            return;
        }
        self.view.scale = scale;
        self.update_fonts();
        self.viewport.set_scale(scale);
        self.redraw();
    }

    pub fn set_offset(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            debug!(x, y, "ignoring non-finite offset");
            return;
        }
        self.view.offset_x = x;
        self.view.offset_y = y;
        self.viewport.set_position(x, y);
        self.redraw();
    }

    pub fn set_zoom_fonts(&mut self, enabled: bool) {
        self.zoom_fonts = enabled;
        self.update_fonts();
    }

    pub fn set_font_size(&mut self, percent: f64) {
        self.font_size = percent;
        self.update_fonts();
    }

    pub fn set_aspect_resize(&mut self, enabled: bool) {
        self.aspect_resize = enabled;
    }

    pub fn set_transparent_nets(&mut self, enabled: bool) {
        self.transparent_nets = enabled;
        self.viewport.redraw_all();
    }

    /// Shows or hides the minimap. Showing it reprojects the minimap, which is left stale while
    /// hidden.
    pub fn set_show_minimap(&mut self, visible: bool) {
        if self.view.show_minimap == visible {
            return;
        }
        self.view.show_minimap = visible;
        if visible {
            self.scene.redraw_view(View::Minimap, &self.view);
            minimap::update_viewbox(&mut self.view);
        }
    }

    /// Adopts new main viewport dimensions. With aspect-preserving resize, top-level items are
    /// rescaled so they keep their on-screen size.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            debug!(width, height, "ignoring degenerate viewport size");
            return;
        }
        if self.aspect_resize {
            self.scene
                .rescale_top_level([self.view.width / width, self.view.height / height]);
            minimap::recompute_extent(
                &mut self.view,
                self.scene.items().values().map(|pair| pair.main()),
            );
        }
        self.view.width = width;
        self.view.height = height;
        self.redraw();
        self.viewport.redraw_all();
    }

    pub fn resize_minimap(&mut self, width: f64, height: f64) {
        self.view.mm_width = width;
        self.view.mm_height = height;
        self.redraw();
    }

    /// Reprojects every displayed view and the viewbox from current state.
    pub fn redraw(&mut self) {
        self.scene.redraw_all(&self.view);
        minimap::update_viewbox(&mut self.view);
    }

    fn update_fonts(&mut self) {
        self.font_em = font_em(self.view.scale, self.font_size, self.zoom_fonts);
    }
}
