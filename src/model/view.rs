// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;

/// The two renderings every item and connection exists in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Main,
    Minimap,
}

impl View {
    pub const ALL: [View; 2] = [View::Main, View::Minimap];

    pub fn other(self) -> Self {
        match self {
            Self::Main => Self::Minimap,
            Self::Minimap => Self::Main,
        }
    }
}

/// Axis-aligned device-pixel rectangle, `x`/`y` at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn from_center(center: [f64; 2], width: f64, height: f64) -> Self {
        Self {
            x: center[0] - width / 2.0,
            y: center[1] - height / 2.0,
            width,
            height,
        }
    }

    pub fn center(&self) -> [f64; 2] {
        [self.x + self.width / 2.0, self.y + self.height / 2.0]
    }
}

/// Bounding box in global model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Extent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub(crate) fn include(&mut self, [min_x, max_x, min_y, max_y]: [f64; 4]) {
        self.min_x = self.min_x.min(min_x);
        self.max_x = self.max_x.max(max_x);
        self.min_y = self.min_y.min(min_y);
        self.max_y = self.max_y.max(max_y);
    }
}

/// Pan/zoom state of one diagram plus the pixel dimensions of both views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub(crate) offset_x: f64,
    pub(crate) offset_y: f64,
    pub(crate) scale: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) mm_width: f64,
    pub(crate) mm_height: f64,
    pub(crate) mm_scale: f64,
    pub(crate) extent: Extent,
    pub(crate) show_minimap: bool,
    pub(crate) viewbox: Option<ScreenRect>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
            width: 800.0,
            height: 600.0,
            mm_width: 200.0,
            mm_height: 150.0,
            mm_scale: 0.1,
            extent: Extent::default(),
            show_minimap: true,
            viewbox: None,
        }
    }
}

impl ViewState {
    pub fn new(width: f64, height: f64, mm_width: f64, mm_height: f64) -> Self {
        Self {
            width,
            height,
            mm_width,
            mm_height,
            ..Self::default()
        }
    }

    /// Pan offset in normalized model units.
    pub fn offset(&self) -> [f64; 2] {
        [self.offset_x, self.offset_y]
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn size(&self) -> [f64; 2] {
        [self.width, self.height]
    }

    pub fn minimap_size(&self) -> [f64; 2] {
        [self.mm_width, self.mm_height]
    }

    /// Main viewport width in pixels at the current zoom.
    pub fn scaled_width(&self) -> f64 {
        self.width * self.scale
    }

    pub fn scaled_height(&self) -> f64 {
        self.height * self.scale
    }

    pub fn minimap_scale(&self) -> f64 {
        self.mm_scale
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn show_minimap(&self) -> bool {
        self.show_minimap
    }

    /// Highlight rectangle on the minimap marking what the main view currently shows.
    pub fn viewbox(&self) -> Option<ScreenRect> {
        self.viewbox
    }
}
