// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model-space to device-pixel mapping for the main view and the minimap.
//!
//! Model space is normalized: a top-level item at `x = 1.0` sits at the right edge of an unzoomed,
//! unpanned main viewport. Items nested in a network live in that network's unit square, so their
//! global coordinates accumulate through the parent chain (see [`GlobalBox::nest`]).

use crate::model::{ScreenRect, View, ViewState};

/// Item geometry in global model coordinates: center plus half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalBox {
    pub center: [f64; 2],
    pub half: [f64; 2],
}

impl GlobalBox {
    /// Lifts a box given relative to its parent into global model space.
    ///
    /// `ancestors` yields `[x, y, half_w, half_h]` of each enclosing network, innermost first.
    pub fn nest(local: [f64; 4], ancestors: impl IntoIterator<Item = [f64; 4]>) -> Self {
        let [x, y, w, h] = local;
        let (mut dx, mut dy) = (0.0, 0.0);
        let (mut nx, mut ny) = (1.0, 1.0);
        for [px, py, pw, ph] in ancestors {
            dx = dx * pw * 2.0 + (px - pw);
            dy = dy * ph * 2.0 + (py - ph);
            nx *= pw * 2.0;
            ny *= ph * 2.0;
        }
        Self {
            center: [x * nx + dx, y * ny + dy],
            half: [w * nx, h * ny],
        }
    }

    pub fn min_max_xy(&self) -> [f64; 4] {
        [
            self.center[0] - self.half[0],
            self.center[0] + self.half[0],
            self.center[1] - self.half[1],
            self.center[1] + self.half[1],
        ]
    }
}

/// Affine map `pixel = model * scale + offset`, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub sx: f64,
    pub sy: f64,
    pub ox: f64,
    pub oy: f64,
}

impl Transform {
    pub fn main(view: &ViewState) -> Self {
        let w = view.scaled_width();
        let h = view.scaled_height();
        Self {
            sx: w,
            sy: h,
            ox: view.offset_x * w,
            oy: view.offset_y * h,
        }
    }

    /// Fits the tracked extent into the minimap, centered along the axis with slack.
    pub fn minimap(view: &ViewState) -> Self {
        let w = view.mm_width * view.mm_scale;
        let h = view.mm_height * view.mm_scale;
        let disp_w = view.extent.width() * w;
        let disp_h = view.extent.height() * h;
        Self {
            sx: w,
            sy: h,
            ox: -view.extent.min_x * w + (view.mm_width - disp_w) / 2.0,
            oy: -view.extent.min_y * h + (view.mm_height - disp_h) / 2.0,
        }
    }

    pub fn for_view(target: View, view: &ViewState) -> Self {
        match target {
            View::Main => Self::main(view),
            View::Minimap => Self::minimap(view),
        }
    }

    pub fn project(&self, [x, y]: [f64; 2]) -> [f64; 2] {
        [x * self.sx + self.ox, y * self.sy + self.oy]
    }

    pub fn unproject(&self, [px, py]: [f64; 2]) -> [f64; 2] {
        [(px - self.ox) / self.sx, (py - self.oy) / self.sy]
    }

    pub fn project_box(&self, global: &GlobalBox) -> ScreenRect {
        ScreenRect::from_center(
            self.project(global.center),
            global.half[0] * 2.0 * self.sx,
            global.half[1] * 2.0 * self.sy,
        )
    }
}

/// Pan offset change for a pointer drag of `dx`/`dy` pixels at the current zoom.
pub fn pan_delta(view: &ViewState, dx: f64, dy: f64) -> [f64; 2] {
    [dx / view.scaled_width(), dy / view.scaled_height()]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    pub offset: [f64; 2],
    pub scale: f64,
}

/// Multiplies the scale by `factor` while keeping the model point under `cursor` (main view
/// pixels) fixed on screen.
pub fn zoom_about(view: &ViewState, cursor: [f64; 2], factor: f64) -> Zoom {
    let x = cursor[0] / view.width;
    let y = cursor[1] / view.height;
    let xx = x / view.scale - view.offset_x;
    let yy = y / view.scale - view.offset_y;
    Zoom {
        offset: [
            (view.offset_x + xx) / factor - xx,
            (view.offset_y + yy) / factor - yy,
        ],
        scale: view.scale * factor,
    }
}

/// Label font size in `em`.
pub fn font_em(scale: f64, font_size: f64, zoom_fonts: bool) -> f64 {
    if zoom_fonts {
        3.0 * scale
    } else {
        font_size / 100.0
    }
}
