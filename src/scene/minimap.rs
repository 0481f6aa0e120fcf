// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Minimap extent tracking and the viewbox highlight.

use crate::model::{Extent, ScreenRect, ViewState, VisualItem};

/// Border added around the content, as a fraction of the minimap scale.
pub const BORDER: f64 = 0.05;

/// Smallest extent span used to derive the scale; keeps a single zero-size item finite.
const MIN_SPAN: f64 = 1e-6;

/// Recomputes the tracked extent and minimap scale from the top-level items.
///
/// Items nested inside networks are skipped since their network already bounds them. Returns
/// whether the extent or the scale changed; with no top-level items the previous extent is kept.
pub fn recompute_extent<'a>(
    view: &mut ViewState,
    items: impl IntoIterator<Item = &'a VisualItem>,
) -> bool {
    let mut extent: Option<Extent> = None;
    for item in items {
        if item.depth() > 1 {
            continue;
        }
        let [min_x, max_x, min_y, max_y] = item.min_max_xy();
        match extent.as_mut() {
            Some(extent) => extent.include([min_x, max_x, min_y, max_y]),
            None => {
                extent = Some(Extent {
                    min_x,
                    max_x,
                    min_y,
                    max_y,
                })
            }
        }
    }
    let Some(mut extent) = extent else {
        return false;
    };

    // The border depends on the scale it feeds back into; one correction pass is enough.
    let scale = span_scale(&extent);
    extent.min_x -= scale * BORDER;
    extent.max_x += scale * BORDER;
    extent.min_y -= scale * BORDER;
    extent.max_y += scale * BORDER;

    let mm_scale = span_scale(&extent);
    if extent == view.extent && mm_scale == view.mm_scale {
        return false;
    }
    view.mm_scale = mm_scale;
    view.extent = extent;
    true
}

fn span_scale(extent: &Extent) -> f64 {
    1.0 / extent.width().max(extent.height()).max(MIN_SPAN)
}

/// Maps the region visible in the main view onto the minimap.
///
/// Leaves the stored viewbox untouched while the minimap is hidden.
pub fn update_viewbox(view: &mut ViewState) {
    if !view.show_minimap {
        return;
    }
    let w = view.mm_width * view.mm_scale;
    let h = view.mm_height * view.mm_scale;
    let disp_w = view.extent.width() * w;
    let disp_h = view.extent.height() * h;
    view.viewbox = Some(ScreenRect {
        x: -(view.extent.min_x + view.offset_x) * w + (view.mm_width - disp_w) / 2.0,
        y: -(view.extent.min_y + view.offset_y) * h + (view.mm_height - disp_h) / 2.0,
        width: w / view.scale,
        height: h / view.scale,
    });
}

#[cfg(test)]
mod tests {
    use super::{recompute_extent, update_viewbox, BORDER};
    use crate::model::{ItemKind, ItemPair, ItemSpec, ViewState};

    fn top_level(uid: &str, pos: [f64; 2], size: [f64; 2]) -> ItemPair {
        ItemPair::new(&ItemSpec::new(uid, ItemKind::Ens, pos, size), 1)
    }

    #[test]
    fn extent_is_padded_with_second_scale_pass() {
        let mut view = ViewState::default();
        let a = top_level("a", [0.0, 0.0], [0.5, 0.5]);
        let b = top_level("b", [1.5, 0.0], [0.5, 0.5]);

        assert!(recompute_extent(&mut view, [a.main(), b.main()]));

        // Raw box [-0.5, 2.0] x [-0.5, 0.5]: first scale 0.4, border 0.02.
        let extent = view.extent();
        assert!((extent.min_x - (-0.52)).abs() < 1e-12);
        assert!((extent.max_x - 2.02).abs() < 1e-12);
        assert!((extent.min_y - (-0.52)).abs() < 1e-12);
        assert!((view.minimap_scale() - 1.0 / 2.54).abs() < 1e-12);
        assert_eq!(BORDER, 0.05);
    }

    #[test]
    fn nested_items_do_not_contribute() {
        let mut view = ViewState::default();
        let top = top_level("net", [0.5, 0.5], [0.5, 0.5]);
        let nested = ItemPair::new(
            &ItemSpec::new("net.a", ItemKind::Node, [10.0, 10.0], [0.1, 0.1]).with_parent("net"),
            2,
        );

        recompute_extent(&mut view, [top.main(), nested.main()]);
        assert!(view.extent().max_x < 1.1);
    }

    #[test]
    fn empty_scene_keeps_previous_extent() {
        let mut view = ViewState::default();
        let a = top_level("a", [0.0, 0.0], [1.0, 1.0]);
        recompute_extent(&mut view, [a.main()]);
        let before = (view.extent(), view.minimap_scale());

        assert!(!recompute_extent(&mut view, std::iter::empty()));
        assert_eq!((view.extent(), view.minimap_scale()), before);
    }

    #[test]
    fn unchanged_extent_reports_no_change() {
        let mut view = ViewState::default();
        let a = top_level("a", [0.0, 0.0], [1.0, 1.0]);
        let inside = top_level("b", [0.2, 0.2], [0.1, 0.1]);

        assert!(recompute_extent(&mut view, [a.main()]));
        assert!(!recompute_extent(&mut view, [a.main()]));
        assert!(!recompute_extent(&mut view, [a.main(), inside.main()]));

        let outside = top_level("c", [3.0, 0.0], [0.5, 0.5]);
        assert!(recompute_extent(&mut view, [a.main(), outside.main()]));
    }

    #[test]
    fn viewbox_tracks_pan_and_zoom() {
        let mut view = ViewState::new(800.0, 600.0, 200.0, 200.0);
        let a = top_level("a", [0.5, 0.5], [0.5, 0.5]);
        recompute_extent(&mut view, [a.main()]);
        update_viewbox(&mut view);
        let unzoomed = view.viewbox().expect("viewbox");

        view.scale = 2.0;
        view.offset_x = -0.25;
        update_viewbox(&mut view);
        let zoomed = view.viewbox().expect("viewbox");

        assert!((zoomed.width - unzoomed.width / 2.0).abs() < 1e-9);
        let w = 200.0 * view.minimap_scale();
        assert!((zoomed.x - (unzoomed.x + 0.25 * w)).abs() < 1e-9);
    }

    #[test]
    fn hidden_minimap_leaves_viewbox_alone() {
        let mut view = ViewState::default();
        view.show_minimap = false;
        update_viewbox(&mut view);
        assert_eq!(view.viewbox(), None);
    }
}
