// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! SVG snapshots of a diagram.
//!
//! The snapshot is drawn from the screen geometry the scene already holds; it never reprojects.
//! The minimap, when displayed, is placed to the right of the main view.

use std::fmt::{self, Write as _};

use crate::graph::NetGraph;
use crate::model::{ConnectionPath, ItemKind, View, VisualConnection, VisualItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvgOptions {
    pub labels: bool,
    pub minimap: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            labels: true,
            minimap: true,
        }
    }
}

pub fn render_svg(graph: &NetGraph) -> Result<String, fmt::Error> {
    render_svg_with_options(graph, SvgOptions::default())
}

pub fn render_svg_with_options(
    graph: &NetGraph,
    options: SvgOptions,
) -> Result<String, fmt::Error> {
    let view = graph.view();
    let [width, height] = view.size();
    let [mm_width, mm_height] = view.minimap_size();
    let minimap = options.minimap && view.show_minimap();

    let total_width = if minimap { width + mm_width } else { width };
    let total_height = if minimap { height.max(mm_height) } else { height };

    let mut out = String::new();
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        num(total_width),
        num(total_height),
        num(total_width),
        num(total_height)
    )?;

    writeln!(
        out,
        r#"<g class="netgraph main" font-size="{}em">"#,
        num(graph.font_em())
    )?;
    write_view(&mut out, graph, View::Main, options.labels)?;
    writeln!(out, "</g>")?;

    if minimap {
        writeln!(
            out,
            r#"<svg class="minimap" x="{}" y="0" width="{}" height="{}">"#,
            num(width),
            num(mm_width),
            num(mm_height)
        )?;
        writeln!(
            out,
            r#"<rect class="background" width="{}" height="{}"/>"#,
            num(mm_width),
            num(mm_height)
        )?;
        write_view(&mut out, graph, View::Minimap, false)?;
        if let Some(viewbox) = view.viewbox() {
            writeln!(
                out,
                r#"<rect class="viewbox" x="{}" y="{}" width="{}" height="{}"/>"#,
                num(viewbox.x),
                num(viewbox.y),
                num(viewbox.width),
                num(viewbox.height)
            )?;
        }
        writeln!(out, "</svg>")?;
    }

    writeln!(out, "</svg>")?;
    Ok(out)
}

fn write_view(out: &mut String, graph: &NetGraph, target: View, labels: bool) -> fmt::Result {
    let scene = graph.scene();

    // Parents before children so nested items paint on top.
    let mut items = scene
        .items()
        .values()
        .map(|pair| pair.get(target))
        .collect::<Vec<_>>();
    items.sort_by_key(|item| item.depth());
    for item in items {
        write_item(out, item, labels, graph.transparent_nets())?;
    }

    for pair in scene.connections().values() {
        write_connection(out, pair.get(target))?;
    }
    Ok(())
}

fn write_item(
    out: &mut String,
    item: &VisualItem,
    label: bool,
    transparent_nets: bool,
) -> fmt::Result {
    let Some(rect) = item.screen() else {
        return Ok(());
    };
    let opacity = match item.kind() {
        ItemKind::Net if transparent_nets => r#" fill-opacity="0""#,
        _ => "",
    };
    writeln!(
        out,
        r#"<g class="{}" data-uid="{}">"#,
        item.kind().as_str(),
        escape(item.uid().as_str())
    )?;
    match item.kind() {
        ItemKind::Ens => {
            let [cx, cy] = rect.center();
            writeln!(
                out,
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}"/>"#,
                num(cx),
                num(cy),
                num(rect.width / 2.0),
                num(rect.height / 2.0)
            )?;
        }
        ItemKind::Net | ItemKind::Node => {
            writeln!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}"{opacity}/>"#,
                num(rect.x),
                num(rect.y),
                num(rect.width),
                num(rect.height)
            )?;
        }
    }
    if label && !item.label().is_empty() {
        let [cx, _] = rect.center();
        writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
            num(cx),
            num(rect.y + rect.height),
            escape(item.label())
        )?;
    }
    writeln!(out, "</g>")
}

fn write_connection(out: &mut String, conn: &VisualConnection) -> fmt::Result {
    let class = if conn.is_recurrent() {
        "conn recurrent"
    } else {
        "conn"
    };
    match conn.path() {
        Some(ConnectionPath::Line { from, to }) => writeln!(
            out,
            r#"<line class="{class}" data-uid="{}" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            escape(conn.uid().as_str()),
            num(from[0]),
            num(from[1]),
            num(to[0]),
            num(to[1])
        ),
        Some(ConnectionPath::Loop { anchor, radius }) => writeln!(
            out,
            r#"<circle class="{class}" data-uid="{}" cx="{}" cy="{}" r="{}" fill="none"/>"#,
            escape(conn.uid().as_str()),
            num(anchor[0]),
            num(anchor[1] - radius),
            num(radius)
        ),
        None => Ok(()),
    }
}

/// Fixed three-decimal rendering with trailing zeros trimmed.
fn num(value: f64) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_owned(),
        other => other.to_owned(),
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
