// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::{debug, warn};

use super::NetGraph;
use crate::model::{ItemKind, Uid};
use crate::protocol::{decode, Inbound, ProtocolError, UiCommand};
use crate::scene::{ObjectKind, SceneError};

impl NetGraph {
    /// Decodes and applies one inbound message. Failures are logged and the message is dropped.
    ///
    /// Returns whether the message changed anything.
    pub fn handle_text(&mut self, text: &str) -> bool {
        match decode(text) {
            Ok(message) => self.handle(message),
            Err(ProtocolError::UnknownType { type_name }) => {
                warn!(message_type = %type_name, "ignoring message of unknown type");
                false
            }
            Err(err) => {
                warn!(%err, "dropping undecodable message");
                false
            }
        }
    }

    /// Applies one decoded message, logging and skipping lookup misses.
    pub fn handle(&mut self, message: Inbound) -> bool {
        let type_name = message.type_name();
        match self.dispatch(message) {
            Ok(applied) => applied,
            Err(err) => {
                warn!(message_type = type_name, %err, "skipping message");
                false
            }
        }
    }

    /// Applies one decoded message. Remote expand/collapse and pan/zoom are not echoed back to
    /// the server.
    pub fn dispatch(&mut self, message: Inbound) -> Result<bool, SceneError> {
        debug!(message_type = message.type_name(), "dispatch");
        match message {
            Inbound::Net(info) => {
                self.scene
                    .create_item(info.into_spec(ItemKind::Net), &mut self.view);
            }
            Inbound::Ens(info) => {
                self.scene
                    .create_item(info.into_spec(ItemKind::Ens), &mut self.view);
            }
            Inbound::Node(info) => {
                self.scene
                    .create_item(info.into_spec(ItemKind::Node), &mut self.view);
            }
            Inbound::Conn(info) => {
                self.scene.create_connection(info.into_spec(), &self.view);
            }
            Inbound::Pan { x, y } => {
                if !x.is_finite() || !y.is_finite() {
                    warn!(x, y, "ignoring non-finite pan offset");
                    return Ok(false);
                }
                self.set_offset(x, y);
            }
            Inbound::Zoom { zoom } => {
                if !zoom.is_finite() || zoom <= 0.0 {
                    warn!(zoom, "ignoring non-positive zoom");
                    return Ok(false);
                }
                self.set_scale(zoom);
            }
            Inbound::Expand { uid } => return self.scene.expand(&uid, &self.view),
            Inbound::Collapse { uid } => return self.scene.collapse(&uid, &mut self.view),
            Inbound::PosSize { uid, pos, size } => {
                self.scene.set_pos_size(&uid, pos, size, &mut self.view)?;
            }
            Inbound::Config { uid, config } => {
                let Some(component) = self.components.by_uid(&uid) else {
                    return Err(component_not_found(uid));
                };
                component.update_layout(&config);
            }
            Inbound::Js { code } => return Ok(self.run_command(code)),
            Inbound::Rename { uid, name } => self.scene.rename(&uid, &name, &self.view)?,
            Inbound::Remove { uid } => {
                self.scene.remove(&uid, &mut self.view)?;
            }
            Inbound::Reconnect { uid, pres, posts } => {
                self.scene
                    .reconnect(&uid, pres.into_path(), posts.into_path(), &self.view)?;
            }
            Inbound::DeleteGraph { uid, notify_server } => {
                let Some(mut component) = self.components.detach(&uid) else {
                    return Err(component_not_found(uid));
                };
                component.remove(notify_server);
            }
            Inbound::Unknown => {
                warn!("ignoring message of unknown type");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Executes a server-pushed UI command.
    pub fn run_command(&mut self, command: UiCommand) -> bool {
        match command {
            UiCommand::Redraw => self.redraw(),
            UiCommand::ResetView => {
                self.set_scale(1.0);
                self.set_offset(0.0, 0.0);
            }
            UiCommand::ShowMinimap { visible } => self.set_show_minimap(visible),
            UiCommand::ZoomFonts { enabled } => self.set_zoom_fonts(enabled),
            UiCommand::FontSize { percent } => self.set_font_size(percent),
            UiCommand::AspectResize { enabled } => self.set_aspect_resize(enabled),
            UiCommand::TransparentNets { enabled } => self.set_transparent_nets(enabled),
            UiCommand::Unsupported => {
                warn!("ignoring unsupported ui command");
                return false;
            }
        }
        true
    }
}

fn component_not_found(uid: Uid) -> SceneError {
    SceneError::NotFound {
        kind: ObjectKind::Component,
        uid,
    }
}
