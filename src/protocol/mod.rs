// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire messages exchanged with the server.
//!
//! Inbound messages are JSON objects tagged by `type`; outbound notifications are tagged by `act`.

use std::fmt;

use schemars::{JsonSchema, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{ConnectionSpec, EndpointPath, ItemKind, ItemSpec, Uid};

/// Descriptor of a network, ensemble or node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectInfo {
    pub uid: Uid,
    #[serde(default)]
    pub label: String,
    /// Center, relative to the parent network.
    pub pos: [f64; 2],
    /// Half extents, relative to the parent network.
    pub size: [f64; 2],
    #[serde(default)]
    pub parent: Option<Uid>,
    #[serde(default)]
    pub expanded: bool,
}

impl ObjectInfo {
    pub fn into_spec(self, kind: ItemKind) -> ItemSpec {
        let mut spec = ItemSpec::new(self.uid, kind, self.pos, self.size)
            .with_label(self.label)
            .expanded(self.expanded);
        spec.parent = self.parent;
        spec
    }
}

/// Endpoint path as sent by the server: either one chain of uids or several chains that are
/// walked in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PathSpec {
    Nested(Vec<Vec<Uid>>),
    Flat(Vec<Uid>),
}

impl Default for PathSpec {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

impl PathSpec {
    /// Flattens into one outermost-to-innermost path.
    pub fn into_path(self) -> EndpointPath {
        match self {
            Self::Nested(chains) => chains.into_iter().flatten().collect(),
            Self::Flat(chain) => chain.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConnInfo {
    pub uid: Uid,
    #[serde(default)]
    pub pres: PathSpec,
    #[serde(default)]
    pub posts: PathSpec,
    /// Network the connection is declared inside.
    #[serde(default)]
    pub parent: Option<Uid>,
}

impl ConnInfo {
    pub fn into_spec(self) -> ConnectionSpec {
        ConnectionSpec {
            uid: self.uid,
            pre: self.pres.into_path(),
            post: self.posts.into_path(),
            parent: self.parent,
        }
    }
}

/// Server-pushed UI actions. A closed set of data-only commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum UiCommand {
    Redraw,
    /// Back to scale 1 with no pan offset.
    ResetView,
    ShowMinimap { visible: bool },
    ZoomFonts { enabled: bool },
    FontSize { percent: f64 },
    AspectResize { enabled: bool },
    TransparentNets { enabled: bool },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    Net(ObjectInfo),
    Ens(ObjectInfo),
    Node(ObjectInfo),
    Conn(ConnInfo),
    Pan {
        x: f64,
        y: f64,
    },
    Zoom {
        zoom: f64,
    },
    Expand {
        uid: Uid,
    },
    Collapse {
        uid: Uid,
    },
    PosSize {
        uid: Uid,
        pos: [f64; 2],
        size: [f64; 2],
    },
    Config {
        uid: Uid,
        config: Value,
    },
    Js {
        code: UiCommand,
    },
    Rename {
        uid: Uid,
        name: String,
    },
    Remove {
        uid: Uid,
    },
    Reconnect {
        uid: Uid,
        #[serde(default)]
        pres: PathSpec,
        #[serde(default)]
        posts: PathSpec,
    },
    DeleteGraph {
        uid: Uid,
        #[serde(default = "default_notify_server")]
        notify_server: bool,
    },
    #[serde(other)]
    Unknown,
}

fn default_notify_server() -> bool {
    true
}

impl Inbound {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Net(_) => "net",
            Self::Ens(_) => "ens",
            Self::Node(_) => "node",
            Self::Conn(_) => "conn",
            Self::Pan { .. } => "pan",
            Self::Zoom { .. } => "zoom",
            Self::Expand { .. } => "expand",
            Self::Collapse { .. } => "collapse",
            Self::PosSize { .. } => "pos_size",
            Self::Config { .. } => "config",
            Self::Js { .. } => "js",
            Self::Rename { .. } => "rename",
            Self::Remove { .. } => "remove",
            Self::Reconnect { .. } => "reconnect",
            Self::DeleteGraph { .. } => "delete_graph",
            Self::Unknown => "unknown",
        }
    }
}

/// User-gesture notifications sent to the server. Fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "act", rename_all = "snake_case")]
pub enum Outbound {
    Pan {
        x: f64,
        y: f64,
    },
    Zoom {
        scale: f64,
        x: f64,
        y: f64,
    },
    /// Ask the server to auto-layout the diagram; `uid` is the network, `null` for the root.
    FeedforwardLayout {
        uid: Option<Uid>,
    },
    Expand {
        uid: Uid,
    },
    Collapse {
        uid: Uid,
    },
    Pos {
        uid: Uid,
        x: f64,
        y: f64,
    },
    PosSize {
        uid: Uid,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl Outbound {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|source| ProtocolError::Json {
            type_name: None,
            source,
        })
    }
}

#[derive(Debug)]
pub enum ProtocolError {
    Json {
        type_name: Option<String>,
        source: serde_json::Error,
    },
    MissingType,
    UnknownType {
        type_name: String,
    },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json {
                type_name: Some(type_name),
                source,
            } => write!(f, "malformed '{type_name}' message: {source}"),
            Self::Json {
                type_name: None,
                source,
            } => write!(f, "malformed message: {source}"),
            Self::MissingType => write!(f, "message has no string 'type' field"),
            Self::UnknownType { type_name } => write!(f, "unknown message type '{type_name}'"),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source, .. } => Some(source),
            Self::MissingType | Self::UnknownType { .. } => None,
        }
    }
}

/// Decodes one inbound message. Unknown `type` tags are reported as errors so callers can log
/// the offending name.
pub fn decode(text: &str) -> Result<Inbound, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(|source| ProtocolError::Json {
        type_name: None,
        source,
    })?;
    let type_name = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?
        .to_owned();

    match Inbound::deserialize(value) {
        Ok(Inbound::Unknown) => Err(ProtocolError::UnknownType { type_name }),
        Ok(message) => Ok(message),
        Err(source) => Err(ProtocolError::Json {
            type_name: Some(type_name),
            source,
        }),
    }
}

pub fn inbound_schema() -> Schema {
    schemars::schema_for!(Inbound)
}

pub fn outbound_schema() -> Schema {
    schemars::schema_for!(Outbound)
}
