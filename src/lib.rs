// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Netgraph: view-state sync, spatial transforms and deferred connection resolution for an
//! interactive node-link diagram of nested simulation networks.
//!
//! A [`graph::NetGraph`] owns one diagram. Server messages enter through
//! [`graph::NetGraph::handle_text`], local input through [`gesture::GestureController`], and
//! user-initiated changes leave as [`protocol::Outbound`] notifications.

pub mod collab;
pub mod config;
pub mod gesture;
pub mod graph;
pub mod model;
pub mod protocol;
pub mod render;
pub mod scene;
pub mod session;
pub mod transform;

pub use config::NetGraphConfig;
pub use graph::NetGraph;
