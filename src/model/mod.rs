// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Items and connections always come in twins (main view + minimap) that share model-space state
//! and differ only in their device-pixel projection.

pub mod connection;
pub mod ids;
pub mod item;
pub mod view;

pub use connection::{
    is_recurrent, ConnectionPair, ConnectionPath, ConnectionSpec, End, EndpointPath,
    VisualConnection,
};
pub use ids::{Uid, UidError};
pub use item::{ItemKind, ItemPair, ItemSpec, VisualItem};
pub use view::{Extent, ScreenRect, View, ViewState};
