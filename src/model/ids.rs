// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Stable identifier of a simulation object or connection, as assigned by the server.
///
/// Construction never fails: the server owns the uid space and a uid that does not look like a
/// model attribute path is still usable as a key. Call [`Uid::check`] to find out whether it is
/// well-formed.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct Uid(#[schemars(with = "String")] SmolStr);

impl Uid {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(SmolStr::new(value.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Validates the uid against the model attribute path grammar
    /// (`model`, `net.ensembles[3]`, `a.b_2`).
    pub fn check(&self) -> Result<(), UidError> {
        validate_uid(self.as_str())
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Uid {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Uid {
    type Err = UidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_uid(s)?;
        Ok(Self::new(s))
    }
}

impl From<&str> for Uid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UidError {
    Empty,
    Malformed { uid: String },
}

impl fmt::Display for UidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("uid must not be empty"),
            Self::Malformed { uid } => write!(f, "uid '{uid}' is not a model attribute path"),
        }
    }
}

impl std::error::Error for UidError {}

fn uid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*|\[[0-9]+\])*$")
            .expect("uid pattern compiles")
    })
}

fn validate_uid(value: &str) -> Result<(), UidError> {
    if value.is_empty() {
        return Err(UidError::Empty);
    }
    if !uid_pattern().is_match(value) {
        return Err(UidError::Malformed {
            uid: value.to_owned(),
        });
    }
    Ok(())
}
