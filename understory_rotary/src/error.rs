// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for snapshot construction and configuration.
//!
//! Navigation itself never fails: "nothing to focus" is reported as `None`.

use crate::types::{NodeId, WindowId};

/// Problems detected while assembling a [`Snapshot`](crate::Snapshot).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// Two windows share an id.
    #[error("window {0:?} was added twice")]
    DuplicateWindow(WindowId),
    /// Two nodes in one window share a key.
    #[error("a node key is used twice in window {0:?}")]
    DuplicateKey(WindowId),
    /// A child was attached to a node this builder did not create.
    #[error("parent {0:?} is not part of this snapshot")]
    UnknownParent(NodeId),
}

/// Invalid [`NavigatorConfig`](crate::NavigatorConfig) values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// An enabled history cache has no room for entries.
    #[error("{cache} history is enabled but has zero capacity")]
    ZeroCapacity {
        /// Which cache.
        cache: &'static str,
    },
    /// An expiring history cache would expire entries immediately.
    #[error("{cache} history expires entries after 0 ms")]
    ZeroTimeout {
        /// Which cache.
        cache: &'static str,
    },
    /// The heads-up notification bounds are empty or inverted.
    #[error("heads-up notification bounds are inverted: left {left} >= right {right}")]
    InvalidHunBounds {
        /// Configured left edge.
        left: f64,
        /// Configured right edge.
        right: f64,
    },
    /// A focus-area scan depth of zero would never find anything.
    #[error("focus area scan depth must be at least 1")]
    ZeroScanDepth,
}
