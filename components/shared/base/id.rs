/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use serde::{Deserialize, Serialize};

/// Identifies a [browsing context group](https://html.spec.whatwg.org/multipage/#browsing-context-group).
///
/// Ids handed out by a [`BrowsingContextGroupIdGenerator`] are unique within the process and
/// ordered by allocation time.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct BrowsingContextGroupId(pub u64);

impl fmt::Display for BrowsingContextGroupId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Something able to mint fresh [`BrowsingContextGroupId`]s. Shared by every navigation
/// of the process, hence `Send + Sync`.
pub trait BrowsingContextGroupIdSource: Send + Sync {
    fn next_browsing_context_group_id(&self) -> BrowsingContextGroupId;
}

/// The process-wide counter of browsing context group ids.
#[derive(Debug)]
pub struct BrowsingContextGroupIdGenerator {
    next: AtomicU64,
}

impl BrowsingContextGroupIdGenerator {
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    pub const fn starting_at(first: u64) -> Self {
        BrowsingContextGroupIdGenerator {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for BrowsingContextGroupIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowsingContextGroupIdSource for BrowsingContextGroupIdGenerator {
    fn next_browsing_context_group_id(&self) -> BrowsingContextGroupId {
        let id = BrowsingContextGroupId(self.next.fetch_add(1, Ordering::Relaxed));
        debug!("Allocated browsing context group {}", id);
        id
    }
}
