/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

#![deny(unsafe_code)]

//! Enforcement of the [Cross-Origin-Opener-Policy](https://html.spec.whatwg.org/multipage/#cross-origin-opener-policies)
//! of top-level navigations.
//!
//! A [`CrossOriginOpenerPolicyStatus`] is created when a navigation starts and is fed
//! every response of that navigation. It decides whether the resulting document has to
//! live in a new browsing context group, and tracks the virtual browsing context group
//! used by report-only policies.

pub mod headers;
pub mod matching;
pub mod navigation;
pub mod origin_trial;
pub mod policy;
pub mod reporting;
pub mod sanitize;
pub mod status;

pub use crate::matching::{
    SwapDecisions, cross_origin_opener_policy_matches,
    should_swap_browsing_instance_for_cross_origin_opener_policy,
};
pub use crate::navigation::{NavigatingFrame, NavigationResponse};
pub use crate::policy::{CrossOriginOpenerPolicy, CrossOriginOpenerPolicyValue};
pub use crate::sanitize::{CoopFeatures, CoopSanitizer, SanitizedPolicy};
pub use crate::status::{BlockedByResponseReason, CrossOriginOpenerPolicyStatus, CurrentDocument};
