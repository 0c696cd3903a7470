/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use servo_url::ImmutableOrigin;

use crate::policy::{CrossOriginOpenerPolicy, CrossOriginOpenerPolicyValue};

/// <https://html.spec.whatwg.org/multipage/#matching-coop>
pub fn cross_origin_opener_policy_matches(
    policy_a: CrossOriginOpenerPolicyValue,
    origin_a: &ImmutableOrigin,
    policy_b: CrossOriginOpenerPolicyValue,
    origin_b: &ImmutableOrigin,
) -> bool {
    // Different values never match, whatever the origins.
    if policy_a != policy_b {
        return false;
    }
    // Two "unsafe-none" values match across origins.
    if policy_a == CrossOriginOpenerPolicyValue::UnsafeNone {
        return true;
    }

    // Any other shared value matches only between same-origin documents.
    origin_a.same_origin(origin_b)
}

/// <https://html.spec.whatwg.org/multipage/#check-browsing-context-group-switch-coop-value>
pub fn should_swap_browsing_instance_for_cross_origin_opener_policy(
    current_policy: CrossOriginOpenerPolicyValue,
    current_origin: &ImmutableOrigin,
    is_initial_navigation: bool,
    destination_policy: CrossOriginOpenerPolicyValue,
    destination_origin: &ImmutableOrigin,
) -> bool {
    if cross_origin_opener_policy_matches(
        current_policy,
        current_origin,
        destination_policy,
        destination_origin,
    ) {
        return false;
    }

    // A popup opened by a `same-origin-allow-popups` document keeps its opener while
    // its first navigation lands on an `unsafe-none` document.
    if is_initial_navigation &&
        current_policy == CrossOriginOpenerPolicyValue::SameOriginAllowPopups &&
        destination_policy == CrossOriginOpenerPolicyValue::UnsafeNone
    {
        return false;
    }

    true
}

/// The four independent outcomes computed for every navigation response.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SwapDecisions {
    /// Enforced policy against enforced policy.
    pub enforced: bool,
    /// Report-only policy against report-only policy.
    pub report_only: bool,
    /// The current enforced policy against the destination's report-only policy.
    pub navigating_to_report_only: bool,
    /// The current report-only policy against the destination's enforced policy.
    pub navigating_from_report_only: bool,
}

impl SwapDecisions {
    pub fn compute(
        current_policy: &CrossOriginOpenerPolicy,
        current_origin: &ImmutableOrigin,
        is_initial_navigation: bool,
        destination_policy: &CrossOriginOpenerPolicy,
        destination_origin: &ImmutableOrigin,
    ) -> SwapDecisions {
        let should_swap = |current, destination| {
            should_swap_browsing_instance_for_cross_origin_opener_policy(
                current,
                current_origin,
                is_initial_navigation,
                destination,
                destination_origin,
            )
        };

        SwapDecisions {
            enforced: should_swap(current_policy.value, destination_policy.value),
            report_only: should_swap(
                current_policy.report_only_value,
                destination_policy.report_only_value,
            ),
            navigating_to_report_only: should_swap(
                current_policy.value,
                destination_policy.report_only_value,
            ),
            navigating_from_report_only: should_swap(
                current_policy.report_only_value,
                destination_policy.value,
            ),
        }
    }

    /// Whether the report-only policies put the two documents in different virtual
    /// browsing context groups. The report-only comparison alone is not enough: at least
    /// one of the mixed enforced/report-only comparisons must require a switch as well.
    pub fn virtual_swap(&self) -> bool {
        self.report_only && (self.navigating_to_report_only || self.navigating_from_report_only)
    }
}
