/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use http::HeaderMap;
use log::debug;
use servo_config::prefs::{self, Preferences};
use servo_url::ServoUrl;
use time::OffsetDateTime;

use crate::navigation::NavigationResponse;
use crate::origin_trial::{COOP_REPORTING_TRIAL_FEATURE, TrialTokenValidator};
use crate::policy::{CrossOriginOpenerPolicy, CrossOriginOpenerPolicyValue};

/// The process-wide switches that influence how COOP headers are treated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CoopFeatures {
    pub cross_origin_opener_policy_enabled: bool,
    /// Reporting for every response, regardless of origin trial tokens.
    pub reporting_enabled: bool,
}

impl CoopFeatures {
    pub fn from_preferences(preferences: &Preferences) -> Self {
        CoopFeatures {
            cross_origin_opener_policy_enabled: preferences
                .network_cross_origin_opener_policy_enabled,
            reporting_enabled: preferences.network_cross_origin_opener_policy_reporting_enabled,
        }
    }
}

impl Default for CoopFeatures {
    fn default() -> Self {
        CoopFeatures {
            cross_origin_opener_policy_enabled: true,
            reporting_enabled: false,
        }
    }
}

/// The outcome of [`CoopSanitizer::sanitize`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SanitizedPolicy {
    pub policy: CrossOriginOpenerPolicy,
    /// Set when a non-default policy was dropped because the response origin is not
    /// potentially trustworthy.
    pub header_ignored_due_to_insecure_context: bool,
}

/// Decides which parts of a parsed COOP header a response is allowed to keep.
#[derive(Clone, Debug, Default)]
pub struct CoopSanitizer {
    features: CoopFeatures,
    trial_token_validator: Option<TrialTokenValidator>,
}

impl CoopSanitizer {
    pub fn new(features: CoopFeatures, trial_token_validator: Option<TrialTokenValidator>) -> Self {
        CoopSanitizer {
            features,
            trial_token_validator,
        }
    }

    pub fn from_preferences(preferences: &Preferences) -> Self {
        let validator =
            TrialTokenValidator::from_base64_keys(&preferences.network_origin_trials_public_keys);
        Self::new(
            CoopFeatures::from_preferences(preferences),
            validator.has_public_keys().then_some(validator),
        )
    }

    /// A sanitizer configured from the current global preferences.
    pub fn from_current_preferences() -> Self {
        Self::from_preferences(&prefs::get())
    }

    pub fn features(&self) -> CoopFeatures {
        self.features
    }

    /// Reporting is enabled either for everyone, or per response through a valid
    /// `CrossOriginOpenerPolicyReporting` origin trial token.
    pub fn is_reporting_enabled(
        &self,
        response_url: &ServoUrl,
        response_headers: &HeaderMap,
        now: OffsetDateTime,
    ) -> bool {
        if self.features.reporting_enabled {
            return true;
        }
        self.trial_token_validator
            .as_ref()
            .is_some_and(|validator| {
                validator.request_enables_feature(
                    response_url,
                    response_headers,
                    COOP_REPORTING_TRIAL_FEATURE,
                    now,
                )
            })
    }

    /// Returns the part of `response`'s COOP that a document loaded from it may keep.
    pub fn sanitize(&self, response: &NavigationResponse, is_main_frame: bool) -> SanitizedPolicy {
        let policy = &response.cross_origin_opener_policy;
        let response_url = &response.url;
        if policy.is_default() {
            return SanitizedPolicy::default();
        }

        if !self.features.cross_origin_opener_policy_enabled {
            debug!("Ignoring COOP of {}: feature disabled", response_url);
            return SanitizedPolicy::default();
        }

        if !response.origin.is_potentially_trustworthy() {
            debug!("Ignoring COOP of {}: insecure context", response_url);
            return SanitizedPolicy {
                policy: CrossOriginOpenerPolicy::default(),
                header_ignored_due_to_insecure_context: true,
            };
        }

        // COOP only applies to top-level documents.
        if !is_main_frame {
            debug!("Ignoring COOP of {}: not a main frame", response_url);
            return SanitizedPolicy::default();
        }

        let mut policy = policy.clone();
        if !self.is_reporting_enabled(response_url, &response.headers, response.response_time) {
            policy.reporting_endpoint = None;
            policy.report_only_reporting_endpoint = None;
            policy.report_only_value = CrossOriginOpenerPolicyValue::UnsafeNone;
        }

        SanitizedPolicy {
            policy,
            header_ignored_due_to_insecure_context: false,
        }
    }
}
