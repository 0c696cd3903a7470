/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use serde::{Deserialize, Serialize};

/// <https://html.spec.whatwg.org/multipage/#cross-origin-opener-policy-value>
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossOriginOpenerPolicyValue {
    #[default]
    UnsafeNone,
    SameOrigin,
    SameOriginAllowPopups,
    SameOriginPlusCoep,
}

impl CrossOriginOpenerPolicyValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsafeNone => "unsafe-none",
            Self::SameOrigin => "same-origin",
            Self::SameOriginAllowPopups => "same-origin-allow-popups",
            Self::SameOriginPlusCoep => "same-origin-plus-coep",
        }
    }

    /// Maps a structured header token to a policy value. Tokens are case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "unsafe-none" => Some(Self::UnsafeNone),
            "same-origin" => Some(Self::SameOrigin),
            "same-origin-allow-popups" => Some(Self::SameOriginAllowPopups),
            "same-origin-plus-coep" => Some(Self::SameOriginPlusCoep),
            _ => None,
        }
    }
}

/// <https://html.spec.whatwg.org/multipage/#cross-origin-opener-policy>
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CrossOriginOpenerPolicy {
    /// <https://html.spec.whatwg.org/multipage/#coop-struct-value>
    pub value: CrossOriginOpenerPolicyValue,
    /// <https://html.spec.whatwg.org/multipage/#coop-struct-report-endpoint>
    pub reporting_endpoint: Option<String>,
    /// <https://html.spec.whatwg.org/multipage/#coop-struct-report-only-value>
    pub report_only_value: CrossOriginOpenerPolicyValue,
    /// <https://html.spec.whatwg.org/multipage/#coop-struct-report-only-endpoint>
    pub report_only_reporting_endpoint: Option<String>,
}

impl CrossOriginOpenerPolicy {
    pub fn new(value: CrossOriginOpenerPolicyValue) -> Self {
        CrossOriginOpenerPolicy {
            value,
            ..Default::default()
        }
    }

    /// Whether this is indistinguishable from a response without any COOP header.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// <https://html.spec.whatwg.org/multipage/#embedder-policy-value>
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossOriginEmbedderPolicyValue {
    #[default]
    UnsafeNone,
    RequireCorp,
    Credentialless,
}

impl CrossOriginEmbedderPolicyValue {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "unsafe-none" => Some(Self::UnsafeNone),
            "require-corp" => Some(Self::RequireCorp),
            "credentialless" => Some(Self::Credentialless),
            _ => None,
        }
    }

    /// <https://html.spec.whatwg.org/multipage/#compatible-with-cross-origin-isolation>
    pub fn is_compatible_with_cross_origin_isolated(&self) -> bool {
        !matches!(self, Self::UnsafeNone)
    }
}

/// <https://html.spec.whatwg.org/multipage/#embedder-policy>
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CrossOriginEmbedderPolicy {
    pub value: CrossOriginEmbedderPolicyValue,
    pub reporting_endpoint: Option<String>,
    pub report_only_value: CrossOriginEmbedderPolicyValue,
    pub report_only_reporting_endpoint: Option<String>,
}
