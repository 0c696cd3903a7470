/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use content_security_policy::sandboxing_directive::SandboxingFlagSet;
use http::HeaderMap;
use servo_url::{ImmutableOrigin, ServoUrl};
use time::OffsetDateTime;

use crate::headers::{parse_cross_origin_embedder_policy, parse_cross_origin_opener_policy};
use crate::policy::CrossOriginOpenerPolicy;

/// A response received while navigating, either the final one or a redirect.
#[derive(Clone, Debug)]
pub struct NavigationResponse {
    pub url: ServoUrl,
    pub origin: ImmutableOrigin,
    pub headers: HeaderMap,
    /// The policy as parsed from `headers`, before any sanitization.
    pub cross_origin_opener_policy: CrossOriginOpenerPolicy,
    /// Used to check the expiry of origin trial tokens.
    pub response_time: OffsetDateTime,
}

impl NavigationResponse {
    pub fn new(url: ServoUrl, headers: HeaderMap, response_time: OffsetDateTime) -> Self {
        let embedder_policy = parse_cross_origin_embedder_policy(&headers);
        let cross_origin_opener_policy = parse_cross_origin_opener_policy(&headers, &embedder_policy);
        NavigationResponse {
            origin: url.origin(),
            url,
            headers,
            cross_origin_opener_policy,
            response_time,
        }
    }

    /// A response whose policy was obtained elsewhere. `headers` are only consulted for
    /// origin trial tokens.
    pub fn with_policy(
        url: ServoUrl,
        headers: HeaderMap,
        cross_origin_opener_policy: CrossOriginOpenerPolicy,
        response_time: OffsetDateTime,
    ) -> Self {
        NavigationResponse {
            origin: url.origin(),
            url,
            headers,
            cross_origin_opener_policy,
            response_time,
        }
    }
}

/// What the navigation needs to know about the frame being navigated.
#[derive(Clone, Debug)]
pub struct NavigatingFrame {
    pub is_main_frame: bool,
    /// The sandboxing flags the new document will be created with.
    pub pending_sandbox_flags: SandboxingFlagSet,
}

impl NavigatingFrame {
    pub fn main_frame() -> Self {
        NavigatingFrame {
            is_main_frame: true,
            pending_sandbox_flags: SandboxingFlagSet::empty(),
        }
    }

    pub fn is_sandboxed(&self) -> bool {
        !self.pending_sandbox_flags.is_empty()
    }
}
