/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Reports queued when a navigation severs, or would sever, the opener relationship
//! between two documents.
//!
//! See <https://html.spec.whatwg.org/multipage/#reporting>.

use serde::Serialize;
use servo_url::{ImmutableOrigin, ServoUrl};

use crate::policy::CrossOriginOpenerPolicyValue;

/// The report type delivered to the reporting endpoint.
pub const COOP_REPORT_TYPE: &str = "coop";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoopReportDisposition {
    /// The browsing context group was actually switched.
    Enforce,
    /// Only the report-only policy asked for a switch.
    Reporting,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoopViolationType {
    NavigationToResponse,
    NavigationFromResponse,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoopReportBody {
    pub disposition: CoopReportDisposition,
    pub effective_policy: CrossOriginOpenerPolicyValue,
    #[serde(rename = "type")]
    pub violation_type: CoopViolationType,
    #[serde(rename = "previousResponseURL", skip_serializing_if = "Option::is_none")]
    pub previous_response_url: Option<String>,
    #[serde(rename = "nextResponseURL", skip_serializing_if = "Option::is_none")]
    pub next_response_url: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CoopReport {
    #[serde(rename = "type")]
    report_type: &'static str,
    /// The name of the endpoint, as given by the `report-to` parameter.
    #[serde(skip)]
    pub endpoint: String,
    /// The stripped URL of the document the report is about.
    pub url: String,
    pub body: CoopReportBody,
}

/// One side of a navigation, as far as reports are concerned.
#[derive(Clone, Copy, Debug)]
pub struct ReportedDocument<'a> {
    pub url: Option<&'a ServoUrl>,
    pub origin: &'a ImmutableOrigin,
}

impl ReportedDocument<'_> {
    /// The URL of `self` as seen from `reporter`: empty unless both are same origin.
    fn url_as_seen_from(&self, reporter: &ReportedDocument) -> String {
        match self.url {
            Some(url) if reporter.origin.same_origin(self.origin) => strip_url_for_reports(url),
            _ => String::new(),
        }
    }
}

impl CoopReport {
    /// The report of the document being navigated away from. `None` when that document
    /// has no URL to report.
    pub fn navigation_from_response(
        endpoint: &str,
        disposition: CoopReportDisposition,
        effective_policy: CrossOriginOpenerPolicyValue,
        reporter: ReportedDocument,
        next: ReportedDocument,
    ) -> Option<CoopReport> {
        let url = strip_url_for_reports(reporter.url?);
        Some(CoopReport {
            report_type: COOP_REPORT_TYPE,
            endpoint: endpoint.to_owned(),
            url,
            body: CoopReportBody {
                disposition,
                effective_policy,
                violation_type: CoopViolationType::NavigationFromResponse,
                previous_response_url: None,
                next_response_url: Some(next.url_as_seen_from(&reporter)),
            },
        })
    }

    /// The report of the response being navigated to.
    pub fn navigation_to_response(
        endpoint: &str,
        disposition: CoopReportDisposition,
        effective_policy: CrossOriginOpenerPolicyValue,
        reporter: ReportedDocument,
        previous: ReportedDocument,
    ) -> Option<CoopReport> {
        let url = strip_url_for_reports(reporter.url?);
        Some(CoopReport {
            report_type: COOP_REPORT_TYPE,
            endpoint: endpoint.to_owned(),
            url,
            body: CoopReportBody {
                disposition,
                effective_policy,
                violation_type: CoopViolationType::NavigationToResponse,
                previous_response_url: Some(previous.url_as_seen_from(&reporter)),
                next_response_url: None,
            },
        })
    }

    pub fn report_type(&self) -> &'static str {
        self.report_type
    }

    /// The report as delivered to its endpoint.
    pub fn to_json(&self) -> serde_json::Value {
        // Serializing plain strings and enums cannot fail.
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// <https://w3c.github.io/webappsec-csp/#strip-url-for-use-in-reports>
pub fn strip_url_for_reports(url: &ServoUrl) -> String {
    let scheme = url.scheme();
    // Step 1: If url’s scheme is not an HTTP(S) scheme, then return url’s scheme.
    if scheme != "https" && scheme != "http" {
        return scheme.to_owned();
    }
    let mut url = url.clone();
    // Step 2: Set url’s fragment to the empty string.
    url.set_fragment(None);
    // Step 3: Set url’s username to the empty string.
    url.set_username("").ok();
    // Step 4: Set url’s password to the empty string.
    url.set_password(None).ok();
    // Step 5: Return the result of executing the URL serializer on url.
    url.as_str().to_owned()
}
