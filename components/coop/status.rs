/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt;
use std::sync::Arc;

use base::id::{BrowsingContextGroupId, BrowsingContextGroupIdSource};
use log::debug;
use servo_url::{ImmutableOrigin, ServoUrl};

use crate::matching::SwapDecisions;
use crate::navigation::{NavigatingFrame, NavigationResponse};
use crate::policy::{CrossOriginOpenerPolicy, CrossOriginOpenerPolicyValue};
use crate::reporting::{CoopReport, CoopReportDisposition, ReportedDocument};
use crate::sanitize::CoopSanitizer;

/// Why a navigation response must not be committed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlockedByResponseReason {
    /// A popup with sandboxing flags tried to load a document with a restrictive COOP.
    CoopSandboxedIFrameCannotNavigateToCoopPage,
}

impl fmt::Display for BlockedByResponseReason {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BlockedByResponseReason::CoopSandboxedIFrameCannotNavigateToCoopPage => write!(
                formatter,
                "a sandboxed browsing context cannot navigate to a document with a \
                 Cross-Origin-Opener-Policy"
            ),
        }
    }
}

impl std::error::Error for BlockedByResponseReason {}

/// The document occupying the frame when the navigation starts.
#[derive(Clone, Debug)]
pub struct CurrentDocument {
    pub cross_origin_opener_policy: CrossOriginOpenerPolicy,
    pub origin: ImmutableOrigin,
    /// `None` for a frame that has not loaded anything yet.
    pub url: Option<ServoUrl>,
    pub browsing_context_group: BrowsingContextGroupId,
}

/// Tracks the effect of Cross-Origin-Opener-Policy on a single top-level navigation,
/// across all of its redirects.
pub struct CrossOriginOpenerPolicyStatus {
    sanitizer: Arc<CoopSanitizer>,
    browsing_context_group_ids: Arc<dyn BrowsingContextGroupIdSource>,

    /// Whether the navigating frame had a reachable opener when the navigation started.
    had_opener: bool,
    /// Whether the frame has not committed anything but its initial `about:blank`.
    is_initial_navigation: bool,

    /// The policy, origin and URL of the previous response, or of the initial document.
    current_coop: CrossOriginOpenerPolicy,
    current_origin: ImmutableOrigin,
    current_url: Option<ServoUrl>,

    require_browsing_instance_swap: bool,
    virtual_browsing_instance_swap: bool,
    virtual_browsing_context_group: BrowsingContextGroupId,
    header_ignored_due_to_insecure_context: bool,

    reports: Vec<CoopReport>,
}

impl CrossOriginOpenerPolicyStatus {
    pub fn new(
        current_document: CurrentDocument,
        had_opener: bool,
        is_initial_navigation: bool,
        sanitizer: Arc<CoopSanitizer>,
        browsing_context_group_ids: Arc<dyn BrowsingContextGroupIdSource>,
    ) -> Self {
        CrossOriginOpenerPolicyStatus {
            sanitizer,
            browsing_context_group_ids,
            had_opener,
            is_initial_navigation,
            current_coop: current_document.cross_origin_opener_policy,
            current_origin: current_document.origin,
            current_url: current_document.url,
            require_browsing_instance_swap: false,
            virtual_browsing_instance_swap: false,
            virtual_browsing_context_group: current_document.browsing_context_group,
            header_ignored_due_to_insecure_context: false,
            reports: Vec::new(),
        }
    }

    /// Called for every response of the navigation, redirects included.
    ///
    /// Afterwards, [`Self::require_browsing_instance_swap`] tells whether the document
    /// has to be committed in a new browsing context group.
    pub fn enforce_coop(
        &mut self,
        response: &NavigationResponse,
        frame: &NavigatingFrame,
    ) -> Result<(), BlockedByResponseReason> {
        let sanitized = self.sanitizer.sanitize(response, frame.is_main_frame);
        if sanitized.header_ignored_due_to_insecure_context {
            self.header_ignored_due_to_insecure_context = true;
        }
        let response_coop = sanitized.policy;

        if !frame.is_main_frame || response.url.matches_about_blank() {
            return Ok(());
        }

        if response_coop.value != CrossOriginOpenerPolicyValue::UnsafeNone && frame.is_sandboxed()
        {
            debug!(
                "Blocking navigation of a sandboxed frame to {} ({})",
                response.url,
                response_coop.value.as_str()
            );
            return Err(BlockedByResponseReason::CoopSandboxedIFrameCannotNavigateToCoopPage);
        }

        let decisions = SwapDecisions::compute(
            &self.current_coop,
            &self.current_origin,
            self.is_initial_navigation,
            &response_coop,
            &response.origin,
        );
        let virtual_swap = decisions.virtual_swap();
        debug!(
            "COOP {} -> {} for {}: {:?}",
            self.current_coop.value.as_str(),
            response_coop.value.as_str(),
            response.url,
            decisions
        );

        let mut transitioned = false;
        if decisions.enforced && !self.require_browsing_instance_swap {
            self.require_browsing_instance_swap = true;
            transitioned = true;
        }
        if virtual_swap && !self.virtual_browsing_instance_swap {
            self.virtual_browsing_instance_swap = true;
            transitioned = true;
        }
        if transitioned {
            self.virtual_browsing_context_group = self
                .browsing_context_group_ids
                .next_browsing_context_group_id();
            debug!(
                "Moved navigation to {} to virtual browsing context group {}",
                response.url, self.virtual_browsing_context_group
            );
        }

        if self.had_opener {
            self.queue_reports(response, &response_coop, decisions.enforced, virtual_swap);
        }

        self.current_coop = response_coop;
        self.current_origin = response.origin.clone();
        self.current_url = Some(response.url.clone());
        Ok(())
    }

    fn queue_reports(
        &mut self,
        response: &NavigationResponse,
        response_coop: &CrossOriginOpenerPolicy,
        enforced_swap: bool,
        virtual_swap: bool,
    ) {
        let previous = ReportedDocument {
            url: self.current_url.as_ref(),
            origin: &self.current_origin,
        };
        let next = ReportedDocument {
            url: Some(&response.url),
            origin: &response.origin,
        };

        let mut reports = Vec::new();
        let mut queue = |disposition,
                         previous_endpoint: Option<&String>,
                         previous_policy,
                         next_endpoint: Option<&String>,
                         next_policy| {
            if let Some(endpoint) = previous_endpoint {
                reports.extend(CoopReport::navigation_from_response(
                    endpoint,
                    disposition,
                    previous_policy,
                    previous,
                    next,
                ));
            }
            if let Some(endpoint) = next_endpoint {
                reports.extend(CoopReport::navigation_to_response(
                    endpoint,
                    disposition,
                    next_policy,
                    next,
                    previous,
                ));
            }
        };

        if enforced_swap {
            queue(
                CoopReportDisposition::Enforce,
                self.current_coop.reporting_endpoint.as_ref(),
                self.current_coop.value,
                response_coop.reporting_endpoint.as_ref(),
                response_coop.value,
            );
        }
        if virtual_swap {
            queue(
                CoopReportDisposition::Reporting,
                self.current_coop.report_only_reporting_endpoint.as_ref(),
                self.current_coop.report_only_value,
                response_coop.report_only_reporting_endpoint.as_ref(),
                response_coop.report_only_value,
            );
        }

        if !reports.is_empty() {
            debug!("Queued {} COOP reports for {}", reports.len(), response.url);
        }
        self.reports.append(&mut reports);
    }

    pub fn require_browsing_instance_swap(&self) -> bool {
        self.require_browsing_instance_swap
    }

    pub fn virtual_browsing_instance_swap(&self) -> bool {
        self.virtual_browsing_instance_swap
    }

    pub fn virtual_browsing_context_group(&self) -> BrowsingContextGroupId {
        self.virtual_browsing_context_group
    }

    pub fn header_ignored_due_to_insecure_context(&self) -> bool {
        self.header_ignored_due_to_insecure_context
    }

    pub fn current_coop(&self) -> &CrossOriginOpenerPolicy {
        &self.current_coop
    }

    pub fn current_origin(&self) -> &ImmutableOrigin {
        &self.current_origin
    }

    pub fn had_opener(&self) -> bool {
        self.had_opener
    }

    pub fn is_initial_navigation(&self) -> bool {
        self.is_initial_navigation
    }

    /// Hands over the reports queued so far.
    pub fn take_reports(&mut self) -> Vec<CoopReport> {
        std::mem::take(&mut self.reports)
    }
}
