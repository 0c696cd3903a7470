/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

mod headers;

use coop::policy::{CrossOriginOpenerPolicy, CrossOriginOpenerPolicyValue};
use servo_url::{ImmutableOrigin, ServoUrl};
use time::OffsetDateTime;

fn url(input: &str) -> ServoUrl {
    ServoUrl::parse(input).unwrap()
}

fn origin(input: &str) -> ImmutableOrigin {
    url(input).origin()
}

fn now() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
}

fn enforced_policy(value: CrossOriginOpenerPolicyValue) -> CrossOriginOpenerPolicy {
    CrossOriginOpenerPolicy::new(value)
}

fn report_only_policy(
    value: CrossOriginOpenerPolicyValue,
    report_only_value: CrossOriginOpenerPolicyValue,
) -> CrossOriginOpenerPolicy {
    CrossOriginOpenerPolicy {
        value,
        report_only_value,
        ..Default::default()
    }
}
