/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use coop::headers::{
    BareItem, CROSS_ORIGIN_EMBEDDER_POLICY, CROSS_ORIGIN_EMBEDDER_POLICY_REPORT_ONLY,
    CROSS_ORIGIN_OPENER_POLICY, CROSS_ORIGIN_OPENER_POLICY_REPORT_ONLY,
    get_value_from_header_list, parse_cross_origin_embedder_policy,
    parse_cross_origin_opener_policy, parse_item,
};
use coop::policy::{
    CrossOriginEmbedderPolicy, CrossOriginEmbedderPolicyValue, CrossOriginOpenerPolicy,
    CrossOriginOpenerPolicyValue,
};
use http::{HeaderMap, HeaderName, HeaderValue};

fn headers(entries: &[(&HeaderName, &str)]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in entries {
        headers.append((*name).clone(), HeaderValue::from_str(value).unwrap());
    }
    headers
}

fn opener_policy(entries: &[(&HeaderName, &str)]) -> CrossOriginOpenerPolicy {
    let headers = headers(entries);
    let embedder_policy = parse_cross_origin_embedder_policy(&headers);
    parse_cross_origin_opener_policy(&headers, &embedder_policy)
}

#[test]
fn test_parse_item_bare_items() {
    let cases = [
        ("same-origin", BareItem::Token("same-origin".to_owned())),
        ("*foo:bar/baz", BareItem::Token("*foo:bar/baz".to_owned())),
        ("42", BareItem::Integer(42)),
        ("-7", BareItem::Integer(-7)),
        ("4.5", BareItem::Decimal(4.5)),
        (
            "\"a \\\"quoted\\\" \\\\ string\"",
            BareItem::String("a \"quoted\" \\ string".to_owned()),
        ),
        (":aGVsbG8=:", BareItem::ByteSequence(b"hello".to_vec())),
        ("?1", BareItem::Boolean(true)),
        ("?0", BareItem::Boolean(false)),
    ];
    for (input, expected) in cases {
        let item = parse_item(input).unwrap_or_else(|| panic!("{:?} should parse", input));
        assert_eq!(item.bare_item, expected, "{:?}", input);
        assert!(item.parameters.is_empty());
    }
}

#[test]
fn test_parse_item_parameters() {
    let item = parse_item("same-origin;report-to=\"endpoint\"; flag;n=3").unwrap();
    assert_eq!(item.bare_item, BareItem::Token("same-origin".to_owned()));
    assert_eq!(
        item.parameter("report-to"),
        Some(&BareItem::String("endpoint".to_owned()))
    );
    assert_eq!(item.parameter("flag"), Some(&BareItem::Boolean(true)));
    assert_eq!(item.parameter("n"), Some(&BareItem::Integer(3)));
    assert_eq!(item.parameter("missing"), None);
}

#[test]
fn test_parse_item_duplicate_parameters_keep_last_value() {
    let item = parse_item("a;x=1;y=2;x=3").unwrap();
    assert_eq!(
        item.parameters,
        vec![
            ("x".to_owned(), BareItem::Integer(3)),
            ("y".to_owned(), BareItem::Integer(2)),
        ]
    );
}

#[test]
fn test_parse_item_surrounding_spaces() {
    assert!(parse_item("  same-origin  ").is_some());
    assert!(parse_item("\tsame-origin").is_none());
}

#[test]
fn test_parse_item_rejects_invalid_input() {
    for input in [
        "",
        "same-origin, unsafe-none",
        "\"unterminated",
        "1234567890123456",
        "1234567890123.5",
        "4.",
        "?2",
        ":not base64!:",
        "same-origin;Report-To=\"x\"",
        "same origin",
        "-",
    ] {
        assert_eq!(parse_item(input), None, "{:?}", input);
    }
}

#[test]
fn test_get_value_from_header_list_joins_values() {
    let headers = headers(&[
        (&CROSS_ORIGIN_OPENER_POLICY, "same-origin"),
        (&CROSS_ORIGIN_OPENER_POLICY, "unsafe-none"),
    ]);
    assert_eq!(
        get_value_from_header_list(&CROSS_ORIGIN_OPENER_POLICY, &headers),
        Some(b"same-origin, unsafe-none".to_vec())
    );
    assert_eq!(
        get_value_from_header_list(&CROSS_ORIGIN_EMBEDDER_POLICY, &headers),
        None
    );
}

#[test]
fn test_missing_headers_give_default_policies() {
    assert_eq!(opener_policy(&[]), CrossOriginOpenerPolicy::default());
    assert_eq!(
        parse_cross_origin_embedder_policy(&HeaderMap::new()),
        CrossOriginEmbedderPolicy::default()
    );
}

#[test]
fn test_parse_opener_policy_values() {
    for (token, value) in [
        ("unsafe-none", CrossOriginOpenerPolicyValue::UnsafeNone),
        ("same-origin", CrossOriginOpenerPolicyValue::SameOrigin),
        (
            "same-origin-allow-popups",
            CrossOriginOpenerPolicyValue::SameOriginAllowPopups,
        ),
        (
            "same-origin-plus-coep",
            CrossOriginOpenerPolicyValue::SameOriginPlusCoep,
        ),
    ] {
        let policy = opener_policy(&[(&CROSS_ORIGIN_OPENER_POLICY, token)]);
        assert_eq!(policy.value, value, "{}", token);
        assert_eq!(value.as_str(), token);
    }
}

#[test]
fn test_parse_opener_policy_with_endpoints() {
    let policy = opener_policy(&[
        (&CROSS_ORIGIN_OPENER_POLICY, "same-origin-allow-popups; report-to=\"main\""),
        (&CROSS_ORIGIN_OPENER_POLICY_REPORT_ONLY, "same-origin;report-to=\"audit\""),
    ]);
    assert_eq!(
        policy,
        CrossOriginOpenerPolicy {
            value: CrossOriginOpenerPolicyValue::SameOriginAllowPopups,
            reporting_endpoint: Some("main".to_owned()),
            report_only_value: CrossOriginOpenerPolicyValue::SameOrigin,
            report_only_reporting_endpoint: Some("audit".to_owned()),
        }
    );
}

#[test]
fn test_unparseable_opener_policy_is_ignored() {
    for value in [
        "same-origin, same-origin",
        "Same-Origin",
        "\"same-origin\"",
    ] {
        let policy = opener_policy(&[(&CROSS_ORIGIN_OPENER_POLICY, value)]);
        assert_eq!(policy.value, CrossOriginOpenerPolicyValue::UnsafeNone, "{}", value);
        assert_eq!(policy.reporting_endpoint, None, "{}", value);
    }

    // `report-to` must be a string.
    let policy = opener_policy(&[(&CROSS_ORIGIN_OPENER_POLICY, "same-origin; report-to=main")]);
    assert_eq!(policy.value, CrossOriginOpenerPolicyValue::SameOrigin);
    assert_eq!(policy.reporting_endpoint, None);

    // Two headers are combined into a list, which is not a single item.
    let policy = opener_policy(&[
        (&CROSS_ORIGIN_OPENER_POLICY, "same-origin"),
        (&CROSS_ORIGIN_OPENER_POLICY, "same-origin"),
    ]);
    assert_eq!(policy, CrossOriginOpenerPolicy::default());
}

#[test]
fn test_unknown_opener_policy_token_keeps_endpoint() {
    let policy = opener_policy(&[(&CROSS_ORIGIN_OPENER_POLICY, "noopener; report-to=\"main\"")]);
    assert_eq!(policy.value, CrossOriginOpenerPolicyValue::UnsafeNone);
    assert_eq!(policy.reporting_endpoint.as_deref(), Some("main"));
}

#[test]
fn test_same_origin_upgraded_with_embedder_policy() {
    let policy = opener_policy(&[
        (&CROSS_ORIGIN_OPENER_POLICY, "same-origin"),
        (&CROSS_ORIGIN_EMBEDDER_POLICY, "require-corp"),
        (&CROSS_ORIGIN_OPENER_POLICY_REPORT_ONLY, "same-origin"),
    ]);
    assert_eq!(policy.value, CrossOriginOpenerPolicyValue::SameOriginPlusCoep);
    assert_eq!(policy.report_only_value, CrossOriginOpenerPolicyValue::SameOrigin);

    let policy = opener_policy(&[
        (&CROSS_ORIGIN_OPENER_POLICY_REPORT_ONLY, "same-origin"),
        (&CROSS_ORIGIN_EMBEDDER_POLICY_REPORT_ONLY, "credentialless"),
    ]);
    assert_eq!(policy.value, CrossOriginOpenerPolicyValue::UnsafeNone);
    assert_eq!(
        policy.report_only_value,
        CrossOriginOpenerPolicyValue::SameOriginPlusCoep
    );

    let policy = opener_policy(&[
        (&CROSS_ORIGIN_OPENER_POLICY, "same-origin-allow-popups"),
        (&CROSS_ORIGIN_EMBEDDER_POLICY, "require-corp"),
    ]);
    assert_eq!(policy.value, CrossOriginOpenerPolicyValue::SameOriginAllowPopups);
}

#[test]
fn test_parse_embedder_policy() {
    let policy = parse_cross_origin_embedder_policy(&headers(&[
        (&CROSS_ORIGIN_EMBEDDER_POLICY, "credentialless; report-to=\"coep\""),
        (&CROSS_ORIGIN_EMBEDDER_POLICY_REPORT_ONLY, "bogus; report-to=\"ignored\""),
    ]));
    assert_eq!(
        policy,
        CrossOriginEmbedderPolicy {
            value: CrossOriginEmbedderPolicyValue::Credentialless,
            reporting_endpoint: Some("coep".to_owned()),
            report_only_value: CrossOriginEmbedderPolicyValue::UnsafeNone,
            report_only_reporting_endpoint: None,
        }
    );
    assert!(policy.value.is_compatible_with_cross_origin_isolated());
    assert!(!policy.report_only_value.is_compatible_with_cross_origin_isolated());
}
