/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Parsing of the `Cross-Origin-Opener-Policy` and `Cross-Origin-Embedder-Policy`
//! response headers, which are [structured fields](https://www.rfc-editor.org/rfc/rfc8941)
//! holding a single item.
//!
//! Nothing in here fails loudly: a header that cannot be parsed behaves exactly as
//! if it was absent.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use http::{HeaderMap, HeaderName};
use log::debug;
use nom::branch::alt;
use nom::bytes::complete::{take_while, take_while_m_n};
use nom::character::complete::{char, satisfy};
use nom::combinator::{all_consuming, map, map_res, opt, recognize, value};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded};
use nom::{IResult, Parser};

use crate::policy::{
    CrossOriginEmbedderPolicy, CrossOriginEmbedderPolicyValue, CrossOriginOpenerPolicy,
    CrossOriginOpenerPolicyValue,
};

pub static CROSS_ORIGIN_OPENER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-opener-policy");

pub static CROSS_ORIGIN_OPENER_POLICY_REPORT_ONLY: HeaderName =
    HeaderName::from_static("cross-origin-opener-policy-report-only");

pub static CROSS_ORIGIN_EMBEDDER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-embedder-policy");

pub static CROSS_ORIGIN_EMBEDDER_POLICY_REPORT_ONLY: HeaderName =
    HeaderName::from_static("cross-origin-embedder-policy-report-only");

pub static ORIGIN_TRIAL: HeaderName = HeaderName::from_static("origin-trial");

const REPORT_TO: &str = "report-to";

/// <https://fetch.spec.whatwg.org/#concept-header-list-get>
pub fn get_value_from_header_list(name: &HeaderName, headers: &HeaderMap) -> Option<Vec<u8>> {
    let values = headers.get_all(name).iter().map(|val| val.as_bytes());

    // Step 1
    if values.size_hint() == (0, Some(0)) {
        return None;
    }

    // Step 2
    Some(values.collect::<Vec<&[u8]>>().join(&[0x2C, 0x20][..]))
}

/// <https://www.rfc-editor.org/rfc/rfc8941#name-items>
#[derive(Clone, Debug, PartialEq)]
pub enum BareItem {
    Integer(i64),
    Decimal(f64),
    String(String),
    Token(String),
    ByteSequence(Vec<u8>),
    Boolean(bool),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub bare_item: BareItem,
    pub parameters: Vec<(String, BareItem)>,
}

impl Item {
    pub fn parameter(&self, key: &str) -> Option<&BareItem> {
        self.parameters
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Later duplicates overwrite the value but keep the position of the first key.
    fn set_parameter(&mut self, key: &str, value: BareItem) {
        match self.parameters.iter_mut().find(|(name, _)| name == key) {
            Some(existing) => existing.1 = value,
            None => self.parameters.push((key.to_owned(), value)),
        }
    }
}

/// <https://www.rfc-editor.org/rfc/rfc8941#name-parsing-an-item>
pub fn parse_item(input: &str) -> Option<Item> {
    let (_, (bare_item, parameters)) = all_consuming(delimited(
        sf_spaces,
        pair(sf_bare_item, many0(sf_parameter)),
        sf_spaces,
    ))
    .parse(input)
    .ok()?;

    let mut item = Item {
        bare_item,
        parameters: Vec::new(),
    };
    for (key, value) in parameters {
        item.set_parameter(key, value);
    }
    Some(item)
}

fn sf_spaces(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c == ' ').parse(input)
}

fn is_tchar(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

fn sf_bare_item(input: &str) -> IResult<&str, BareItem> {
    alt((
        sf_number,
        sf_string,
        sf_token,
        sf_byte_sequence,
        sf_boolean,
    ))
    .parse(input)
}

// sf-integer = ["-"] 1*15DIGIT
// sf-decimal = ["-"] 1*12DIGIT "." 1*3DIGIT
fn sf_number(input: &str) -> IResult<&str, BareItem> {
    map_res(
        recognize((
            opt(char('-')),
            take_while_m_n(1, 15, |c: char| c.is_ascii_digit()),
            opt(pair(
                char('.'),
                take_while_m_n(1, 3, |c: char| c.is_ascii_digit()),
            )),
        )),
        number_from_str,
    )
    .parse(input)
}

fn number_from_str(number: &str) -> Result<BareItem, ()> {
    match number.split_once('.') {
        None => number.parse().map(BareItem::Integer).map_err(|_| ()),
        Some((integer, _)) if integer.trim_start_matches('-').len() > 12 => Err(()),
        Some(_) => number.parse().map(BareItem::Decimal).map_err(|_| ()),
    }
}

// sf-string = DQUOTE *chr DQUOTE
fn sf_string(input: &str) -> IResult<&str, BareItem> {
    map(
        delimited(
            char('"'),
            many0(alt((
                preceded(char('\\'), satisfy(|c: char| c == '"' || c == '\\')),
                satisfy(|c: char| c != '"' && c != '\\' && (' '..='~').contains(&c)),
            ))),
            char('"'),
        ),
        |characters: Vec<char>| BareItem::String(characters.into_iter().collect()),
    )
    .parse(input)
}

// sf-token = ( ALPHA / "*" ) *( tchar / ":" / "/" )
fn sf_token(input: &str) -> IResult<&str, BareItem> {
    map(
        recognize(pair(
            satisfy(|c: char| c.is_ascii_alphabetic() || c == '*'),
            take_while(|c: char| is_tchar(c) || c == ':' || c == '/'),
        )),
        |token: &str| BareItem::Token(token.to_owned()),
    )
    .parse(input)
}

// sf-binary = ":" *(base64) ":"
fn sf_byte_sequence(input: &str) -> IResult<&str, BareItem> {
    map_res(
        delimited(
            char(':'),
            take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')),
            char(':'),
        ),
        |encoded: &str| BASE64_STANDARD.decode(encoded).map(BareItem::ByteSequence),
    )
    .parse(input)
}

// sf-boolean = "?" boolean
fn sf_boolean(input: &str) -> IResult<&str, BareItem> {
    preceded(
        char('?'),
        alt((
            value(BareItem::Boolean(true), char('1')),
            value(BareItem::Boolean(false), char('0')),
        )),
    )
    .parse(input)
}

// key = ( lcalpha / "*" ) *( lcalpha / DIGIT / "_" / "-" / "." / "*" )
fn sf_key(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_ascii_lowercase() || c == '*'),
        take_while(|c: char| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.' | '*')
        }),
    ))
    .parse(input)
}

// parameters = *( ";" *SP parameter )
// parameter = param-key [ "=" param-value ]
fn sf_parameter(input: &str) -> IResult<&str, (&str, BareItem)> {
    preceded(
        pair(char(';'), sf_spaces),
        pair(
            sf_key,
            map(opt(preceded(char('='), sf_bare_item)), |value| {
                value.unwrap_or(BareItem::Boolean(true))
            }),
        ),
    )
    .parse(input)
}

/// The token and `report-to` endpoint of a policy header.
struct PolicyHeader {
    token: String,
    report_to: Option<String>,
}

fn parse_policy_header(name: &HeaderName, headers: &HeaderMap) -> Option<PolicyHeader> {
    let value = get_value_from_header_list(name, headers)?;
    let Some(item) = std::str::from_utf8(&value).ok().and_then(parse_item) else {
        debug!("Ignoring unparseable {} header", name);
        return None;
    };

    let report_to = match item.parameter(REPORT_TO) {
        Some(BareItem::String(endpoint)) => Some(endpoint.clone()),
        _ => None,
    };
    let BareItem::Token(token) = item.bare_item else {
        debug!("Ignoring {} header without a token", name);
        return None;
    };
    Some(PolicyHeader { token, report_to })
}

/// <https://html.spec.whatwg.org/multipage/#obtain-an-embedder-policy>
pub fn parse_cross_origin_embedder_policy(headers: &HeaderMap) -> CrossOriginEmbedderPolicy {
    let mut policy = CrossOriginEmbedderPolicy::default();

    if let Some(header) = parse_policy_header(&CROSS_ORIGIN_EMBEDDER_POLICY, headers) {
        if let Some(value) = CrossOriginEmbedderPolicyValue::from_token(&header.token) {
            policy.value = value;
            policy.reporting_endpoint = header.report_to;
        }
    }

    if let Some(header) = parse_policy_header(&CROSS_ORIGIN_EMBEDDER_POLICY_REPORT_ONLY, headers) {
        if let Some(value) = CrossOriginEmbedderPolicyValue::from_token(&header.token) {
            policy.report_only_value = value;
            policy.report_only_reporting_endpoint = header.report_to;
        }
    }

    policy
}

/// <https://html.spec.whatwg.org/multipage/#obtain-coop>
///
/// `same-origin` is upgraded to `same-origin-plus-coep` when the corresponding embedder
/// policy allows cross-origin isolation.
pub fn parse_cross_origin_opener_policy(
    headers: &HeaderMap,
    embedder_policy: &CrossOriginEmbedderPolicy,
) -> CrossOriginOpenerPolicy {
    let mut policy = CrossOriginOpenerPolicy::default();

    if let Some(header) = parse_policy_header(&CROSS_ORIGIN_OPENER_POLICY, headers) {
        if let Some(value) = CrossOriginOpenerPolicyValue::from_token(&header.token) {
            policy.value = value;
        }
        policy.reporting_endpoint = header.report_to;
    }
    if policy.value == CrossOriginOpenerPolicyValue::SameOrigin &&
        embedder_policy
            .value
            .is_compatible_with_cross_origin_isolated()
    {
        policy.value = CrossOriginOpenerPolicyValue::SameOriginPlusCoep;
    }

    if let Some(header) = parse_policy_header(&CROSS_ORIGIN_OPENER_POLICY_REPORT_ONLY, headers) {
        if let Some(value) = CrossOriginOpenerPolicyValue::from_token(&header.token) {
            policy.report_only_value = value;
        }
        policy.report_only_reporting_endpoint = header.report_to;
    }
    if policy.report_only_value == CrossOriginOpenerPolicyValue::SameOrigin &&
        embedder_policy
            .report_only_value
            .is_compatible_with_cross_origin_isolated()
    {
        policy.report_only_value = CrossOriginOpenerPolicyValue::SameOriginPlusCoep;
    }

    policy
}
