/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use servo_config::opts::{ArgumentParsingResult, from_cmdline_args, parse_pref_from_command_line};
use servo_config::pref;
use servo_config::prefs::{self, PrefValue, PreferenceError, Preferences};

fn args(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

fn expect_preferences(result: ArgumentParsingResult) -> Preferences {
    match result {
        ArgumentParsingResult::Preferences(preferences) => preferences,
        ArgumentParsingResult::Usage(usage) => panic!("Unexpected usage: {usage}"),
        ArgumentParsingResult::Error(error) => panic!("Unexpected error: {error}"),
    }
}

#[test]
fn test_default_preferences() {
    let preferences = Preferences::default();
    assert!(preferences.network_cross_origin_opener_policy_enabled);
    assert!(!preferences.network_cross_origin_opener_policy_reporting_enabled);
    assert!(preferences.network_origin_trials_public_keys.is_empty());
}

#[test]
fn test_argument_flags() {
    let preferences = expect_preferences(from_cmdline_args(
        Preferences::default(),
        &args(&["--enable-coop-reporting", "--disable-coop"]),
    ));
    assert!(preferences.network_cross_origin_opener_policy_reporting_enabled);
    assert!(!preferences.network_cross_origin_opener_policy_enabled);

    let preferences = expect_preferences(from_cmdline_args(Preferences::default(), &[]));
    assert_eq!(preferences, Preferences::default());
}

#[test]
fn test_help_prints_usage() {
    match from_cmdline_args(Preferences::default(), &args(&["-h"])) {
        ArgumentParsingResult::Usage(usage) => assert!(usage.contains("--enable-coop-reporting")),
        _ => panic!("Expected usage"),
    }
}

#[test]
fn test_unknown_argument_is_an_error() {
    assert!(matches!(
        from_cmdline_args(Preferences::default(), &args(&["--frobnicate"])),
        ArgumentParsingResult::Error(_)
    ));
}

#[test]
fn test_invalid_prefs_from_command_line_are_rejected() {
    let mut preferences = Preferences::default();
    assert_eq!(
        parse_pref_from_command_line(&mut preferences, "doesntexist=true"),
        Err(PreferenceError::UnknownPreference("doesntexist".to_owned()))
    );
    assert_eq!(
        parse_pref_from_command_line(
            &mut preferences,
            "network_cross_origin_opener_policy_enabled=42"
        ),
        Err(PreferenceError::MismatchedType(
            "network_cross_origin_opener_policy_enabled".to_owned()
        ))
    );
    assert_eq!(preferences, Preferences::default());

    match from_cmdline_args(Preferences::default(), &args(&["--pref", "doesntexist"])) {
        ArgumentParsingResult::Error(error) => {
            assert!(error.starts_with("Error setting preference"));
            assert!(error.contains("doesntexist"));
        },
        _ => panic!("Expected an error"),
    }
}

#[test]
fn test_parse_pref_from_command_line() {
    let mut preferences = Preferences::default();

    // Test with boolean values.
    parse_pref_from_command_line(
        &mut preferences,
        "network_cross_origin_opener_policy_reporting_enabled=true",
    )
    .unwrap();
    assert_eq!(
        preferences.get_value("network_cross_origin_opener_policy_reporting_enabled"),
        Some(PrefValue::Bool(true))
    );

    // Test string.
    parse_pref_from_command_line(&mut preferences, "network_origin_trials_public_keys=abc")
        .unwrap();
    assert_eq!(preferences.network_origin_trials_public_keys, "abc");

    // Test with no value (defaults to true).
    preferences.network_cross_origin_opener_policy_enabled = false;
    parse_pref_from_command_line(&mut preferences, "network_cross_origin_opener_policy_enabled")
        .unwrap();
    assert!(preferences.network_cross_origin_opener_policy_enabled);

    let changes: Vec<&str> = preferences
        .diff(&Preferences::default())
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        changes,
        [
            "network_cross_origin_opener_policy_reporting_enabled",
            "network_origin_trials_public_keys"
        ]
    );
}

#[test]
fn test_reflection() {
    assert!(Preferences::exists("network_cross_origin_opener_policy_enabled"));
    assert!(!Preferences::exists("layout_threads"));
    assert_eq!(Preferences::all_fields().len(), 3);
    assert_eq!(Preferences::default().get_value("layout_threads"), None);
}

#[test]
fn test_global_preferences() {
    let mut preferences = Preferences::default();
    preferences.network_cross_origin_opener_policy_reporting_enabled = true;
    prefs::set(preferences);
    assert!(pref!(network_cross_origin_opener_policy_reporting_enabled));

    prefs::set(Preferences::default());
    assert!(!pref!(network_cross_origin_opener_policy_reporting_enabled));
}
