/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Command line handling. Every option ends up as a change to [`Preferences`].

use getopts::Options;

use crate::pref_util::{PrefValue, PreferenceError};
use crate::prefs::Preferences;

pub enum ArgumentParsingResult {
    Preferences(Preferences),
    Usage(String),
    Error(String),
}

fn build_options() -> Options {
    let mut opts = Options::new();
    opts.optmulti(
        "",
        "pref",
        "A preference to set, `name=value`. A bare `name` sets a boolean preference to true.",
        "NAME[=VALUE]",
    );
    opts.optflag(
        "",
        "enable-coop-reporting",
        "Report Cross-Origin-Opener-Policy violations without an origin trial token",
    );
    opts.optflag(
        "",
        "disable-coop",
        "Ignore Cross-Origin-Opener-Policy headers",
    );
    opts.optflag("h", "help", "Print this message");
    opts
}

/// Parse `args` (without the program name) on top of `defaults`.
pub fn from_cmdline_args(defaults: Preferences, args: &[String]) -> ArgumentParsingResult {
    let opts = build_options();
    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(error) => return ArgumentParsingResult::Error(error.to_string()),
    };

    if matches.opt_present("h") {
        return ArgumentParsingResult::Usage(opts.usage("Usage: [options]"));
    }

    let mut preferences = defaults;
    if matches.opt_present("enable-coop-reporting") {
        preferences.network_cross_origin_opener_policy_reporting_enabled = true;
    }
    if matches.opt_present("disable-coop") {
        preferences.network_cross_origin_opener_policy_enabled = false;
    }
    for pref in matches.opt_strs("pref") {
        if let Err(error) = parse_pref_from_command_line(&mut preferences, &pref) {
            return ArgumentParsingResult::Error(format!(
                "Error setting preference {pref:?}: {error}"
            ));
        }
    }

    ArgumentParsingResult::Preferences(preferences)
}

pub fn parse_pref_from_command_line(
    preferences: &mut Preferences,
    pref: &str,
) -> Result<(), PreferenceError> {
    let (name, value) = match pref.split_once('=') {
        Some((name, value)) => (name.trim(), PrefValue::from_booleanish_str(value.trim())),
        None => (pref.trim(), PrefValue::Bool(true)),
    };
    preferences.set_value(name, value)
}
