/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::{RwLock, RwLockReadGuard};

use log::debug;
use serde::{Deserialize, Serialize};
use servo_config_macro::ServoPreferences;

pub use crate::pref_util::{PrefValue, PreferenceError};

static PREFERENCES: RwLock<Preferences> = RwLock::new(Preferences::const_default());

#[inline]
pub fn get() -> RwLockReadGuard<'static, Preferences> {
    PREFERENCES
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn set(preferences: Preferences) {
    let mut current = PREFERENCES
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    for (name, value) in preferences.diff(&current) {
        debug!("Preference {} changed to {}", name, value);
    }
    *current = preferences;
}

#[macro_export]
macro_rules! pref {
    ($name: ident) => {
        $crate::prefs::get().$name.clone()
    };
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, ServoPreferences)]
pub struct Preferences {
    /// Whether `Cross-Origin-Opener-Policy` headers are honoured at all.
    pub network_cross_origin_opener_policy_enabled: bool,
    /// Force-enables COOP violation reporting, bypassing the origin trial.
    pub network_cross_origin_opener_policy_reporting_enabled: bool,
    /// Comma separated, base64 encoded Ed25519 public keys that origin trial tokens are
    /// checked against. Empty disables origin trials.
    pub network_origin_trials_public_keys: String,
}

impl Preferences {
    const fn const_default() -> Self {
        Self {
            network_cross_origin_opener_policy_enabled: true,
            network_cross_origin_opener_policy_reporting_enabled: false,
            network_origin_trials_public_keys: String::new(),
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::const_default()
    }
}
