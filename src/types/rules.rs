//! Per-site rule data: scale bounds and the persisted rule-set snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Smallest scale a rescaled element may carry.
pub const MIN_SCALE: f64 = 0.2;
/// Largest scale a rescaled element may carry.
pub const MAX_SCALE: f64 = 5.0;
/// Increment applied by the adjustment control's +/- buttons.
pub const SCALE_STEP: f64 = 0.1;
/// The implicit scale of an untouched element. Never stored.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Clamps a raw scale into `[MIN_SCALE, MAX_SCALE]` and rounds it to the
/// nearest 0.1.
pub fn normalize_scale(raw: f64) -> f64 {
    let clamped = raw.clamp(MIN_SCALE, MAX_SCALE);
    (clamped * 10.0).round() / 10.0
}

/// True when a (normalized) scale equals the implicit default and must not
/// be stored.
pub fn is_default_scale(scale: f64) -> bool {
    (scale - DEFAULT_SCALE).abs() < f64::EPSILON
}

/// Formats a scale the way it is written into inline styles and the marker
/// attribute.
pub fn format_scale(scale: f64) -> String {
    format!("{}", scale)
}

fn default_active() -> bool {
    true
}

/// Snapshot of one site's persisted rule set.
///
/// The three fields live under independent storage keys; this struct only
/// exists as a read-side aggregate for status surfaces and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRules {
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub hidden: Vec<String>,
    #[serde(default)]
    pub resized: BTreeMap<String, f64>,
}

impl Default for SiteRules {
    fn default() -> Self {
        Self {
            active: true,
            hidden: Vec::new(),
            resized: BTreeMap::new(),
        }
    }
}
