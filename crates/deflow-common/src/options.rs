//! Options recognized by the core translation contract.

use serde::{Deserialize, Serialize};

/// Per-run translation options.
///
/// `quiet` suppresses human-readable surfacing of diagnostics (logging); it
/// never changes the emitted text or the returned diagnostic list. Output is
/// a pure function of the input tree plus `report_unsupported`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslateOptions {
    /// Do not log diagnostics as they are recorded.
    pub quiet: bool,
    /// Record a diagnostic for unrecognized raw node kinds instead of
    /// dropping them silently.
    pub report_unsupported: bool,
}

impl TranslateOptions {
    pub const fn quiet() -> TranslateOptions {
        TranslateOptions {
            quiet: true,
            report_unsupported: false,
        }
    }
}
