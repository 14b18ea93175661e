//! Namespace flattening.
//!
//! The target dialect has no namespace construct, so every surviving symbol
//! gets a flat, globally unique identifier: its qualified path segments
//! joined with `$`, sanitized to identifier characters. `Outer.Inner.Member`
//! becomes `Outer$Inner$Member`. The encoding is deterministic - no
//! randomness, no counters - so the same input always produces the same
//! names.
//!
//! Two distinct paths flattening to one identifier would silently alias two
//! entities, so that is a fatal error for the run, never a rename.

use crate::symbol::SymbolTable;
use deflow_common::FatalError;
use rustc_hash::FxHashMap;

/// Assign flat names to every non-suppressed symbol, failing on collision.
pub fn assign_flat_names(table: &mut SymbolTable) -> Result<(), FatalError> {
    let mut seen: FxHashMap<String, String> = FxHashMap::default();
    for id in table.ids() {
        if table.get(id).suppressed {
            continue;
        }
        let flat = flatten_path(&table.get(id).path);
        let dotted = table.get(id).dotted_path();
        if let Some(prior) = seen.get(&flat) {
            return Err(FatalError::FlatNameCollision {
                flat_name: flat,
                first_path: prior.clone(),
                second_path: dotted,
            });
        }
        seen.insert(flat.clone(), dotted);
        table.get_mut(id).flat_name = Some(flat);
    }
    tracing::debug!(flattened = seen.len(), "assigned flat names");
    Ok(())
}

/// Join qualified path segments into one flat identifier.
pub fn flatten_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push('$');
        }
        push_sanitized(&mut out, segment.as_ref());
    }
    out
}

/// Sanitize one path segment to identifier characters. Ambient module
/// specifiers can contain arbitrary text (`"@scope/pkg"`), which maps onto
/// `$`; a leading digit gains an underscore so the result stays a valid
/// identifier.
fn push_sanitized(out: &mut String, segment: &str) {
    for (i, ch) in segment.chars().enumerate() {
        if i == 0 && ch.is_ascii_digit() {
            out.push('_');
        }
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
            out.push(ch);
        } else {
            out.push('$');
        }
    }
}
