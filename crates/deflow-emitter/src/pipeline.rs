//! The translation pipeline.
//!
//! One synchronous run: wrap, bind, merge, flatten, resolve, emit. Each
//! phase completes before the next begins and owns no state beyond the run,
//! so concurrent runs over different inputs need no coordination.

use crate::emit::emit_document;
use deflow_ast::RawNode;
use deflow_binder::{assign_flat_names, build_symbol_table, resolve_merges, resolve_references};
use deflow_common::{Diagnostic, FatalError, TranslateOptions};

/// The outcome of a successful run: the emitted document plus every
/// non-fatal diagnostic, in the order the phases recorded them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Translation {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category() == deflow_common::DiagnosticCategory::Error)
    }
}

/// Translate one externally-parsed declaration tree into a Flow libdef
/// document.
///
/// Diagnostics never abort the run; the only fatal outcomes are a flat-name
/// collision and an input with no tree. The emitted text and the diagnostic
/// list are a pure function of the input tree and `report_unsupported`;
/// `quiet` only silences the log surfacing below.
pub fn translate(root: &RawNode, options: &TranslateOptions) -> Result<Translation, FatalError> {
    let (mut arena, mut diagnostics) = deflow_ast::adapt(root, options);

    let mut table = build_symbol_table(&arena);
    diagnostics.extend(resolve_merges(&arena, &mut table));
    assign_flat_names(&mut table)?;
    diagnostics.extend(resolve_references(&mut arena, &table));

    let text = emit_document(&arena, &table);

    if !options.quiet {
        for diagnostic in &diagnostics {
            tracing::warn!(
                code = diagnostic.code(),
                path = %diagnostic.path,
                "{}",
                diagnostic.message
            );
        }
    }

    Ok(Translation { text, diagnostics })
}
