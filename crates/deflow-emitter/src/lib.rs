//! Target-dialect text emission for the deflow translator.
//!
//! The emitter walks the merged, flattened, resolved symbol model and prints
//! one Flow library-definition document. It performs no validation of the
//! produced text; correctness was established (or classified) by the earlier
//! phases, and external checkers belong to the test harness, not here.

pub mod printer;
pub use printer::Printer;

pub mod emit;
pub use emit::emit_document;

pub mod pipeline;
pub use pipeline::{Translation, translate};
