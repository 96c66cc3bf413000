//! Dual-mode source printer
//!
//! [`Printer::print`] reprints a parsed (and possibly modified) tree,
//! reusing the original text of every node that did not change.
//! [`Printer::print_generically`] formats the whole tree from rules.

pub mod comments;
pub mod fast_path;
pub mod formatter;
pub mod lines;
pub mod options;
pub mod patcher;
pub mod print_result;
pub mod printer;

#[cfg(test)]
mod tests_printer;

#[cfg(test)]
mod tests_e2e;

pub use comments::{CommentPrinter, Comments};
pub use fast_path::FastPath;
pub use formatter::{Formatter, GenericFormatter};
pub use lines::Lines;
pub use options::{normalize, Options, PartialOptions, PrintOptions, PrintOverrides, QuoteStyle};
pub use patcher::{Patcher, PrintFn, PrintWithFn, Reconciler, Reprint, Reprinter};
pub use print_result::{DeprecationNotice, PrintResult};
pub use printer::{Printer, RenderMode};
