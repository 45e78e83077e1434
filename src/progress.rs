//! Progress bars for the per-file loops.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{msg}: {wide_bar} {pos}/{len} [{elapsed_precise}]";

/// A bar on stderr for `len` items. indicatif hides it when stderr is not a
/// terminal, so tests and piped runs stay quiet.
pub(crate) fn bar(len: usize, message: String) -> ProgressBar {
    let style =
        ProgressStyle::with_template(TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(len as u64)
        .with_style(style)
        .with_message(message)
}
