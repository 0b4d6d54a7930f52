use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use tracing::debug;

use crate::{errors::errors::Error, FileId};

/// Converts a compiler error into something codespan can render.
pub trait IntoDiagnostic {
    fn into_diagnostic(&self) -> Diagnostic<FileId>;
}

impl IntoDiagnostic for Error {
    fn into_diagnostic(&self) -> Diagnostic<FileId> {
        let severity = self.get_severity();
        let span = self.get_span();

        let mut labels = vec![Label::primary(span.file, span.range())];
        for (extra, message) in self.get_extra_spans() {
            labels.push(Label::secondary(extra.file, extra.range()).with_message(message.clone()));
        }

        let mut notes = vec![];
        let tip = self.get_tip().to_string();
        if !tip.is_empty() {
            notes.push(format!("help: {}", tip));
        }
        for fixit in self.get_fixits() {
            if fixit.span.is_empty() {
                notes.push(format!(
                    "fix: insert `{}` at offset {}",
                    fixit.replacement, fixit.span.start
                ));
            } else {
                notes.push(format!(
                    "fix: replace bytes {}..{} with `{}`",
                    fixit.span.start, fixit.span.end, fixit.replacement
                ));
            }
        }

        Diagnostic::new(severity)
            .with_message(self.to_string())
            .with_code(self.get_error_name())
            .with_labels(labels)
            .with_notes(notes)
    }
}

/// Collects every problem reported during one compilation.
///
/// Passes report and keep going. Whether the result may move on to code
/// generation is decided by looking at [`Diagnostics::error_count`] once
/// all passes have run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    reported: Vec<Error>,
    errors: usize,
    warnings: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: Error) {
        debug!(
            kind = error.get_error_name(),
            start = error.get_span().start,
            end = error.get_span().end,
            "diagnostic reported"
        );

        match error.get_severity() {
            Severity::Bug | Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Note | Severity::Help => {}
        }
        self.reported.push(error);
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn len(&self) -> usize {
        self.reported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.reported.iter()
    }

    pub fn first_error(&self) -> Option<&Error> {
        self.reported.iter().find(|error| error.is_error())
    }

    /// Drops everything but the first error. Warnings are dropped too.
    pub fn keep_first_error(&mut self) {
        let first = self.reported.iter().position(|error| error.is_error());
        match first {
            Some(index) => {
                let error = self.reported.swap_remove(index);
                self.reported = vec![error];
                self.errors = 1;
            }
            None => {
                self.reported.clear();
                self.errors = 0;
            }
        }
        self.warnings = 0;
    }

    /// Whether any reported problem has the given name, see
    /// [`Error::get_error_name`].
    pub fn contains(&self, name: &str) -> bool {
        self.reported.iter().any(|error| error.get_error_name() == name)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.reported.iter()
    }
}
