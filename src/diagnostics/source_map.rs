use std::collections::HashMap;

use codespan_reporting::{
    files::{Files, SimpleFiles},
    term::{
        self,
        termcolor::{ColorChoice, StandardStream, WriteColor},
    },
};

use crate::FileId;

use super::diagnostics::{Diagnostics, IntoDiagnostic};

/// The source files of a compilation, and the place diagnostics get
/// rendered against them.
pub struct SourceMap {
    files: SimpleFiles<String, String>,
    file_map: HashMap<String, FileId>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            file_map: HashMap::new(),
        }
    }

    /// Registers a file, returning the existing id if the name is known.
    pub fn add_file(&mut self, name: String, source: String) -> FileId {
        if let Some(&id) = self.file_map.get(&name) {
            return id;
        }
        let id = self.files.add(name.clone(), source);
        self.file_map.insert(name, id);
        id
    }

    pub fn get_file_id(&self, name: &str) -> Option<FileId> {
        self.file_map.get(name).copied()
    }

    pub fn source(&self, file: FileId) -> Option<&str> {
        self.files.get(file).ok().map(|file| file.source().as_str())
    }

    pub fn name(&self, file: FileId) -> Option<String> {
        self.files.name(file).ok()
    }

    /// 1-based line and column of a byte offset.
    pub fn location(&self, file: FileId, offset: usize) -> Option<(usize, usize)> {
        let location = self.files.location(file, offset).ok()?;
        Some((location.line_number, location.column_number))
    }

    /// Renders every diagnostic to stderr.
    pub fn emit(
        &self,
        diagnostics: &Diagnostics,
        color: ColorChoice,
    ) -> Result<(), codespan_reporting::files::Error> {
        let writer = StandardStream::stderr(color);
        let mut lock = writer.lock();
        self.emit_to(&mut lock, diagnostics)
    }

    pub fn emit_to<W: WriteColor>(
        &self,
        writer: &mut W,
        diagnostics: &Diagnostics,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();

        for error in diagnostics {
            term::emit(writer, &config, &self.files, &error.into_diagnostic())?;
        }

        Ok(())
    }
}

impl Default for SourceMap {
    fn default() -> Self {
        Self::new()
    }
}
