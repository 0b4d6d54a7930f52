use codespan_reporting::term::termcolor::{ColorChoice, WriteColor};
use tracing::{info, warn};

use crate::{
    ast::Ast,
    binding::{bind, Bindings, ScopeTree},
    diagnostics::{Diagnostics, SourceMap},
    flow::{flow_check, FlowInfo},
    lexer::lexer::tokenize,
    parser::parse,
    type_checker::{type_check, TypeTable},
    types::TypeInterner,
    FileId,
};

use super::options::{CompilerOptions, ErrorPolicy};

/// Everything the passes produced for one source file.
#[derive(Debug)]
pub struct CheckedProgram {
    pub ast: Ast,
    pub types: TypeInterner,
    pub scopes: ScopeTree,
    pub bindings: Bindings,
    pub type_table: TypeTable,
    pub flow: FlowInfo,
}

/// The outcome of running the pipeline over one file.
pub struct Compilation {
    pub sources: SourceMap,
    pub file: FileId,
    pub diagnostics: Diagnostics,
    analysis: Option<CheckedProgram>,
}

impl Compilation {
    /// The program, only if no errors were reported. Warnings do not block.
    pub fn checked(&self) -> Option<&CheckedProgram> {
        if self.diagnostics.has_errors() {
            return None;
        }
        self.analysis.as_ref()
    }

    pub fn into_checked(self) -> Result<CheckedProgram, Diagnostics> {
        match self.analysis {
            Some(program) if !self.diagnostics.has_errors() => Ok(program),
            _ => Err(self.diagnostics),
        }
    }

    /// Whatever the passes got to, errors or not. `None` after a syntax
    /// error.
    pub fn analysis(&self) -> Option<&CheckedProgram> {
        self.analysis.as_ref()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub fn emit(&self, color: ColorChoice) -> Result<(), codespan_reporting::files::Error> {
        self.sources.emit(&self.diagnostics, color)
    }

    pub fn emit_to<W: WriteColor>(&self, writer: &mut W) -> Result<(), codespan_reporting::files::Error> {
        self.sources.emit_to(writer, &self.diagnostics)
    }
}

/// Applies the error policy after a pass. Returns true if the pipeline
/// should stop here.
fn should_stop(diagnostics: &mut Diagnostics, options: &CompilerOptions, pass: &str) -> bool {
    if options.error_policy == ErrorPolicy::FailFast && diagnostics.has_errors() {
        warn!(pass, errors = diagnostics.error_count(), "stopping after failed pass");
        diagnostics.keep_first_error();
        return true;
    }
    false
}

/// Runs lexing, parsing, binding, type checking and flow checking over
/// `source`, strictly in that order.
pub fn check_source(source: &str, file_name: &str, options: &CompilerOptions) -> Compilation {
    let mut sources = SourceMap::new();
    let file = sources.add_file(file_name.to_string(), source.to_string());
    let mut diagnostics = Diagnostics::new();

    info!(file = file_name, bytes = source.len(), "compilation started");

    let mut types = TypeInterner::new();
    let parsed = tokenize(source, file).and_then(|tokens| {
        info!(tokens = tokens.len(), "tokenized");
        parse(tokens, &mut types)
    });

    let ast = match parsed {
        Ok(ast) => ast,
        Err(error) => {
            diagnostics.report(error);
            return Compilation {
                sources,
                file,
                diagnostics,
                analysis: None,
            };
        }
    };
    info!(nodes = ast.len(), "parsed");

    let (scopes, bindings) = bind(&ast, &mut diagnostics);
    let stop = should_stop(&mut diagnostics, options, "binding");

    let type_table = if stop {
        TypeTable::new()
    } else {
        type_check(&ast, &mut types, &scopes, &bindings, &mut diagnostics)
    };
    let stop = stop || should_stop(&mut diagnostics, options, "type checking");

    let flow = if stop {
        FlowInfo::default()
    } else {
        flow_check(&ast, &types, &mut diagnostics, options.warn_unreachable)
    };

    info!(
        errors = diagnostics.error_count(),
        warnings = diagnostics.warning_count(),
        "compilation finished"
    );

    Compilation {
        sources,
        file,
        diagnostics,
        analysis: Some(CheckedProgram {
            ast,
            types,
            scopes,
            bindings,
            type_table,
            flow,
        }),
    }
}
