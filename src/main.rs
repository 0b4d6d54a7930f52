use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use codespan_reporting::term::termcolor::ColorChoice;
use semac::{check_source, visitor::AstStringifier, CheckedProgram, Compilation, CompilerOptions, ErrorPolicy};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "semac")]
#[command(about = "Binds, type checks and flow checks a source file", long_about = None)]
#[command(version)]
struct Cli {
    /// Source file to check
    file: PathBuf,

    /// Stop at the first pass that reports an error
    #[arg(long)]
    fail_fast: bool,

    /// Warn about statements after a guaranteed return
    #[arg(long)]
    warn_unreachable: bool,

    /// Print the tree with checked literal types
    #[arg(long)]
    dump_ast: bool,

    /// Print the type of every expression
    #[arg(long)]
    dump_types: bool,

    #[arg(long, value_enum, default_value_t = Color::Auto)]
    color: Color,
}

#[derive(Clone, Copy, ValueEnum)]
enum Color {
    Auto,
    Always,
    Never,
}

impl From<Color> for ColorChoice {
    fn from(color: Color) -> Self {
        match color {
            Color::Auto => ColorChoice::Auto,
            Color::Always => ColorChoice::Always,
            Color::Never => ColorChoice::Never,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dump_types(compilation: &Compilation, program: &CheckedProgram) {
    let mut exprs: Vec<_> = program.type_table.exprs().collect();
    exprs.sort_by_key(|(node, _)| node.index());

    for (node, ty) in exprs {
        let span = program.ast.span(node);
        let (line, column) = compilation
            .sources
            .location(compilation.file, span.start)
            .unwrap_or((0, 0));
        println!(
            "{}:{} {} {}",
            line,
            column,
            program.ast.kind(node).name(),
            program.types.display(ty)
        );
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            error!(file = %cli.file.display(), "cannot read source file");
            eprintln!("error: cannot read '{}': {}", cli.file.display(), err);
            return ExitCode::from(2);
        }
    };

    let options = CompilerOptions {
        error_policy: if cli.fail_fast {
            ErrorPolicy::FailFast
        } else {
            ErrorPolicy::Accumulate
        },
        warn_unreachable: cli.warn_unreachable,
    };

    let file_name = cli.file.display().to_string();
    let compilation = check_source(&source, &file_name, &options);

    if let Some(program) = compilation.analysis() {
        if cli.dump_ast {
            let mut stringifier = AstStringifier::with_type_table(&program.types, &program.type_table);
            println!("{}", stringifier.stringify(&program.ast));
        }
        if cli.dump_types {
            dump_types(&compilation, program);
        }
    }

    if let Err(err) = compilation.emit(cli.color.into()) {
        eprintln!("error: cannot render diagnostics: {}", err);
    }

    if compilation.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
