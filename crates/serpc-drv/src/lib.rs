//! serpc-drv - Transpiler driver.
//!
//! Composes the pipeline: read the input file, lex, parse, and - only
//! when not a single diagnostic was raised - generate C++ and write it
//! to `Output/CodeTranspiled.cpp`. On any diagnostic the driver prints
//! every formatted error plus the failure footer to stderr, writes no
//! output file, and exits 1.
//!
//! An unexpected panic inside the parser (an internal bug, not a user
//! error) is caught here and reported as one `other` diagnostic, so
//! the process still exits through the normal failure path.

use std::fs;
use std::io::IsTerminal;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serpc_gen::CodeGenerator;
use serpc_lex::Lexer;
use serpc_par::{ast, dot, Parser};
use serpc_util::{ErrorKind, Handler};

/// Directory the transpiled unit is written to, created on demand.
pub const OUTPUT_DIR: &str = "Output";
/// Name of the emitted compilation unit.
pub const OUTPUT_FILE: &str = "CodeTranspiled.cpp";

/// Parsed command line.
#[derive(Clone, Debug)]
pub struct Config {
    /// Input source file.
    pub input: PathBuf,
    /// Dump a Graphviz rendering of the AST to `Output/ast.dot`.
    pub draw_graph: bool,
    /// Report pipeline phases and the parsed tree on stderr.
    pub verbose: bool,
}

impl Config {
    /// Parse arguments (program name already stripped).
    pub fn from_args(args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut input = None;
        let mut draw_graph = false;
        let mut verbose = false;

        for arg in args {
            match arg.as_str() {
                "drawGraph" => draw_graph = true,
                "--verbose" => verbose = true,
                _ if arg.starts_with('-') => {
                    return Err(format!("unknown option '{arg}'"));
                },
                _ => {
                    if input.replace(PathBuf::from(&arg)).is_some() {
                        return Err("expected exactly one input file".to_string());
                    }
                },
            }
        }

        Ok(Self {
            input: input.ok_or("missing input file")?,
            draw_graph,
            verbose,
        })
    }
}

/// Run the pipeline. Returns the process exit code; `Err` is reserved
/// for environment failures (unreadable input, unwritable output).
pub fn run(config: &Config) -> Result<i32> {
    let source = fs::read_to_string(&config.input)
        .with_context(|| format!("cannot read '{}'", config.input.display()))?;

    let handler = Handler::new();

    if config.verbose {
        eprintln!("Lexing: {}", config.input.display());
    }
    let tokens = Lexer::new(&source, &handler).tokenize();

    if config.verbose {
        eprintln!("Parsing: {} tokens", tokens.len());
    }
    let parsed = catch_unwind(AssertUnwindSafe(|| {
        Parser::new(tokens, &handler, &source).parse()
    }));
    let tree = match parsed {
        Ok(tree) => tree,
        Err(_) => {
            handler.log("internal error while parsing", ErrorKind::Other);
            None
        },
    };

    if config.verbose {
        if let Some(tree) = &tree {
            eprintln!("{}", ast::dump(tree));
        }
    }

    if handler.count() == 0 {
        if let Some(tree) = &tree {
            if config.draw_graph {
                write_output("ast.dot", &dot::render(tree))?;
            }

            if config.verbose {
                eprintln!("Generating C++");
            }
            let mut generator = CodeGenerator::new(&handler);
            let mut code = generator.generate(tree);

            if handler.count() == 0 {
                code.push('\n');
                write_output(OUTPUT_FILE, &code)?;
                println!("############# File transpiled successfully! #############");
                return Ok(0);
            }
        }
    }

    let color = std::io::stderr().is_terminal();
    eprint!(
        "{}",
        handler.render(&config.input.display().to_string(), color)
    );
    Ok(1)
}

fn write_output(name: &str, contents: &str) -> Result<()> {
    let dir = Path::new(OUTPUT_DIR);
    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create output directory '{}'", dir.display()))?;
    let path = dir.join(name);
    fs::write(&path, contents)
        .with_context(|| format!("cannot write '{}'", path.display()))?;
    Ok(())
}
