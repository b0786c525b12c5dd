//! `watc` — command-line driver for the WebAssembly text-format front
//! end, grounded on `oric`'s CLI structure: a flat subcommand dispatch,
//! `read_file`/`std::process::exit` error conventions, no argument-
//! parsing crate.

mod tracing_setup;

use wat_diagnostic::emitter::{ColorMode, TerminalEmitter};
use wat_diagnostic::{CollectingReporter, DiagnosticQueue};
use wat_parse::binary_reader::{BinaryReadError, BinaryReadOptions, Relexer, UnsupportedBinaryReader};
use wat_parse::ParserOptions;

fn main() {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: watc parse <file.wat>");
                std::process::exit(1);
            }
            parse_file(&args[2]);
        }
        "script" => {
            if args.len() < 3 {
                eprintln!("Usage: watc script <file.wast>");
                std::process::exit(1);
            }
            script_file(&args[2]);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: watc lex <file>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("watc 0.1.0-alpha.1");
            println!("WebAssembly text-format front end");
        }
        _ => {
            if looks_like_script(command) {
                script_file(command);
            } else if looks_like_module(command) {
                parse_file(command);
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn looks_like_module(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wat"))
}

fn looks_like_script(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wast"))
}

fn print_usage() {
    println!("watc — WebAssembly text-format front end");
    println!();
    println!("Usage: watc <command> [options]");
    println!();
    println!("Commands:");
    println!("  parse <file.wat>    Parse a module and print its structure");
    println!("  script <file.wast>  Parse a test script and print its commands");
    println!("  lex <file>          Tokenize a file and print its tokens");
    println!("  help                Show this help message");
    println!("  version             Show version information");
    println!();
    println!("Examples:");
    println!("  watc parse add.wat");
    println!("  watc script spec-test.wast");
    println!("  watc add.wat        (shorthand for 'parse')");
    println!();
    println!("Logging is controlled by the WAT_LOG environment variable");
    println!("(falls back to RUST_LOG); set WAT_LOG_TREE to get hierarchical output.");
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading '{path}': {e}");
            std::process::exit(1);
        }
    }
}

fn report_diagnostics(path: &str, diagnostics: &DiagnosticQueue<CollectingReporter>) {
    if diagnostics.diagnostics().is_empty() {
        return;
    }
    let mut emitter = TerminalEmitter::with_color_mode(std::io::stderr(), ColorMode::Auto, true);
    for diagnostic in diagnostics.diagnostics() {
        let diagnostic = diagnostic.clone().with_source_name(path.to_string());
        // A formatting failure here has no recovery path worth taking.
        let _ = emitter.emit(&diagnostic);
    }
}

fn parse_file(path: &str) {
    let content = read_file(path);
    tracing::info!(path, "parsing module");
    let tokens = wat_lexer::lex(&content);
    let mut interner = wat_ir::StringInterner::new();
    let mut diagnostics = DiagnosticQueue::new(CollectingReporter::default());

    let result = wat_parse::parse_module(&tokens, &mut interner, &mut diagnostics, ParserOptions::default());
    report_diagnostics(path, &diagnostics);

    match result {
        Ok(module) => {
            println!("Parse result for '{path}':");
            println!("  Functions: {}", module.funcs.len());
            println!("  Tables: {}", module.tables.len());
            println!("  Memories: {}", module.memories.len());
            println!("  Globals: {}", module.globals.len());
            println!("  Imports: {}", module.imports.len());
            println!("  Exports: {}", module.exports.len());
            println!("  Element segments: {}", module.elems.len());
            println!("  Data segments: {}", module.datas.len());
            println!("  Function types: {}", module.func_types.len());
            if !module.exports.is_empty() {
                println!();
                println!("Exports:");
                for export in &module.exports {
                    println!("  \"{}\" -> {:?}", export.name, export.kind);
                }
            }
        }
        Err(()) => {
            eprintln!("Parse failed: {path}");
            std::process::exit(1);
        }
    }
}

fn script_file(path: &str) {
    let content = read_file(path);
    tracing::info!(path, "parsing script");
    let tokens = wat_lexer::lex(&content);
    let mut interner = wat_ir::StringInterner::new();
    let mut diagnostics = DiagnosticQueue::new(CollectingReporter::default());

    let result = wat_parse::parse_script(&tokens, &mut interner, &mut diagnostics, ParserOptions::default());
    report_diagnostics(path, &diagnostics);

    match result {
        Ok(mut script) => {
            let mut relexer = LexerRelexer;
            wat_parse::binary_reader::dispatch_raw_modules(
                &mut script,
                &mut UnsupportedBinaryReader,
                &mut relexer,
                &mut diagnostics,
                BinaryReadOptions::default(),
            );
            report_diagnostics(path, &diagnostics);

            println!("Script result for '{path}':");
            println!("  Commands: {}", script.commands.len());
            let mut modules = 0;
            let mut actions = 0;
            let mut asserts = 0;
            let mut registers = 0;
            for command in &script.commands {
                match command {
                    wat_ir::Command::Module(_) => modules += 1,
                    wat_ir::Command::Register { .. } => registers += 1,
                    wat_ir::Command::Action(_) => actions += 1,
                    wat_ir::Command::AssertReturn { .. }
                    | wat_ir::Command::AssertTrap { .. }
                    | wat_ir::Command::AssertExhaustion { .. }
                    | wat_ir::Command::AssertMalformed { .. }
                    | wat_ir::Command::AssertInvalid { .. }
                    | wat_ir::Command::AssertUnlinkable { .. }
                    | wat_ir::Command::AssertUninstantiable { .. } => asserts += 1,
                }
            }
            println!("  Modules: {modules}");
            println!("  Registers: {registers}");
            println!("  Actions: {actions}");
            println!("  Assertions: {asserts}");
        }
        Err(()) => {
            eprintln!("Parse failed: {path}");
            std::process::exit(1);
        }
    }
}

fn lex_file(path: &str) {
    let content = read_file(path);
    let tokens = wat_lexer::lex(&content);

    println!("Tokens for '{path}' ({} tokens):", tokens.len());
    for token in &tokens {
        println!("  {:?} {:?} @ {}", token.kind, token.lexeme, token.span.start);
    }
}

/// Wires the `quote`-form raw-module path to this binary's own lexer,
/// the one external collaborator every `watc` invocation actually has on
/// hand (spec §6 "external Binary Reader", generalized to the re-lex
/// path by `wat_parse::binary_reader::Relexer`).
struct LexerRelexer;

impl Relexer for LexerRelexer {
    fn relex(&mut self, source: &str) -> Result<Vec<wat_lexer_core::Token>, BinaryReadError> {
        Ok(wat_lexer::lex(source))
    }
}
