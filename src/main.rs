use lambda_scheme_core::error::Result;
use lambda_scheme_core::parser;
use lambda_scheme_core::trampoline::{AmbFn, RetFn, Step, run};
use lambda_scheme_core::types::Inferencer;
use lambda_scheme_core::value::Expr;
use lambda_scheme_core::{root_environment, root_type_env};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::rc::Rc;

/// Hand-parsed CLI: `lambda-scheme [--no-infer] [source-file]`. A `clap`
/// dependency would be overkill for two flags, and the teacher's own
/// binary never took arguments at all, so we keep this the same
/// zero-dependency shape it would use for a larger flag set.
struct Cli {
    no_infer: bool,
    source_file: Option<String>,
}

fn parse_cli(mut args: impl Iterator<Item = String>) -> Cli {
    let mut no_infer = false;
    let mut source_file = None;
    args.next(); // binary name
    for arg in args {
        if arg == "--no-infer" {
            no_infer = true;
        } else {
            source_file = Some(arg);
        }
    }
    Cli { no_infer, source_file }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = parse_cli(std::env::args());

    if let Some(path) = &cli.source_file {
        let source = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("could not read {path}: {e}"));
        run_program(&source, cli.no_infer);
        return Ok(());
    }

    println!("lambda-scheme");
    println!("Press Ctrl+C or Ctrl+D to exit");

    let mut rl = DefaultEditor::new().expect("could not start line editor");
    loop {
        match rl.readline("\u{03bb}> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                rl.add_history_entry(line.as_str()).ok();
                run_one(&line, cli.no_infer);
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted (Ctrl+C)");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("Exiting (Ctrl+D)");
                break;
            }
            Err(err) => {
                eprintln!("Readline error: {err:?}");
                break;
            }
        }
    }
    Ok(())
}

fn run_program(source: &str, no_infer: bool) {
    match parser::parse_program(source) {
        Ok(expr) => evaluate_and_report(expr, no_infer),
        Err(e) => eprintln!("Parse error: {e}"),
    }
}

fn run_one(line: &str, no_infer: bool) {
    match parser::parse(line) {
        Ok(expr) => evaluate_and_report(expr, no_infer),
        Err(e) => eprintln!("Parse error: {e}"),
    }
}

fn evaluate_and_report(expr: Expr, no_infer: bool) {
    if !no_infer {
        let inf = Inferencer::new();
        let env = root_type_env(&inf);
        match inf.infer(&expr, &env, &[]) {
            Ok(t) => log::debug!("inferred type: {t}"),
            Err(e) => {
                eprintln!("Type error: {e}");
                return;
            }
        }
    }

    let sink: Rc<dyn Fn(&str)> = Rc::new(|s: &str| print!("{s}"));
    let final_ret: RetFn = Rc::new(|v, _amb| Ok(Step::Done(v)));
    let env = root_environment(sink, final_ret.clone());
    let halt_amb: AmbFn = Rc::new(|| Ok(Step::Exit));

    log::trace!("evaluating top-level form");
    match expr.eval(&env, final_ret, halt_amb).and_then(run) {
        Ok(Some(value)) => println!("{value:?}"),
        Ok(None) => println!("(exited)"),
        Err(e) => eprintln!("Error: {e}"),
    }
}
