use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use skiff_lang_core::lexer;
use skiff_lang_core::parser;
use skiff_lang_interpreter::builtins;
use skiff_lang_interpreter::evaluator;
use skiff_lang_interpreter::scope::Scope;

const PROMPT: &str = ">> ";

/// Interactive loop over one global scope: bindings persist across lines.
pub fn start() -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;
    let scope = Scope::new();
    if let Err(error) = builtins::install(&scope) {
        eprintln!("runtime error: {}", error);
        return Ok(());
    }

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error),
        };
        if line.trim().is_empty() {
            continue;
        }
        rl.add_history_entry(&line)?;

        let (toks, errors) = lexer::lex(&line);
        if !errors.is_empty() {
            for error in errors {
                println!("lexical error: {}", error);
            }
            continue;
        }
        let (program, errors) = parser::parse(&toks);
        if !errors.is_empty() {
            for error in errors {
                println!("syntax error: {}", error);
            }
            continue;
        }
        match evaluator::run(&program, &scope) {
            Ok(value) => println!("{}", value),
            Err(error) => println!("runtime error: {}", error),
        }
    }
    Ok(())
}
