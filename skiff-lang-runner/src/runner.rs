use skiff_lang_core::lexer;
use skiff_lang_core::parser;
use skiff_lang_interpreter::builtins;
use skiff_lang_interpreter::evaluator;
use skiff_lang_interpreter::scope::Scope;
use skiff_lang_interpreter::value::EvaluationError;

#[derive(Debug)]
pub enum ExecuteError {
    Lex(Vec<lexer::LexError>),
    Parse(Vec<parser::ParseError>),
    Eval(EvaluationError),
}

/// Runs a whole script: any lexical or syntactic errors suppress evaluation.
pub fn execute(src: &str) -> Result<(), ExecuteError> {
    let (toks, errors) = lexer::lex(src);
    if !errors.is_empty() {
        return Err(ExecuteError::Lex(errors));
    }
    let (program, errors) = parser::parse(&toks);
    if !errors.is_empty() {
        return Err(ExecuteError::Parse(errors));
    }
    let scope = Scope::new();
    builtins::install(&scope).map_err(ExecuteError::Eval)?;
    let value = evaluator::run(&program, &scope).map_err(ExecuteError::Eval)?;
    println!("{}", value);
    Ok(())
}
