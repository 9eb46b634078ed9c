mod repl;
mod runner;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Script to execute; starts the REPL when omitted.
    path: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    match cli.path {
        None => repl::start().unwrap(),
        Some(path) => {
            let src = std::fs::read_to_string(path).unwrap();
            if let Err(error) = runner::execute(&src) {
                match error {
                    runner::ExecuteError::Lex(errors) => {
                        for error in errors {
                            eprintln!("lexical error: {}", error);
                        }
                    }
                    runner::ExecuteError::Parse(errors) => {
                        for error in errors {
                            eprintln!("syntax error: {}", error);
                        }
                    }
                    runner::ExecuteError::Eval(error) => eprintln!("runtime error: {}", error),
                }
                std::process::exit(1);
            }
        }
    }
}
