use gc::Gc;

use crate::scope::Scope;
use crate::value::{EvaluationError, NativeFunction, Value};

/// Seeds the global scope with the native function catalog. Must run before
/// evaluation; the evaluator itself only knows the call protocol.
pub fn install(scope: &Scope) -> Result<(), EvaluationError> {
    for native in [
        NativeFunction {
            name: "print",
            func: native_print,
        },
        NativeFunction {
            name: "panic",
            func: native_panic,
        },
        NativeFunction {
            name: "len",
            func: native_len,
        },
        NativeFunction {
            name: "to_string",
            func: native_to_string,
        },
    ] {
        scope.declare(native.name, Value::native_function(native))?;
    }
    Ok(())
}

fn arity_error(name: &'static str, expected: usize, actual: usize) -> EvaluationError {
    EvaluationError::NativeFunctionError {
        name,
        message: format!("expected {} arguments, got {}", expected, actual).into(),
    }
}

fn render(args: &[Gc<Value>]) -> String {
    args.iter()
        .map(|value| value.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}

fn native_print(args: Vec<Gc<Value>>) -> Result<Gc<Value>, EvaluationError> {
    println!("{}", render(&args));
    Ok(Value::null())
}

fn native_panic(args: Vec<Gc<Value>>) -> Result<Gc<Value>, EvaluationError> {
    Err(EvaluationError::NativeFunctionError {
        name: "panic",
        message: render(&args).into(),
    })
}

fn native_len(args: Vec<Gc<Value>>) -> Result<Gc<Value>, EvaluationError> {
    if args.len() != 1 {
        return Err(arity_error("len", 1, args.len()));
    }
    match &*args[0] {
        Value::String(value) => Ok(Value::integer(value.chars().count() as u64)),
        other => Err(EvaluationError::NativeFunctionError {
            name: "len",
            message: format!("expected a string, got {}", other.type_name()).into(),
        }),
    }
}

fn native_to_string(args: Vec<Gc<Value>>) -> Result<Gc<Value>, EvaluationError> {
    if args.len() != 1 {
        return Err(arity_error("to_string", 1, args.len()));
    }
    Ok(Value::string(args[0].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len() {
        let no_arguments = native_len(vec![]);
        assert_eq!(
            no_arguments,
            Err(EvaluationError::NativeFunctionError {
                name: "len",
                message: "expected 1 arguments, got 0".into(),
            })
        );

        let empty = native_len(vec![Value::string("")]);
        assert_eq!(empty, Ok(Value::integer(0)));

        let hello = native_len(vec![Value::string("hello")]);
        assert_eq!(hello, Ok(Value::integer(5)));

        let not_a_string = native_len(vec![Value::integer(42)]);
        assert_eq!(
            not_a_string,
            Err(EvaluationError::NativeFunctionError {
                name: "len",
                message: "expected a string, got integer".into(),
            })
        );
    }

    #[test]
    fn test_to_string() {
        assert_eq!(
            native_to_string(vec![Value::integer(42)]),
            Ok(Value::string("42"))
        );
        assert_eq!(
            native_to_string(vec![Value::float(4.0)]),
            Ok(Value::string("4.0"))
        );
        assert_eq!(
            native_to_string(vec![Value::null()]),
            Ok(Value::string("null"))
        );
    }

    #[test]
    fn test_panic_always_fails() {
        assert_eq!(
            native_panic(vec![Value::string("boom")]),
            Err(EvaluationError::NativeFunctionError {
                name: "panic",
                message: "boom".into(),
            })
        );
    }

    #[test]
    fn test_install_binds_the_catalog() {
        let scope = Scope::new();
        install(&scope).unwrap();
        for name in ["print", "panic", "len", "to_string"] {
            assert!(scope.lookup(name).is_ok(), "missing builtin {}", name);
        }
    }
}
