use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use gc::{Finalize, Gc, GcCell, Trace};
use num_bigint::BigInt;
use thiserror::Error;

use crate::scope::Scope;
use skiff_lang_core::ast;

/// A runtime value, always handled through a `Gc` pointer. Objects and
/// functions are reference types: aliases observe each other's mutations.
/// Everything else is immutable, so sharing is indistinguishable from
/// copying.
#[derive(Debug, PartialEq, Trace, Finalize)]
pub enum Value {
    Null,
    Integer(#[unsafe_ignore_trace] BigInt),
    Float(f64),
    Boolean(bool),
    String(#[unsafe_ignore_trace] Rc<str>),
    Object(GcCell<HashMap<String, Gc<Value>>>),
    Function(Function),
    NativeFunction(NativeFunction),
}

thread_local! {
    static NULL: Gc<Value> = Gc::new(Value::Null);
    static TRUE: Gc<Value> = Gc::new(Value::Boolean(true));
    static FALSE: Gc<Value> = Gc::new(Value::Boolean(false));
}

impl Value {
    pub fn null() -> Gc<Value> {
        NULL.with(|x| x.clone())
    }
    pub fn boolean(value: bool) -> Gc<Value> {
        if value {
            TRUE.with(|x| x.clone())
        } else {
            FALSE.with(|x| x.clone())
        }
    }
    pub fn integer(value: impl Into<BigInt>) -> Gc<Value> {
        Gc::new(Value::Integer(value.into()))
    }
    pub fn float(value: f64) -> Gc<Value> {
        Gc::new(Value::Float(value))
    }
    pub fn string(value: impl Into<Rc<str>>) -> Gc<Value> {
        Gc::new(Value::String(value.into()))
    }
    pub fn object(fields: HashMap<String, Gc<Value>>) -> Gc<Value> {
        Gc::new(Value::Object(GcCell::new(fields)))
    }
    pub fn function(
        parameters: Rc<Vec<ast::Identifier>>,
        body: Rc<ast::BlockStatement>,
        scope: Scope,
    ) -> Gc<Value> {
        Gc::new(Value::Function(Function {
            parameters,
            body,
            scope,
        }))
    }
    pub fn native_function(native: NativeFunction) -> Gc<Value> {
        Gc::new(Value::NativeFunction(native))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::NativeFunction(_) => "native function",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{:?}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Function(function) => {
                write!(f, "<fn@{:x}>", function as *const Function as usize)
            }
            Value::NativeFunction(native) => write!(f, "<native fn {}>", native.name),
        }
    }
}

/// A closure: the parameter list and body are shared with the AST node the
/// function was created from, and the defining scope is held by reference.
#[derive(Clone, Trace, Finalize)]
pub struct Function {
    #[unsafe_ignore_trace]
    pub parameters: Rc<Vec<ast::Identifier>>,
    #[unsafe_ignore_trace]
    pub body: Rc<ast::BlockStatement>,
    pub scope: Scope,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.body, &other.body) && self.scope.ptr_eq(&other.scope)
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("ptr", &(self as *const Function as usize))
            .finish()
    }
}

pub type NativeFn = fn(Vec<Gc<Value>>) -> Result<Gc<Value>, EvaluationError>;

#[derive(Clone, Trace, Finalize)]
pub struct NativeFunction {
    #[unsafe_ignore_trace]
    pub name: &'static str,
    #[unsafe_ignore_trace]
    pub func: NativeFn,
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.func as usize == other.func as usize
    }
}

impl std::fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish()
    }
}

/// Why evaluation of a statement stopped short: either a `return` unwinding
/// to the enclosing call, or a runtime error aborting the whole pass.
#[derive(Debug, PartialEq)]
pub enum Interrupt {
    Return(Gc<Value>),
    Error(EvaluationError),
}

impl From<EvaluationError> for Interrupt {
    fn from(error: EvaluationError) -> Self {
        Interrupt::Error(error)
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum EvaluationError {
    #[error("unsupported operand types for '{}': {} and {}", .operation.to_str(), .left.type_name(), .right.type_name())]
    TypeMismatch {
        operation: ast::InfixOperationKind,
        left: Gc<Value>,
        right: Gc<Value>,
    },
    #[error("unsupported operand type for prefix '{}': {}", .operation.to_str(), .operand.type_name())]
    PrefixTypeMismatch {
        operation: ast::PrefixOperationKind,
        operand: Gc<Value>,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("unable to resolve symbol '{0}'")]
    UnresolvedSymbol(Rc<str>),
    #[error("cannot redeclare variable '{0}'")]
    DuplicateBinding(Rc<str>),
    #[error("condition must be a boolean, got {}", .0.type_name())]
    NonBooleanCondition(Gc<Value>),
    #[error("dot operator can only be used on objects, got {}", .0.type_name())]
    NotAnObject(Gc<Value>),
    #[error("field '{0}' is not present on the object")]
    MissingField(Rc<str>),
    #[error("assignee must be an identifier or an object field")]
    InvalidAssignee,
    #[error("expected {expected} arguments, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("value of type {} is not callable", .0.type_name())]
    NotCallable(Gc<Value>),
    #[error("{name}: {message}")]
    NativeFunctionError {
        name: &'static str,
        message: Rc<str>,
    },
}
