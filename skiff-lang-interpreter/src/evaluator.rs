use std::collections::HashMap;

use gc::Gc;
use num_traits::Zero;

use crate::scope::Scope;
use crate::value::{EvaluationError, Function, Interrupt, Value};
use skiff_lang_core::ast;

/// Evaluates a program in the given scope and yields the last statement's
/// value. A top-level `return` yields its value; the first runtime error
/// aborts the pass, leaving already-committed side effects in place.
pub fn run(program: &ast::Program, scope: &Scope) -> Result<Gc<Value>, EvaluationError> {
    let mut output = Value::null();
    for statement in &program.statements {
        match eval_statement(statement, scope) {
            Ok(value) => output = value,
            Err(Interrupt::Return(value)) => return Ok(value),
            Err(Interrupt::Error(error)) => return Err(error),
        }
    }
    Ok(output)
}

fn eval_statement(statement: &ast::Statement, scope: &Scope) -> Result<Gc<Value>, Interrupt> {
    match statement {
        ast::Statement::Expression(expression) => eval_expression(expression, scope),
        ast::Statement::Var(statement) => eval_var_statement(statement, scope),
        ast::Statement::Return(statement) => eval_return_statement(statement, scope),
        ast::Statement::If(statement) => eval_if_statement(statement, scope),
        ast::Statement::Block(block) => eval_block_statement(block, scope),
    }
}

fn eval_var_statement(
    statement: &ast::VarStatement,
    scope: &Scope,
) -> Result<Gc<Value>, Interrupt> {
    let value = eval_expression(&statement.value, scope)?;
    scope.declare(&statement.identifier.name, value)?;
    Ok(Value::null())
}

fn eval_return_statement(
    statement: &ast::ReturnStatement,
    scope: &Scope,
) -> Result<Gc<Value>, Interrupt> {
    let value = eval_expression(&statement.value, scope)?;
    Err(Interrupt::Return(value))
}

fn eval_if_statement(statement: &ast::IfStatement, scope: &Scope) -> Result<Gc<Value>, Interrupt> {
    for branch in &statement.branches {
        let condition = eval_expression(&branch.condition, scope)?;
        match &*condition {
            Value::Boolean(true) => return eval_block_statement(&branch.block, scope),
            Value::Boolean(false) => {}
            _ => {
                return Err(Interrupt::Error(EvaluationError::NonBooleanCondition(
                    condition.clone(),
                )))
            }
        }
    }
    if let Some(alternative) = &statement.alternative {
        return eval_block_statement(alternative, scope);
    }
    Ok(Value::null())
}

/// Runs the block's statements in a fresh scope nested under `enclosing`.
/// Blocks are statements, not expressions: completing one yields null, and
/// only an `Interrupt` carries anything out of it.
fn eval_block_statement(
    block: &ast::BlockStatement,
    enclosing: &Scope,
) -> Result<Gc<Value>, Interrupt> {
    let scope = Scope::nested(enclosing);
    for statement in &block.statements {
        eval_statement(statement, &scope)?;
    }
    Ok(Value::null())
}

fn eval_expression(expression: &ast::Expression, scope: &Scope) -> Result<Gc<Value>, Interrupt> {
    match expression {
        ast::Expression::IntegerLiteral(value) => Ok(Value::integer(value.clone())),
        ast::Expression::FloatLiteral(value) => Ok(Value::float(*value)),
        ast::Expression::BooleanLiteral(value) => Ok(Value::boolean(*value)),
        ast::Expression::NullLiteral => Ok(Value::null()),
        ast::Expression::StringLiteral(value) => Ok(Value::string(value.clone())),
        ast::Expression::Identifier(identifier) => Ok(scope.lookup(&identifier.name)?),
        ast::Expression::PrefixOperation(kind, operand) => {
            let operand = eval_expression(operand, scope)?;
            eval_prefix_operation(kind, operand)
        }
        ast::Expression::InfixOperation(kind, left, right) => {
            let left = eval_expression(left, scope)?;
            let right = eval_expression(right, scope)?;
            eval_infix_operation(kind, left, right)
        }
        ast::Expression::Assignment { assignee, value } => eval_assignment(assignee, value, scope),
        ast::Expression::ObjectLiteral(properties) => eval_object_literal(properties, scope),
        ast::Expression::Member { object, property } => {
            let object = eval_expression(object, scope)?;
            eval_member(object, property)
        }
        ast::Expression::Call {
            function,
            arguments,
        } => eval_call(function, arguments, scope),
        ast::Expression::FunctionLiteral { parameters, body } => Ok(Value::function(
            parameters.clone(),
            body.clone(),
            scope.clone(),
        )),
    }
}

fn eval_prefix_operation(
    kind: &ast::PrefixOperationKind,
    operand: Gc<Value>,
) -> Result<Gc<Value>, Interrupt> {
    match (kind, &*operand) {
        (ast::PrefixOperationKind::Minus, Value::Integer(value)) => Ok(Value::integer(-value)),
        (ast::PrefixOperationKind::Minus, Value::Float(value)) => Ok(Value::float(-value)),
        (ast::PrefixOperationKind::Bang, Value::Boolean(value)) => Ok(Value::boolean(!value)),
        _ => Err(Interrupt::Error(EvaluationError::PrefixTypeMismatch {
            operation: kind.clone(),
            operand: operand.clone(),
        })),
    }
}

fn eval_infix_operation(
    kind: &ast::InfixOperationKind,
    left: Gc<Value>,
    right: Gc<Value>,
) -> Result<Gc<Value>, Interrupt> {
    use ast::InfixOperationKind::*;
    match (kind, &*left, &*right) {
        (Plus, Value::Integer(l), Value::Integer(r)) => Ok(Value::integer(l + r)),
        (Plus, Value::Float(l), Value::Float(r)) => Ok(Value::float(l + r)),
        (Minus, Value::Integer(l), Value::Integer(r)) => Ok(Value::integer(l - r)),
        (Minus, Value::Float(l), Value::Float(r)) => Ok(Value::float(l - r)),
        (Multiply, Value::Integer(l), Value::Integer(r)) => Ok(Value::integer(l * r)),
        (Multiply, Value::Float(l), Value::Float(r)) => Ok(Value::float(l * r)),
        (Divide, Value::Integer(l), Value::Integer(r)) => {
            if r.is_zero() {
                return Err(EvaluationError::DivisionByZero.into());
            }
            Ok(Value::integer(l / r))
        }
        (Divide, Value::Float(l), Value::Float(r)) => {
            if *r == 0.0 {
                return Err(EvaluationError::DivisionByZero.into());
            }
            Ok(Value::float(l / r))
        }
        (Modulo, Value::Integer(l), Value::Integer(r)) => {
            if r.is_zero() {
                return Err(EvaluationError::DivisionByZero.into());
            }
            Ok(Value::integer(l % r))
        }
        (Modulo, Value::Float(l), Value::Float(r)) => {
            if *r == 0.0 {
                return Err(EvaluationError::DivisionByZero.into());
            }
            Ok(Value::float(l % r))
        }
        (Equal, Value::Integer(l), Value::Integer(r)) => Ok(Value::boolean(l == r)),
        (Equal, Value::Float(l), Value::Float(r)) => Ok(Value::boolean(l == r)),
        (Equal, Value::Boolean(l), Value::Boolean(r)) => Ok(Value::boolean(l == r)),
        (Equal, Value::String(l), Value::String(r)) => Ok(Value::boolean(l == r)),
        (Equal, Value::Null, Value::Null) => Ok(Value::boolean(true)),
        (NotEqual, Value::Integer(l), Value::Integer(r)) => Ok(Value::boolean(l != r)),
        (NotEqual, Value::Float(l), Value::Float(r)) => Ok(Value::boolean(l != r)),
        (NotEqual, Value::Boolean(l), Value::Boolean(r)) => Ok(Value::boolean(l != r)),
        (NotEqual, Value::String(l), Value::String(r)) => Ok(Value::boolean(l != r)),
        (NotEqual, Value::Null, Value::Null) => Ok(Value::boolean(false)),
        (LessThan, Value::Integer(l), Value::Integer(r)) => Ok(Value::boolean(l < r)),
        (LessThan, Value::Float(l), Value::Float(r)) => Ok(Value::boolean(l < r)),
        (GreaterThan, Value::Integer(l), Value::Integer(r)) => Ok(Value::boolean(l > r)),
        (GreaterThan, Value::Float(l), Value::Float(r)) => Ok(Value::boolean(l > r)),
        (And, Value::Boolean(l), Value::Boolean(r)) => Ok(Value::boolean(*l && *r)),
        (Or, Value::Boolean(l), Value::Boolean(r)) => Ok(Value::boolean(*l || *r)),
        _ => Err(Interrupt::Error(EvaluationError::TypeMismatch {
            operation: kind.clone(),
            left: left.clone(),
            right: right.clone(),
        })),
    }
}

fn eval_assignment(
    assignee: &ast::Expression,
    value: &ast::Expression,
    scope: &Scope,
) -> Result<Gc<Value>, Interrupt> {
    match assignee {
        ast::Expression::Identifier(identifier) => {
            let value = eval_expression(value, scope)?;
            scope.assign(&identifier.name, value.clone())?;
            Ok(value)
        }
        ast::Expression::Member { object, property } => {
            let target = eval_expression(object, scope)?;
            let Value::Object(fields) = &*target else {
                return Err(Interrupt::Error(EvaluationError::NotAnObject(
                    target.clone(),
                )));
            };
            let value = eval_expression(value, scope)?;
            fields
                .borrow_mut()
                .insert(property.name.to_string(), value.clone());
            Ok(value)
        }
        _ => Err(Interrupt::Error(EvaluationError::InvalidAssignee)),
    }
}

fn eval_object_literal(
    properties: &[ast::Property],
    scope: &Scope,
) -> Result<Gc<Value>, Interrupt> {
    let mut fields = HashMap::new();
    for property in properties {
        let value = match &property.value {
            Some(expression) => eval_expression(expression, scope)?,
            None => scope.lookup(&property.key.name)?,
        };
        fields.insert(property.key.name.to_string(), value);
    }
    Ok(Value::object(fields))
}

fn eval_member(object: Gc<Value>, property: &ast::Identifier) -> Result<Gc<Value>, Interrupt> {
    let Value::Object(fields) = &*object else {
        return Err(Interrupt::Error(EvaluationError::NotAnObject(
            object.clone(),
        )));
    };
    let value = fields.borrow().get(property.name.as_ref()).cloned();
    value.ok_or_else(|| Interrupt::Error(EvaluationError::MissingField(property.name.clone())))
}

fn eval_call(
    function: &ast::Expression,
    arguments: &[ast::Expression],
    scope: &Scope,
) -> Result<Gc<Value>, Interrupt> {
    let callee = eval_expression(function, scope)?;
    let mut args = Vec::with_capacity(arguments.len());
    for argument in arguments {
        args.push(eval_expression(argument, scope)?);
    }
    match &*callee {
        Value::Function(function) => apply_function(function, args),
        Value::NativeFunction(native) => (native.func)(args).map_err(Interrupt::Error),
        _ => Err(Interrupt::Error(EvaluationError::NotCallable(
            callee.clone(),
        ))),
    }
}

fn apply_function(function: &Function, arguments: Vec<Gc<Value>>) -> Result<Gc<Value>, Interrupt> {
    if function.parameters.len() != arguments.len() {
        return Err(Interrupt::Error(EvaluationError::ArityMismatch {
            expected: function.parameters.len(),
            actual: arguments.len(),
        }));
    }
    let call_scope = Scope::nested(&function.scope);
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        call_scope.declare(&parameter.name, argument)?;
    }
    // The body block nests one more scope under the parameter scope.
    match eval_block_statement(&function.body, &call_scope) {
        Ok(_) => Ok(Value::null()),
        Err(Interrupt::Return(value)) => Ok(value),
        Err(Interrupt::Error(error)) => Err(Interrupt::Error(error)),
    }
}
