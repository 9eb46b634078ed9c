use std::fmt::Display;
use std::rc::Rc;

use num_bigint::BigInt;

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Var(VarStatement),
    Return(ReturnStatement),
    Expression(Expression),
    Block(BlockStatement),
    If(IfStatement),
}

#[derive(Debug, PartialEq, Clone)]
pub struct VarStatement {
    pub identifier: Identifier,
    pub value: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ReturnStatement {
    pub value: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct IfStatement {
    pub branches: Vec<IfBranch>,
    pub alternative: Option<BlockStatement>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct IfBranch {
    pub condition: Expression,
    pub block: BlockStatement,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(BigInt),
    FloatLiteral(f64),
    BooleanLiteral(bool),
    NullLiteral,
    StringLiteral(Rc<str>),
    PrefixOperation(PrefixOperationKind, Box<Expression>),
    InfixOperation(InfixOperationKind, Box<Expression>, Box<Expression>),
    Assignment {
        assignee: Box<Expression>,
        value: Box<Expression>,
    },
    ObjectLiteral(Vec<Property>),
    Member {
        object: Box<Expression>,
        property: Identifier,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    // The parameter list and body are shared with function values created
    // from this literal rather than cloned into them.
    FunctionLiteral {
        parameters: Rc<Vec<Identifier>>,
        body: Rc<BlockStatement>,
    },
}

/// One entry of an object literal. `value` is `None` for shorthand
/// properties, which resolve `key` as a variable at evaluation time.
#[derive(Debug, PartialEq, Clone)]
pub struct Property {
    pub key: Identifier,
    pub value: Option<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum InfixOperationKind {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    And,
    Or,
}

#[derive(Debug, PartialEq, Clone)]
pub enum PrefixOperationKind {
    Minus,
    Bang,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Identifier {
    pub name: Rc<str>,
}

#[derive(Debug)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl InfixOperationKind {
    pub fn to_str(&self) -> &'static str {
        use InfixOperationKind::*;
        match self {
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
            Equal => "==",
            NotEqual => "!=",
            LessThan => "<",
            GreaterThan => ">",
            And => "and",
            Or => "or",
        }
    }
}

impl PrefixOperationKind {
    pub fn to_str(&self) -> &'static str {
        use PrefixOperationKind::*;
        match self {
            Minus => "-",
            Bang => "!",
        }
    }
}

impl Display for VarStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "var {} = {};", self.identifier.name, self.value)
    }
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "return {};", self.value)
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", statement)?;
        }
        write!(f, "}}")
    }
}

impl Display for IfStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                write!(f, " else ")?;
            }
            write!(f, "if {} {}", branch.condition, branch.block)?;
        }
        if let Some(alternative) = &self.alternative {
            write!(f, " else {}", alternative)?;
        }
        Ok(())
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expression::*;
        match self {
            Identifier(ident) => write!(f, "{}", ident.name),
            IntegerLiteral(val) => write!(f, "{}", val),
            FloatLiteral(val) => write!(f, "{:?}", val),
            BooleanLiteral(val) => write!(f, "{}", val),
            NullLiteral => write!(f, "null"),
            StringLiteral(val) => write!(f, "\"{}\"", val),
            PrefixOperation(kind, operand) => write!(f, "({}{})", kind.to_str(), operand),
            InfixOperation(kind, left, right) => {
                write!(f, "({} {} {})", left, kind.to_str(), right)
            }
            Assignment { assignee, value } => write!(f, "({} = {})", assignee, value),
            ObjectLiteral(properties) => {
                write!(f, "{{")?;
                for (i, property) in properties.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match &property.value {
                        Some(value) => write!(f, "{}: {}", property.key.name, value)?,
                        None => write!(f, "{}", property.key.name)?,
                    }
                }
                write!(f, "}}")
            }
            Member { object, property } => write!(f, "{}.{}", object, property.name),
            Call {
                function,
                arguments,
            } => {
                write!(
                    f,
                    "{}({})",
                    function,
                    arguments
                        .iter()
                        .map(|arg| arg.to_string())
                        .collect::<Vec<String>>()
                        .join(", ")
                )
            }
            FunctionLiteral { parameters, body } => {
                write!(
                    f,
                    "fn({}) {}",
                    parameters
                        .iter()
                        .map(|id| id.name.as_ref())
                        .collect::<Vec<&str>>()
                        .join(", "),
                    body
                )
            }
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;
        match self {
            Var(statement) => write!(f, "{}", statement),
            Return(statement) => write!(f, "{}", statement),
            Expression(expression) => write!(f, "{};", expression),
            Block(block) => write!(f, "{}", block),
            If(statement) => write!(f, "{}", statement),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}
