use std::fmt::{Display, Formatter};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonOperator {
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
}

impl ComparisonOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Greater => ">",
            ComparisonOperator::Less => "<",
            ComparisonOperator::GreaterEqual => ">=",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(i64),
    String(String),

    Variable(String),

    Binary {
        left: Box<Expr>,
        operator: BinaryOperator,
        right: Box<Expr>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expr>,
    },
    // Separate from `Binary`: always evaluates to a boolean
    Comparison {
        left: Box<Expr>,
        operator: ComparisonOperator,
        right: Box<Expr>,
    },

    Call {
        name: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `have name = value`; declares or silently overwrites `name`.
    Assign {
        name: String,
        value: Expr,
    },
    /// `say value`
    Print(Expr),

    If {
        condition: Expr,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
    },
    /// `repeat (condition) { body }`, a while loop.
    Repeat {
        condition: Expr,
        body: Vec<Stmt>,
    },

    Function(Rc<FunctionDef>),
    Return(Option<Expr>),
}

pub type Program = Vec<Stmt>;

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Number(value) => write!(f, "{}", value),
            Expr::String(value) => write!(f, "{:?}", value),
            Expr::Variable(name) => f.write_str(name),
            Expr::Binary { left, operator, right } => write!(f, "({} {} {})", left, operator.symbol(), right),
            Expr::Unary { operator: UnaryOperator::Not, operand } => write!(f, "(not {})", operand),
            Expr::Comparison { left, operator, right } => write!(f, "({} {} {})", left, operator.symbol(), right),
            Expr::Call { name, args } => write!(f, "{}({})", name,
                                                args.iter().map(|arg| arg.to_string()).collect::<Vec<String>>().join(", ")),
        }
    }
}

fn write_block(f: &mut Formatter<'_>, block: &[Stmt]) -> std::fmt::Result {
    if block.is_empty() {
        return f.write_str("{}");
    }

    write!(f, "{{ {} }}", block.iter().map(|stmt| stmt.to_string()).collect::<Vec<String>>().join(" "))
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Assign { name, value } => write!(f, "have {} = {}", name, value),
            Stmt::Print(value) => write!(f, "say {}", value),
            Stmt::If { condition, then_block, else_block } => {
                write!(f, "if ({}) ", condition)?;
                write_block(f, then_block)?;

                if let Some(else_block) = else_block {
                    f.write_str(" else ")?;
                    write_block(f, else_block)?;
                }

                Ok(())
            },
            Stmt::Repeat { condition, body } => {
                write!(f, "repeat ({}) ", condition)?;
                write_block(f, body)
            },
            Stmt::Function(function) => {
                write!(f, "func {}({}) ", function.name, function.params.join(", "))?;
                write_block(f, &function.body)
            },
            Stmt::Return(Some(value)) => write!(f, "return {}", value),
            Stmt::Return(None) => f.write_str("return"),
        }
    }
}
