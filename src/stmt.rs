use std::rc::Rc;

use crate::expr::Expr;
use crate::token::Token;

/// A function declaration.  Shared behind an `Rc` so every closure created from
/// it points at the same body instead of copying the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(Expr),

    Log(Expr),

    Var {
        name: Token,
        initializer: Option<Expr>,
    },

    /// Owns a child scope for its statements.
    Block(Vec<Stmt>),

    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// Also the target of `for` loops, which the parser lowers.
    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    Function(Rc<FunctionDecl>),
}
