use std::sync::atomic::{AtomicUsize, Ordering};

use crate::token::Token;

/// Identity of a variable‑reference or assignment node.
///
/// The resolver records binding distances against this id and the interpreter
/// looks them up again at runtime.  Ids come from a process‑wide counter so
/// that trees parsed at different times (e.g. successive REPL lines feeding
/// one interpreter) never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(usize);

static NEXT_EXPR_ID: AtomicUsize = AtomicUsize::new(0);

impl ExprId {
    pub fn fresh() -> Self {
        ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal constant.  The token keeps its category (`NUMBER`, `STRING`,
    /// `TRUE`, `FALSE`, `NIL`) and raw lexeme so later passes can tell the
    /// kinds apart without re‑lexing.
    Literal(Token),

    /// Parenthesised sub‑expression.
    Grouping(Box<Expr>),

    /// Prefix `!` or `-`.
    Unary { operator: Token, right: Box<Expr> },

    /// Infix arithmetic, comparison or equality operator.
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    /// Short‑circuiting `and` / `or`.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    /// Read of a named variable.
    Variable { id: ExprId, name: Token },

    /// `name = value`
    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },

    /// Call of any callee expression with one argument list.
    Call {
        callee: Box<Expr>,
        /// The closing `)` token, retained for error reporting.
        paren: Token,
        arguments: Vec<Expr>,
    },

    /// `return` with an optional value; leaves the nearest enclosing call.
    Return {
        keyword: Token,
        value: Option<Box<Expr>>,
    },
}

impl Expr {
    pub fn variable(name: Token) -> Self {
        Expr::Variable {
            id: ExprId::fresh(),
            name,
        }
    }

    pub fn assign(name: Token, value: Expr) -> Self {
        Expr::Assign {
            id: ExprId::fresh(),
            name,
            value: Box::new(value),
        }
    }

    /// The token most representative of this expression, for diagnostics.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Literal(token) => token,
            Expr::Grouping(expr) => expr.token(),
            Expr::Unary { operator, .. } => operator,
            Expr::Binary { operator, .. } => operator,
            Expr::Logical { operator, .. } => operator,
            Expr::Variable { name, .. } => name,
            Expr::Assign { name, .. } => name,
            Expr::Call { paren, .. } => paren,
            Expr::Return { keyword, .. } => keyword,
        }
    }
}
