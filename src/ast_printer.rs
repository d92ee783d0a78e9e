use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::token::TokenType;

/// Renders syntax trees in a parenthesised prefix form for debugging, e.g.
/// `-123 * 123` becomes `(* (- 123) 123)`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print_expr(expr: &Expr) -> String {
        match expr {
            // ── literals ────────────────────────────────────────────────
            Expr::Literal(token) => match token.token_type {
                TokenType::STRING => format!("\"{}\"", token.lexeme),
                _ => token.lexeme.clone(),
            },

            Expr::Grouping(inner) => Self::parenthesize("#g", &[&**inner]),

            Expr::Unary { operator, right } => Self::parenthesize(&operator.lexeme, &[&**right]),

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => Self::parenthesize(&operator.lexeme, &[&**left, &**right]),

            Expr::Variable { name, .. } => name.lexeme.clone(),

            Expr::Assign { name, value, .. } => {
                Self::parenthesize(&format!("#as {} =", name.lexeme), &[&**value])
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let arguments: Vec<String> = arguments.iter().map(Self::print_expr).collect();

                format!(
                    "(#call-expr {}({}))",
                    Self::print_expr(callee),
                    arguments.join(", ")
                )
            }

            Expr::Return { keyword, value } => match value {
                Some(value) => Self::parenthesize(&keyword.lexeme, &[&**value]),
                None => format!("({})", keyword.lexeme),
            },
        }
    }

    pub fn print_stmt(stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => Self::parenthesize("#es", &[expr]),

            Stmt::Log(expr) => Self::parenthesize("#ls", &[expr]),

            Stmt::Var { name, initializer } => match initializer {
                Some(init) => Self::parenthesize(&format!("#vs {} =", name.lexeme), &[init]),
                None => format!("(#vs {})", name.lexeme),
            },

            Stmt::Block(statements) => {
                let mut s = String::from("(#bs");
                for stmt in statements {
                    s.push(' ');
                    s.push_str(&Self::print_stmt(stmt));
                }
                s.push(')');
                s
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut s = format!(
                    "(#is {} {}",
                    Self::print_expr(condition),
                    Self::print_stmt(then_branch)
                );
                if let Some(else_branch) = else_branch {
                    s.push(' ');
                    s.push_str(&Self::print_stmt(else_branch));
                }
                s.push(')');
                s
            }

            Stmt::While { condition, body } => format!(
                "(#ws {} {})",
                Self::print_expr(condition),
                Self::print_stmt(body)
            ),

            Stmt::Function(decl) => {
                let params: Vec<&str> = decl.params.iter().map(|p| p.lexeme.as_str()).collect();
                let body: Vec<String> = decl.body.iter().map(Self::print_stmt).collect();

                format!(
                    "(#fn-stmt {}({}) {{ {} }})",
                    decl.name.lexeme,
                    params.join(", "),
                    body.join("; ")
                )
            }
        }
    }

    fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
        let mut s = format!("({}", name);
        for expr in exprs {
            s.push(' ');
            s.push_str(&Self::print_expr(expr));
        }
        s.push(')');
        s
    }
}
