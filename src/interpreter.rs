use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Stdout, Write};
use std::rc::Rc;

use log::{debug, info};
use thiserror::Error;

use crate::callable::{Callable, NativeFunction};
use crate::environment::Environment;
use crate::error::{GluError, Result};
use crate::expr::{Expr, ExprId};
use crate::stack::ensure_sufficient_stack;
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Non-local exits while walking the tree.
///
/// `Return` is caught by the nearest call and `Error` by [`Interpreter::eval`];
/// neither is visible outside the crate.
#[derive(Debug, Error)]
pub(crate) enum Unwind {
    #[error("return signal from {keyword}")]
    Return { value: Value, keyword: Token },

    #[error(transparent)]
    Error(#[from] GluError),
}

type Exec<T> = std::result::Result<T, Unwind>;

/// Tree-walking evaluator.  `log` output goes to `W`.
pub struct Interpreter<W: Write = Stdout> {
    globals: Rc<RefCell<Environment>>,
    /// Hop distances recorded by the resolver; absent means global.
    locals: HashMap<ExprId, usize>,
    output: W,
}

impl Interpreter<Stdout> {
    /// Creates an interpreter that logs to stdout.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter writing `log` output to `output`, with the
    /// native functions already defined in its globals.
    pub fn with_output(output: W) -> Self {
        info!("Initializing Interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));

        debug!("Defining native function 'clock'");
        globals
            .borrow_mut()
            .define("clock", Value::Callable(Callable::native(NativeFunction::clock())));

        Self {
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    pub fn globals(&self) -> &Rc<RefCell<Environment>> {
        &self.globals
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Record that the variable node `id` binds `depth` scopes out.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        debug!("Noting local {:?} at depth {}", id, depth);
        self.locals.insert(id, depth);
    }

    /// Drop the hop distances of nodes that will never run again.
    pub fn forget<'a>(&mut self, ids: impl IntoIterator<Item = &'a ExprId>) {
        let before = self.locals.len();
        for id in ids {
            self.locals.remove(id);
        }
        debug!("Forgot {} local(s)", before - self.locals.len());
    }

    /// Run one top-level statement in the global scope.
    ///
    /// Expression statements produce their value, everything else `nil`.  A
    /// failing statement leaves the globals as they were at the point of
    /// failure and the interpreter stays usable.
    pub fn eval(&mut self, stmt: &Stmt) -> Result<Value> {
        let globals = Rc::clone(&self.globals);

        let result = match stmt {
            Stmt::Expression(expr) => self.evaluate(expr, &globals),
            other => self.execute(other, &globals).map(|()| Value::Nil),
        };

        Self::settle(result)
    }

    /// Evaluate a bare expression in the global scope.
    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        let globals = Rc::clone(&self.globals);
        let result = self.evaluate(expr, &globals);

        Self::settle(result)
    }

    fn settle(result: Exec<Value>) -> Result<Value> {
        match result {
            Ok(value) => Ok(value),
            Err(Unwind::Error(e)) => {
                debug!("Statement failed: {}", e);
                Err(e)
            }
            Err(Unwind::Return { keyword, .. }) => Err(GluError::runtime(
                &keyword,
                "Cannot return from top-level code.",
            )),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────

    fn execute(&mut self, stmt: &Stmt, env: &Rc<RefCell<Environment>>) -> Exec<()> {
        ensure_sufficient_stack(|| self.execute_stmt(stmt, env))
    }

    fn execute_stmt(&mut self, stmt: &Stmt, env: &Rc<RefCell<Environment>>) -> Exec<()> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr, env)?;
            }

            Stmt::Log(expr) => {
                let value = self.evaluate(expr, env)?;
                debug!("Logging value: {}", value);
                write!(self.output, "{}", value).map_err(GluError::from)?;
                self.output.flush().map_err(GluError::from)?;
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };
                env.borrow_mut().define(&name.lexeme, value);
            }

            Stmt::Block(statements) => {
                let scope = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(env))));
                self.execute_block(statements, scope)?;
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition, env)?.is_truthy() {
                    self.execute(then_branch, env)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, env)?;
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition, env)?.is_truthy() {
                    self.execute(body, env)?;
                }
            }

            Stmt::Function(decl) => {
                debug!("Defining function '{}'", decl.name.lexeme);
                let function = Callable::function(Rc::clone(decl), Rc::clone(env));
                env.borrow_mut()
                    .define(&decl.name.lexeme, Value::Callable(function));
            }
        }

        Ok(())
    }

    /// Run `statements` in `env`.  The caller's scope is untouched whichever
    /// way this returns.
    pub(crate) fn execute_block(
        &mut self,
        statements: &[Stmt],
        env: Rc<RefCell<Environment>>,
    ) -> Exec<()> {
        for stmt in statements {
            self.execute(stmt, &env)?;
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────

    fn evaluate(&mut self, expr: &Expr, env: &Rc<RefCell<Environment>>) -> Exec<Value> {
        ensure_sufficient_stack(|| self.evaluate_expr(expr, env))
    }

    fn evaluate_expr(&mut self, expr: &Expr, env: &Rc<RefCell<Environment>>) -> Exec<Value> {
        match expr {
            Expr::Literal(token) => Ok(Self::literal(token)?),

            Expr::Grouping(inner) => self.evaluate(inner, env),

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right, env)?;

                match (operator.token_type, right) {
                    (TokenType::BANG, right) => Ok(Value::Bool(!right.is_truthy())),
                    (TokenType::MINUS, Value::Number(n)) => Ok(Value::Number(-n)),
                    (TokenType::MINUS, _) => {
                        Err(GluError::runtime(operator, "Operand must be a number.").into())
                    }
                    _ => Err(GluError::runtime(operator, "Unknown unary operator.").into()),
                }
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left, env)?;
                let right = self.evaluate(right, env)?;

                Ok(Self::binary(operator, &left, &right)?)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left, env)?;

                let decided = match operator.token_type {
                    TokenType::OR => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                if decided {
                    Ok(left)
                } else {
                    self.evaluate(right, env)
                }
            }

            Expr::Variable { id, name } => Ok(self.look_up(*id, name, env)?),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value, env)?;

                match self.locals.get(id) {
                    Some(&distance) => Environment::assign_at(env, distance, name, value.clone())?,
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee, env)?;

                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument, env)?);
                }

                let Value::Callable(callable) = callee else {
                    return Err(GluError::runtime(paren, "Can only call functions.").into());
                };

                if values.len() != callable.arity() {
                    return Err(GluError::runtime(
                        paren,
                        format!(
                            "Expected {} arguments but got {}.",
                            callable.arity(),
                            values.len()
                        ),
                    )
                    .into());
                }

                callable.call(self, values, paren)
            }

            Expr::Return { keyword, value } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };

                debug!("Returning value: {}", value);

                Err(Unwind::Return {
                    value,
                    keyword: keyword.clone(),
                })
            }
        }
    }

    fn look_up(&self, id: ExprId, name: &Token, env: &Rc<RefCell<Environment>>) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(env, distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    /// Numeric literals keep their text until they are evaluated.
    fn literal(token: &Token) -> Result<Value> {
        match token.token_type {
            TokenType::NUMBER => token
                .lexeme
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|_| GluError::runtime(token, "Invalid number literal.")),
            TokenType::STRING => Ok(Value::String(token.lexeme.clone())),
            TokenType::TRUE => Ok(Value::Bool(true)),
            TokenType::FALSE => Ok(Value::Bool(false)),
            TokenType::NIL => Ok(Value::Nil),
            _ => Err(GluError::runtime(token, "Invalid literal.")),
        }
    }

    fn binary(operator: &Token, left: &Value, right: &Value) -> Result<Value> {
        match operator.token_type {
            TokenType::EQUAL_EQUAL => return Ok(Value::Bool(left.is_equal(right))),
            TokenType::BANG_EQUAL => return Ok(Value::Bool(!left.is_equal(right))),
            _ => {}
        }

        let (Value::Number(a), Value::Number(b)) = (left, right) else {
            return Err(GluError::runtime(operator, "Operands must both be numbers."));
        };

        let value = match operator.token_type {
            TokenType::PLUS => Value::Number(a + b),
            TokenType::MINUS => Value::Number(a - b),
            TokenType::STAR => Value::Number(a * b),
            TokenType::SLASH => Value::Number(a / b),
            TokenType::GREATER => Value::Bool(a > b),
            TokenType::GREATER_EQUAL => Value::Bool(a >= b),
            TokenType::LESS => Value::Bool(a < b),
            TokenType::LESS_EQUAL => Value::Bool(a <= b),
            _ => return Err(GluError::runtime(operator, "Unknown binary operator.")),
        };

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Source;

    fn token(token_type: TokenType, lexeme: &str) -> Token {
        Token::new(token_type, lexeme, Source::new("", 1, 0, lexeme.len()))
    }

    #[test]
    fn stray_return_becomes_a_runtime_error() {
        let mut interpreter = Interpreter::with_output(Vec::new());
        let stmt = Stmt::Expression(Expr::Return {
            keyword: token(TokenType::RETURN, "return"),
            value: None,
        });

        let err = interpreter.eval(&stmt).unwrap_err();

        assert_eq!(err.message(), Some("Cannot return from top-level code."));
    }

    #[test]
    fn globals_start_with_clock() {
        let interpreter = Interpreter::with_output(Vec::new());
        let clock = interpreter
            .globals()
            .borrow()
            .get(&token(TokenType::IDENTIFIER, "clock"))
            .unwrap();

        assert_eq!(clock.to_string(), "<native fn clock>");
    }

    #[test]
    fn top_level_locals_are_forgotten_after_each_run() {
        let mut interpreter = Interpreter::with_output(Vec::new());
        let report = interpreter.exec(
            "func counter() { var n = 0; func inc() { n = n + 1; return n; } return inc; } \
             var c = counter();",
        );
        assert!(report.is_ok());

        let retained = interpreter.locals.len();
        assert!(retained > 0);

        for _ in 0..10 {
            assert!(interpreter.exec("{ var a = 1; { a = a + 1; log a; } }").is_ok());
        }
        let rejected = interpreter.exec("{ var a = 1; log a; var a = 2; }");
        assert_eq!(rejected.resolve_errors.len(), 1);

        assert_eq!(interpreter.locals.len(), retained);
        assert_eq!(interpreter.exec("c(); c();").last_value(), Some(&Value::Number(2.0)));
    }

    #[test]
    fn number_literals_are_parsed_when_evaluated() {
        let value = Interpreter::<Vec<u8>>::literal(&token(TokenType::NUMBER, "12.5")).unwrap();

        assert_eq!(value, Value::Number(12.5));
    }
}
