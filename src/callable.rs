//! Callable values: user functions closing over their defining environment,
//! and natives implemented in Rust.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::environment::Environment;
use crate::error::GluError;
use crate::interpreter::{Interpreter, Unwind};
use crate::stmt::FunctionDecl;
use crate::token::Token;
use crate::value::Value;

/// Signature shared by all natives.  An `Err` becomes a runtime error at the
/// call site.
pub type NativeFn = fn(&[Value]) -> std::result::Result<Value, String>;

#[derive(Debug, Clone)]
pub enum Callable {
    Function(Rc<Function>),
    Native(Rc<NativeFunction>),
}

/// A user function paired with the environment that was current where it
/// was declared.
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: Rc<RefCell<Environment>>,
}

// The closure usually contains the function itself, so Debug stops here.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.declaration.name.lexeme)
            .field("arity", &self.declaration.params.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl NativeFunction {
    /// Wall-clock seconds since the Unix epoch, with millisecond resolution.
    pub fn clock() -> Self {
        NativeFunction {
            name: "clock",
            arity: 0,
            func: |_args: &[Value]| {
                let seconds: f64 = Utc::now().timestamp_millis() as f64 / 1000.0;
                debug!("Native 'clock' returned {}", seconds);
                Ok(Value::Number(seconds))
            },
        }
    }
}

impl Callable {
    pub fn function(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>) -> Self {
        Callable::Function(Rc::new(Function {
            declaration,
            closure,
        }))
    }

    pub fn native(native: NativeFunction) -> Self {
        Callable::Native(Rc::new(native))
    }

    pub fn name(&self) -> &str {
        match self {
            Callable::Function(function) => &function.declaration.name.lexeme,
            Callable::Native(native) => native.name,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Callable::Function(function) => function.declaration.params.len(),
            Callable::Native(native) => native.arity,
        }
    }

    /// Identity comparison.
    pub fn same(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Function(a), Callable::Function(b)) => Rc::ptr_eq(a, b),
            (Callable::Native(a), Callable::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Invoke with already evaluated arguments.  The caller has checked the
    /// arity.  A `return` inside the body ends here and becomes the result.
    pub(crate) fn call<W: Write>(
        &self,
        interpreter: &mut Interpreter<W>,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> std::result::Result<Value, Unwind> {
        match self {
            Callable::Native(native) => {
                debug!("Calling native '{}'", native.name);

                (native.func)(&arguments).map_err(|msg| Unwind::from(GluError::runtime(paren, msg)))
            }

            Callable::Function(function) => {
                debug!("Calling function '{}'", function.declaration.name.lexeme);

                let env = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
                    &function.closure,
                ))));

                for (param, argument) in function.declaration.params.iter().zip(arguments) {
                    env.borrow_mut().define(&param.lexeme, argument);
                }

                match interpreter.execute_block(&function.declaration.body, env) {
                    Ok(()) => Ok(Value::Nil),
                    Err(Unwind::Return { value, .. }) => {
                        info!(
                            "Function '{}' returned {}",
                            function.declaration.name.lexeme, value
                        );
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Function(_) => write!(f, "<fn {}>", self.name()),
            Callable::Native(_) => write!(f, "<native fn {}>", self.name()),
        }
    }
}
