use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::error::{GluError, Result};
use crate::token::Token;
use crate::value::Value;

/// One lexical scope at runtime.  Scopes only point upwards, to the scope
/// they were created in.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Insert or overwrite `name` in this scope.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("Defining '{}' = {}", name, value);
        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up along the whole chain.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Overwrite the nearest binding of `name`.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }

    /// Read `name` from the scope exactly `distance` links up from `env`.
    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &Token) -> Result<Value> {
        let scope = Self::ancestor(env, distance, name)?;
        let value = scope.borrow().values.get(&name.lexeme).cloned();

        value.ok_or_else(|| misresolved(name, distance))
    }

    /// Overwrite `name` in the scope exactly `distance` links up from `env`.
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &Token,
        value: Value,
    ) -> Result<()> {
        let scope = Self::ancestor(env, distance, name)?;
        let mut scope = scope.borrow_mut();

        match scope.values.get_mut(&name.lexeme) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(misresolved(name, distance)),
        }
    }

    fn ancestor(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &Token,
    ) -> Result<Rc<RefCell<Environment>>> {
        let mut scope = Rc::clone(env);

        for _ in 0..distance {
            let parent = scope.borrow().enclosing.clone();
            scope = parent.ok_or_else(|| misresolved(name, distance))?;
        }

        Ok(scope)
    }
}

fn undefined(name: &Token) -> GluError {
    GluError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
}

fn misresolved(name: &Token, distance: usize) -> GluError {
    GluError::runtime(
        name,
        format!(
            "Variable '{}' is not bound {} scope(s) up.",
            name.lexeme, distance
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Source, TokenType};

    fn ident(name: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, name, Source::new("", 1, 0, name.len()))
    }

    #[test]
    fn lookup_walks_the_parent_chain() {
        let globals = Rc::new(RefCell::new(Environment::new()));
        globals.borrow_mut().define("a", Value::Number(1.0));

        let inner = Environment::with_enclosing(Rc::clone(&globals));

        assert_eq!(inner.get(&ident("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assignment_updates_the_nearest_binding() {
        let globals = Rc::new(RefCell::new(Environment::new()));
        globals.borrow_mut().define("a", Value::Number(1.0));

        let mut inner = Environment::with_enclosing(Rc::clone(&globals));
        inner.assign(&ident("a"), Value::Number(2.0)).unwrap();

        assert_eq!(globals.borrow().get(&ident("a")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn missing_name_is_an_undefined_variable_error() {
        let env = Environment::new();
        let err = env.get(&ident("nope")).unwrap_err();

        assert_eq!(err.message(), Some("Undefined variable 'nope'."));
        assert_eq!(err.token().map(|t| t.lexeme.as_str()), Some("nope"));
    }

    #[test]
    fn get_at_reads_exactly_the_requested_scope() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer.borrow_mut().define("a", Value::Number(1.0));
        let inner = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(&outer))));
        inner.borrow_mut().define("a", Value::Number(2.0));

        assert_eq!(Environment::get_at(&inner, 0, &ident("a")).unwrap(), Value::Number(2.0));
        assert_eq!(Environment::get_at(&inner, 1, &ident("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn walking_past_the_root_is_reported() {
        let env = Rc::new(RefCell::new(Environment::new()));
        env.borrow_mut().define("a", Value::Nil);

        assert!(Environment::get_at(&env, 3, &ident("a")).is_err());
        assert!(Environment::assign_at(&env, 0, &ident("b"), Value::Nil).is_err());
    }
}
