//! The "execute this source text" entry point used by the REPL and the batch
//! runner.

use std::io::Write;

use log::{debug, info};

use crate::error::{GluError, Result};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::{Scanner, ScannerConfig};
use crate::value::Value;

/// Everything one call to [`Interpreter::exec`] produced.
#[derive(Debug, Default)]
pub struct Report {
    pub lex_errors: Vec<GluError>,
    pub parse_errors: Vec<GluError>,
    pub resolve_errors: Vec<GluError>,
    /// One entry per top-level statement, in order.  Empty whenever any
    /// diagnostic was reported, since nothing is run in that case.
    pub results: Vec<Result<Value>>,
}

impl Report {
    /// Lexical, parse and resolution errors in pipeline order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &GluError> {
        self.lex_errors
            .iter()
            .chain(&self.parse_errors)
            .chain(&self.resolve_errors)
    }

    pub fn has_diagnostics(&self) -> bool {
        self.diagnostics().next().is_some()
    }

    pub fn runtime_errors(&self) -> impl Iterator<Item = &GluError> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    pub fn is_ok(&self) -> bool {
        !self.has_diagnostics() && self.runtime_errors().next().is_none()
    }

    /// Value of the final statement, if it ran successfully.
    pub fn last_value(&self) -> Option<&Value> {
        self.results.last().and_then(|r| r.as_ref().ok())
    }
}

impl<W: Write> Interpreter<W> {
    /// Scan, parse, resolve and run `source`.
    pub fn exec(&mut self, source: &str) -> Report {
        self.exec_with(source, ScannerConfig::default())
    }

    pub fn exec_with(&mut self, source: &str, config: ScannerConfig) -> Report {
        info!("Executing {} byte(s) of source", source.len());

        let mut report = Report::default();

        let (tokens, lex_errors) = Scanner::with_config(source, config).scan_tokens();
        report.lex_errors = lex_errors;

        let (statements, parse_errors) = Parser::new(tokens).parse();
        report.parse_errors = parse_errors;

        if report.has_diagnostics() {
            debug!("Skipping resolution of a malformed program");
            return report;
        }

        let mut resolver = Resolver::new(self);
        let resolution = resolver.resolve(&statements);
        let (top_level, in_functions) = resolver.into_noted();

        if let Err(e) = resolution {
            self.forget(top_level.iter().chain(&in_functions));
            report.resolve_errors.push(e);
            return report;
        }

        // Each statement settles its own error so later ones still run.
        report.results = statements.iter().map(|stmt| self.eval(stmt)).collect();

        // Closures keep the distances noted inside function bodies.
        self.forget(&top_level);

        info!(
            "Executed {} statement(s), {} failed",
            report.results.len(),
            report.runtime_errors().count()
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_statements_report_their_value() {
        let mut interpreter = Interpreter::with_output(Vec::new());
        let report = interpreter.exec("var a = 1; a + 1;");

        assert!(report.is_ok());
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.last_value(), Some(&Value::Number(2.0)));
    }

    #[test]
    fn diagnostics_block_execution() {
        let mut interpreter = Interpreter::with_output(Vec::new());
        let report = interpreter.exec("log 1; log ;");

        assert_eq!(report.parse_errors.len(), 1);
        assert!(report.results.is_empty());
        assert!(interpreter.output().is_empty());
    }
}
