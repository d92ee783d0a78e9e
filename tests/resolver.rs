#[cfg(test)]
mod resolver_tests {
    use glu::error::GluError;
    use glu::interpreter::Interpreter;
    use glu::parser::Parser;
    use glu::resolver::Resolver;
    use glu::scanner::Scanner;
    use pretty_assertions::assert_eq;

    fn resolve(source: &str) -> Result<(), GluError> {
        let (tokens, _) = Scanner::new(source).scan_tokens();
        let (statements, errors) = Parser::new(tokens).parse();
        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);

        let mut interpreter = Interpreter::with_output(Vec::new());
        Resolver::new(&mut interpreter).resolve(&statements)
    }

    fn resolve_err(source: &str) -> GluError {
        match resolve(source) {
            Ok(()) => panic!("{:?} resolved without error", source),
            Err(e) => e,
        }
    }

    #[test]
    fn test_duplicate_declaration_in_one_block_is_an_error() {
        let err = resolve_err("{ var a = 1; var a = 2; }");

        assert!(matches!(err, GluError::Resolve { .. }));
        assert_eq!(
            err.message(),
            Some("Variable with this name already declared in this scope.")
        );
        assert_eq!(err.token().map(|t| t.source.column), Some(17));
    }

    #[test]
    fn test_redeclaring_in_a_nested_block_is_legal() {
        assert!(resolve("{ var a = 1; { var a = 2; } }").is_ok());
    }

    #[test]
    fn test_globals_may_be_redeclared() {
        assert!(resolve("var a = 1; var a = 2;").is_ok());
    }

    #[test]
    fn test_parameters_share_the_body_scope() {
        let err = resolve_err("func f(a) { var a = 1; }");

        assert_eq!(
            err.message(),
            Some("Variable with this name already declared in this scope.")
        );
    }

    #[test]
    fn test_reading_a_local_in_its_own_initializer() {
        let err = resolve_err("var a = 1; { var a = a; }");

        assert_eq!(
            err.message(),
            Some("Cannot read local variable in its own initializer.")
        );
    }

    #[test]
    fn test_return_at_top_level_is_a_resolution_error() {
        let err = resolve_err("log 1; return 2;");

        assert!(matches!(err, GluError::Resolve { .. }));
        assert_eq!(err.message(), Some("Cannot return from top-level code."));
        assert_eq!(err.token().map(|t| t.lexeme.as_str()), Some("return"));
    }

    #[test]
    fn test_return_inside_nested_block_of_a_function_is_fine() {
        assert!(resolve("func f() { if (true) { return 1; } return; }").is_ok());
    }
}
