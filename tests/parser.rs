#[cfg(test)]
mod parser_tests {
    use glu::ast_printer::AstPrinter;
    use glu::error::GluError;
    use glu::parser::Parser;
    use glu::scanner::Scanner;
    use glu::stmt::Stmt;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> (Vec<Stmt>, Vec<GluError>) {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        assert!(errors.is_empty(), "unexpected lexical errors: {:?}", errors);

        Parser::new(tokens).parse()
    }

    fn print_expr(source: &str) -> String {
        let (tokens, _) = Scanner::new(source).scan_tokens();
        let expr = Parser::new(tokens)
            .parse_expression()
            .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e));

        AstPrinter::print_expr(&expr)
    }

    fn print_program(source: &str) -> Vec<String> {
        let (statements, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);

        statements.iter().map(AstPrinter::print_stmt).collect()
    }

    fn messages(errors: &[GluError]) -> Vec<&str> {
        errors.iter().filter_map(GluError::message).collect()
    }

    #[test]
    fn test_unary_binds_tighter_than_factor() {
        assert_eq!(print_expr("-123 * 123"), "(* (- 123) 123)");
    }

    #[test]
    fn test_precedence_levels() {
        assert_eq!(print_expr("1 + 2 * 3 - 4"), "(- (+ 1 (* 2 3)) 4)");
        assert_eq!(print_expr("1 < 2 == true"), "(== (< 1 2) true)");
        assert_eq!(print_expr("a or b and !c"), "(or a (and b (! c)))");
        assert_eq!(print_expr("(1 + 2) / 3"), "(/ (#g (+ 1 2)) 3)");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(print_expr("a = b = 1"), "(#as a = (#as b = 1))");
    }

    #[test]
    fn test_calls_chain_and_take_any_arguments() {
        assert_eq!(print_expr("f(1, \"s\")(x)"), "(#call-expr (#call-expr f(1, \"s\"))(x))");
        assert_eq!(print_expr("clock()"), "(#call-expr clock())");
    }

    #[test]
    fn test_statement_forms() {
        assert_eq!(
            print_program(
                "var a; var b = nil; log a; \
                 if (a) log 1; else { b; } \
                 while (false) log 2; \
                 func add(x, y) { return x + y; log x; }"
            ),
            vec![
                "(#vs a)",
                "(#vs b = nil)",
                "(#ls a)",
                "(#is a (#ls 1) (#bs (#es b)))",
                "(#ws false (#ls 2))",
                "(#fn-stmt add(x, y) { (#es (return (+ x y))); (#ls x) })",
            ]
        );
    }

    #[test]
    fn test_for_is_lowered_to_while() {
        assert_eq!(
            print_program("for (var i = 0; i < 10; i = i + 1) { log i; }"),
            vec!["(#bs (#vs i = 0) (#ws (< i 10) (#bs (#bs (#ls i)) (#es (#as i = (+ i 1))))))"]
        );
    }

    #[test]
    fn test_for_without_clauses_loops_on_true() {
        assert_eq!(print_program("for (;;) log 1;"), vec!["(#ws true (#ls 1))"]);
    }

    #[test]
    fn test_return_outside_function_parses() {
        let (statements, errors) = parse("return 1;");

        assert!(errors.is_empty());
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_every_malformed_statement_is_reported() {
        let (statements, errors) = parse("var = 1; log 2; log ; var c = 3;");

        assert_eq!(
            messages(&errors),
            vec!["Expected variable name.", "Token failed to match any rule."]
        );
        assert_eq!(
            statements.iter().map(AstPrinter::print_stmt).collect::<Vec<_>>(),
            vec!["(#ls 2)", "(#vs c = 3)"]
        );
    }

    #[test]
    fn test_error_is_tagged_with_the_current_token() {
        let (_, errors) = parse("log 1\nlog 2;");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "{log 'log' 2:0, Expected ';' after value.}");
    }

    #[test]
    fn test_delimiter_messages() {
        let cases = [
            ("(1 + 2;", "Expected ')' after expression."),
            ("{ log 1;", "Expected '}' after block."),
            ("f(1;", "Expected ')' after arguments."),
            ("if 1) log 1;", "Expected '(' after if condition."),
            ("if (1 log 1;", "Expected ')' after if condition."),
            ("while true) log 1;", "Expected '(' after while."),
            ("while (true log 1;", "Expected ')' after while."),
            ("for var i = 0; i < 1;) {}", "Expected '(' after 'for'."),
            ("for (;; log 1;", "Expected ')' after if condition."),
            ("for (var i = 0; i < 1 i = i + 1) {}", "Expected ';' after loop condition."),
            ("func (a) {}", "Expected kind function."),
            ("func f a) {}", "Expected '(' after kind function."),
            ("func f(a,) {}", "Expected parameter name."),
            ("func f(a {}", "Expected ')' after arguments."),
            ("func f(a) log a;", "Expected '{' before kind function body."),
            ("var a = 1", "Expected ';' after variable declaration."),
            ("1 + 1", "Expected ';' after expression."),
        ];

        for (source, expected) in cases {
            let (_, errors) = parse(source);
            assert_eq!(messages(&errors).first().copied(), Some(expected), "{}", source);
        }
    }

    #[test]
    fn test_deeply_nested_source_parses() {
        let depth = 2_000;
        let grouped = format!("log {}1{};", "(".repeat(depth), ")".repeat(depth));
        let negated = format!("log {}1;", "-".repeat(depth));
        let blocks = format!("{}log 1;{}", "{".repeat(depth), "}".repeat(depth));

        for source in [grouped, negated, blocks] {
            let (statements, errors) = parse(&source);

            assert!(errors.is_empty(), "{:?}", errors.first());
            assert_eq!(statements.len(), 1);
        }
    }

    #[test]
    fn test_single_expression_must_fill_the_input() {
        let (tokens, _) = Scanner::new("1 2").scan_tokens();
        let err = Parser::new(tokens).parse_expression().unwrap_err();

        assert_eq!(err.message(), Some("Expected end of input after expression."));
    }
}
