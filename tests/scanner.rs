#[cfg(test)]
mod scanner_tests {
    use glu::scanner::*;
    use glu::token::*;
    use pretty_assertions::assert_eq;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        let actual: Vec<(TokenType, &str)> = tokens
            .iter()
            .map(|t| (t.token_type, t.lexeme.as_str()))
            .collect();

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_character_operators() {
        assert_token_sequence(
            "! != = == > >= < <=",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "var logger = nil; func _f() { return true and false or x1; }",
            &[
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "logger"),
                (TokenType::EQUAL, "="),
                (TokenType::NIL, "nil"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::FUNC, "func"),
                (TokenType::IDENTIFIER, "_f"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::RETURN, "return"),
                (TokenType::TRUE, "true"),
                (TokenType::AND, "and"),
                (TokenType::FALSE, "false"),
                (TokenType::OR, "or"),
                (TokenType::IDENTIFIER, "x1"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_literals() {
        assert_token_sequence(
            "log \"hi there\" 12 3.25 // ignored",
            &[
                (TokenType::LOG, "log"),
                (TokenType::STRING, "hi there"),
                (TokenType::NUMBER, "12"),
                (TokenType::NUMBER, "3.25"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_05_escaped_whitespace() {
        let (tokens, errors) = Scanner::new("var a = 1;\\n\\tlog a;").scan_tokens();

        assert!(errors.is_empty());

        let log = tokens
            .iter()
            .find(|t| t.token_type == TokenType::LOG)
            .unwrap();
        assert_eq!(log.source.line, 2);
    }

    #[test]
    fn test_scanner_06_escaped_whitespace_can_be_disabled() {
        let config = ScannerConfig {
            escaped_whitespace: false,
            ..ScannerConfig::default()
        };
        let (_, errors) = Scanner::with_config("a \\n b", config).scan_tokens();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), Some("Unexpected character: \\."));
    }

    #[test]
    fn test_scanner_07_eof_is_optional() {
        let config = ScannerConfig {
            auto_eof: false,
            ..ScannerConfig::default()
        };
        let (tokens, _) = Scanner::with_config("1 + 2", config).scan_tokens();

        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|t| t.token_type != TokenType::EOF));
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let results: Vec<_> = Scanner::new(source).collect();

        // COMMA, DOT, error for '$', LEFT_PAREN, error for '#', EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let messages: Vec<_> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(|e| e.to_string())
            .collect();

        assert_eq!(
            messages,
            vec![
                "{1:2, Unexpected character: $.}".to_string(),
                "{1:4, Unexpected character: #.}".to_string(),
            ]
        );

        fn assert_token_matches(
            result: &glu::Result<Token>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(token.token_type, expected_type);
                    assert_eq!(token.lexeme, expected_lexeme);
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_unterminated_string_is_reported_at_its_start() {
        let config = ScannerConfig::with_origin("repl");
        let (tokens, errors) = Scanner::with_config("log 1;\nlog \"abc", config).scan_tokens();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "{repl:2:4, Unterminated string.}");

        // scanning carries on to the end
        assert_eq!(tokens.last().map(|t| t.token_type), Some(TokenType::EOF));
    }

    #[test]
    fn test_bad_escape_is_reported_and_skipped() {
        let (tokens, errors) = Scanner::new("1 \\q 2").scan_tokens();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), Some("Unexpected escape character: q."));
        assert_eq!(
            tokens.iter().map(|t| t.lexeme.as_str()).collect::<Vec<_>>(),
            vec!["1", "2", ""]
        );
    }

    #[test]
    fn test_multiline_string_keeps_lines_in_step() {
        let (tokens, _) = Scanner::new("\"a\nb\" x").scan_tokens();

        assert_eq!(tokens[0].lexeme, "a\nb");
        assert_eq!(tokens[0].source.length, 5);
        assert_eq!((tokens[1].source.line, tokens[1].source.column), (2, 3));
    }

    #[test]
    fn test_token_serializes_to_json() {
        let (tokens, _) = Scanner::new("log").scan_tokens();
        let json = serde_json::to_value(&tokens[0]).unwrap();

        assert_eq!(json["token_type"], "LOG");
        assert_eq!(json["lexeme"], "log");
        assert_eq!(json["source"]["line"], 1);
    }
}
