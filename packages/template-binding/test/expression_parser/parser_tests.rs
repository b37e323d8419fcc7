/**
 * Parser Tests
 *
 * Binding, action, host and interpolation grammars of the default
 * expression parser, checked through the unparser.
 */

#[path = "../utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::unparser::unparse;
    use pretty_assertions::assert_eq;
    use template_binding::expression_parser::{ast::*, parser::Parser};
    use template_binding::ml_parser::InterpolationConfig;

    fn config() -> InterpolationConfig {
        InterpolationConfig::default()
    }

    fn parse_action(text: &str) -> ASTWithSource {
        Parser::new().parse_action(text, false, "loc", 0, &config())
    }

    fn parse_binding(text: &str) -> ASTWithSource {
        Parser::new().parse_binding(text, "loc", 0, &config())
    }

    fn check_action(exp: &str, expected: Option<&str>) {
        let parsed = parse_action(exp);
        assert!(parsed.errors.is_empty(), "unexpected errors: {:?}", parsed.errors);
        assert_eq!(unparse(&parsed.ast), expected.unwrap_or(exp));
    }

    fn check_binding(exp: &str, expected: Option<&str>) {
        let parsed = parse_binding(exp);
        assert!(parsed.errors.is_empty(), "unexpected errors: {:?}", parsed.errors);
        assert_eq!(unparse(&parsed.ast), expected.unwrap_or(exp));
    }

    fn expect_error(parsed: &ASTWithSource, fragment: &str) {
        assert!(
            parsed.errors.iter().any(|e| e.message.contains(fragment)),
            "expected an error containing '{}', got: {:?}",
            fragment,
            parsed.errors
        );
    }

    mod parse_action_tests {
        use super::*;

        #[test]
        fn should_parse_literals() {
            check_action("1", None);
            check_action("'1'", Some("\"1\""));
            check_action("null", None);
            check_action("undefined", None);
            check_action("true", None);
        }

        #[test]
        fn should_parse_unary_and_prefix_not() {
            check_action("-1", None);
            check_action("!true", None);
            check_action("!!a", None);
        }

        #[test]
        fn should_parse_non_null_assert() {
            check_action("a!", None);
            check_action("a!.b", None);
        }

        #[test]
        fn should_parse_property_writes() {
            check_action("a = 1", None);
            check_action("a.b = c", None);
            check_action("a[0] = b", None);
        }

        #[test]
        fn should_parse_chains() {
            check_action("a = 1; b = 2", Some("a = 1; b = 2;"));
            check_action("a();; b()", Some("a(); b();"));
        }

        #[test]
        fn should_parse_calls_with_arguments() {
            check_action("submit($event, 'x')", Some("submit($event, \"x\")"));
            check_action("a?.b()", None);
        }

        #[test]
        fn should_reject_pipes() {
            let parsed = parse_action("a | b");
            expect_error(&parsed, "Cannot have a pipe in an action expression");
        }

        #[test]
        fn should_reject_chains_in_assignment_events() {
            let parsed = Parser::new().parse_action("a = $event; b()", true, "loc", 0, &config());
            expect_error(&parsed, "Binding expression cannot contain chained expression");
        }

        #[test]
        fn should_parse_empty_input_as_empty_expr() {
            let parsed = parse_action("   ");
            assert!(parsed.ast.is_empty_expr());
            assert!(parsed.errors.is_empty());
        }
    }

    mod parse_binding_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_parse_property_access() {
            check_binding("a.b.c", None);
            check_binding("a?.b", None);
            check_binding("a[b]", None);
            check_binding("a?.[0]", None);
        }

        #[test]
        fn should_parse_operators() {
            check_binding("a + b * c", None);
            check_binding("a && b || c", None);
            check_binding("a ?? b", None);
            check_binding("a === b", None);
        }

        #[test]
        fn should_parse_conditionals() {
            check_binding("a ? b : c", None);
        }

        #[test]
        fn should_parse_pipes() {
            check_binding("a | upper", Some("(a | upper)"));
            check_binding("a | slice:1:2", Some("(a | slice:1:2)"));
            check_binding("a | b | c", Some("((a | b) | c)"));
        }

        #[test]
        fn should_parse_literal_collections() {
            check_binding("[1, 2]", None);
            check_binding("{a: 1, 'b': c}", Some("{a: 1, \"b\": c}"));
        }

        #[test]
        fn should_strip_trailing_comments() {
            check_binding("a // comment", Some("a"));
            check_binding("'http://x'", Some("\"http://x\""));
        }

        #[test]
        fn should_report_assignments() {
            let parsed = parse_binding("a = 1");
            assert_eq!(
                parsed.errors[0].message,
                "Parser Error: Bindings cannot contain assignments at column 5 in [a = 1] in loc"
            );
            assert!(parsed.ast.is_empty_expr());
        }

        #[test]
        fn should_report_chains() {
            expect_error(&parse_binding("a; b"), "Binding expression cannot contain chained expression");
        }

        #[test]
        fn should_report_unexpected_tokens() {
            let parsed = parse_binding("a b");
            assert_eq!(
                parsed.errors[0].message,
                "Parser Error: Unexpected token 'b' at column 3 in [a b] in loc"
            );
            assert_eq!(unparse(&parsed.ast), "a");
        }

        #[test]
        fn should_report_incomplete_conditionals() {
            expect_error(&parse_binding("a ? b"), "Conditional expression a ? b requires all 3 expressions");
        }

        #[test]
        fn should_report_empty_key_access() {
            expect_error(&parse_binding("a[]"), "Key access cannot be empty");
        }

        #[test]
        fn should_report_interpolation_in_binding() {
            expect_error(
                &parse_binding("{{a}}"),
                "Got interpolation ({{}}) where expression was expected at column 0 in",
            );
        }

        #[test]
        fn should_report_private_identifiers() {
            expect_error(&parse_binding("#a"), "Private identifiers are not supported");
        }

        #[test]
        fn should_record_absolute_spans() {
            let parsed = Parser::new().parse_binding("a.b", "loc", 10, &config());
            match &parsed.ast {
                AST::PropertyRead(read) => {
                    assert_eq!(read.source_span, AbsoluteSourceSpan::new(10, 13));
                    assert_eq!(read.name_span, AbsoluteSourceSpan::new(12, 13));
                }
                other => panic!("unexpected ast {:?}", other),
            }
            assert_eq!(parsed.source.as_deref(), Some("a.b"));
            assert_eq!(parsed.absolute_offset, 10);
        }
    }

    mod parse_simple_binding_tests {
        use super::*;

        #[test]
        fn should_accept_plain_expressions() {
            let parsed = Parser::new().parse_simple_binding("a.b", "host", 0, &config());
            assert!(parsed.errors.is_empty());
        }

        #[test]
        fn should_reject_pipes() {
            let parsed = Parser::new().parse_simple_binding("a | b", "host", 0, &config());
            expect_error(&parsed, "Host binding expression cannot contain pipes");
        }
    }

    mod interpolation_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        fn parse_interpolation(text: &str) -> Option<ASTWithSource> {
            Parser::new().parse_interpolation(text, "loc", 0, &config())
        }

        #[test]
        fn should_return_none_without_interpolation() {
            assert!(parse_interpolation("plain text").is_none());
            assert!(parse_interpolation("a {{ b").is_none());
        }

        #[test]
        fn should_parse_text_and_expressions() {
            let parsed = parse_interpolation("Hi {{ name }}!").unwrap();
            assert!(parsed.errors.is_empty());
            assert_eq!(unparse(&parsed.ast), "Hi {{ name }}!");
            match &parsed.ast {
                AST::Interpolation(interpolation) => {
                    assert_eq!(interpolation.strings, vec!["Hi ".to_string(), "!".to_string()]);
                    assert_eq!(interpolation.expressions[0].source_span(), AbsoluteSourceSpan::new(6, 10));
                }
                other => panic!("unexpected ast {:?}", other),
            }
        }

        #[test]
        fn should_ignore_closing_marker_in_quotes() {
            let parsed = parse_interpolation("{{ '}}' }}").unwrap();
            assert!(parsed.errors.is_empty());
            assert_eq!(unparse(&parsed.ast), "{{ \"}}\" }}");
        }

        #[test]
        fn should_report_blank_expressions() {
            let parsed = parse_interpolation("a {{ }}").unwrap();
            expect_error(&parsed, "Blank expressions are not allowed in interpolated strings");
        }

        #[test]
        fn should_honor_custom_delimiters() {
            let config = InterpolationConfig::new("[[", "]]");
            let parsed = Parser::new().parse_interpolation("[[ a ]]", "loc", 0, &config).unwrap();
            assert!(parsed.errors.is_empty());
            assert!(Parser::new().parse_interpolation("{{ a }}", "loc", 0, &config).is_none());
        }

        #[test]
        fn should_wrap_whole_input_as_interpolation_expression() {
            let parsed = Parser::new().parse_interpolation_expression("a + b", "loc", 3);
            match &parsed.ast {
                AST::Interpolation(interpolation) => {
                    assert_eq!(interpolation.strings, vec![String::new(), String::new()]);
                    assert_eq!(unparse(&interpolation.expressions[0]), "a + b");
                }
                other => panic!("unexpected ast {:?}", other),
            }
        }
    }

    mod wrap_literal_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_wrap_strings_and_null() {
            let parsed = Parser::new().wrap_literal_primitive(Some("ERROR"), "loc", 4);
            assert_eq!(unparse(&parsed.ast), "\"ERROR\"");
            assert_eq!(parsed.ast.source_span(), AbsoluteSourceSpan::new(4, 9));

            let parsed = Parser::new().wrap_literal_primitive(None, "loc", 0);
            assert_eq!(unparse(&parsed.ast), "null");
            assert_eq!(parsed.source, None);
        }
    }
}
