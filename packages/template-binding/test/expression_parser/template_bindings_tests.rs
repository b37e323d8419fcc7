/**
 * Template Bindings Tests
 *
 * Micro-syntax (`*key="..."`) parsing: keys, values and absolute spans.
 */

#[path = "../utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::unparser::unparse;
    use pretty_assertions::assert_eq;
    use template_binding::expression_parser::{ast::*, parser::Parser};

    fn parse(key: &str, value: &str, value_offset: usize) -> TemplateBindingParseResult {
        Parser::new().parse_template_bindings(key, value, "loc", 0, value_offset)
    }

    fn keys(result: &TemplateBindingParseResult) -> Vec<&str> {
        result
            .template_bindings
            .iter()
            .map(|binding| binding.key().source.as_str())
            .collect()
    }

    /// `key=value` for expressions, `let key=value` for variables.
    fn humanize(result: &TemplateBindingParseResult) -> Vec<String> {
        result
            .template_bindings
            .iter()
            .map(|binding| match binding {
                TemplateBinding::Variable(variable) => format!(
                    "let {}={}",
                    variable.key.source,
                    variable.value.as_ref().map_or("", |value| value.source.as_str())
                ),
                TemplateBinding::Expression(expression) => format!(
                    "{}={}",
                    expression.key.source,
                    expression.value.as_ref().map_or(String::new(), |value| unparse(&value.ast))
                ),
            })
            .collect()
    }

    #[test]
    fn should_bind_template_key_to_value() {
        let result = parse("ngIf", "cond", 6);
        assert!(result.errors.is_empty());
        assert_eq!(humanize(&result), vec!["ngIf=cond"]);
        assert_eq!(result.template_bindings[0].source_span(), AbsoluteSourceSpan::new(0, 10));
    }

    #[test]
    fn should_prefix_secondary_keys_with_template_key() {
        let result = parse("ngFor", "let item of items; index as i; trackBy: fn", 7);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(keys(&result), vec!["ngFor", "item", "ngForOf", "i", "ngForTrackBy"]);
        assert_eq!(
            humanize(&result),
            vec!["ngFor=", "let item=", "ngForOf=items", "let i=index", "ngForTrackBy=fn"]
        );
    }

    #[test]
    fn should_record_absolute_spans() {
        let result = parse("ngFor", "let item of items", 7);
        match &result.template_bindings[1] {
            TemplateBinding::Variable(variable) => {
                assert_eq!(variable.key.span, AbsoluteSourceSpan::new(11, 15));
                assert_eq!(variable.value, None);
            }
            other => panic!("unexpected binding {:?}", other),
        }
        match &result.template_bindings[2] {
            TemplateBinding::Expression(expression) => {
                let value = expression.value.as_ref().unwrap();
                assert_eq!(value.source.as_deref(), Some("items"));
                assert_eq!(value.absolute_offset, 19);
                assert_eq!(value.ast.source_span(), AbsoluteSourceSpan::new(19, 24));
            }
            other => panic!("unexpected binding {:?}", other),
        }
    }

    #[test]
    fn should_parse_let_with_explicit_value() {
        let result = parse("ngFor", "let item of items; let i = index", 0);
        assert_eq!(
            humanize(&result),
            vec!["ngFor=", "let item=", "ngForOf=items", "let i=index"]
        );
    }

    #[test]
    fn should_bind_as_alias_to_template_key() {
        let result = parse("ngIf", "user | async as u", 0);
        assert_eq!(humanize(&result), vec!["ngIf=(user | async)", "let u=ngIf"]);
    }

    #[test]
    fn should_keep_pipes_in_values() {
        let result = parse("ngFor", "let item of items | slice:1", 0);
        match &result.template_bindings[2] {
            TemplateBinding::Expression(expression) => {
                assert_eq!(
                    expression.value.as_ref().and_then(|value| value.source.as_deref()),
                    Some("items | slice:1")
                );
            }
            other => panic!("unexpected binding {:?}", other),
        }
    }

    #[test]
    fn should_accept_dashed_keys() {
        let result = parse("ngSwitch", "let a-b = c-d", 0);
        assert_eq!(humanize(&result), vec!["ngSwitch=", "let a-b=c-d"]);
    }

    #[test]
    fn should_report_missing_keys_without_looping() {
        let result = parse("ngFor", "let : ;", 0);
        assert!(!result.errors.is_empty());
        assert!(result.errors[0]
            .message
            .contains("expected identifier, keyword, or string"));
    }
}
