/**
 * Parallel Tests
 *
 * Binding many elements at once keeps input order for results and
 * diagnostics, and matches binding them one by one.
 */

#[path = "../utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{attrs, source_file};
    use pretty_assertions::assert_eq;
    use template_binding::template_parser::*;
    use template_binding::{BindingParserConfig, DomElementSchemaRegistry, ErrorSink, ExpressionParser};

    const TEMPLATE: &str = "<a [href]=\"url\" (click)=\"go()\"></a>\n\
                            <div [onclick]=\"x\" title=\"t\"></div>\n\
                            <input [(value)]=\"a + b\" disabled>";

    fn elements() -> Vec<ElementInput> {
        let file = source_file(TEMPLATE);
        (0..20)
            .flat_map(|_| {
                vec![
                    ElementInput::new("a", attrs(&file, &["[href]", "(click)"])),
                    ElementInput::new("div", attrs(&file, &["[onclick]", "title"])),
                    ElementInput::new("input", attrs(&file, &["[(value)]", "disabled"])),
                ]
            })
            .collect()
    }

    #[test]
    fn should_keep_input_order() {
        let adapter = ExpressionParser::new();
        let registry = DomElementSchemaRegistry::new();
        let config = BindingParserConfig::default();
        let elements = elements();

        let (bound, errors) = bind_elements(&adapter, &registry, &config, &elements);

        let selectors: Vec<&str> = bound.iter().map(|b| b.selector.as_str()).collect();
        let expected: Vec<&str> = elements.iter().map(|e| e.selector.as_str()).collect();
        assert_eq!(selectors, expected);

        let messages: Vec<&str> = errors.iter().map(|e| e.msg.as_str()).collect();
        assert_eq!(messages.len(), 40);
        assert!(messages[0].starts_with("Binding to event property 'onclick'"));
        assert_eq!(messages[1], "Unsupported expression in a two-way binding");
    }

    #[test]
    fn should_match_sequential_binding() {
        let adapter = ExpressionParser::new();
        let registry = DomElementSchemaRegistry::new();
        let config = BindingParserConfig::default();
        let elements = elements();

        let (parallel, parallel_errors) = bind_elements(&adapter, &registry, &config, &elements);

        let mut sequential_errors = ErrorSink::new();
        let sequential: Vec<BoundElement> = {
            let mut parser = BindingParser::new(&adapter, &registry, &config, &mut sequential_errors);
            elements
                .iter()
                .map(|element| parser.bind_element(&element.selector, &element.attrs))
                .collect()
        };

        assert_eq!(parallel, sequential);
        assert_eq!(parallel_errors, sequential_errors.into_vec());
    }

    #[test]
    fn should_handle_no_elements() {
        let adapter = ExpressionParser::new();
        let registry = DomElementSchemaRegistry::new();
        let (bound, errors) = bind_elements(&adapter, &registry, &BindingParserConfig::default(), &[]);
        assert!(bound.is_empty());
        assert!(errors.is_empty());
    }
}
