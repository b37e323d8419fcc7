/**
 * Security Tests
 *
 * Security context classification across the elements a selector may match.
 */

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use template_binding::core::SecurityContext;
    use template_binding::schema::DomElementSchemaRegistry;
    use template_binding::template_parser::calc_possible_security_contexts;

    fn contexts(selector: &str, prop: &str, is_attribute: bool) -> Vec<SecurityContext> {
        let registry = DomElementSchemaRegistry::new();
        calc_possible_security_contexts(&registry, selector, prop, is_attribute).to_vec()
    }

    #[test]
    fn should_classify_by_element_name() {
        assert_eq!(contexts("a", "href", false), vec![SecurityContext::URL]);
        assert_eq!(contexts("link", "href", false), vec![SecurityContext::ResourceUrl]);
        assert_eq!(contexts("div", "title", false), vec![SecurityContext::NONE]);
    }

    #[test]
    fn should_union_over_selector_lists() {
        assert_eq!(
            contexts("a, link, div", "href", false),
            vec![SecurityContext::NONE, SecurityContext::URL, SecurityContext::ResourceUrl]
        );
    }

    #[test]
    fn should_consider_every_element_without_element_name() {
        let all = contexts("[href]", "href", false);
        assert_eq!(
            all,
            vec![SecurityContext::NONE, SecurityContext::URL, SecurityContext::ResourceUrl]
        );
        assert_eq!(contexts("", "href", false), all);
    }

    #[test]
    fn should_exclude_not_element_names() {
        let registry = DomElementSchemaRegistry::new().with_elements(["my-link"]);
        let ctxs = calc_possible_security_contexts(&registry, "my-link, a", "href", false);
        assert_eq!(ctxs.as_slice(), &[SecurityContext::NONE, SecurityContext::URL]);

        let ctxs = calc_possible_security_contexts(&registry, "[x]:not(a)", "src", false);
        assert!(ctxs.contains(&SecurityContext::URL));
        assert!(ctxs.contains(&SecurityContext::ResourceUrl));
    }

    #[test]
    fn should_map_attribute_names() {
        assert_eq!(contexts("button", "formaction", true), vec![SecurityContext::URL]);
        assert_eq!(contexts("div", "style", true), vec![SecurityContext::STYLE]);
    }

    #[test]
    fn should_fall_back_to_none_for_unparsable_selectors() {
        assert_eq!(contexts("a:not(:not(b))", "href", false), vec![SecurityContext::NONE]);
        assert_eq!(contexts("[x$]", "href", false), vec![SecurityContext::NONE]);
    }

    #[test]
    fn should_be_idempotent() {
        for (selector, prop) in [("a", "href"), ("", "src"), ("iframe, img", "src")] {
            assert_eq!(contexts(selector, prop, false), contexts(selector, prop, false));
        }
    }
}
