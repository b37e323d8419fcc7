/**
 * DOM Element Schema Registry Tests
 *
 * Security contexts, property name mapping and event-binding validation.
 */

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use template_binding::core::SecurityContext;
    use template_binding::schema::{DomElementSchemaRegistry, ElementSchemaRegistry};

    fn registry() -> DomElementSchemaRegistry {
        DomElementSchemaRegistry::new()
    }

    #[test]
    fn should_classify_url_properties() {
        let registry = registry();
        assert_eq!(registry.security_context("a", "href", false), SecurityContext::URL);
        assert_eq!(registry.security_context("img", "src", false), SecurityContext::URL);
        assert_eq!(registry.security_context("button", "formaction", false), SecurityContext::URL);
    }

    #[test]
    fn should_classify_resource_urls() {
        let registry = registry();
        assert_eq!(registry.security_context("iframe", "src", false), SecurityContext::ResourceUrl);
        assert_eq!(registry.security_context("script", "src", false), SecurityContext::ResourceUrl);
        assert_eq!(registry.security_context("link", "href", false), SecurityContext::ResourceUrl);
    }

    #[test]
    fn should_classify_html_and_style() {
        let registry = registry();
        assert_eq!(registry.security_context("div", "innerHTML", false), SecurityContext::HTML);
        assert_eq!(registry.security_context("iframe", "srcdoc", false), SecurityContext::HTML);
        assert_eq!(registry.security_context("div", "style", false), SecurityContext::STYLE);
    }

    #[test]
    fn should_ignore_case() {
        let registry = registry();
        assert_eq!(registry.security_context("A", "HREF", false), SecurityContext::URL);
        assert_eq!(registry.security_context("IFRAME", "SrcDoc", false), SecurityContext::HTML);
    }

    #[test]
    fn should_map_attribute_names_before_classifying() {
        let registry = registry();
        assert_eq!(registry.security_context("div", "innerHtml", true), SecurityContext::HTML);
        assert_eq!(registry.get_mapped_prop_name("tabindex"), "tabIndex");
        assert_eq!(registry.get_mapped_prop_name("class"), "className");
    }

    #[test]
    fn should_default_to_none() {
        let registry = registry();
        assert_eq!(registry.security_context("div", "title", false), SecurityContext::NONE);
        assert_eq!(registry.security_context("my-comp", "href", false), SecurityContext::NONE);
    }

    #[test]
    fn should_reject_event_properties() {
        let registry = registry();
        let result = registry.validate_property("onclick");
        assert!(result.error);
        assert!(result
            .msg
            .unwrap()
            .starts_with("Binding to event property 'onclick' is disallowed for security reasons, please use (click)=..."));
        assert!(!registry.validate_property("title").error);
    }

    #[test]
    fn should_reject_event_attributes() {
        let registry = registry();
        let result = registry.validate_attribute("onLoad");
        assert!(result.error);
        assert_eq!(
            result.msg.as_deref(),
            Some("Binding to event attribute 'onLoad' is disallowed for security reasons, please use (Load)=...")
        );
        assert!(registry.validate_attribute("aria-label").msg.is_none());
    }

    #[test]
    fn should_list_known_elements() {
        let names = registry().all_known_element_names();
        assert!(names.iter().any(|n| n == "div"));
        assert!(names.iter().any(|n| n == "iframe"));
        assert!(!names.iter().any(|n| n == "my-comp"));
    }
}
