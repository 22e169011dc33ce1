use wombat_dom::Attribute;

/// [§ 13.2.6.3 Adjust MathML attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
///
/// "...if the token has an attribute named definitionurl, change its name to
/// definitionURL (note the case difference)."
pub(in crate::tree_builder) fn adjust_mathml_attributes(attributes: &mut [Attribute]) {
    for attr in attributes {
        if attr.name.eq_ignore_ascii_case("definitionurl") {
            attr.name = "definitionURL".to_string();
        }
    }
}
