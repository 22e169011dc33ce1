//! Element scopes and the stack maintenance algorithms built on them.

use wombat_dom::{Namespace, NodeFactory};

use super::core::{HtmlTreeBuilder, InsertionMode, OpenElement};
use super::tag_sets::{IMPLIED_END_TAGS, IMPLIED_END_TAGS_THOROUGH, MAY_REMAIN_OPEN};

/// [§ 13.2.4.2 Has an element in scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
///
/// Each variant names a list of element types that bound the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    /// [Has an element in scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    Default,
    /// [Has an element in list item scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-list-item-scope)
    ListItem,
    /// [Has an element in button scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-button-scope)
    Button,
    /// [Has an element in table scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-table-scope)
    Table,
    /// [Has an element in select scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-select-scope)
    Select,
}

impl Scope {
    /// Whether `node` terminates a search in this scope.
    fn is_boundary<H>(self, node: &OpenElement<H>) -> bool {
        match self {
            Self::Default => is_default_boundary(node),
            Self::ListItem => is_default_boundary(node) || node.is_html_one_of(&["ol", "ul"]),
            Self::Button => is_default_boundary(node) || node.is_html("button"),
            Self::Table => node.is_html_one_of(&["html", "table", "template"]),
            // "...consisting of all element types except the following:
            // optgroup in the HTML namespace, option in the HTML namespace"
            Self::Select => !node.is_html_one_of(&["optgroup", "option"]),
        }
    }
}

fn is_default_boundary<H>(node: &OpenElement<H>) -> bool {
    match node.namespace {
        Namespace::Html => matches!(
            node.name.as_str(),
            "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object" | "template"
        ),
        Namespace::MathMl => matches!(
            node.name.as_str(),
            "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
        ),
        Namespace::Svg => matches!(node.name.as_str(), "foreignObject" | "desc" | "title"),
        Namespace::Xml => false,
    }
}

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// Whether an HTML element called `name` is in the given scope.
    pub(super) fn in_scope(&self, name: &str, scope: Scope) -> bool {
        self.any_in_scope(&[name], scope)
    }

    /// Whether any of the HTML elements `names` is in the given scope.
    pub(super) fn any_in_scope(&self, names: &[&str], scope: Scope) -> bool {
        for node in self.open_elements.iter().rev() {
            // "If node is the target node, terminate in a match state."
            if node.is_html_one_of(names) {
                return true;
            }
            // "Otherwise, if node is one of the element types in list, terminate
            // in a failure state."
            if scope.is_boundary(node) {
                return false;
            }
        }
        false
    }

    /// Whether a specific element (by handle) is in scope.
    pub(super) fn handle_in_scope(&self, handle: F::Handle, scope: Scope) -> bool {
        for node in self.open_elements.iter().rev() {
            if node.handle == handle {
                return true;
            }
            if scope.is_boundary(node) {
                return false;
            }
        }
        false
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "...while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an rp
    /// element, an rt element, or an rtc element, the UA must pop the current
    /// node off the stack of open elements." `except` is left open.
    pub(super) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        while let Some(node) = self.current_node() {
            if !node.is_html_one_of(IMPLIED_END_TAGS) || except.is_some_and(|name| node.is_html(name)) {
                break;
            }
            let _ = self.pop();
        }
    }

    /// "...generate all implied end tags thoroughly"
    pub(super) fn generate_implied_end_tags_thoroughly(&mut self) {
        while self.current_is_one_of(IMPLIED_END_TAGS_THOROUGH) {
            let _ = self.pop();
        }
    }

    /// [Close a p element](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    pub(super) fn close_p_element(&mut self) {
        // STEP 1: "Generate implied end tags, except for p elements."
        self.generate_implied_end_tags(Some("p"));
        // STEP 2: "If the current node is not a p element, then this is a parse error."
        if !self.current_is("p") {
            self.parse_error("unclosed elements inside <p>");
        }
        // STEP 3: "Pop elements from the stack of open elements until a p element
        //          has been popped from the stack."
        self.close_element("p");
    }

    /// Close a `p` if one is in button scope. Block-level start tags do this.
    pub(super) fn close_p_if_in_button_scope(&mut self) {
        if self.in_scope("p", Scope::Button) {
            self.close_p_element();
        }
    }

    /// The shared shape of most end tag rules: generate implied end tags,
    /// complain if the current node is not `name`, then pop through it.
    pub(super) fn close_with_implied_end_tags(&mut self, name: &str) {
        self.generate_implied_end_tags(None);
        if !self.current_is(name) {
            self.parse_error(&format!("end tag </{name}> with unclosed children"));
        }
        self.close_element(name);
    }

    /// Report open elements that must not outlive `</body>` or end of file.
    pub(super) fn check_unclosed_elements(&mut self) {
        let unclosed = self
            .open_elements
            .iter()
            .find(|node| !node.is_html_one_of(MAY_REMAIN_OPEN))
            .map(|node| node.name.clone());
        if let Some(name) = unclosed {
            self.parse_error(&format!("<{name}> is still open"));
        }
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(super) fn reset_insertion_mode(&mut self) {
        let mode = self.appropriate_insertion_mode();
        self.switch_mode(mode);
    }

    fn appropriate_insertion_mode(&self) -> InsertionMode {
        // STEP 1-3: walk from the current node up, using the context element in
        //           place of the html element in the fragment case.
        for (index, entry) in self.open_elements.iter().enumerate().rev() {
            let last = index == 0;
            let node = if last {
                self.context.as_ref().unwrap_or(entry)
            } else {
                entry
            };

            if node.namespace != Namespace::Html {
                if last {
                    return InsertionMode::InBody;
                }
                continue;
            }

            match node.name.as_str() {
                // STEP 4: "If node is a select element..."
                "select" => {
                    if !last {
                        for ancestor in self.open_elements[..index].iter().rev() {
                            if ancestor.is_html("template") {
                                break;
                            }
                            if ancestor.is_html("table") {
                                return InsertionMode::InSelectInTable;
                            }
                        }
                    }
                    return InsertionMode::InSelect;
                }
                // STEP 5: "If node is a td or th element and last is false..."
                "td" | "th" if !last => return InsertionMode::InCell,
                "tr" => return InsertionMode::InRow,
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                "caption" => return InsertionMode::InCaption,
                "colgroup" => return InsertionMode::InColumnGroup,
                "table" => return InsertionMode::InTable,
                // STEP 11: "If node is a template element, then switch the insertion
                //           mode to the current template insertion mode and return."
                "template" => {
                    return self
                        .template_modes
                        .last()
                        .copied()
                        .unwrap_or(InsertionMode::InTemplate);
                }
                "head" if !last => return InsertionMode::InHead,
                "body" => return InsertionMode::InBody,
                "frameset" => return InsertionMode::InFrameset,
                // STEP 15: "If node is an html element..."
                "html" => {
                    return if self.head_element.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                }
                _ if last => return InsertionMode::InBody,
                _ => {}
            }
        }
        InsertionMode::InBody
    }

    /// [Clear the stack back to a table context](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    pub(super) fn clear_stack_to_table_context(&mut self) {
        self.clear_stack_until(&["table", "template", "html"]);
    }

    /// [Clear the stack back to a table body context](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    pub(super) fn clear_stack_to_table_body_context(&mut self) {
        self.clear_stack_until(&["tbody", "tfoot", "thead", "template", "html"]);
    }

    /// [Clear the stack back to a table row context](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    pub(super) fn clear_stack_to_table_row_context(&mut self) {
        self.clear_stack_until(&["tr", "template", "html"]);
    }

    fn clear_stack_until(&mut self, names: &[&str]) {
        while self.current_node().is_some() && !self.current_is_one_of(names) {
            let _ = self.pop();
        }
    }

    /// [Close the cell](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    pub(super) fn close_cell(&mut self) {
        // STEP 1: "Generate implied end tags."
        self.generate_implied_end_tags(None);
        // STEP 2: "If the current node is not now a td element or a th element,
        //          then this is a parse error."
        if !self.current_is_one_of(&["td", "th"]) {
            self.parse_error("table cell closed with unclosed children");
        }
        // STEP 3: "Pop elements from the stack of open elements stack until a td
        //          element or a th element has been popped from the stack."
        let _ = self.pop_until_one_of(&["td", "th"]);
        // STEP 4: "Clear the list of active formatting elements up to the last marker."
        self.clear_formatting_to_last_marker();
        // STEP 5: "Switch the insertion mode to "in row"."
        self.switch_mode(InsertionMode::InRow);
    }
}
