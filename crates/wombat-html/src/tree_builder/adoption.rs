//! [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)

use wombat_dom::{Namespace, NodeFactory};

use super::core::{ActiveFormattingElement, BuildResult, HtmlTreeBuilder, InsertionPoint};
use super::scope::Scope;
use super::tag_sets::is_special;

const OUTER_LOOP_LIMIT: usize = 8;
const INNER_LOOP_LIMIT: usize = 3;

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// Run the adoption agency algorithm for the end tag `subject`.
    pub(super) fn run_adoption_agency(&mut self, subject: &str) -> BuildResult {
        // STEP 2: "If the current node is an HTML element whose tag name is subject,
        //          and the current node is not in the list of active formatting
        //          elements, then pop the current node off the stack of open
        //          elements and return."
        if let Some(current) = self.current_node() {
            if current.is_html(subject) && self.formatting_position(current.handle).is_none() {
                let handle = current.handle;
                let _ = self.pop();
                self.closed_by_end_tag(Some(handle));
                return Ok(());
            }
        }

        // STEP 3-4: "Let outer loop counter be 0. While true:"
        for _ in 0..OUTER_LOOP_LIMIT {
            // STEP 4.3: "Let formatting element be the last element in the list of
            //            active formatting elements that is between the end of the
            //            list and the last marker in the list, if any, or the start of
            //            the list otherwise, and has the tag name subject."
            let Some((_, formatting_element)) = self.formatting_element_after_marker(subject) else {
                // "If there is no such element, then return and instead act as
                // described in the "any other end tag" entry above."
                self.any_other_end_tag(subject);
                return Ok(());
            };

            // STEP 4.4: "If formatting element is not in the stack of open elements,
            //            then this is a parse error; remove the element from the list,
            //            and return."
            let Some(formatting_index) = self.stack_position(formatting_element) else {
                self.parse_error(&format!("</{subject}> closes a formatting element that is no longer open"));
                self.remove_formatting_element(formatting_element);
                return Ok(());
            };

            // STEP 4.5: "If formatting element is in the stack of open elements, but
            //            the element is not in scope, then this is a parse error; return."
            if !self.handle_in_scope(formatting_element, Scope::Default) {
                self.parse_error(&format!("</{subject}> is not in scope"));
                return Ok(());
            }

            // STEP 4.6: "If formatting element is not the current node, this is a
            //            parse error. (But do not return.)"
            if self.current_node().map(|node| node.handle) != Some(formatting_element) {
                self.parse_error(&format!("</{subject}> closes misnested formatting"));
            }

            // STEP 4.7: "Let furthest block be the topmost node in the stack of open
            //            elements that is lower in the stack than formatting element,
            //            and is an element in the special category."
            let furthest = self.open_elements[formatting_index + 1..]
                .iter()
                .position(is_special)
                .map(|offset| formatting_index + 1 + offset);

            // STEP 4.8: "If there is no furthest block, then the UA must first pop all
            //            the nodes from the bottom of the stack of open elements, from
            //            the current node up to and including formatting element, then
            //            remove formatting element from the list of active formatting
            //            elements, and finally return."
            let Some(furthest_index) = furthest else {
                self.pop_until_handle(formatting_element);
                self.closed_by_end_tag(Some(formatting_element));
                self.remove_formatting_element(formatting_element);
                return Ok(());
            };
            let furthest_block = self.open_elements[furthest_index].handle;

            // STEP 4.9: "Let common ancestor be the element immediately above
            //            formatting element in the stack of open elements."
            let Some(common_ancestor) = formatting_index
                .checked_sub(1)
                .map(|i| self.open_elements[i].handle)
            else {
                return Ok(());
            };

            // STEP 4.10: "Let a bookmark note the position of formatting element in
            //             the list of active formatting elements relative to the
            //             elements on either side of it in the list."
            let mut bookmark = self.formatting_position(formatting_element).unwrap_or(0);

            // STEP 4.11: "Let node and last node be furthest block."
            let mut node_index = furthest_index;
            let mut last_node = furthest_block;

            // STEP 4.13: "Inner loop"
            let mut inner_loop_counter = 0;
            loop {
                inner_loop_counter += 1;

                // STEP 4.13.2: "Let node be the element immediately above node in the
                //               stack of open elements, or if node is no longer in the
                //               stack of open elements, the element that was immediately
                //               above node in the stack of open elements before node was
                //               removed."
                node_index -= 1;
                let node = self.open_elements[node_index].handle;

                // STEP 4.13.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 4.13.4: "If inner loop counter is greater than 3 and node is in
                //               the list of active formatting elements, then remove node
                //               from the list of active formatting elements."
                if inner_loop_counter > INNER_LOOP_LIMIT {
                    if let Some(position) = self.formatting_position(node) {
                        let _ = self.active_formatting.remove(position);
                        if position < bookmark {
                            bookmark -= 1;
                        }
                    }
                }

                // STEP 4.13.5: "If node is not in the list of active formatting
                //               elements, then remove node from the stack of open
                //               elements and continue."
                let Some(node_position) = self.formatting_position(node) else {
                    let _ = self.open_elements.remove(node_index);
                    continue;
                };

                // STEP 4.13.6: "Create an element for the token for which the element
                //               node was created, in the HTML namespace, with common
                //               ancestor as the intended parent; replace the entry for
                //               node in the list of active formatting elements with an
                //               entry for the new element, replace the entry for node in
                //               the stack of open elements with an entry for the new
                //               element, and let node be the new element."
                let ActiveFormattingElement::Element { tag, .. } = &self.active_formatting[node_position] else {
                    continue;
                };
                let tag = tag.clone();
                let range = self.implied_range();
                let replacement = self.create_element_for_tag(&tag, Namespace::Html, range)?;
                let new_node = replacement.handle;
                self.active_formatting[node_position] = ActiveFormattingElement::Element { handle: new_node, tag };
                self.open_elements[node_index] = replacement;

                // STEP 4.13.7: "If last node is furthest block, then move the aforementioned
                //               bookmark to be immediately after the new node in the list
                //               of active formatting elements."
                if last_node == furthest_block {
                    bookmark = node_position + 1;
                }

                // STEP 4.13.8: "Append last node to node."
                self.factory.remove_from_parent(last_node)?;
                self.factory.append_child(new_node, last_node)?;

                // STEP 4.13.9: "Set last node to node."
                last_node = new_node;
            }

            // STEP 4.14: "Insert whatever last node ended up being in the previous step
            //             at the appropriate place for inserting a node, but using common
            //             ancestor as the override target."
            self.factory.remove_from_parent(last_node)?;
            let point = self.appropriate_place(Some(common_ancestor));
            self.insert_at(point, last_node)?;

            // STEP 4.15: "Create an element for the token for which formatting element
            //             was created, in the HTML namespace, with furthest block as
            //             the intended parent."
            let Some(formatting_position) = self.formatting_position(formatting_element) else {
                return Ok(());
            };
            let ActiveFormattingElement::Element { tag, .. } = &self.active_formatting[formatting_position] else {
                return Ok(());
            };
            let tag = tag.clone();
            let range = self.implied_range();
            let new_element = self.create_element_for_tag(&tag, Namespace::Html, range)?;
            let new_handle = new_element.handle;

            // STEP 4.16: "Take all of the child nodes of furthest block and append them
            //             to the element created in the last step."
            self.factory.reparent_children(furthest_block, new_handle)?;

            // STEP 4.17: "Append that new element to furthest block."
            self.insert_at(InsertionPoint::Append(furthest_block), new_handle)?;

            // STEP 4.18: "Remove formatting element from the list of active formatting
            //             elements, and insert the new element into the list of active
            //             formatting elements at the position of the aforementioned
            //             bookmark."
            let _ = self.active_formatting.remove(formatting_position);
            if formatting_position < bookmark {
                bookmark -= 1;
            }
            let bookmark = bookmark.min(self.active_formatting.len());
            self.active_formatting.insert(
                bookmark,
                ActiveFormattingElement::Element {
                    handle: new_handle,
                    tag,
                },
            );

            // STEP 4.19: "Remove formatting element from the stack of open elements, and
            //             insert the new element into the stack of open elements
            //             immediately below the position of furthest block in that stack."
            if let Some(position) = self.stack_position(formatting_element) {
                let _ = self.open_elements.remove(position);
            }
            if let Some(position) = self.stack_position(furthest_block) {
                self.open_elements.insert(position + 1, new_element);
            }
        }
        Ok(())
    }

    /// [Any other end tag](https://html.spec.whatwg.org/multipage/parsing.html#any-other-end-tag)
    /// in the "in body" insertion mode.
    pub(super) fn any_other_end_tag(&mut self, name: &str) {
        // STEP 1-2: walk up from the current node.
        for index in (0..self.open_elements.len()).rev() {
            let node = &self.open_elements[index];
            // STEP 2: "If node is an HTML element with the same tag name as the token..."
            if node.is_html(name) {
                let handle = node.handle;
                // STEP 2.1: "Generate implied end tags, except for HTML elements with
                //            the same tag name as the token."
                self.generate_implied_end_tags(Some(name));
                // STEP 2.2: "If node is not the current node, then this is a parse error."
                if self.current_node().map(|n| n.handle) != Some(handle) {
                    self.parse_error(&format!("end tag </{name}> with unclosed children"));
                }
                // STEP 2.3: "Pop all the nodes from the current node up to node,
                //            including node, then stop these steps."
                self.pop_until_handle(handle);
                self.closed_by_end_tag(Some(handle));
                return;
            }
            // STEP 3: "Otherwise, if node is in the special category, then this is a
            //          parse error; ignore the token, and return."
            if is_special(node) {
                self.parse_error(&format!("stray end tag </{name}>"));
                return;
            }
        }
    }
}
