//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)

use wombat_dom::{Namespace, NodeFactory};

use super::core::{ActiveFormattingElement, BuildResult, HtmlTreeBuilder, Tag};

/// "If there are already three elements in the list of active formatting
/// elements after the last marker, if any, or anywhere in the list if there
/// are no markers, that have the same tag name, namespace, and attributes..."
const NOAHS_ARK_LIMIT: usize = 3;

impl<F: NodeFactory> HtmlTreeBuilder<'_, F> {
    /// [Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    pub(super) fn push_formatting_element(&mut self, handle: F::Handle, tag: &Tag) {
        // STEP 1: the Noah's Ark clause. Attributes compare as sets.
        let mut same = Vec::new();
        for (index, entry) in self.active_formatting.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => break,
                ActiveFormattingElement::Element { tag: existing, .. } => {
                    if existing.name == tag.name && same_attributes(existing, tag) {
                        same.push(index);
                    }
                }
            }
        }
        // "...then remove the earliest such element from the list of active
        // formatting elements."
        if same.len() >= NOAHS_ARK_LIMIT {
            if let Some(&earliest) = same.last() {
                let _ = self.active_formatting.remove(earliest);
            }
        }

        // STEP 2: "Add element to the list of active formatting elements."
        self.active_formatting.push(ActiveFormattingElement::Element {
            handle,
            tag: tag.clone(),
        });
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub(super) fn push_formatting_marker(&mut self) {
        self.active_formatting.push(ActiveFormattingElement::Marker);
    }

    /// [Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    pub(super) fn reconstruct_active_formatting_elements(&mut self) -> BuildResult {
        // STEP 1: "If there are no entries in the list of active formatting
        //          elements, then there is nothing to reconstruct; stop this algorithm."
        // STEP 2: "If the last (most recently added) entry in the list of active
        //          formatting elements is a marker, or if it is an element that is
        //          in the stack of open elements, then there is nothing to
        //          reconstruct; stop this algorithm."
        let Some(last) = self.active_formatting.last() else {
            return Ok(());
        };
        if self.is_marker_or_open(last) {
            return Ok(());
        }

        // STEP 4-6 (Rewind): walk back to the entry after the last marker or
        //                    open element.
        let mut index = self.active_formatting.len() - 1;
        while index > 0 {
            if self.is_marker_or_open(&self.active_formatting[index - 1]) {
                break;
            }
            index -= 1;
        }

        // STEP 7-10 (Advance, Create): recreate each entry in turn.
        let range = self.implied_range();
        for position in index..self.active_formatting.len() {
            let ActiveFormattingElement::Element { tag, .. } = &self.active_formatting[position] else {
                continue;
            };
            let tag = tag.clone();
            // STEP 8: "Create: Insert an HTML element for the token for which the
            //          element entry was created, to obtain new element."
            let point = self.appropriate_place(None);
            let element = self.create_element_for_tag(&tag, Namespace::Html, range)?;
            let handle = element.handle;
            self.insert_at(point, handle)?;
            self.open_elements.push(element);
            // STEP 9: "Replace the entry for entry in the list with an entry for
            //          new element."
            self.active_formatting[position] = ActiveFormattingElement::Element { handle, tag };
        }
        Ok(())
    }

    fn is_marker_or_open(&self, entry: &ActiveFormattingElement<F::Handle>) -> bool {
        match entry {
            ActiveFormattingElement::Marker => true,
            ActiveFormattingElement::Element { handle, .. } => {
                self.open_elements.iter().any(|node| node.handle == *handle)
            }
        }
    }

    /// [Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub(super) fn clear_formatting_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting.pop() {
            if entry == ActiveFormattingElement::Marker {
                break;
            }
        }
    }

    /// The last formatting element called `name` after the last marker.
    pub(super) fn formatting_element_after_marker(&self, name: &str) -> Option<(usize, F::Handle)> {
        for (index, entry) in self.active_formatting.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => return None,
                ActiveFormattingElement::Element { handle, tag } if tag.name == name => {
                    return Some((index, *handle));
                }
                ActiveFormattingElement::Element { .. } => {}
            }
        }
        None
    }

    pub(super) fn formatting_position(&self, handle: F::Handle) -> Option<usize> {
        self.active_formatting.iter().rposition(|entry| {
            matches!(entry, ActiveFormattingElement::Element { handle: h, .. } if *h == handle)
        })
    }

    pub(super) fn remove_formatting_element(&mut self, handle: F::Handle) {
        if let Some(index) = self.formatting_position(handle) {
            let _ = self.active_formatting.remove(index);
        }
    }
}

fn same_attributes(a: &Tag, b: &Tag) -> bool {
    a.attributes.len() == b.attributes.len()
        && a.attributes.iter().all(|attr| {
            b.attributes
                .iter()
                .any(|other| other.name == attr.name && other.value == attr.value)
        })
}
