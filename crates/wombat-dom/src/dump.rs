//! Tree dumps in the html5lib test-suite format.
//!
//! ```text
//! | <html>
//! |   <head>
//! |   <body>
//! |     <p>
//! |       class="intro"
//! |       "Hello"
//! ```
//!
//! Foreign elements are prefixed with their namespace (`<svg svg>`), and
//! attributes are listed sorted by name under their element.

use std::fmt::Write;

use crate::{DomTree, Namespace, NodeId, NodeType};

impl DomTree {
    /// Dump every child of the document node.
    #[must_use]
    pub fn dump(&self) -> String {
        self.dump_children(self.root())
    }

    /// Dump the children of `id`, one node per line, indented by depth.
    #[must_use]
    pub fn dump_children(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.dump_node(child, 0, &mut out);
        }
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        let _ = match &node.node_type {
            NodeType::Document => writeln!(out, "| {indent}#document"),
            NodeType::Doctype(doctype) => {
                if doctype.public_id.is_empty() && doctype.system_id.is_empty() {
                    writeln!(out, "| {indent}<!DOCTYPE {}>", doctype.name)
                } else {
                    writeln!(
                        out,
                        "| {indent}<!DOCTYPE {} \"{}\" \"{}\">",
                        doctype.name, doctype.public_id, doctype.system_id
                    )
                }
            }
            NodeType::Element(element) => {
                let result = match element.namespace {
                    Namespace::Html | Namespace::Xml => {
                        writeln!(out, "| {indent}<{}>", element.tag_name)
                    }
                    ns => writeln!(out, "| {indent}<{ns} {}>", element.tag_name),
                };
                let mut attrs: Vec<_> = element.attrs.iter().collect();
                attrs.sort_by(|a, b| a.name.cmp(&b.name));
                for attr in attrs {
                    let _ = writeln!(out, "| {indent}  {}=\"{}\"", attr.name, attr.value);
                }
                result
            }
            NodeType::Text(text) => writeln!(out, "| {indent}\"{text}\""),
            NodeType::Comment(data) => writeln!(out, "| {indent}<!-- {data} -->"),
            NodeType::CData(data) => writeln!(out, "| {indent}<![CDATA[{data}]]>"),
            NodeType::ProcessingInstruction { target, data } => {
                writeln!(out, "| {indent}<?{target} {data}>")
            }
        };
        for &child in &node.children {
            self.dump_node(child, depth + 1, out);
        }
    }
}
