//! Property tests: any input parses, deterministically, into a well-shaped
//! tree.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use wombat_dom::DomTree;
use wombat_html::{ParseOptions, Parser};

/// Input stitched together from markup pieces, so generated documents hit
/// the interesting tree construction paths far more often than random text.
#[derive(Debug, Clone)]
struct Markup(String);

const PIECES: &[&str] = &[
    "<p>", "</p>", "<b>", "</b>", "<i>", "</i>", "<a href=x>", "</a>", "<div>", "</div>",
    "<table>", "</table>", "<tr>", "<td>", "</td>", "<th>", "<caption>", "<colgroup>",
    "<col>", "<tbody>", "<select>", "<option>", "</select>", "<template>", "</template>",
    "<svg>", "</svg>", "<foreignObject>", "<math>", "<mi>", "<mtext>", "</math>",
    "<annotation-xml encoding=text/html>", "<li>", "<dd>", "<ul>", "<form>", "</form>",
    "<frameset>", "<frame>", "<noscript>", "<title>", "</title>", "<textarea>",
    "<script>", "</script>", "<style>", "</style>", "<plaintext>", "<head>", "<body>",
    "</body>", "<html>", "</html>", "<!DOCTYPE html>", "<!-- c -->", "<![CDATA[x]]>",
    "<?pi?>", "&amp;", "&#0;", "&not", "text", " ", "\n", "\0", "<", ">", "</", "=",
    "\"", "'", "<br/>", "</br>", "<image>", "<input type=hidden>", "<hr>", "<pre>",
    "<button>", "<nobr>", "<font color=red>", "<ruby>", "<rt>", "<h1>", "</h2>",
];

impl Arbitrary for Markup {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 40;
        let mut out = String::new();
        for _ in 0..len {
            if let Some(piece) = g.choose(PIECES) {
                out.push_str(piece);
            }
        }
        Self(out)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self))
    }
}

fn parse_html(input: &str) -> (String, usize) {
    let parsed = Parser::new(ParseOptions::html().with_max_errors(1000))
        .parse_str(input)
        .unwrap();
    (parsed.dump(), parsed.errors.len())
}

/// Every node's parent lists it as a child, exactly once.
fn links_are_consistent(tree: &DomTree) -> bool {
    tree.descendants(tree.root()).all(|id| {
        tree.children(id).iter().all(|&child| {
            tree.parent(child) == Some(id)
                && tree.children(id).iter().filter(|&&c| c == child).count() == 1
        })
    })
}

#[quickcheck]
fn any_string_parses(input: String) -> bool {
    Parser::html().parse_str(&input).is_ok()
}

#[quickcheck]
fn any_markup_parses_deterministically(input: Markup) -> bool {
    parse_html(&input.0) == parse_html(&input.0)
}

#[quickcheck]
fn html_document_has_one_html_root(input: Markup) -> bool {
    let parsed = Parser::html().parse_str(&input.0).unwrap();
    let tree = &parsed.tree;
    let elements: Vec<_> = tree
        .children(tree.root())
        .iter()
        .filter(|&&id| tree.as_element(id).is_some())
        .collect();
    elements.len() == 1
        && tree
            .document_element()
            .and_then(|id| tree.as_element(id))
            .is_some_and(|e| e.tag_name == "html")
}

#[quickcheck]
fn html_tree_links_are_consistent(input: Markup) -> bool {
    let parsed = Parser::html().parse_str(&input.0).unwrap();
    links_are_consistent(&parsed.tree)
}

#[quickcheck]
fn html_tree_has_no_empty_text(input: Markup) -> bool {
    let parsed = Parser::html().parse_str(&input.0).unwrap();
    let tree = &parsed.tree;
    tree.descendants(tree.root())
        .all(|id| tree.as_text(id).is_none_or(|text| !text.is_empty()))
}

#[quickcheck]
fn error_limit_is_respected(input: Markup, limit: u8) -> bool {
    let limit = usize::from(limit % 8);
    let parsed = Parser::new(ParseOptions::html().with_max_errors(limit))
        .parse_str(&input.0)
        .unwrap();
    parsed.errors.len() <= limit
}

#[quickcheck]
fn fragments_parse(input: Markup) -> bool {
    ["div", "table", "tr", "select", "title", "svg svg", "template"]
        .iter()
        .all(|context| Parser::html().parse_fragment(&input.0, context).is_ok())
}

#[quickcheck]
fn any_markup_parses_as_xml(input: Markup) -> bool {
    let options = ParseOptions::xml().with_namespace_aware(true).with_max_errors(100);
    let first = Parser::new(options.clone()).parse_str(&input.0).unwrap();
    let second = Parser::new(options).parse_str(&input.0).unwrap();
    first.dump() == second.dump() && links_are_consistent(&first.tree)
}
