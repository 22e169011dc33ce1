//! Wombat CLI
//!
//! Parses an HTML or XML document (or fragment) and prints the resulting
//! tree in the html5lib dump format, followed by the parse errors.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use wombat_common::SourceRange;
use wombat_dom::{DomTree, NodeId};
use wombat_html::{ParseErrors, ParseOptions, ParserMode};

/// Wombat: parse HTML or XML and print the tree
#[derive(Parser, Debug)]
#[command(name = "wombat")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Parse a file
    wombat ./index.html

    # Parse inline HTML and show every parse error
    wombat --html '<p>1<b>2<i>3</b>4</i>5</p>'

    # Parse the contents of a <td>
    wombat --fragment td --html 'a<td>b'

    # Parse XML with namespace resolution
    wombat --xml --namespaces feed.xml

    # Load options from a JSON file
    wombat --config parser.json ./index.html
"#)]
struct Cli {
    /// Path to the document to parse
    #[arg(value_name = "FILE", required_unless_present = "html")]
    path: Option<PathBuf>,

    /// Parse this string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Tree construction mode (html or xml)
    #[arg(long, value_name = "MODE")]
    mode: Option<ParserMode>,

    /// Shorthand for --mode xml
    #[arg(long, conflicts_with = "mode")]
    xml: bool,

    /// Parse as the contents of this context element (e.g. td, "svg path")
    #[arg(long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Maximum number of parse errors to collect (0 disables tracking)
    #[arg(long, value_name = "N")]
    max_errors: Option<usize>,

    /// Print the source range of every element
    #[arg(long)]
    positions: bool,

    /// Keep tag and attribute names as written
    #[arg(long)]
    preserve_case: bool,

    /// Resolve xmlns declarations (XML only)
    #[arg(long)]
    namespaces: bool,

    /// Read parser options from a JSON file; flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Error limit when neither the config nor `--max-errors` set one.
const DEFAULT_MAX_ERRORS: usize = 100;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let options = build_options(&cli)?;
    log::debug!(target: "wombat_cli", "options: {options:?}");
    let parser = wombat_html::Parser::new(options);

    let (tree, root, errors) = if let Some(ref context) = cli.fragment {
        let input = read_input(&cli)?;
        let parsed = parser
            .parse_fragment(&input, context)
            .context("failed to parse fragment")?;
        (parsed.tree, parsed.root, parsed.errors)
    } else if let Some(ref html) = cli.html {
        let parsed = parser.parse_str(html).context("failed to parse input")?;
        let root = parsed.tree.root();
        (parsed.tree, root, parsed.errors)
    } else {
        let path = input_path(&cli)?;
        let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        let parsed = parser
            .parse_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let root = parsed.tree.root();
        (parsed.tree, root, parsed.errors)
    };

    println!("{}", "=== Tree ===".bold());
    print!("{}", tree.dump_children(root));

    if cli.fragment.is_none() && parser.options().mode == ParserMode::Html {
        println!("\n{} {}", "Quirks mode:".bold(), tree.quirks_mode());
    }

    if cli.positions {
        println!("\n{}", "=== Source Ranges ===".bold());
        print_positions(&tree, root);
    }

    print_errors(&errors, parser.options().max_errors);
    Ok(())
}

/// Merge the JSON config (if any) with the command line flags.
fn build_options(cli: &Cli) -> anyhow::Result<ParseOptions> {
    let mut options = match cli.config {
        Some(ref path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ParseOptions {
            max_errors: DEFAULT_MAX_ERRORS,
            ..ParseOptions::default()
        },
    };

    if cli.xml {
        options.mode = ParserMode::Xml;
    } else if let Some(mode) = cli.mode {
        options.mode = mode;
    }
    if let Some(max) = cli.max_errors {
        options.max_errors = max;
    }
    if cli.positions {
        options.track_position = true;
    }
    if cli.preserve_case {
        options.preserve_tag_case = true;
        options.preserve_attribute_case = true;
    }
    if cli.namespaces {
        options.namespace_aware = true;
    }
    Ok(options)
}

fn input_path(cli: &Cli) -> anyhow::Result<&PathBuf> {
    cli.path
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("a FILE or --html is required"))
}

fn read_input(cli: &Cli) -> anyhow::Result<String> {
    if let Some(ref html) = cli.html {
        return Ok(html.clone());
    }
    let path = input_path(cli)?;
    fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

/// One line per element: its name, start tag span and end tag span.
fn print_positions(tree: &DomTree, root: NodeId) {
    for id in tree.descendants(root) {
        let (Some(element), Some(node)) = (tree.as_element(id), tree.get(id)) else {
            continue;
        };
        let span = |range: Option<SourceRange>| {
            range.map_or_else(
                || "-".to_string(),
                |r| {
                    if r.is_empty() {
                        format!("{} (implied)", r.start)
                    } else {
                        format!("{}..{}", r.start, r.end)
                    }
                },
            )
        };
        println!(
            "<{}> {} {}  {} {}",
            element.tag_name.cyan(),
            "start".dimmed(),
            span(node.start_range),
            "end".dimmed(),
            span(node.end_range)
        );
    }
}

fn print_errors(errors: &ParseErrors, limit: usize) {
    if limit == 0 {
        return;
    }
    if errors.is_empty() {
        println!("\n{}", "No parse errors".green());
        return;
    }
    println!(
        "\n{}",
        format!("=== Parse Errors ({}) ===", errors.len()).bold()
    );
    for error in errors {
        println!(
            "  {} {} {}",
            error.position.to_string().yellow(),
            format!("[{}]", error.kind).dimmed(),
            error.message.red()
        );
    }
    if errors.len() == limit {
        println!(
            "  {}",
            format!("(stopped collecting at {limit}; raise --max-errors to see more)").dimmed()
        );
    }
}
