//! Winnow grammar for bracket notation.
//!
//! The grammar produces a small intermediate tree ([`ParsedNode`]) which is
//! then flattened, in pre-order, into [`Element`]s. Pre-order keeps every
//! level in left-to-right order, which the layout engine relies on.

use winnow::{
    Parser as _,
    combinator::{alt, fail, repeat},
    error::{ContextError, ErrMode},
    token::take_while,
};

use syntree_core::element::{Element, ElementId};

use crate::error::{ErrorCode, ParseError};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// A node opened below [`MAX_NESTING`] levels
    Nesting,
}

type Input<'src> = &'src str;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Marker that requests a triangle connector for a leaf.
const TRIANGLE_MARKER: char = '^';

/// Deepest bracket nesting accepted; the root node is at depth 0.
pub(crate) const MAX_NESTING: usize = 256;

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ParsedNode<'src> {
    label: &'src str,
    items: Vec<Item<'src>>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Item<'src> {
    Node(ParsedNode<'src>),
    Text(&'src str),
}

/// Turns a backtrack into a cut once a node has been opened.
fn cut<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    f(input).map_err(|err| match err {
        ErrMode::Backtrack(e) => ErrMode::Cut(e),
        other => other,
    })
}

fn ws<'src>(input: &mut Input<'src>) -> IResult<()> {
    take_while(0.., char::is_whitespace)
        .void()
        .parse_next(input)
}

fn is_bracket(c: char) -> bool {
    c == '[' || c == ']'
}

/// Parse a node label: everything up to whitespace or a bracket.
fn label<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(1.., |c: char| !c.is_whitespace() && !is_bracket(c))
        .context(Context::Label("node label"))
        .parse_next(input)
}

/// Parse leaf text: everything up to the next bracket, trailing space trimmed.
fn leaf_text<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(1.., |c: char| !is_bracket(c))
        .map(str::trim_end)
        .parse_next(input)
}

fn item<'src>(input: &mut Input<'src>, depth: usize) -> IResult<Item<'src>> {
    let item = alt((
        (|input: &mut Input<'src>| node(input, depth)).map(Item::Node),
        leaf_text.map(Item::Text),
    ))
    .parse_next(input)?;
    ws.parse_next(input)?;
    Ok(item)
}

/// Parse `[label item*]` at nesting `depth`
fn node<'src>(input: &mut Input<'src>, depth: usize) -> IResult<ParsedNode<'src>> {
    '['.void()
        .context(Context::Label("opening bracket `[`"))
        .parse_next(input)?;

    cut(input, |input| {
        if depth > MAX_NESTING {
            return fail.context(Context::Nesting).parse_next(input);
        }
        ws.parse_next(input)?;
        let label = label.parse_next(input)?;
        ws.parse_next(input)?;
        let items: Vec<Item<'src>> =
            repeat(0.., |input: &mut Input<'src>| item(input, depth + 1)).parse_next(input)?;
        ']'.void()
            .context(Context::Label("closing bracket `]`"))
            .parse_next(input)?;
        Ok(ParsedNode { label, items })
    })
}

/// Parse a complete tree with optional surrounding whitespace.
fn tree<'src>(input: &mut Input<'src>) -> IResult<ParsedNode<'src>> {
    ws.parse_next(input)?;
    let root = node(input, 0)?;
    ws.parse_next(input)?;
    Ok(root)
}

/// Convert a winnow error at `offset` into a [`ParseError`].
fn convert_error(error: ErrMode<ContextError<Context>>, source: &str, offset: usize) -> ParseError {
    let span_end = source[offset..]
        .chars()
        .next()
        .map_or(offset, |c| offset + c.len_utf8());
    let span = offset..span_end;

    match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e)
            if e.context().any(|ctx| *ctx == Context::Nesting) =>
        {
            ParseError::new(
                ErrorCode::E103,
                format!("brackets are nested more than {MAX_NESTING} levels deep"),
                span,
            )
            .with_help("flatten the tree or split it into smaller diagrams")
        }
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => {
            let contexts: Vec<String> = e
                .context()
                .filter_map(|ctx| match ctx {
                    Context::Label(label) => Some(format!("expected {label}")),
                    Context::Nesting => None,
                })
                .collect();

            let message = if contexts.is_empty() {
                "unexpected input".to_string()
            } else {
                contexts.join(" → ")
            };
            let found = if span.is_empty() {
                "end of input".to_string()
            } else {
                format!("`{}`", &source[span.clone()])
            };

            ParseError::new(ErrorCode::E100, format!("{message}, found {found}"), span)
                .with_help("every node is written as `[label contents]`")
        }
        _ => ParseError::new(ErrorCode::E100, "incomplete input", span)
            .with_help("ensure every `[` has a matching `]`"),
    }
}

/// Parse bracket notation into elements in pre-order.
pub(crate) fn parse_elements(source: &str) -> Result<Vec<Element>, ParseError> {
    let mut input = source;
    let root = tree
        .parse_next(&mut input)
        .map_err(|err| convert_error(err, source, source.len() - input.len()))?;

    if !input.is_empty() {
        let offset = source.len() - input.len();
        return Err(ParseError::new(
            ErrorCode::E101,
            "unexpected text after the root node",
            offset..source.len(),
        )
        .with_help("a diagram contains exactly one tree; wrap siblings in a common node"));
    }

    let mut elements = Vec::new();
    flatten(&root, None, 0, &mut elements);
    Ok(elements)
}

fn next_id(elements: &[Element]) -> ElementId {
    ElementId::new(elements.len())
}

fn flatten(node: &ParsedNode<'_>, parent: Option<ElementId>, level: usize, out: &mut Vec<Element>) {
    let id = next_id(out);
    if node.items.is_empty() {
        out.push(Element::leaf(id, parent, level, node.label));
        return;
    }

    out.push(Element::node(id, parent, level, node.label));
    for item in &node.items {
        match item {
            Item::Node(child) => flatten(child, Some(id), level + 1, out),
            Item::Text(text) => {
                let (content, triangle) = match text.strip_prefix(TRIANGLE_MARKER) {
                    Some(rest) => (rest.trim_start(), true),
                    None => (*text, false),
                };
                let leaf = Element::leaf(next_id(out), Some(id), level + 1, content)
                    .with_triangle(triangle);
                out.push(leaf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use syntree_core::element::ElementKind;

    use super::*;

    fn contents(elements: &[Element]) -> Vec<(&str, usize, ElementKind)> {
        elements
            .iter()
            .map(|e| (e.content(), e.level(), e.kind()))
            .collect()
    }

    #[test]
    fn test_label() {
        let mut input = "NP rest";
        assert_eq!(label.parse_next(&mut input).unwrap(), "NP");
        assert_eq!(input, " rest");
    }

    #[test]
    fn test_leaf_text_stops_at_bracket() {
        let mut input = "left early ]";
        assert_eq!(leaf_text.parse_next(&mut input).unwrap(), "left early");
        assert_eq!(input, "]");
    }

    #[test]
    fn test_node_with_nested_items() {
        let mut input = "[VP left [Adv early]]";
        let parsed = node(&mut input, 0).unwrap();
        assert_eq!(parsed.label, "VP");
        assert_eq!(
            parsed.items,
            vec![
                Item::Text("left"),
                Item::Node(ParsedNode {
                    label: "Adv",
                    items: vec![Item::Text("early")],
                }),
            ]
        );
        assert!(input.is_empty());
    }

    #[test]
    fn test_parse_sample_tree() {
        let elements = parse_elements("[S [NP Kim] [VP left early]]").unwrap();
        assert_eq!(
            contents(&elements),
            vec![
                ("S", 0, ElementKind::Node),
                ("NP", 1, ElementKind::Node),
                ("Kim", 2, ElementKind::Leaf),
                ("VP", 1, ElementKind::Node),
                ("left early", 2, ElementKind::Leaf),
            ]
        );
        assert_eq!(elements[2].parent(), Some(elements[1].id()));
        assert_eq!(elements[4].parent(), Some(elements[3].id()));
        assert_eq!(elements[0].parent(), None);
    }

    #[test]
    fn test_parse_whitespace_is_free() {
        let elements = parse_elements("\n  [S\n\t[NP  Kim ]\n]\n").unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[2].content(), "Kim");
    }

    #[test]
    fn test_parse_triangle_marker() {
        let elements = parse_elements("[NP ^ the old dog]").unwrap();
        assert!(elements[1].triangle());
        assert_eq!(elements[1].content(), "the old dog");

        let plain = parse_elements("[NP dog]").unwrap();
        assert!(!plain[1].triangle());
    }

    #[test]
    fn test_parse_empty_node_is_leaf() {
        let elements = parse_elements("[S [N] [V]]").unwrap();
        assert_eq!(elements[1].kind(), ElementKind::Leaf);
        assert_eq!(elements[2].kind(), ElementKind::Leaf);
    }

    #[test]
    fn test_parse_multibyte() {
        let elements = parse_elements("[文 [名詞 猫が] [動詞 鳴いた]]").unwrap();
        assert_eq!(elements[2].content(), "猫が");
        assert_eq!(elements[4].content(), "鳴いた");
    }

    #[test]
    fn test_parse_missing_closing_bracket() {
        let err = parse_elements("[S [NP Kim]").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E100);
        assert!(err.message().contains("closing bracket"));
        assert!(err.span().is_empty());
    }

    #[test]
    fn test_parse_missing_opening_bracket() {
        let err = parse_elements("S Kim").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E100);
        assert!(err.message().contains("opening bracket"));
        assert_eq!(err.span(), 0..1);
    }

    #[test]
    fn test_parse_missing_label() {
        let err = parse_elements("[ ]").unwrap_err();
        assert!(err.message().contains("node label"));
        assert_eq!(err.span(), 2..3);
    }

    #[test]
    fn test_parse_trailing_text() {
        let err = parse_elements("[S a] [T b]").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E101);
        assert_eq!(err.span(), 6..11);
    }

    fn nested(depth: usize) -> String {
        format!("{}x{}", "[a ".repeat(depth), "]".repeat(depth))
    }

    #[test]
    fn test_parse_nesting_at_limit() {
        let elements = parse_elements(&nested(MAX_NESTING + 1)).unwrap();
        assert_eq!(elements.len(), MAX_NESTING + 2);
        assert_eq!(elements.last().unwrap().level(), MAX_NESTING + 1);
    }

    #[test]
    fn test_parse_deep_nesting_fails_fast() {
        let source = nested(100_000);
        let err = parse_elements(&source).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E103);
        assert!(err.message().contains("nested"));

        // the node that crossed the limit opens at this offset
        let opened = (MAX_NESTING + 1) * "[a ".len();
        assert_eq!(err.span(), opened + 1..opened + 2);
    }

    #[test]
    fn test_parse_empty_source() {
        let err = parse_elements("").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E100);
    }
}
