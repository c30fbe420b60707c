//! Constituency trees in bracketed (Penn Treebank) notation.
//!
//! Trees come back from the pipeline as text. They are parsed into a small
//! owned structure so the report always uses one layout, whatever whitespace
//! the server happened to produce.

use std::fmt;

use thiserror::Error;

/// Errors from reading bracketed tree text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("tree text is empty")]
    Empty,

    #[error("unexpected end of tree text (missing ')')")]
    UnexpectedEnd,

    #[error("unbalanced ')' at byte {0}")]
    UnbalancedClose(usize),

    #[error("trailing input after tree at byte {0}")]
    TrailingInput(usize),

    #[error("tree nested too deeply at byte {0}")]
    TooDeep(usize),
}

/// Deepest nesting `Tree::parse` accepts.
pub const MAX_DEPTH: usize = 1000;

/// A constituency tree node.
///
/// Leaves carry the word as their label and have no children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub label: String,
    pub children: Vec<Tree>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Open(usize),
    Close(usize),
    Atom(usize, &'a str),
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut atom_start: Option<usize> = None;

    for (pos, c) in text.char_indices() {
        if c == '(' || c == ')' || c.is_whitespace() {
            if let Some(start) = atom_start.take() {
                tokens.push(Token::Atom(start, &text[start..pos]));
            }
            match c {
                '(' => tokens.push(Token::Open(pos)),
                ')' => tokens.push(Token::Close(pos)),
                _ => {}
            }
        } else if atom_start.is_none() {
            atom_start = Some(pos);
        }
    }
    if let Some(start) = atom_start {
        tokens.push(Token::Atom(start, &text[start..]));
    }

    tokens
}

impl Tree {
    /// Create a leaf node.
    pub fn leaf(word: impl Into<String>) -> Self {
        Self {
            label: word.into(),
            children: Vec::new(),
        }
    }

    /// Create an interior node.
    pub fn node(label: impl Into<String>, children: Vec<Tree>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Create a preterminal: a tag over a single word.
    pub fn preterminal(tag: impl Into<String>, word: impl Into<String>) -> Self {
        Self::node(tag, vec![Tree::leaf(word)])
    }

    /// Parse bracketed notation such as `(ROOT (S (NP (PRP She)) ...))`.
    ///
    /// Whitespace, including newlines, is insignificant. An empty root label
    /// (`( (S ...))`) is accepted. Nesting deeper than [`MAX_DEPTH`] brackets
    /// is rejected.
    pub fn parse(text: &str) -> Result<Self, TreeError> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(TreeError::Empty);
        }

        let mut pos = 0;
        let tree = parse_node(&tokens, &mut pos, 0)?;

        match tokens.get(pos) {
            None => Ok(tree),
            Some(Token::Open(at)) | Some(Token::Close(at)) | Some(Token::Atom(at, _)) => {
                Err(TreeError::TrailingInput(*at))
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// A node with exactly one child, which is a leaf.
    pub fn is_preterminal(&self) -> bool {
        self.children.len() == 1 && self.children[0].is_leaf()
    }

    /// Single-line bracketed form, e.g. `(NP (DT the) (NN dog))`.
    pub fn flat_string(&self) -> String {
        let mut out = String::new();
        self.write_flat(&mut out);
        out
    }

    fn write_flat(&self, out: &mut String) {
        if self.is_leaf() {
            out.push_str(&self.label);
            return;
        }
        out.push('(');
        out.push_str(&self.label);
        for child in &self.children {
            out.push(' ');
            child.write_flat(out);
        }
        out.push(')');
    }

    /// Multi-line Penn Treebank layout, terminated by a newline.
    ///
    /// Matches the `pennString` layout CoreNLP prints: preterminals stay on
    /// their parent's line while they follow other preterminals (a `CC` tag
    /// always breaks the run), every other node starts a new line indented
    /// two spaces per level.
    pub fn penn_string(&self) -> String {
        let mut out = String::new();
        self.display(&mut out, 0, false, false, false, true);
        out.push('\n');
        out
    }

    fn display(
        &self,
        out: &mut String,
        indent: usize,
        parent_label_null: bool,
        first_sibling: bool,
        left_sib_is_preterminal: bool,
        top_level: bool,
    ) {
        let preterminal = self.is_preterminal();
        let suppress_indent = parent_label_null
            || (first_sibling && preterminal)
            || (left_sib_is_preterminal && preterminal && !self.label.starts_with("CC"));

        if suppress_indent {
            out.push(' ');
        } else {
            if !top_level {
                out.push('\n');
            }
            for _ in 0..indent {
                out.push_str("  ");
            }
        }

        if self.is_leaf() || preterminal {
            self.write_flat(out);
            return;
        }

        out.push('(');
        out.push_str(&self.label);

        let label_null = self.label.is_empty();
        let mut first = true;
        let mut left_preterminal = true;
        for child in &self.children {
            child.display(out, indent + 1, label_null, first, left_preterminal, false);
            left_preterminal = child.is_preterminal() && !child.label.starts_with("CC");
            first = false;
        }

        out.push(')');
    }
}

fn parse_node(tokens: &[Token<'_>], pos: &mut usize, depth: usize) -> Result<Tree, TreeError> {
    match tokens.get(*pos) {
        None => Err(TreeError::UnexpectedEnd),
        Some(Token::Close(at)) => Err(TreeError::UnbalancedClose(*at)),
        Some(Token::Atom(_, word)) => {
            *pos += 1;
            Ok(Tree::leaf(*word))
        }
        Some(Token::Open(at)) => {
            if depth == MAX_DEPTH {
                return Err(TreeError::TooDeep(*at));
            }
            *pos += 1;
            let label = match tokens.get(*pos) {
                Some(Token::Atom(_, label)) => {
                    *pos += 1;
                    (*label).to_string()
                }
                _ => String::new(),
            };

            let mut children = Vec::new();
            loop {
                match tokens.get(*pos) {
                    None => return Err(TreeError::UnexpectedEnd),
                    Some(Token::Close(_)) => {
                        *pos += 1;
                        break;
                    }
                    Some(_) => children.push(parse_node(tokens, pos, depth + 1)?),
                }
            }

            Ok(Tree { label, children })
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.penn_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED_DATE: &str = "(ROOT (S (NP (DT The) (JJ expected) (NN date)) \
        (VP (VBD came) (CC and) (VBD went)) (. .)))";

    #[test]
    fn test_parse_flat_roundtrip() {
        let tree = Tree::parse(EXPECTED_DATE).unwrap();
        assert_eq!(tree.label, "ROOT");
        assert_eq!(tree.flat_string(), EXPECTED_DATE);
    }

    #[test]
    fn test_penn_layout() {
        let tree = Tree::parse(EXPECTED_DATE).unwrap();
        let expected = "(ROOT\n  (S\n    (NP (DT The) (JJ expected) (NN date))\n    \
            (VP (VBD came)\n      (CC and)\n      (VBD went))\n    (. .)))\n";
        assert_eq!(tree.penn_string(), expected);
    }

    #[test]
    fn test_penn_is_stable_under_reparse() {
        let tree = Tree::parse(EXPECTED_DATE).unwrap();
        let reparsed = Tree::parse(&tree.penn_string()).unwrap();
        assert_eq!(tree, reparsed);
        assert_eq!(tree.penn_string(), reparsed.penn_string());
    }

    #[test]
    fn test_empty_root_label() {
        let tree = Tree::parse("( (S (NP (PRP She)) (VP (VBD sighed))))").unwrap();
        assert_eq!(tree.label, "");
        assert_eq!(
            tree.penn_string(),
            "( (S\n    (NP (PRP She))\n    (VP (VBD sighed))))\n"
        );
    }

    #[test]
    fn test_preterminal_detection() {
        let np = Tree::node(
            "NP",
            vec![Tree::preterminal("DT", "the"), Tree::preterminal("NN", "road")],
        );
        assert!(!np.is_preterminal());
        assert!(np.children[0].is_preterminal());
        assert!(np.children[0].children[0].is_leaf());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Tree::parse("   "), Err(TreeError::Empty));
        assert_eq!(Tree::parse("(S (NP x)"), Err(TreeError::UnexpectedEnd));
        assert_eq!(Tree::parse(")"), Err(TreeError::UnbalancedClose(0)));
        assert_eq!(Tree::parse("(S x) (T y)"), Err(TreeError::TrailingInput(6)));
        assert_eq!(Tree::parse("(S x) y"), Err(TreeError::TrailingInput(6)));
    }

    fn nested(depth: usize) -> String {
        format!("{}x{}", "(A ".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn test_nesting_limit() {
        assert!(Tree::parse(&nested(MAX_DEPTH)).is_ok());
        assert_eq!(
            Tree::parse(&nested(MAX_DEPTH + 1)),
            Err(TreeError::TooDeep(MAX_DEPTH * 3))
        );
        assert_eq!(
            Tree::parse(&nested(200_000)),
            Err(TreeError::TooDeep(MAX_DEPTH * 3))
        );
    }
}
