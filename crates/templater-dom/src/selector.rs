//! Selectors and Element Query
//!
//! querySelectorAll over the arena tree. Supports selector lists, compound
//! selectors (type, `#id`, `.class`, attribute matchers), the four
//! combinators, and the tree-structural pseudo-classes a template needs.

use crate::{DomTree, NodeId};

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected {found} at position {position}")]
    Unexpected { position: usize, found: String },
    #[error("unsupported pseudo-class :{0}")]
    UnsupportedPseudo(String),
    #[error("invalid An+B expression {0:?}")]
    InvalidNth(String),
}

/// Element query trait
pub trait ElementQuery {
    /// Query all descendants of `root` matching `selector`, in document order
    fn query_selector_all(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError>;

    /// First descendant of `root` matching `selector`
    fn query_selector(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError>;

    /// Check if an element matches `selector`
    fn matches(&self, element: NodeId, selector: &str) -> Result<bool, SelectorError>;
}

impl ElementQuery for DomTree {
    fn query_selector_all(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.descendants(root)
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect())
    }

    fn query_selector(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.descendants(root)
            .into_iter()
            .find(|&id| selector.matches(self, id)))
    }

    fn matches(&self, element: NodeId, selector: &str) -> Result<bool, SelectorError> {
        Ok(Selector::parse(selector)?.matches(self, element))
    }
}

/// Parsed selector list (`a, b > c`)
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<ComplexSelector>,
}

impl Selector {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut parser = Parser::new(input);
        let mut alternatives = Vec::new();
        loop {
            parser.skip_whitespace();
            alternatives.push(parser.parse_complex()?);
            parser.skip_whitespace();
            match parser.peek() {
                None => break,
                Some(',') => parser.bump(),
                Some(_) => return Err(parser.unexpected()),
            }
        }
        Ok(Self { alternatives })
    }

    /// Check if an element matches any alternative
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        tree.is_element(id) && self.alternatives.iter().any(|c| c.matches(tree, id))
    }
}

/// Combinator between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// Compounds joined by combinators; `combinators[i]` sits between
/// `compounds[i]` and `compounds[i + 1]`
#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector {
    compounds: Vec<CompoundSelector>,
    combinators: Vec<Combinator>,
}

impl ComplexSelector {
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        self.matches_at(tree, id, self.compounds.len() - 1)
    }

    /// Right-to-left matching of `compounds[..=idx]` with `id` as the subject
    fn matches_at(&self, tree: &DomTree, id: NodeId, idx: usize) -> bool {
        if !self.compounds[idx].matches(tree, id) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match self.combinators[idx - 1] {
            Combinator::Child => tree
                .parent_element(id)
                .is_some_and(|p| self.matches_at(tree, p, idx - 1)),
            Combinator::Descendant => {
                let mut cur = tree.parent_element(id);
                while let Some(p) = cur {
                    if self.matches_at(tree, p, idx - 1) {
                        return true;
                    }
                    cur = tree.parent_element(p);
                }
                false
            }
            Combinator::NextSibling => tree
                .prev_element_sibling(id)
                .is_some_and(|s| self.matches_at(tree, s, idx - 1)),
            Combinator::SubsequentSibling => {
                let mut cur = tree.prev_element_sibling(id);
                while let Some(s) = cur {
                    if self.matches_at(tree, s, idx - 1) {
                        return true;
                    }
                    cur = tree.prev_element_sibling(s);
                }
                false
            }
        }
    }
}

/// Sequence of simple selectors that all apply to one element
#[derive(Debug, Clone, PartialEq)]
struct CompoundSelector {
    components: Vec<SelectorComponent>,
}

impl CompoundSelector {
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        self.components.iter().all(|c| c.matches(tree, id))
    }
}

/// A component of a selector
#[derive(Debug, Clone, PartialEq)]
enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :not(), etc.
    PseudoClass(PseudoClass),
}

impl SelectorComponent {
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        match self {
            SelectorComponent::Universal => true,
            SelectorComponent::Type(tag) => tree
                .tag_name(id)
                .is_some_and(|t| t.eq_ignore_ascii_case(tag)),
            SelectorComponent::Id(expected) => tree.get_attribute(id, "id") == Some(expected.as_str()),
            SelectorComponent::Class(class) => tree
                .get_attribute(id, "class")
                .is_some_and(|c| c.split_whitespace().any(|t| t == class)),
            SelectorComponent::Attribute(attr) => attr.matches(tree.get_attribute(id, &attr.name)),
            SelectorComponent::PseudoClass(pseudo) => pseudo.matches(tree, id),
        }
    }
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
struct AttributeSelector {
    name: String,
    matcher: Option<AttributeMatcher>,
    case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    fn matches(&self, value: Option<&str>) -> bool {
        let (Some(matcher), Some(value)) = (&self.matcher, value) else {
            return self.matcher.is_none() && value.is_some();
        };

        let fold = |s: &str| if self.case_insensitive { s.to_lowercase() } else { s.to_string() };
        let value = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => value == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                value.split_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                value == expected || value.starts_with(&format!("{}-", expected))
            }
            // Empty operands never match for the substring family
            AttributeMatcher::Prefix(expected) => !expected.is_empty() && value.starts_with(&fold(expected)),
            AttributeMatcher::Suffix(expected) => !expected.is_empty() && value.ends_with(&fold(expected)),
            AttributeMatcher::Substring(expected) => !expected.is_empty() && value.contains(&fold(expected)),
        }
    }
}

/// Supported pseudo-classes
#[derive(Debug, Clone, PartialEq)]
enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    Empty,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    Not(Box<CompoundSelector>),
}

impl PseudoClass {
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        match self {
            PseudoClass::FirstChild => tree.prev_element_sibling(id).is_none(),
            PseudoClass::LastChild => tree.next_element_sibling(id).is_none(),
            PseudoClass::OnlyChild => {
                tree.prev_element_sibling(id).is_none() && tree.next_element_sibling(id).is_none()
            }
            PseudoClass::Empty => tree.children(id).all(|(_, n)| {
                !n.is_element() && n.as_text().map_or(true, str::is_empty)
            }),
            PseudoClass::NthChild(expr) => expr.matches(sibling_position(tree, id, false)),
            PseudoClass::NthLastChild(expr) => expr.matches(sibling_position(tree, id, true)),
            PseudoClass::Not(inner) => !inner.matches(tree, id),
        }
    }
}

/// 1-based position among element siblings
fn sibling_position(tree: &DomTree, id: NodeId, from_end: bool) -> i32 {
    let mut n = 1;
    let mut cur = id;
    loop {
        let next = if from_end {
            tree.next_element_sibling(cur)
        } else {
            tree.prev_element_sibling(cur)
        };
        match next {
            Some(s) => {
                n += 1;
                cur = s;
            }
            None => return n,
        }
    }
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    /// Create An+B expression
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3"
    pub fn parse(s: &str) -> Option<Self> {
        let s: String = s.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::new(2, 1)),
            "even" => return Some(Self::new(2, 0)),
            _ => {}
        }

        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::new(0, n));
        }

        let n_pos = s.find('n')?;
        let a = match &s[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            a => a.parse().ok()?,
        };
        let rest = &s[n_pos + 1..];
        let b = if rest.is_empty() {
            0
        } else {
            rest.strip_prefix('+').unwrap_or(rest).parse().ok()?
        };
        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        // Widened so extreme `b` offsets cannot overflow
        let (a, b, n) = (i64::from(self.a), i64::from(self.b), i64::from(n));
        if a == 0 {
            return n == b;
        }
        let diff = n - b;
        diff % a == 0 && diff / a >= 0
    }
}

/// Character-level selector parser
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> Result<(), SelectorError> {
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Skip whitespace, returning whether any was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        SelectorError::Unexpected {
            position: self.pos,
            found: match self.peek() {
                Some(c) => format!("{:?}", c),
                None => "end of input".to_string(),
            },
        }
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();

        match self.peek() {
            Some('*') => {
                self.bump();
                components.push(SelectorComponent::Universal);
            }
            Some(c) if is_ident_start(c) => {
                components.push(SelectorComponent::Type(self.parse_ident()?.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    components.push(SelectorComponent::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.bump();
                    components.push(SelectorComponent::Class(self.parse_ident()?));
                }
                Some('[') => {
                    self.bump();
                    components.push(SelectorComponent::Attribute(self.parse_attribute()?));
                }
                Some(':') => {
                    self.bump();
                    components.push(SelectorComponent::PseudoClass(self.parse_pseudo()?));
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return Err(self.unexpected());
        }
        Ok(CompoundSelector { components })
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.parse_ident()?;
        self.skip_whitespace();

        let op = match self.peek() {
            Some(']') => {
                self.bump();
                return Ok(AttributeSelector { name, matcher: None, case_insensitive: false });
            }
            Some('=') => {
                self.bump();
                '='
            }
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.bump();
                self.eat('=')?;
                c
            }
            _ => return Err(self.unexpected()),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.bump();
                }
                let value = self.input[start..self.pos].to_string();
                self.eat(quote)?;
                value
            }
            _ => self.parse_ident()?,
        };

        self.skip_whitespace();
        let case_insensitive = matches!(self.peek(), Some('i' | 'I'));
        if case_insensitive {
            self.bump();
            self.skip_whitespace();
        }
        self.eat(']')?;

        let matcher = match op {
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            '*' => AttributeMatcher::Substring(value),
            _ => AttributeMatcher::Exact(value),
        };
        Ok(AttributeSelector { name, matcher: Some(matcher), case_insensitive })
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass, SelectorError> {
        let name = self.parse_ident()?.to_ascii_lowercase();

        if self.peek() != Some('(') {
            return match name.as_str() {
                "first-child" => Ok(PseudoClass::FirstChild),
                "last-child" => Ok(PseudoClass::LastChild),
                "only-child" => Ok(PseudoClass::OnlyChild),
                "empty" => Ok(PseudoClass::Empty),
                _ => Err(SelectorError::UnsupportedPseudo(name)),
            };
        }

        self.bump();
        self.skip_whitespace();
        let pseudo = match name.as_str() {
            "not" => {
                let inner = self.parse_compound()?;
                PseudoClass::Not(Box::new(inner))
            }
            "nth-child" | "nth-last-child" => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c != ')') {
                    self.bump();
                }
                let arg = &self.input[start..self.pos];
                let expr = NthExpression::parse(arg)
                    .ok_or_else(|| SelectorError::InvalidNth(arg.trim().to_string()))?;
                if name == "nth-child" {
                    PseudoClass::NthChild(expr)
                } else {
                    PseudoClass::NthLastChild(expr)
                }
            }
            _ => return Err(SelectorError::UnsupportedPseudo(name)),
        };
        self.skip_whitespace();
        self.eat(')')?;
        Ok(pseudo)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// <div id="root" class="card">
    ///   <h2 class="title">..</h2>
    ///   <ul><li data-kind="a b">..</li><li lang="en-US">..</li><li></li></ul>
    /// </div>
    fn sample() -> (DomTree, Vec<NodeId>) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "id", "root").unwrap();
        tree.set_attribute(div, "class", "card wide").unwrap();
        let h2 = tree.create_element("h2");
        tree.set_attribute(h2, "class", "title").unwrap();
        let ul = tree.create_element("ul");
        let li1 = tree.create_element("li");
        tree.set_attribute(li1, "data-kind", "a b").unwrap();
        let li2 = tree.create_element("li");
        tree.set_attribute(li2, "lang", "en-US").unwrap();
        let li3 = tree.create_element("li");

        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, h2).unwrap();
        tree.append_child(div, ul).unwrap();
        for li in [li1, li2, li3] {
            tree.append_child(ul, li).unwrap();
        }
        let text = tree.create_text("x");
        tree.append_child(li1, text).unwrap();
        (tree, vec![div, h2, ul, li1, li2, li3])
    }

    #[test]
    fn test_simple_selectors() {
        let (tree, n) = sample();
        let root = tree.root();
        assert_eq!(tree.query_selector_all(root, "li").unwrap(), vec![n[3], n[4], n[5]]);
        assert_eq!(tree.query_selector_all(root, "#root").unwrap(), vec![n[0]]);
        assert_eq!(tree.query_selector_all(root, ".wide").unwrap(), vec![n[0]]);
        assert_eq!(tree.query_selector_all(root, "DIV.card#root").unwrap(), vec![n[0]]);
        assert_eq!(tree.query_selector_all(root, "*").unwrap().len(), 6);
    }

    #[test]
    fn test_combinators() {
        let (tree, n) = sample();
        let root = tree.root();
        assert_eq!(tree.query_selector_all(root, "div li").unwrap().len(), 3);
        assert_eq!(tree.query_selector_all(root, "div > li").unwrap().len(), 0);
        assert_eq!(tree.query_selector_all(root, "div>ul>li").unwrap().len(), 3);
        assert_eq!(tree.query_selector_all(root, "h2 + ul").unwrap(), vec![n[2]]);
        assert_eq!(tree.query_selector_all(root, "li ~ li").unwrap(), vec![n[4], n[5]]);
    }

    #[test]
    fn test_attribute_selectors() {
        let (tree, n) = sample();
        let root = tree.root();
        assert_eq!(tree.query_selector_all(root, "[data-kind]").unwrap(), vec![n[3]]);
        assert_eq!(tree.query_selector_all(root, "[data-kind~=b]").unwrap(), vec![n[3]]);
        assert_eq!(tree.query_selector_all(root, "[lang|=\"en\"]").unwrap(), vec![n[4]]);
        assert_eq!(tree.query_selector_all(root, "[lang^='EN' i]").unwrap(), vec![n[4]]);
        assert_eq!(tree.query_selector_all(root, "[lang$=US]").unwrap(), vec![n[4]]);
        assert!(tree.query_selector_all(root, "[lang*='']").unwrap().is_empty());
    }

    #[test]
    fn test_pseudo_classes() {
        let (tree, n) = sample();
        let root = tree.root();
        assert_eq!(tree.query_selector_all(root, "li:first-child").unwrap(), vec![n[3]]);
        assert_eq!(tree.query_selector_all(root, "li:last-child").unwrap(), vec![n[5]]);
        assert_eq!(tree.query_selector_all(root, "li:nth-child(2)").unwrap(), vec![n[4]]);
        assert_eq!(tree.query_selector_all(root, "li:nth-child(odd)").unwrap(), vec![n[3], n[5]]);
        assert_eq!(tree.query_selector_all(root, "li:nth-last-child(1)").unwrap(), vec![n[5]]);
        assert_eq!(tree.query_selector_all(root, "li:not([lang])").unwrap(), vec![n[3], n[5]]);
        assert_eq!(tree.query_selector_all(root, "li:empty").unwrap(), vec![n[4], n[5]]);
    }

    #[test]
    fn test_selector_list_keeps_document_order() {
        let (tree, n) = sample();
        let found = tree.query_selector_all(tree.root(), "li, h2").unwrap();
        assert_eq!(found, vec![n[1], n[3], n[4], n[5]]);
    }

    #[test]
    fn test_scoped_query_excludes_root() {
        let (tree, n) = sample();
        assert_eq!(tree.query_selector_all(n[0], "div").unwrap(), Vec::<NodeId>::new());
        // Combinators may still look above the scope root
        assert_eq!(tree.query_selector_all(n[2], "div li").unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_selectors() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert!(matches!(Selector::parse("a >"), Err(SelectorError::Unexpected { .. })));
        assert!(matches!(Selector::parse("[x"), Err(SelectorError::Unexpected { .. })));
        assert!(matches!(Selector::parse("a:hover"), Err(SelectorError::UnsupportedPseudo(_))));
        assert!(matches!(Selector::parse("li:nth-child(x)"), Err(SelectorError::InvalidNth(_))));
        assert!(matches!(Selector::parse("a,"), Err(SelectorError::Unexpected { .. })));
    }

    #[test]
    fn test_nth_expression() {
        assert_eq!(NthExpression::parse("2n+1"), Some(NthExpression::new(2, 1)));
        assert_eq!(NthExpression::parse("-n + 3"), Some(NthExpression::new(-1, 3)));
        assert_eq!(NthExpression::parse("even"), Some(NthExpression::new(2, 0)));

        let first_three = NthExpression::new(-1, 3);
        assert!(first_three.matches(1) && first_three.matches(3));
        assert!(!first_three.matches(4));

        let odd = NthExpression::new(2, 1);
        assert!(odd.matches(1) && odd.matches(3) && !odd.matches(2));
    }

    #[test]
    fn test_nth_expression_extreme_offsets() {
        let min = NthExpression::new(0, i32::MIN);
        assert!(!min.matches(1) && !min.matches(i32::MAX));

        let before_min = NthExpression::new(-1, i32::MIN);
        assert!(!before_min.matches(1) && !before_min.matches(i32::MAX));

        let after_min = NthExpression::new(1, i32::MIN);
        assert!(after_min.matches(1) && after_min.matches(i32::MAX));

        let max = NthExpression::new(-1, i32::MAX);
        assert!(max.matches(1) && max.matches(i32::MAX));
    }
}
