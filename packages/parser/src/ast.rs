use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::source::SourceFile;

/// Original location of a parsed node or comment
///
/// Nodes built by hand carry no `Loc`; everything the parser produces
/// does. Two locs are equal when they cover the same range of the same
/// source file.
#[derive(Clone)]
pub struct Loc {
    pub start: usize,
    pub end: usize,
    pub id: String,
    pub source: Arc<SourceFile>,
}

impl Loc {
    pub fn new(start: usize, end: usize, id: String, source: Arc<SourceFile>) -> Self {
        Self { start, end, id, source }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Original text covered by this loc
    pub fn text(&self) -> &str {
        self.source.slice(self.range())
    }

    pub fn same_source(&self, other: &Loc) -> bool {
        Arc::ptr_eq(&self.source, &other.source)
    }
}

impl PartialEq for Loc {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.id == other.id && self.same_source(other)
    }
}

impl fmt::Debug for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loc({}..{} #{}", self.start, self.end, self.id)?;
        if let Some(name) = self.source.name() {
            write!(f, " in {}", name)?;
        }
        write!(f, ")")
    }
}

/// Syntax tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,

    #[serde(skip)]
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Program {
        body: Vec<Node>,
    },

    VariableDeclaration {
        kind: DeclarationKind,
        declarations: Vec<Node>,
    },

    VariableDeclarator {
        id: Box<Node>,
        #[serde(default)]
        init: Option<Box<Node>>,
    },

    FunctionDeclaration {
        id: Box<Node>,
        params: Vec<Node>,
        body: Box<Node>,
    },

    BlockStatement {
        body: Vec<Node>,
    },

    ReturnStatement {
        #[serde(default)]
        argument: Option<Box<Node>>,
    },

    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        #[serde(default)]
        alternate: Option<Box<Node>>,
    },

    ExpressionStatement {
        expression: Box<Node>,
    },

    Identifier {
        name: String,
    },

    /// Number literal, kept as written (`1.50` stays `1.50`)
    NumericLiteral {
        raw: String,
    },

    /// String literal; `value` is the text between the quotes, escapes
    /// left as written
    StringLiteral {
        value: String,
        #[serde(default)]
        quote: Quote,
    },

    UnaryExpression {
        operator: UnaryOperator,
        argument: Box<Node>,
    },

    BinaryExpression {
        operator: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },

    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },

    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Const,
    Let,
    Var,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Const => "const",
            DeclarationKind::Let => "let",
            DeclarationKind::Var => "var",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quote {
    Single,
    #[default]
    Double,
}

impl Quote {
    pub fn as_char(&self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "-")]
    Minus,
}

impl UnaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "==")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "===")]
    StrictEquals,
    #[serde(rename = "!==")]
    StrictNotEquals,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "%")]
    Remainder,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Or => "||",
            BinaryOperator::And => "&&",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::StrictEquals => "===",
            BinaryOperator::StrictNotEquals => "!==",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
        }
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Equals
            | BinaryOperator::NotEquals
            | BinaryOperator::StrictEquals
            | BinaryOperator::StrictNotEquals => 3,
            BinaryOperator::LessThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterThanOrEqual => 4,
            BinaryOperator::Add | BinaryOperator::Subtract => 5,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Remainder => 6,
        }
    }
}

/// Comment attached to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub kind: CommentKind,
    /// Text without the `//` or `/* */` delimiters
    pub value: String,
    pub placement: Placement,

    #[serde(skip)]
    pub loc: Option<Loc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    Line,
    Block,
}

/// Where a comment sits relative to the node that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Leading,
    Trailing,
    /// Inside a node with no child to attach to, e.g. `{ /* empty */ }`
    Dangling,
}

impl Comment {
    pub fn line(value: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Line,
            value: value.into(),
            placement: Placement::Leading,
            loc: None,
        }
    }

    pub fn block(value: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Block,
            value: value.into(),
            placement: Placement::Leading,
            loc: None,
        }
    }

    pub fn trailing(mut self) -> Self {
        self.placement = Placement::Trailing;
        self
    }

    pub fn dangling(mut self) -> Self {
        self.placement = Placement::Dangling;
        self
    }

    /// Source form including delimiters
    pub fn text(&self) -> String {
        match self.kind {
            CommentKind::Line => format!("//{}", self.value),
            CommentKind::Block => format!("/*{}*/", self.value),
        }
    }

    /// Content equality, ignoring where the comment came from
    pub fn same_content(&self, other: &Comment) -> bool {
        self.kind == other.kind && self.value == other.value && self.placement == other.placement
    }
}

/// Node fields that are not child nodes
///
/// Two nodes with equal shallow values and equal children render the
/// same, which is what the reconciler relies on.
#[derive(Debug, Clone, PartialEq)]
pub enum Shallow {
    Program,
    VariableDeclaration(DeclarationKind),
    VariableDeclarator,
    FunctionDeclaration,
    BlockStatement,
    ReturnStatement,
    IfStatement,
    ExpressionStatement,
    Identifier(String),
    NumericLiteral(String),
    StringLiteral(String, Quote),
    UnaryExpression(UnaryOperator),
    BinaryExpression(BinaryOperator),
    CallExpression,
    MemberExpression,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            comments: Vec::new(),
            loc: None,
        }
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    pub fn program(body: Vec<Node>) -> Self {
        Self::new(NodeKind::Program { body })
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Identifier { name: name.into() })
    }

    pub fn number(raw: impl Into<String>) -> Self {
        Self::new(NodeKind::NumericLiteral { raw: raw.into() })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(NodeKind::StringLiteral {
            value: value.into(),
            quote: Quote::default(),
        })
    }

    pub fn binary(operator: BinaryOperator, left: Node, right: Node) -> Self {
        Self::new(NodeKind::BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn call(callee: Node, arguments: Vec<Node>) -> Self {
        Self::new(NodeKind::CallExpression {
            callee: Box::new(callee),
            arguments,
        })
    }

    pub fn member(object: Node, property: impl Into<String>) -> Self {
        Self::new(NodeKind::MemberExpression {
            object: Box::new(object),
            property: Box::new(Node::identifier(property)),
        })
    }

    pub fn expression_statement(expression: Node) -> Self {
        Self::new(NodeKind::ExpressionStatement {
            expression: Box::new(expression),
        })
    }

    pub fn variable(kind: DeclarationKind, name: impl Into<String>, init: Option<Node>) -> Self {
        let declarator = Node::new(NodeKind::VariableDeclarator {
            id: Box::new(Node::identifier(name)),
            init: init.map(Box::new),
        });
        Self::new(NodeKind::VariableDeclaration {
            kind,
            declarations: vec![declarator],
        })
    }

    pub fn block(body: Vec<Node>) -> Self {
        Self::new(NodeKind::BlockStatement { body })
    }

    pub fn return_statement(argument: Option<Node>) -> Self {
        Self::new(NodeKind::ReturnStatement {
            argument: argument.map(Box::new),
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Program { .. } => "Program",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::VariableDeclarator { .. } => "VariableDeclarator",
            NodeKind::FunctionDeclaration { .. } => "FunctionDeclaration",
            NodeKind::BlockStatement { .. } => "BlockStatement",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::NumericLiteral { .. } => "NumericLiteral",
            NodeKind::StringLiteral { .. } => "StringLiteral",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::MemberExpression { .. } => "MemberExpression",
        }
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::VariableDeclaration { .. }
                | NodeKind::FunctionDeclaration { .. }
                | NodeKind::BlockStatement { .. }
                | NodeKind::ReturnStatement { .. }
                | NodeKind::IfStatement { .. }
                | NodeKind::ExpressionStatement { .. }
        )
    }

    /// Child nodes in source order
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Program { body } | NodeKind::BlockStatement { body } => body.iter().collect(),
            NodeKind::VariableDeclaration { declarations, .. } => declarations.iter().collect(),
            NodeKind::VariableDeclarator { id, init } => {
                let mut children = vec![id.as_ref()];
                children.extend(init.as_deref());
                children
            }
            NodeKind::FunctionDeclaration { id, params, body } => {
                let mut children = vec![id.as_ref()];
                children.extend(params.iter());
                children.push(body.as_ref());
                children
            }
            NodeKind::ReturnStatement { argument } => argument.as_deref().into_iter().collect(),
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                let mut children = vec![test.as_ref(), consequent.as_ref()];
                children.extend(alternate.as_deref());
                children
            }
            NodeKind::ExpressionStatement { expression } => vec![expression.as_ref()],
            NodeKind::Identifier { .. } | NodeKind::NumericLiteral { .. } | NodeKind::StringLiteral { .. } => {
                Vec::new()
            }
            NodeKind::UnaryExpression { argument, .. } => vec![argument.as_ref()],
            NodeKind::BinaryExpression { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            NodeKind::CallExpression { callee, arguments } => {
                let mut children = vec![callee.as_ref()];
                children.extend(arguments.iter());
                children
            }
            NodeKind::MemberExpression { object, property } => vec![object.as_ref(), property.as_ref()],
        }
    }

    /// Mutable child nodes in source order
    pub fn children_mut(&mut self) -> Vec<&mut Node> {
        match &mut self.kind {
            NodeKind::Program { body } | NodeKind::BlockStatement { body } => body.iter_mut().collect(),
            NodeKind::VariableDeclaration { declarations, .. } => declarations.iter_mut().collect(),
            NodeKind::VariableDeclarator { id, init } => {
                let mut children = vec![id.as_mut()];
                children.extend(init.as_deref_mut());
                children
            }
            NodeKind::FunctionDeclaration { id, params, body } => {
                let mut children = vec![id.as_mut()];
                children.extend(params.iter_mut());
                children.push(body.as_mut());
                children
            }
            NodeKind::ReturnStatement { argument } => argument.as_deref_mut().into_iter().collect(),
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                let mut children = vec![test.as_mut(), consequent.as_mut()];
                children.extend(alternate.as_deref_mut());
                children
            }
            NodeKind::ExpressionStatement { expression } => vec![expression.as_mut()],
            NodeKind::Identifier { .. } | NodeKind::NumericLiteral { .. } | NodeKind::StringLiteral { .. } => {
                Vec::new()
            }
            NodeKind::UnaryExpression { argument, .. } => vec![argument.as_mut()],
            NodeKind::BinaryExpression { left, right, .. } => vec![left.as_mut(), right.as_mut()],
            NodeKind::CallExpression { callee, arguments } => {
                let mut children = vec![callee.as_mut()];
                children.extend(arguments.iter_mut());
                children
            }
            NodeKind::MemberExpression { object, property } => vec![object.as_mut(), property.as_mut()],
        }
    }

    pub fn shallow(&self) -> Shallow {
        match &self.kind {
            NodeKind::Program { .. } => Shallow::Program,
            NodeKind::VariableDeclaration { kind, .. } => Shallow::VariableDeclaration(*kind),
            NodeKind::VariableDeclarator { .. } => Shallow::VariableDeclarator,
            NodeKind::FunctionDeclaration { .. } => Shallow::FunctionDeclaration,
            NodeKind::BlockStatement { .. } => Shallow::BlockStatement,
            NodeKind::ReturnStatement { .. } => Shallow::ReturnStatement,
            NodeKind::IfStatement { .. } => Shallow::IfStatement,
            NodeKind::ExpressionStatement { .. } => Shallow::ExpressionStatement,
            NodeKind::Identifier { name } => Shallow::Identifier(name.clone()),
            NodeKind::NumericLiteral { raw } => Shallow::NumericLiteral(raw.clone()),
            NodeKind::StringLiteral { value, quote } => Shallow::StringLiteral(value.clone(), *quote),
            NodeKind::UnaryExpression { operator, .. } => Shallow::UnaryExpression(*operator),
            NodeKind::BinaryExpression { operator, .. } => Shallow::BinaryExpression(*operator),
            NodeKind::CallExpression { .. } => Shallow::CallExpression,
            NodeKind::MemberExpression { .. } => Shallow::MemberExpression,
        }
    }

    /// Original range widened to cover attached leading and trailing
    /// comments that come from the same source
    pub fn full_range(&self) -> Option<Range<usize>> {
        let loc = self.loc.as_ref()?;
        let mut range = loc.range();

        for comment in &self.comments {
            let Some(comment_loc) = comment.loc.as_ref().filter(|l| l.same_source(loc)) else {
                continue;
            };
            range.start = range.start.min(comment_loc.start);
            range.end = range.end.max(comment_loc.end);
        }

        Some(range)
    }

    pub fn leading_comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter().filter(|c| c.placement == Placement::Leading)
    }

    pub fn trailing_comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter().filter(|c| c.placement == Placement::Trailing)
    }

    pub fn dangling_comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter().filter(|c| c.placement == Placement::Dangling)
    }
}
