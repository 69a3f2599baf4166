//! Query and type-language parsing.
//!
//! Syntax is handled by `apollo-parser`; this module converts its concrete
//! syntax tree into the smaller AST in [`crate::ast`] and rejects constructs
//! outside the supported subset (fragments, directives, interfaces and
//! non-object type definitions) with a located parse error. The query side
//! lives in `document`, the type-language side in `type_system`, literal
//! values and type references in `values`.

mod document;
mod type_system;
mod values;

use std::borrow::Cow;

use apollo_parser::cst::{self, CstNode};
use apollo_parser::{Lexer, SyntaxTree, TokenKind};

use crate::ast::{Document, Location, TypeSystemDocument};
use crate::error::{GqlError, GqlResult};

/// Maximum nesting the parser descends into before giving up.
pub const RECURSION_LIMIT: usize = 64;

/// Maximum number of tokens read from a single document.
pub const TOKEN_LIMIT: usize = 20_000;

/// Parse a query document. Fields written without the enclosing braces, e.g.
/// `user(id: "1001") { age }`, are read as an anonymous query.
pub fn parse_query(input: &str) -> GqlResult<Document> {
    let source = if is_bare_selection(input) {
        Source::bare_selection(input)
    } else {
        Source::new(input)
    };
    let tree = source.parse()?;
    source.document(tree.document())
}

/// Parse a type-language (SDL) document.
pub fn parse_schema(input: &str) -> GqlResult<TypeSystemDocument> {
    let source = Source::new(input);
    let tree = source.parse()?;
    source.type_system_document(tree.document())
}

/// A document starting with a field name rather than `{` or an operation
/// keyword.
fn is_bare_selection(input: &str) -> bool {
    let first = Lexer::new(input).filter_map(Result::ok).find(|token| {
        !matches!(
            token.kind(),
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::Comma
        )
    });
    match first {
        Some(token) if matches!(token.kind(), TokenKind::Name) => !matches!(
            token.data(),
            "query" | "mutation" | "subscription" | "fragment"
        ),
        _ => false,
    }
}

/// Text handed to the parser, plus what is needed to map byte offsets in it
/// back to line/column positions in the caller's input.
pub(crate) struct Source<'a> {
    input: &'a str,
    text: Cow<'a, str>,
    shift: usize,
    line_starts: Vec<usize>,
}

impl<'a> Source<'a> {
    fn new(input: &'a str) -> Self {
        Self::with_text(input, Cow::Borrowed(input), 0)
    }

    /// Wraps the input in braces. The closing brace goes on its own line so a
    /// trailing comment cannot swallow it.
    fn bare_selection(input: &'a str) -> Self {
        Self::with_text(input, Cow::Owned(format!("{{{}\n}}", input)), 1)
    }

    fn with_text(input: &'a str, text: Cow<'a, str>, shift: usize) -> Self {
        let line_starts = std::iter::once(0)
            .chain(input.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            input,
            text,
            shift,
            line_starts,
        }
    }

    fn parse(&self) -> GqlResult<SyntaxTree> {
        let tree = apollo_parser::Parser::new(&self.text)
            .recursion_limit(RECURSION_LIMIT)
            .token_limit(TOKEN_LIMIT)
            .parse();

        if let Some(err) = tree.errors().next() {
            return Err(self.error_at(err.index(), err.message()));
        }
        Ok(tree)
    }

    fn location(&self, offset: usize) -> Location {
        let offset = offset.saturating_sub(self.shift).min(self.input.len());
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self
            .input
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);
        Location {
            line,
            column: column + 1,
        }
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> GqlError {
        GqlError::Parse {
            message: message.into(),
            location: self.location(offset),
        }
    }

    pub(crate) fn node_location(&self, node: &impl CstNode) -> Location {
        self.location(usize::from(node.syntax().text_range().start()))
    }

    pub(crate) fn node_error(&self, node: &impl CstNode, message: impl Into<String>) -> GqlError {
        GqlError::Parse {
            message: message.into(),
            location: self.node_location(node),
        }
    }

    /// Children the grammar requires are only absent in trees that also
    /// carry a syntax error, so this is a fallback.
    pub(crate) fn required<T>(
        &self,
        child: Option<T>,
        parent: &impl CstNode,
        what: &str,
    ) -> GqlResult<T> {
        child.ok_or_else(|| self.node_error(parent, format!("Expected {}", what)))
    }

    pub(crate) fn name(&self, name: Option<cst::Name>, parent: &impl CstNode) -> GqlResult<String> {
        self.required(name, parent, "Name")
            .map(|name| name.text().to_string())
    }

    pub(crate) fn reject_directives(&self, directives: Option<cst::Directives>) -> GqlResult<()> {
        match directives.and_then(|d| d.directives().next()) {
            Some(directive) => Err(self.node_error(&directive, "Directives are not supported")),
            None => Ok(()),
        }
    }

    fn end_of_input(&self) -> GqlError {
        self.error_at(self.text.len(), "Unexpected <EOF>, expected an operation")
    }
}
