use crate::foundation::error::{UndulateError, UndulateResult};
use crate::scene::{Annotation, Endpoint};

const SHAPE_PREFIX: &str = "<*[#";
const SHAPE_BODY: &str = "-|\\/~";
const SHAPE_SUFFIX: &str = "*]#>";

/// Parsed form of an edge string `[<from>[ws]<shape>[ws]]<to>[ws]<text>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeSpec {
    /// Source node, absent for a single-ended edge.
    pub from: Option<String>,
    /// Connector shape between the endpoints.
    pub shape: Option<String>,
    /// Target node.
    pub to: String,
    /// Label drawn at the middle of the connector.
    pub text: String,
}

impl EdgeSpec {
    /// Equivalent annotation.
    pub fn into_annotation(self) -> Annotation {
        Annotation {
            shape: self.shape,
            from: self.from.map(Endpoint::Text),
            to: Some(Endpoint::Text(self.to)),
            text: self.text,
            ..Annotation::default()
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '#')
}

fn take_while(s: &str, pred: impl Fn(char) -> bool) -> (&str, &str) {
    let end = s.find(|c| !pred(c)).unwrap_or(s.len());
    s.split_at(end)
}

fn skip_blanks(s: &str) -> &str {
    s.trim_start_matches([' ', '\t'])
}

// optional prefix, one or more body characters, optional suffix
fn take_shape(s: &str) -> Option<(&str, &str)> {
    let mut end = 0;
    let mut chars = s.char_indices().peekable();
    if let Some(&(_, c)) = chars.peek()
        && SHAPE_PREFIX.contains(c)
    {
        end += c.len_utf8();
        chars.next();
    }
    let body_start = end;
    while let Some(&(_, c)) = chars.peek() {
        if !SHAPE_BODY.contains(c) {
            break;
        }
        end += c.len_utf8();
        chars.next();
    }
    if end == body_start {
        return None;
    }
    if let Some(&(_, c)) = chars.peek()
        && SHAPE_SUFFIX.contains(c)
    {
        end += c.len_utf8();
    }
    Some(s.split_at(end))
}

/// Parse one edge string.
pub fn parse_edge(edge: &str) -> UndulateResult<EdgeSpec> {
    let unmatched = || UndulateError::annotation(format!("cannot parse edge '{edge}'"));
    let input = edge.trim_end();
    let (first, rest) = take_while(input, is_name_char);

    if !first.is_empty()
        && let Some((shape, after)) = take_shape(skip_blanks(rest))
    {
        let (to, tail) = take_while(skip_blanks(after), is_name_char);
        if to.is_empty() {
            return Err(unmatched());
        }
        return Ok(EdgeSpec {
            from: Some(first.to_owned()),
            shape: Some(shape.to_owned()),
            to: to.to_owned(),
            text: skip_blanks(tail).to_owned(),
        });
    }

    let (to, tail) = take_while(input, is_name_char);
    if to.is_empty() {
        return Err(unmatched());
    }
    Ok(EdgeSpec {
        from: None,
        shape: None,
        to: to.to_owned(),
        text: skip_blanks(tail).to_owned(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/annotate/edges.rs"]
mod tests;
