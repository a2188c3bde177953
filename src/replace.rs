/*!
Substitution templates.

A template is the replacement text used by
[`Pattern::substitute_all`](crate::Pattern::substitute_all) and the
[`SubstitutionFilter`](crate::SubstitutionFilter). `$0` stands for
the whole match and `$1` through `$9` stand for the corresponding capture
groups. A group that did not participate, or that does not exist, expands to
nothing. Every other character is copied as is, including a `$` that is not
followed by a digit.
*/

use crate::util::captures::Captures;

/// A parsed substitution template.
///
/// # Example
///
/// ```
/// use rematch::{Pattern, Template};
///
/// let re = Pattern::new(r"(\w+)@(\w+)")?;
/// let caps = re.find("mail: user@host").unwrap();
///
/// let mut dst = String::new();
/// Template::new("$2 at $1 ($$3)").expand(&caps, &mut dst);
/// assert_eq!("host at user ($)", dst);
///
/// let mut dst = String::new();
/// Template::literal("$2 at $1").expand(&caps, &mut dst);
/// assert_eq!("$2 at $1", dst);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Template {
    pieces: Vec<Piece>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Piece {
    Literal(String),
    Group(usize),
}

impl Template {
    /// Parses a template, interpreting `$0` through `$9`.
    pub fn new(template: &str) -> Template {
        let mut pieces = vec![];
        let mut lit = String::new();
        let mut it = template.chars().peekable();
        while let Some(c) = it.next() {
            let group = match (c, it.peek().and_then(|d| d.to_digit(10))) {
                ('$', Some(group)) => group as usize,
                _ => {
                    lit.push(c);
                    continue;
                }
            };
            it.next();
            if !lit.is_empty() {
                pieces.push(Piece::Literal(core::mem::take(&mut lit)));
            }
            pieces.push(Piece::Group(group));
        }
        if !lit.is_empty() {
            pieces.push(Piece::Literal(lit));
        }
        Template { pieces }
    }

    /// Creates a template that expands to `text` verbatim, without
    /// interpreting any `$`.
    pub fn literal(text: &str) -> Template {
        let pieces = if text.is_empty() {
            vec![]
        } else {
            vec![Piece::Literal(text.to_string())]
        };
        Template { pieces }
    }

    /// Returns true if this template always expands to the empty string.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Appends the expansion of this template for the given match to `dst`.
    pub fn expand(&self, caps: &Captures, dst: &mut String) {
        for piece in self.pieces.iter() {
            match *piece {
                Piece::Literal(ref s) => dst.push_str(s),
                Piece::Group(index) => {
                    dst.push_str(caps.as_str(index).unwrap_or(""))
                }
            }
        }
    }
}

impl<'a> From<&'a str> for Template {
    fn from(template: &'a str) -> Template {
        Template::new(template)
    }
}

impl From<String> for Template {
    fn from(template: String) -> Template {
        Template::new(&template)
    }
}

impl<'a> From<&'a Template> for Template {
    fn from(template: &'a Template) -> Template {
        template.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pieces() {
        assert_eq!(
            vec![
                Piece::Literal("a".to_string()),
                Piece::Group(1),
                Piece::Literal("$x$".to_string()),
                Piece::Group(0),
                Piece::Group(9),
                Piece::Literal("0".to_string()),
            ],
            Template::new("a$1$x$$0$90").pieces,
        );
        assert!(Template::new("").is_empty());
        assert!(Template::literal("").is_empty());
        assert!(!Template::new("$").is_empty());
    }
}
