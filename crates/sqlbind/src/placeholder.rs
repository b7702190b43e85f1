//! Parameter placeholder styles.
//!
//! SQL dialects disagree on how positional parameters are spelled. Rendering
//! code takes a [`Placeholder`] and formats each parameter index through it,
//! so no string replacement pass is needed afterwards.

/// The parameter-marker convention used when rendering SQL.
///
/// There is no process-wide default; standalone clause rendering uses
/// [`Placeholder::Question`] and the query builders use
/// [`Placeholder::Dollar`] (the style `tokio-postgres` executes), each
/// overridable per call or per builder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placeholder {
    /// Plain question marks: `?`
    #[default]
    Question,
    /// Dollar-prefixed positions: `$1`, `$2`, ...
    Dollar,
    /// Colon-prefixed positions: `:1`, `:2`, ...
    Colon,
    /// `@p`-prefixed positions: `@p1`, `@p2`, ...
    AtP,
}

impl Placeholder {
    /// Format the marker for the 1-based parameter `index`.
    pub fn format(self, index: usize) -> String {
        match self {
            Placeholder::Question => "?".to_string(),
            Placeholder::Dollar => format!("${index}"),
            Placeholder::Colon => format!(":{index}"),
            Placeholder::AtP => format!("@p{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_style() {
        assert_eq!(Placeholder::Question.format(3), "?");
        assert_eq!(Placeholder::Dollar.format(3), "$3");
        assert_eq!(Placeholder::Colon.format(3), ":3");
        assert_eq!(Placeholder::AtP.format(3), "@p3");
    }
}
