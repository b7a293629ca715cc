//! draw.io style strings.
//!
//! A style is a `;`-separated list of tokens, each either a bare shape name
//! (`swimlane`, `text`, `line`) or a `key=value` pair. Cell kinds are derived
//! from whole tokens; a style is never searched for substrings.

/// Stacked swimlane holding one class.
pub const CONTAINER_STYLE: &str = "swimlane;whiteSpace=wrap;rounded=0;dashed=0;fontStyle=1;childLayout=stackLayout;startSize=40;horizontalStack=0;horizontal=1;resizeParent=1;resizeParentMax=0;resizeLast=0;collapsible=1;marginButtom=0;html=1;align=center;verticalAlign=top;marginBottom=0;";

/// Text block listing fields or methods.
pub const ITEM_STYLE: &str = "text;whiteSpace=wrap;rounded=0;fillColor=none;strokeColor=none;dashed=0;align=left;verticalAlign=top;spacingLeft=4;spacingRight=4;overflow=hidden;rotatable=0;points=[[0,0.5],[1,0.5]];portConstraint=eastwest;html=1;";

/// Horizontal rule between the fields and methods blocks.
pub const SEPARATOR_STYLE: &str = "line;whiteSpace=wrap;rounded=0;fillColor=none;strokeColor=inherit;dashed=0;strokeWidth=1;align=left;verticalAlign=middle;spacingTop=-1;spacingLeft=3;spacingRight=3;rotatable=0;labelPosition=right;points=[];portConstraint=eastwest;";

pub const ASSOCIATION_STYLE: &str = "curved=1;endArrow=classic;html=1;rounded=0;";

pub const BIDIRECTIONAL_STYLE: &str = "curved=1;startArrow=classic;endArrow=classic;html=1;rounded=0;";

pub const EXTENDS_STYLE: &str = "endArrow=block;endSize=16;endFill=0;html=1;rounded=0;";

/// Parsed tokens of a style string, borrowing from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTokens<'a> {
    tokens: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> StyleTokens<'a> {
    /// Splits a style string into tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// # use umlsync::document::StyleTokens;
    /// let tokens = StyleTokens::parse("swimlane;childLayout=stackLayout;html=1;");
    /// assert!(tokens.has_flag("swimlane"));
    /// assert_eq!(tokens.value("childLayout"), Some("stackLayout"));
    /// assert!(!tokens.has_flag("swim"));
    /// ```
    pub fn parse(style: &'a str) -> Self {
        let tokens = style
            .split(';')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| match token.split_once('=') {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (token, None),
            })
            .collect();
        Self { tokens }
    }

    /// Returns `true` if `name` appears as a bare token.
    pub fn has_flag(&self, name: &str) -> bool {
        self.tokens
            .iter()
            .any(|(key, value)| value.is_none() && *key == name)
    }

    /// Returns the value of the first `key=value` token with this key.
    pub fn value(&self, key: &str) -> Option<&'a str> {
        self.tokens
            .iter()
            .find(|(name, value)| value.is_some() && *name == key)
            .and_then(|(_, value)| *value)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_tokens() {
        let tokens = StyleTokens::parse("text; align = left ;points=[[0,0.5],[1,0.5]];;");

        assert!(tokens.has_flag("text"));
        assert_eq!(tokens.value("align"), Some("left"));
        assert_eq!(tokens.value("points"), Some("[[0,0.5],[1,0.5]]"));
        assert_eq!(tokens.value("text"), None);
    }

    #[test]
    fn test_flags_are_matched_exactly() {
        let tokens = StyleTokens::parse("shape=swimlane;lineHeight=2;");

        assert!(!tokens.has_flag("swimlane"));
        assert!(!tokens.has_flag("line"));
    }

    #[test]
    fn test_empty_style() {
        assert!(StyleTokens::parse("").is_empty());
        assert!(StyleTokens::parse(" ; ;").is_empty());
    }
}
