// ── Powerfilter ──
//
// The query language shared by every list endpoint: space-separated terms,
// each either a bare word or `keyword<relation>value`. Filters serialize
// to a canonical string used both on the wire and as cache-key material.
// `simple()` strips the pagination and sort keywords so that semantically
// equivalent queries share one cached payload.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Keywords that only affect pagination/ordering, not which entities
/// match. Stripped by [`Filter::simple`].
const VOLATILE_KEYWORDS: [&str; 4] = ["first", "rows", "sort", "sort-reverse"];

/// Relation between a keyword and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    Equals,
    Approx,
    Greater,
    Less,
}

impl Relation {
    fn symbol(self) -> char {
        match self {
            Self::Equals => '=',
            Self::Approx => '~',
            Self::Greater => '>',
            Self::Less => '<',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '=' => Some(Self::Equals),
            '~' => Some(Self::Approx),
            '>' => Some(Self::Greater),
            '<' => Some(Self::Less),
            _ => None,
        }
    }
}

/// One term of a filter: `keyword=value`, `keyword~value`, or a bare word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTerm {
    pub keyword: Option<String>,
    pub relation: Relation,
    pub value: String,
}

impl FilterTerm {
    pub fn new(keyword: impl Into<String>, relation: Relation, value: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            relation,
            value: value.into(),
        }
    }

    pub fn bare(value: impl Into<String>) -> Self {
        Self {
            keyword: None,
            relation: Relation::Equals,
            value: value.into(),
        }
    }

    fn parse(token: &str) -> Self {
        // The first relation symbol splits keyword from value; a token
        // starting with a symbol or carrying none is a bare term.
        if let Some(pos) = token.find(['=', '~', '>', '<']) {
            if pos > 0 {
                let (keyword, rest) = token.split_at(pos);
                let mut chars = rest.chars();
                let relation = chars
                    .next()
                    .and_then(Relation::from_symbol)
                    .unwrap_or(Relation::Equals);
                return Self {
                    keyword: Some(keyword.to_owned()),
                    relation,
                    value: chars.as_str().to_owned(),
                };
            }
        }
        Self::bare(token)
    }
}

impl fmt::Display for FilterTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.keyword {
            Some(keyword) => write!(f, "{keyword}{}{}", self.relation.symbol(), self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

/// A structured query over an entity list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    terms: Vec<FilterTerm>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terms(&self) -> &[FilterTerm] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Append a term, builder-style.
    pub fn with_term(mut self, term: FilterTerm) -> Self {
        self.terms.push(term);
        self
    }

    /// The value of the first term matching `keyword`, if any.
    pub fn value_of(&self, keyword: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|t| t.keyword.as_deref() == Some(keyword))
            .map(|t| t.value.as_str())
    }

    /// The canonical filter string, including pagination and sort terms.
    pub fn to_filter_string(&self) -> String {
        self.to_string()
    }

    /// A copy with pagination/sort terms (`first`, `rows`, `sort`,
    /// `sort-reverse`) stripped. Two queries differing only in those
    /// terms match the same entities and share one cached payload.
    pub fn simple(&self) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .filter(|t| {
                    t.keyword
                        .as_deref()
                        .is_none_or(|k| !VOLATILE_KEYWORDS.contains(&k))
                })
                .cloned()
                .collect(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for term in &self.terms {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{term}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Filter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            terms: s.split_whitespace().map(FilterTerm::parse).collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let filter: Filter = "severity>6.9 name~web rows=10 first=20".parse().unwrap();
        assert_eq!(
            filter.to_filter_string(),
            "severity>6.9 name~web rows=10 first=20"
        );
    }

    #[test]
    fn bare_terms_survive() {
        let filter: Filter = "apache sort=name".parse().unwrap();
        assert_eq!(filter.terms()[0], FilterTerm::bare("apache"));
        assert_eq!(filter.to_filter_string(), "apache sort=name");
    }

    #[test]
    fn simple_strips_pagination_and_sort() {
        let filter: Filter = "foo=bar rows=10 first=20 sort=name sort-reverse=severity"
            .parse()
            .unwrap();
        assert_eq!(filter.simple().to_filter_string(), "foo=bar");
    }

    #[test]
    fn simple_keeps_bare_terms() {
        let filter: Filter = "apache rows=10".parse().unwrap();
        assert_eq!(filter.simple().to_filter_string(), "apache");
    }

    #[test]
    fn value_of_finds_first_match() {
        let filter: Filter = "rows=10 rows=20".parse().unwrap();
        assert_eq!(filter.value_of("rows"), Some("10"));
        assert_eq!(filter.value_of("first"), None);
    }

    #[test]
    fn relations_parse() {
        let filter: Filter = "a=1 b~2 c>3 d<4".parse().unwrap();
        let relations: Vec<_> = filter.terms().iter().map(|t| t.relation).collect();
        assert_eq!(
            relations,
            vec![
                Relation::Equals,
                Relation::Approx,
                Relation::Greater,
                Relation::Less
            ]
        );
    }
}
