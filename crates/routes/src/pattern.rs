//! URL path patterns: literal segments and `:name` parameters.

use std::collections::BTreeMap;

use crate::error::RouteError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Parameters captured by a matched pattern, by name.
pub type RouteParams = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        if !raw.starts_with('/') {
            return Err(RouteError::InvalidPattern {
                pattern: raw.to_string(),
                reason: "must start with '/'",
            });
        }

        let mut segments = Vec::new();
        for part in raw.split('/').filter(|s| !s.is_empty()) {
            match part.strip_prefix(':') {
                Some("") => {
                    return Err(RouteError::InvalidPattern {
                        pattern: raw.to_string(),
                        reason: "empty parameter name",
                    });
                }
                Some(name) => {
                    let duplicate = segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(existing) if existing == name));
                    if duplicate {
                        return Err(RouteError::InvalidPattern {
                            pattern: raw.to_string(),
                            reason: "duplicate parameter name",
                        });
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                None => segments.push(Segment::Literal(part.to_string())),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Patterns with the same shape match exactly the same paths
    /// (`/jobs/:id` and `/jobs/:slug` overlap).
    pub fn overlaps(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }

    /// Match a request path. Query strings, fragments and trailing slashes
    /// are ignored.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

impl core::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_paths() {
        let p = PathPattern::parse("/post-job").unwrap();
        assert!(p.matches("/post-job").is_some());
        assert!(p.matches("/post-job/").is_some());
        assert!(p.matches("/post-job?draft=1").is_some());
        assert!(p.matches("/post-jobs").is_none());
        assert!(p.matches("/").is_none());
    }

    #[test]
    fn root_matches_only_root() {
        let root = PathPattern::parse("/").unwrap();
        assert!(root.matches("/").is_some());
        assert!(root.matches("").is_some());
        assert!(root.matches("/jobs").is_none());
    }

    #[test]
    fn captures_parameters() {
        let p = PathPattern::parse("/workers/:id").unwrap();
        let params = p.matches("/workers/42#skills").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert!(p.matches("/workers").is_none());
        assert!(p.matches("/workers/42/extra").is_none());
    }

    #[test]
    fn rejects_bad_patterns() {
        assert!(PathPattern::parse("jobs").is_err());
        assert!(PathPattern::parse("/jobs/:").is_err());
        assert!(PathPattern::parse("/a/:id/b/:id").is_err());
    }

    #[test]
    fn overlap_ignores_parameter_names() {
        let a = PathPattern::parse("/jobs/:id").unwrap();
        let b = PathPattern::parse("/jobs/:slug/").unwrap();
        let c = PathPattern::parse("/jobs/new").unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
