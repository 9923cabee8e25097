//! Route matching module
//!
//! A route table of `(method, pattern) -> action` entries built from the
//! collection prefix. Patterns are anchored regular expressions applied to the
//! raw request path; the first capture group, if any, is handed to the handler
//! as its path parameter.

use hyper::Method;
use regex::Regex;

/// What a matched route does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    /// Look up one student by id
    GetStudent,
    /// Register (or overwrite) a student from the request body
    CreateStudent,
}

/// A single routing table entry
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: Regex,
    pub action: RouteAction,
}

/// Result of a successful lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'p> {
    pub action: RouteAction,
    /// First capture group of the pattern (the student id for `GetStudent`)
    pub param: Option<&'p str>,
}

/// Ordered routing table; the first matching entry wins
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build the student routes under `prefix`:
    /// - `GET  {prefix}/{digits}` -> [`RouteAction::GetStudent`]
    /// - `POST {prefix}` with any number of trailing slashes -> [`RouteAction::CreateStudent`]
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let prefix = regex::escape(prefix.trim_end_matches('/'));
        Ok(Self {
            routes: vec![
                Route {
                    method: Method::GET,
                    // ASCII digits only; `\d` would also accept other Unicode digits
                    pattern: Regex::new(&format!("^{prefix}/([0-9]+)$"))?,
                    action: RouteAction::GetStudent,
                },
                Route {
                    method: Method::POST,
                    pattern: Regex::new(&format!("^{prefix}/*$"))?,
                    action: RouteAction::CreateStudent,
                },
            ],
        })
    }

    /// Find the first route accepting `method` and `path`
    pub fn resolve<'p>(&self, method: &Method, path: &'p str) -> Option<RouteMatch<'p>> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                let captures = route.pattern.captures(path)?;
                Some(RouteMatch {
                    action: route.action,
                    param: captures.get(1).map(|m| m.as_str()),
                })
            })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new("/users").unwrap()
    }

    #[test]
    fn test_get_by_numeric_id() {
        let m = table().resolve(&Method::GET, "/users/42").unwrap();
        assert_eq!(m.action, RouteAction::GetStudent);
        assert_eq!(m.param, Some("42"));
    }

    #[test]
    fn test_get_requires_digits() {
        let t = table();
        assert!(t.resolve(&Method::GET, "/users/abc").is_none());
        assert!(t.resolve(&Method::GET, "/users/").is_none());
        assert!(t.resolve(&Method::GET, "/users/42/").is_none());
        assert!(t.resolve(&Method::GET, "/users/-1").is_none());
        assert!(t.resolve(&Method::GET, "/users/\u{0664}\u{0662}").is_none());
    }

    #[test]
    fn test_create_with_trailing_slashes() {
        let t = table();
        for path in ["/users", "/users/", "/users///"] {
            let m = t.resolve(&Method::POST, path).unwrap();
            assert_eq!(m.action, RouteAction::CreateStudent);
            assert_eq!(m.param, None);
        }
        assert!(t.resolve(&Method::POST, "/users/42").is_none());
        assert!(t.resolve(&Method::POST, "/usersx").is_none());
    }

    #[test]
    fn test_method_mismatch() {
        let t = table();
        assert!(t.resolve(&Method::DELETE, "/users/1").is_none());
        assert!(t.resolve(&Method::PUT, "/users/1").is_none());
        assert!(t.resolve(&Method::GET, "/users").is_none());
        assert!(t.resolve(&Method::POST, "/Student").is_none());
    }

    #[test]
    fn test_custom_prefix_is_escaped() {
        let t = RouteTable::new("/v1.students/").unwrap();
        assert!(t.resolve(&Method::GET, "/v1.students/3").is_some());
        assert!(t.resolve(&Method::GET, "/v1xstudents/3").is_none());
        assert!(t.resolve(&Method::POST, "/v1.students").is_some());
    }

    #[test]
    fn test_root_prefix() {
        let t = RouteTable::new("/").unwrap();
        assert_eq!(
            t.resolve(&Method::GET, "/9").map(|m| m.param),
            Some(Some("9"))
        );
        assert!(t.resolve(&Method::POST, "/").is_some());
        assert_eq!(t.routes().len(), 2);
    }
}
