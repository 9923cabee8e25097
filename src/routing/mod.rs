//! Routing module
//!
//! Maps `(method, path)` pairs onto student actions.

mod matcher;

pub use matcher::{Route, RouteAction, RouteMatch, RouteTable};
