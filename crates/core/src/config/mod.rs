pub mod settings;
pub mod sources;
pub mod validation;

pub use settings::*;
pub use sources::*;
pub use validation::*;

/// Collection route, relative to a resource prefix
pub const ROOT_ROUTE: &str = "/";

/// Single-item route, relative to a resource prefix
pub const IDENTIFIER_ROUTE: &str = "/{identifier}";
