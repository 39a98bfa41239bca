/// Router Module Index
///
/// Routing is segregated by required role so access control is applied
/// explicitly at the module level, as a declared middleware layer per group,
/// rather than per handler.

/// Routes accessible without a token: health, registration, login.
pub mod public;

/// Read endpoints; the route-group guard requires the `Reader` role.
pub mod reader;

/// Mutating endpoints; the route-group guard requires the `Writer` role.
pub mod writer;
