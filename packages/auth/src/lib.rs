// ABOUTME: Authentication and authorization primitives for Schoolgate
// ABOUTME: HS256 bearer tokens plus the static role/module permission table

pub mod gate;
pub mod jwt;

pub use gate::{has_module_access, AccessLevel, Module, Role};
pub use jwt::{sign, verify, AuthError, Claims};
