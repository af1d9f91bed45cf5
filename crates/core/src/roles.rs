//! Well-known role name constants carried in access tokens.
//!
//! Derived from `people.is_admin`; there is no roles table.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Map the `is_admin` flag of a people row to its role name.
pub fn role_for(is_admin: bool) -> &'static str {
    if is_admin {
        ROLE_ADMIN
    } else {
        ROLE_USER
    }
}
