//! Authentication: HS256 access tokens, argon2 password hashing, and the
//! request extractors handlers use to identify the caller.

pub mod extractors;
pub mod jwt;
pub mod password;

pub use extractors::AuthUser;
