//! Authentication adapters.
//!
//! - `jwt` - HS256 access and refresh tokens
//! - `bcrypt_hasher` - password hashing on the blocking pool
//! - `session_validator` - bearer token to account resolution
//! - `mock` - fixed-token validator for tests

mod bcrypt_hasher;
mod jwt;
mod mock;
mod session_validator;

pub use bcrypt_hasher::BcryptPasswordHasher;
pub use jwt::JwtTokenService;
pub use mock::MockSessionValidator;
pub use session_validator::JwtSessionValidator;
