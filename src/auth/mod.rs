//! Authentication and authorization

pub mod clock;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use clock::{Clock, ManualClock, SystemClock};
pub use gate::{authorize, AdminOnly};
pub use jwt::{Claims, TokenError, TokenIssuer};
pub use middleware::{bearer_token, require_identity, Authenticator, Identity};
pub use models::{Role, User, UserId};
pub use password::{PasswordError, PasswordHasher};
