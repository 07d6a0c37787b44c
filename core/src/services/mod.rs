//! Credential services containing the session-authentication logic.

pub mod session;
pub mod token;

// Re-export commonly used types
pub use session::SessionService;
pub use token::{
    KeyRing, RevocationSweeper, SweeperConfig, TokenConfig, TokenIssuer, TokenValidator,
};
