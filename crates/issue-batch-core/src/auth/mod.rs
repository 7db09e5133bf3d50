mod error;
mod provider;
mod token;

pub use error::AuthError;
pub use provider::{CredentialProvider, GhCliProvider, StaticTokenProvider};
pub use token::GhToken;
