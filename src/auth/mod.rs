pub mod claims;
pub mod jwks;
pub mod jwt;
#[cfg(test)]
pub mod test_keys;
pub mod verifier;

pub use jwks::FIREBASE_JWKS_URL;
pub use verifier::{FirebaseVerifier, IdentityVerifier, VerifyError};
