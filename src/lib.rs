//! # sslstarter
//!
//! `sslstarter` unlocks a server whose key material is protected by a password
//! that must never travel or rest in the clear.
//!
//! ## Flow
//!
//! 1. The starter listens before the real server does and hands out a freshly
//!    generated RSA public key on `GET /key`.
//! 2. A client reads the password, clears its input immediately, encrypts the
//!    password with that key (PKCS#1 v1.5, hex encoded) and posts it to
//!    `POST /pass`.
//! 3. The starter decrypts it with the matching private key. On success it
//!    answers `complete`, hands the password to whoever awaits it and shuts
//!    down. Anything else answers `continue` and the client may try again.
//!
//! Each key is single use: requesting a new key invalidates the previous one.

pub mod cli;
pub mod client;
pub mod crypto;
pub mod protocol;
pub mod starter;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with("sslstarter/"));
        assert!(APP_USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
