//! Chained credential lookup for build hosts.
//!
//! Hosts that apply version pins usually also need repository credentials in
//! the same configuration pass. A [`CredentialSet`] names one logical
//! credential pair and an ordered chain of sources to draw it from; the
//! first source that yields a *complete* pair wins, and the result is
//! memoized for the life of the set.
//!
//! Built-in sources cover environment variables and explicit defaults; the
//! [`CredentialSource`] trait is public so hosts can chain their own (a
//! property file or a secrets service, for example).
//!
//! ```rust
//! use pinfile::credentials::CredentialSet;
//!
//! let set = CredentialSet::new("artifact-repo")
//!     .environment("REPO_USER", "REPO_TOKEN")
//!     .default_credentials("anonymous", "");
//!
//! let credentials = set.credentials()?;
//! # let _ = credentials.username();
//! # Ok::<(), pinfile::core::PinfileError>(())
//! ```

use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::core::{PinfileError, Result};

/// A resolved username/password pair.
///
/// `Debug` redacts the password so a credential pair can appear in
/// diagnostics without leaking secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Builds a credential pair from its parts.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password or token.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One place credentials may be drawn from.
///
/// A source returns `None` when it cannot provide a *complete* pair; partial
/// answers (username without password, or vice versa) must collapse to
/// `None` so the chain can move on to the next source.
pub trait CredentialSource: Send + Sync {
    /// Attempts to load a complete credential pair.
    fn load(&self) -> Option<Credentials>;
}

/// Reads username and password from two environment variables.
pub struct EnvironmentSource {
    username_variable: String,
    password_variable: String,
}

impl EnvironmentSource {
    /// Builds a source reading `username_variable` and `password_variable`
    /// from the process environment.
    #[must_use]
    pub fn new(username_variable: impl Into<String>, password_variable: impl Into<String>) -> Self {
        Self {
            username_variable: username_variable.into(),
            password_variable: password_variable.into(),
        }
    }
}

impl CredentialSource for EnvironmentSource {
    fn load(&self) -> Option<Credentials> {
        let username = std::env::var(&self.username_variable).ok()?;
        let password = std::env::var(&self.password_variable).ok()?;

        Some(Credentials::new(username, password))
    }
}

/// Always yields the pair it was constructed with. Chain it last as a
/// fallback.
pub struct DefaultSource {
    credentials: Credentials,
}

impl DefaultSource {
    /// Builds a source around fixed credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(username, password),
        }
    }
}

impl CredentialSource for DefaultSource {
    fn load(&self) -> Option<Credentials> {
        Some(self.credentials.clone())
    }
}

/// A named credential pair resolved from an ordered source chain.
///
/// Sources are consulted in the order they were chained; the first complete
/// answer is memoized and reused by every later accessor call.
pub struct CredentialSet {
    name: String,
    sources: Vec<Box<dyn CredentialSource>>,
    resolved: Mutex<Option<Credentials>>,
}

impl CredentialSet {
    /// Creates an empty set named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
            resolved: Mutex::new(None),
        }
    }

    /// The set's name, used in error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chains an [`EnvironmentSource`].
    #[must_use]
    pub fn environment(
        self,
        username_variable: impl Into<String>,
        password_variable: impl Into<String>,
    ) -> Self {
        self.source(EnvironmentSource::new(username_variable, password_variable))
    }

    /// Chains a [`DefaultSource`] with fixed credentials.
    #[must_use]
    pub fn default_credentials(
        self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.source(DefaultSource::new(username, password))
    }

    /// Chains an arbitrary source.
    #[must_use]
    pub fn source(mut self, source: impl CredentialSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Resolves the credentials, first-match-wins across the chain.
    ///
    /// The first complete pair is memoized; subsequent calls return it
    /// without consulting any source again.
    ///
    /// # Errors
    ///
    /// Returns [`PinfileError::CredentialsUnavailable`] naming this set when
    /// no source yields a complete pair. The failure is not memoized - a
    /// later call retries the chain, so credentials exported after the first
    /// attempt are picked up.
    pub fn credentials(&self) -> Result<Credentials> {
        let mut resolved = self.resolved.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(credentials) = resolved.as_ref() {
            return Ok(credentials.clone());
        }

        let credentials = self
            .sources
            .iter()
            .find_map(|source| source.load())
            .ok_or_else(|| PinfileError::CredentialsUnavailable {
                name: self.name.clone(),
            })?;

        *resolved = Some(credentials.clone());

        Ok(credentials)
    }

    /// The resolved username. See [`credentials`](Self::credentials).
    pub fn username(&self) -> Result<String> {
        Ok(self.credentials()?.username.clone())
    }

    /// The resolved password. See [`credentials`](Self::credentials).
    pub fn password(&self) -> Result<String> {
        Ok(self.credentials()?.password.clone())
    }
}
