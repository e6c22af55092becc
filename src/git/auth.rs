//! Credentials for fetching the upstream repository
//!
//! Public HTTPS clones need no credentials. For private mirrors the lookup
//! order is: ssh-agent, then keys in `~/.ssh`, then git credential helpers.
//! libgit2 calls the callback again after every rejected credential, so each
//! source is offered once and the callback then gives up.

use std::path::PathBuf;

use git2::{Cred, CredentialType, Error, ErrorClass, ErrorCode, RemoteCallbacks};

/// Private key file names tried under `~/.ssh`, in order
const SSH_KEY_NAMES: &[&str] = &["id_ed25519", "id_ecdsa", "id_rsa"];

fn auth_error(message: &str) -> Error {
    Error::new(ErrorCode::Auth, ErrorClass::Ssh, message)
}

/// Which credential sources have already been offered to the server
#[derive(Debug, Default)]
struct Attempts {
    agent: bool,
    /// Index of the next key in [`SSH_KEY_NAMES`] to try
    next_key: usize,
    helper: bool,
}

impl Attempts {
    fn ssh(&mut self, username: &str) -> Result<Cred, Error> {
        if !self.agent {
            self.agent = true;
            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");
        while let Some(name) = SSH_KEY_NAMES.get(self.next_key) {
            self.next_key += 1;
            let private_key = ssh_dir.join(name);
            if !private_key.is_file() {
                continue;
            }
            let public_key: PathBuf = ssh_dir.join(format!("{name}.pub"));
            let public_key = public_key.is_file().then_some(public_key);
            if let Ok(cred) = Cred::ssh_key(username, public_key.as_deref(), &private_key, None) {
                tracing::debug!(key = %private_key.display(), "offering ssh key");
                return Ok(cred);
            }
        }

        Err(auth_error("no usable ssh credentials"))
    }

    fn user_pass(&mut self, url: &str, username: Option<&str>) -> Result<Cred, Error> {
        if self.helper {
            return Err(auth_error("credentials rejected"));
        }
        self.helper = true;

        let config = git2::Config::open_default().or_else(|_| git2::Config::new())?;
        Cred::credential_helper(&config, url, username)
            .map_err(|_| auth_error("no credential helper provided credentials"))
    }
}

/// Install the credential callback on `callbacks`.
pub fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks<'_>) {
    let mut attempts = Attempts::default();
    callbacks.credentials(move |url, username_from_url, allowed| {
        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(username_from_url.unwrap_or("git"));
        }
        if allowed.contains(CredentialType::SSH_KEY) {
            return attempts.ssh(username_from_url.unwrap_or("git"));
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return attempts.user_pass(url, username_from_url);
        }
        if allowed.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }
        Err(auth_error("no supported authentication method"))
    });
}
