//! The logged in session and the token cache behind it.
//!
//! Tokens are kept on disk in a JSON file keyed by instance name, so several
//! backends can be used side by side. The user record itself is never read
//! from disk: [`Session::hydrate`] always asks the backend who the token
//! belongs to.

use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::PathBuf;

#[cfg(target_family = "unix")]
use libc::umask;
use lsl_proto::v1::{ProfileUpdate, Realtor, RegisterRequest};
use lsl_proto::validation::{require_fields, validate_email, validate_registration};
use serde::{Deserialize, Serialize};

use crate::{ClientError, LslClient, StatusCode};

#[derive(Debug, Serialize, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct TokenInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct TokenStore {
    instances: BTreeMap<String, TokenInstance>,
}

impl TokenStore {
    fn key(name: &Option<String>) -> String {
        name.clone().unwrap_or_default()
    }

    pub fn instances(&self, name: &Option<String>) -> Option<&TokenInstance> {
        self.instances.get(&Self::key(name))
    }

    pub fn instances_mut(&mut self, name: &Option<String>) -> &mut TokenInstance {
        self.instances.entry(Self::key(name)).or_default()
    }

    /// Forget both tokens for an instance. Returns true if anything was held.
    pub fn clear(&mut self, name: &Option<String>) -> bool {
        self.instances.remove(&Self::key(name)).is_some()
    }

    pub fn instance_names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(|k| k.as_str())
    }
}

pub fn read_tokens(token_path: &str) -> Result<TokenStore, ClientError> {
    let token_path = PathBuf::from(shellexpand::tilde(token_path).into_owned());
    if !token_path.exists() {
        debug!(
            "Token cache file path {:?} does not exist, returning an empty token store.",
            token_path
        );
        return Ok(Default::default());
    }

    debug!("Attempting to read tokens from {:?}", &token_path);
    let file = match File::open(&token_path) {
        Ok(f) => f,
        Err(e) => {
            match e.kind() {
                ErrorKind::PermissionDenied => {
                    // Nothing could be written back either.
                    error!(
                        "Permission denied reading token store file {:?}",
                        &token_path
                    );
                    return Err(ClientError::TokenStore(format!(
                        "permission denied reading {}",
                        token_path.display()
                    )));
                }
                _ => {
                    warn!(
                        "Cannot read tokens from {} due to error: {:?} ... continuing.",
                        token_path.display(),
                        e
                    );
                    return Ok(Default::default());
                }
            };
        }
    };
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|e| {
        warn!(
            "JSON/IO error reading tokens from {:?} -> {:?}",
            &token_path, e
        );
        ClientError::TokenStore(format!("{} is corrupt: {}", token_path.display(), e))
    })
}

pub fn write_tokens(tokens: &TokenStore, token_path: &str) -> Result<(), ClientError> {
    let token_path = PathBuf::from(shellexpand::tilde(token_path).into_owned());

    if let Some(token_dir) = token_path.parent() {
        if !token_dir.as_os_str().is_empty() && !token_dir.exists() {
            create_dir_all(token_dir).map_err(|e| {
                error!("Unable to create directory - {:?} {:?}", token_dir, e);
                ClientError::TokenStore(format!("cannot create {}", token_dir.display()))
            })?;
        }
    }

    // Take away group/everyone read/write
    #[cfg(target_family = "unix")]
    let before = unsafe { umask(0o177) };

    let file = File::create(&token_path).map_err(|e| {
        #[cfg(target_family = "unix")]
        let _ = unsafe { umask(before) };
        error!("Can not write to {} -> {:?}", token_path.display(), e);
        ClientError::TokenStore(format!("cannot write {}", token_path.display()))
    })?;

    #[cfg(target_family = "unix")]
    let _ = unsafe { umask(before) };

    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, tokens).map_err(|e| {
        error!(
            "JSON/IO error writing tokens to file {:?} -> {:?}",
            &token_path, e
        );
        ClientError::TokenStore(format!("cannot write {}", token_path.display()))
    })
}

/// The current user and the client acting for them. Commands receive this
/// and change it only through the methods below.
#[derive(Debug)]
pub struct Session {
    client: LslClient,
    instance: Option<String>,
    token_path: String,
    user: Option<Realtor>,
}

impl Session {
    pub fn new(client: LslClient, instance: Option<String>, token_path: String) -> Self {
        Session {
            client,
            instance,
            token_path,
            user: None,
        }
    }

    pub fn client(&self) -> &LslClient {
        &self.client
    }

    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    pub fn user(&self) -> Option<&Realtor> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }

    pub fn require_user(&self) -> Result<&Realtor, ClientError> {
        self.user
            .as_ref()
            .ok_or_else(|| ClientError::Unauthorized(Some("You are not logged in".to_string())))
    }

    pub fn require_admin(&self) -> Result<&Realtor, ClientError> {
        let user = self.require_user()?;
        if user.is_admin {
            Ok(user)
        } else {
            Err(ClientError::Http(
                StatusCode::FORBIDDEN,
                Some("Admin access required".to_string()),
                "session".to_string(),
            ))
        }
    }

    pub fn tokens(&self) -> Result<TokenInstance, ClientError> {
        let store = read_tokens(&self.token_path)?;
        Ok(store.instances(&self.instance).cloned().unwrap_or_default())
    }

    fn persist(&self, access_token: String, refresh_token: Option<String>) -> Result<(), ClientError> {
        let mut store = read_tokens(&self.token_path)?;
        let inst = store.instances_mut(&self.instance);
        inst.access_token = Some(access_token);
        if refresh_token.is_some() {
            inst.refresh_token = refresh_token;
        }
        write_tokens(&store, &self.token_path)
    }

    fn forget(&self) -> Result<(), ClientError> {
        let mut store = read_tokens(&self.token_path).unwrap_or_default();
        if store.clear(&self.instance) {
            debug!(instance = ?self.instance, "cleared cached tokens");
        }
        write_tokens(&store, &self.token_path)
    }

    /// Restore the session from the token cache. With no cached token this is
    /// a logged out session. A cached token the backend will not verify is
    /// removed from the cache along with its refresh token.
    pub async fn hydrate(&mut self) -> Result<Option<&Realtor>, ClientError> {
        let access_token = match self.tokens()?.access_token {
            Some(t) => t,
            None => {
                debug!("No cached access token");
                self.user = None;
                return Ok(None);
            }
        };

        self.client.set_token(access_token).await;
        match self.client.auth_verify().await {
            Ok(r) if r.valid => {
                self.user = Some(r.realtor);
                Ok(self.user.as_ref())
            }
            Ok(_) => {
                self.client.clear_token().await;
                self.user = None;
                self.forget()?;
                Err(ClientError::Unauthorized(Some(
                    "Your session is no longer valid".to_string(),
                )))
            }
            Err(e) => {
                warn!(?e, "Unable to verify cached session, clearing tokens");
                self.client.clear_token().await;
                self.user = None;
                self.forget()?;
                Err(e)
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Realtor, ClientError> {
        require_fields([("email", email), ("password", password)])?;
        let r = self.client.auth_login(email, password).await?;
        self.persist(r.access_token, Some(r.refresh_token))?;
        info!(email = %r.realtor.email, "login success");
        self.user = Some(r.realtor);
        self.require_user()
    }

    pub async fn register(&mut self, req: &RegisterRequest) -> Result<&Realtor, ClientError> {
        require_fields([
            ("email", req.email.as_str()),
            ("password", req.password.as_str()),
            ("first_name", req.first_name.as_str()),
            ("last_name", req.last_name.as_str()),
        ])?;
        validate_email(&req.email)?;
        validate_registration(
            &req.password,
            &req.confirm_password,
            req.donation_amount_per_transaction,
        )?;

        let r = self.client.auth_register(req).await?;
        self.persist(r.access_token, Some(r.refresh_token))?;
        self.user = Some(r.realtor);
        self.require_user()
    }

    /// End the session. Local tokens and the user are always dropped, even
    /// when the backend cannot be told.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        if let Err(e) = self.client.auth_logout().await {
            warn!(?e, "Backend logout failed, clearing local session anyway");
        }
        self.user = None;
        self.forget()
    }

    pub fn update_user(&mut self, user: Realtor) {
        self.user = Some(user);
    }

    pub async fn update_profile(&mut self, patch: &ProfileUpdate) -> Result<&Realtor, ClientError> {
        if let Some(amount) = patch.donation_amount_per_transaction {
            if amount.is_nan() || amount < 0.0 {
                return Err(lsl_proto::validation::ValidationError::NegativeDonation.into());
            }
        }
        let r = self.client.realtor_profile_update(patch).await?;
        self.update_user(r.realtor);
        self.require_user()
    }

    /// Swap the cached refresh token for a new access token.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let refresh_token = self.tokens()?.refresh_token.ok_or_else(|| {
            ClientError::Unauthorized(Some("No refresh token is cached, please log in".to_string()))
        })?;
        let r = self.client.auth_refresh(&refresh_token).await?;
        self.persist(r.access_token, None)
    }
}

#[cfg(test)]
mod tests {
    use super::{read_tokens, write_tokens, TokenStore};

    #[test]
    fn test_token_store_roundtrip_per_instance() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("nested").join("tokens");
        let path = path.to_str().expect("tempdir path is not utf8");

        let empty = read_tokens(path).expect("missing file should be empty");
        assert_eq!(empty, TokenStore::default());

        let mut store = TokenStore::default();
        store.instances_mut(&None).access_token = Some("a1".to_string());
        store.instances_mut(&None).refresh_token = Some("r1".to_string());
        store.instances_mut(&Some("staging".to_string())).access_token = Some("a2".to_string());
        write_tokens(&store, path).expect("failed to write tokens");

        let mut back = read_tokens(path).expect("failed to read tokens");
        assert_eq!(back, store);
        assert_eq!(
            back.instances(&Some("staging".to_string()))
                .and_then(|i| i.access_token.as_deref()),
            Some("a2")
        );

        assert!(back.clear(&None));
        assert!(!back.clear(&None));
        assert_eq!(back.instance_names().collect::<Vec<_>>(), vec!["staging"]);
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("tokens");
        let path_str = path.to_str().expect("tempdir path is not utf8");
        write_tokens(&TokenStore::default(), path_str).expect("failed to write tokens");
        let mode = std::fs::metadata(&path)
            .expect("failed to stat tokens")
            .permissions()
            .mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn test_corrupt_token_file_is_an_error() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("tokens");
        std::fs::write(&path, "{not json").expect("failed to write");
        assert!(read_tokens(path.to_str().expect("utf8")).is_err());
    }
}
