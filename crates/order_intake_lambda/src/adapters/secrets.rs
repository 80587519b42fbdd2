use std::sync::OnceLock;

pub trait SecretProvider {
    fn get_secret(&self, secret_name: &str) -> Result<String, String>;
}

/// Signing secret memoized for the lifetime of one execution context.
///
/// The provider is called until a fetch succeeds; afterwards the cached value
/// is returned without touching the provider again. Failed fetches are not
/// cached.
#[derive(Debug)]
pub struct SecretCache {
    secret_name: String,
    value: OnceLock<String>,
}

impl SecretCache {
    pub fn new(secret_name: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            value: OnceLock::new(),
        }
    }

    pub fn get_or_fetch(&self, provider: &dyn SecretProvider) -> Result<&str, String> {
        if let Some(value) = self.value.get() {
            return Ok(value.as_str());
        }

        let fetched = provider.get_secret(&self.secret_name)?;
        Ok(self.value.get_or_init(|| fetched).as_str())
    }
}
