//! Render credentials.

/// What the render client needs from the user's settings.
///
/// Passed explicitly to every dispatch; there is no global key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RenderCredentials {
    api_key: Option<String>,
    pub use_proxy: bool,
}

impl RenderCredentials {
    pub fn new(api_key: Option<String>, use_proxy: bool) -> Self {
        Self {
            api_key: api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            use_proxy,
        }
    }

    /// The trimmed key, if one is set.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Replace the key; `None` or a blank key clears it.
    pub fn set_api_key(&mut self, api_key: Option<String>) {
        *self = Self::new(api_key, self.use_proxy);
    }
}

impl std::fmt::Debug for RenderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("use_proxy", &self.use_proxy)
            .finish()
    }
}
