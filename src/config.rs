//! Server configuration.
//!
//! [`Settings`] is the file/environment view, deserialized from YAML.
//! [`ServerConfig`] is the runtime view the dispatcher reads: built once
//! through [`ServerConfigBuilder`], then shared behind an `Arc` and never
//! mutated while connections are served.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::dispatch::filter::FilterMapping;
use crate::dispatch::provider::ResourceProvider;
use crate::http::request::Method;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const CONFIG_ENV: &str = "WICKET_CONFIG";
pub const LISTEN_ENV: &str = "LISTEN";

/// Settings as written in the YAML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub listen_addr: String,
    pub keep_alive: bool,
    pub signature: String,
    pub supported_methods: Vec<String>,
    pub directory_index: Vec<String>,
    pub document_root: Option<PathBuf>,
    pub error_documents: ErrorDocuments,
    pub filters: Vec<FilterSettings>,
}

/// Optional HTML documents served as error bodies.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorDocuments {
    pub not_found: Option<PathBuf>,
    pub forbidden: Option<PathBuf>,
}

/// One filter mapping declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    pub include: String,
    #[serde(default)]
    pub exclude: Option<String>,
    pub filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            keep_alive: true,
            signature: default_signature(),
            supported_methods: vec!["GET".into(), "HEAD".into(), "POST".into()],
            directory_index: vec!["index.html".into(), "index.htm".into()],
            document_root: None,
            error_documents: ErrorDocuments::default(),
            filters: Vec::new(),
        }
    }
}

pub fn default_signature() -> String {
    format!("wicket/{}", env!("CARGO_PKG_VERSION"))
}

impl Settings {
    /// Loads settings from `path` if given, otherwise from `$WICKET_CONFIG`
    /// if set, otherwise defaults. `$LISTEN` overrides the listen address.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let path = path.map(Path::to_path_buf).or(from_env);

        let mut settings = match path {
            Some(path) => Self::from_file(&path)?,
            None => Settings::default(),
        };

        if let Ok(listen) = std::env::var(LISTEN_ENV) {
            settings.listen_addr = listen;
        }

        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parses the configured method names.
    pub fn methods(&self) -> Result<Vec<Method>> {
        self.supported_methods
            .iter()
            .map(|m| Method::parse(m).with_context(|| format!("Invalid HTTP method {m:?}")))
            .collect()
    }

    /// Compiles the configured filter mappings.
    pub fn filter_mappings(&self) -> Result<Vec<FilterMapping>> {
        self.filters
            .iter()
            .map(|f| {
                FilterMapping::new(&f.include, f.exclude.as_deref(), f.filter.clone())
                    .with_context(|| format!("Invalid pattern in filter {:?}", f.filter))
            })
            .collect()
    }
}

/// Read-only configuration shared by every dispatcher.
pub struct ServerConfig {
    providers: Vec<Arc<dyn ResourceProvider>>,
    directory_index: Vec<String>,
    supported_methods: Vec<Method>,
    keep_alive: bool,
    signature: String,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("directory_index", &self.directory_index)
            .field("supported_methods", &self.supported_methods)
            .field("keep_alive", &self.keep_alive)
            .field("signature", &self.signature)
            .finish()
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Providers in resolution order.
    pub fn providers(&self) -> &[Arc<dyn ResourceProvider>] {
        &self.providers
    }

    /// Index file names in resolution order.
    pub fn directory_index(&self) -> &[String] {
        &self.directory_index
    }

    pub fn supported_methods(&self) -> &[Method] {
        &self.supported_methods
    }

    pub fn is_method_supported(&self, method: &Method) -> bool {
        self.supported_methods.contains(method)
    }

    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// Assembles a [`ServerConfig`].
pub struct ServerConfigBuilder {
    providers: Vec<Arc<dyn ResourceProvider>>,
    directory_index: Vec<String>,
    supported_methods: Vec<Method>,
    keep_alive: bool,
    signature: String,
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            directory_index: Vec::new(),
            supported_methods: vec![Method::GET, Method::HEAD],
            keep_alive: true,
            signature: default_signature(),
        }
    }
}

impl ServerConfigBuilder {
    /// Starts from file settings: index names, methods, keep-alive and
    /// signature. Providers are added separately.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            providers: Vec::new(),
            directory_index: settings.directory_index.clone(),
            supported_methods: settings.methods()?,
            keep_alive: settings.keep_alive,
            signature: settings.signature.clone(),
        })
    }

    /// Appends a provider; earlier providers win.
    pub fn provider(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn directory_index<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.directory_index = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn supported_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.supported_methods = methods.into_iter().collect();
        self
    }

    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    pub fn build(self) -> ServerConfig {
        ServerConfig {
            providers: self.providers,
            directory_index: self.directory_index,
            supported_methods: self.supported_methods,
            keep_alive: self.keep_alive,
            signature: self.signature,
        }
    }
}
