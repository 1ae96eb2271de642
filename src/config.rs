use anyhow::{anyhow, Result};

/// Built into browser bundles at compile time.
const BUILD_API_BASE_URL: Option<&str> = option_env!("PONG_API_BASE_URL");
const BUILD_GOOGLE_CLIENT_ID: Option<&str> = option_env!("PONG_GOOGLE_CLIENT_ID");

pub const DEFAULT_API_BASE_URL: &str = "/api";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebConfig {
    /// Base URL the API client prefixes to every endpoint.
    pub api_base_url: String,
    /// Google Identity Services client id. `None` disables the OAuth button.
    pub google_client_id: Option<String>,
    /// Debug category list (see [`crate::debug`]).
    pub debug: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            google_client_id: None,
            debug: None,
        }
    }
}

impl WebConfig {
    /// Configuration baked in at build time; what the browser bundle uses.
    pub fn from_build_env() -> Self {
        Self {
            api_base_url: BUILD_API_BASE_URL
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            google_client_id: non_empty(BUILD_GOOGLE_CLIENT_ID.map(str::to_string)),
            debug: None,
        }
    }

    /// The client id, if one is configured and non-blank.
    pub fn client_id(&self) -> Option<&str> {
        self.google_client_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// API base as an absolute URL; same-origin paths are joined to `origin`.
    pub fn absolute_api_base(&self, origin: &str) -> String {
        if self.api_base_url.starts_with('/') {
            format!("{}{}", origin.trim_end_matches('/'), self.api_base_url)
        } else {
            self.api_base_url.clone()
        }
    }

    pub fn print_summary(&self) {
        eprintln!("Pong web configuration:");
        eprintln!("  API base URL: {}", self.api_base_url);
        match self.client_id() {
            Some(_) => eprintln!("  Google client id: configured"),
            None => eprintln!("  Google client id: missing (OAuth button disabled)"),
        }
        if let Some(debug) = &self.debug {
            eprintln!("  Debug categories: {debug}");
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

/// Validate the API base URL: absolute http(s) or a same-origin path.
pub fn validate_api_base_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/') {
        Ok(())
    } else {
        Err(anyhow!(
            "{name} must start with http://, https://, or / (same origin)"
        ))
    }
}

#[cfg(feature = "native")]
pub use cli::{load, CliArgs, Command};

#[cfg(feature = "native")]
mod cli {
    use super::*;
    use clap::{Parser, Subcommand};
    use std::env;

    /// Pong web client - route table and headless rendering
    ///
    /// Configuration priority: CLI args > Environment variables > Build-time defaults
    #[derive(Parser, Debug)]
    #[command(name = "pongweb")]
    #[command(version = env!("CARGO_PKG_VERSION"))]
    #[command(about = "Pong web client tooling", long_about = None)]
    pub struct CliArgs {
        /// API base URL (http(s)://... or a same-origin path like /api)
        #[arg(long, env = "PONG_API_BASE_URL")]
        pub api_base_url: Option<String>,

        /// Google Identity Services client id
        #[arg(long, env = "PONG_GOOGLE_CLIENT_ID")]
        pub google_client_id: Option<String>,

        /// Debug categories (comma-separated: router,view,auth,oauth,game,api or all)
        #[arg(long, env = "PONG_DEBUG")]
        pub debug: Option<String>,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
    pub enum Command {
        /// List registered routes in match order
        Routes,
        /// Render a route headlessly and print its title and markup
        Render {
            /// Hash path, e.g. /login or #/login
            path: String,
        },
    }

    /// Load configuration from CLI args and environment variables
    /// Priority: CLI args > Environment variables > Build-time defaults
    pub fn load() -> Result<(WebConfig, Command)> {
        let args = CliArgs::parse();
        let config = resolve(args.api_base_url, args.google_client_id, args.debug)?;
        Ok((config, args.command))
    }

    pub(super) fn resolve(
        api_base_url: Option<String>,
        google_client_id: Option<String>,
        debug: Option<String>,
    ) -> Result<WebConfig> {
        let build = WebConfig::from_build_env();

        let api_base_url = api_base_url
            .or_else(|| env::var("PONG_API_BASE_URL").ok())
            .unwrap_or(build.api_base_url);
        validate_api_base_url(&api_base_url, "PONG_API_BASE_URL")?;

        let google_client_id = non_empty(
            google_client_id.or_else(|| env::var("PONG_GOOGLE_CLIENT_ID").ok()),
        )
        .or(build.google_client_id);

        Ok(WebConfig {
            api_base_url,
            google_client_id,
            debug: debug.or_else(|| env::var("PONG_DEBUG").ok()),
        })
    }
}
