//! Site configuration management for `folio.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── category   # [[categories]] validation
//! │   ├── serve      # [serve]
//! │   ├── site       # [site]
//! │   └── theme      # [theme]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # SiteConfig (this file)
//! ```

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{BuildConfig, ServeConfig, SiteSectionConfig, ThemeConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    content::ContentStore,
    log,
    site::Catalog,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSectionConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    /// Static category catalog; the built-in list when absent.
    #[serde(default)]
    pub categories: Catalog,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// For non-Init commands, searches upward from cwd to find config file.
    /// The project root is determined by the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        if !cli.is_init() && !exists {
            bail!(
                "config file '{}' not found, run 'folio init' to create a new project",
                cli.config.display()
            );
        }

        let mut config = if exists && !cli.is_init() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        config.config_path = config_path;
        config.finalize(cli);

        if !cli.is_init() {
            config.validate()?;
        }

        Ok(config)
    }

    /// Resolve config file path based on command.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        match &cli.command {
            Commands::Init { name } => {
                let base = name.as_ref().map_or_else(|| cwd.clone(), |n| cwd.join(n));
                let path = base.join(&cli.config);
                let exists = path.exists();
                Ok((path, exists))
            }
            _ => match find_config_file(&cli.config) {
                Some(path) => Ok((path, true)),
                None => Ok((cwd.join(&cli.config), false)),
            },
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.set_root(&root);
        self.apply_path_overrides(cli);
        self.apply_command_options(cli);
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Run every section's checks and report them together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.site.validate(&mut diag);
        self.build.validate(&mut diag);
        self.theme.validate(&mut diag);
        section::category::validate(&self.categories, &mut diag);

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// Join a path with the root directory.
    ///
    /// Absolute paths are returned unchanged.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get path relative to the site root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    pub fn content_dir(&self) -> PathBuf {
        self.root_join(&self.build.content)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root_join(&self.build.output)
    }

    /// Content store rooted at the configured content directory.
    pub fn store(&self) -> ContentStore {
        ContentStore::new(self.content_dir(), self.build.extension.clone())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// `--content` and `--output` are relative to the project root.
    fn apply_path_overrides(&mut self, cli: &Cli) {
        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } => self.apply_build_args(build_args),
            Commands::Serve {
                build_args,
                interface,
                port,
            } => {
                self.apply_build_args(build_args);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Init { .. } | Commands::Query { .. } => {}
        }
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        if args.clean {
            self.build.clean = true;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }
}

/// Parse a config snippet the way `load` would, minus the filesystem.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let (config, _) = SiteConfig::parse_with_ignored(extra).unwrap();
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::net::{IpAddr, Ipv4Addr};

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("folio").chain(args.iter().copied()))
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (config, ignored) =
            SiteConfig::parse_with_ignored("[build]\nextension = \"md\"\nminify = true\n[deploy]\nx = 1")
                .unwrap();
        assert_eq!(config.build.extension, "md");
        assert_eq!(ignored, ["build.minify", "deploy"]);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            SiteConfig::parse_with_ignored("[build"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = test_parse_config("[serve]\nport = 4000");
        config.config_path = PathBuf::from("/site/folio.toml");
        config.finalize(&cli(&[
            "--content",
            "notes",
            "serve",
            "--clean",
            "-p",
            "9000",
            "-i",
            "0.0.0.0",
        ]));

        assert_eq!(config.root, PathBuf::from("/site"));
        assert_eq!(config.content_dir(), PathBuf::from("/site/notes"));
        assert_eq!(config.output_dir(), PathBuf::from("/site/public"));
        assert_eq!(config.serve.port, 9000);
        assert_eq!(config.serve.interface, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert!(config.build.clean);
    }

    #[test]
    fn test_no_override_keeps_config() {
        let mut config = test_parse_config("[serve]\nport = 4000\n[build]\nclean = true");
        config.config_path = PathBuf::from("/site/folio.toml");
        config.finalize(&cli(&["serve"]));
        assert_eq!(config.serve.port, 4000);
        assert!(config.build.clean);
    }

    #[test]
    fn test_validate_collects_all() {
        let config = test_parse_config(
            "[build]\nextension = \".mdx\"\n[theme]\nstorage_key = \"\"\n[[categories]]\nslug = \"a b\"\nlabel = \"A\"",
        );
        match config.validate() {
            Err(ConfigError::Diagnostics(diag)) => assert_eq!(diag.len(), 3),
            other => panic!("expected diagnostics, got {other:?}"),
        }
    }

    #[test]
    fn test_port_zero_is_valid() {
        let mut config = test_parse_config("[serve]\nport = 4000");
        config.config_path = PathBuf::from("/site/folio.toml");
        config.finalize(&cli(&["serve", "--port", "0"]));
        assert_eq!(config.serve.port, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SiteConfig::default().validate().is_ok());
    }
}
