//! Runtime settings.
//!
//! Every setting can come from a flag, an environment variable or a `.env`
//! file, in that order of precedence.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;

use crate::catalog::{BuiltinCatalog, FallbackCatalog, JsonFileCatalog, ProductCatalog};

/// Store settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// JSON file holding every order
    #[arg(long, env = "PIZZERIA_ORDERS_FILE", default_value = "orders.json")]
    pub orders_file: PathBuf,

    /// JSON menu to use instead of the house menu
    #[arg(long, env = "PIZZERIA_CATALOG_FILE")]
    pub catalog_file: Option<PathBuf>,

    /// Seconds between kitchen board refreshes
    #[arg(long, env = "PIZZERIA_REFRESH_SECS", default_value_t = 5)]
    pub refresh_secs: u64,

    /// Pending requests the order actor will queue
    #[arg(long, env = "PIZZERIA_CHANNEL_CAPACITY", default_value_t = 32)]
    pub channel_capacity: usize,
}

impl Settings {
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }

    /// The configured menu file, or the house menu when it is unset or empty.
    pub fn catalog(&self) -> Arc<dyn ProductCatalog> {
        match &self.catalog_file {
            Some(path) => Arc::new(FallbackCatalog::new(JsonFileCatalog::new(path), BuiltinCatalog)),
            None => Arc::new(BuiltinCatalog),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        settings: Settings,
    }

    fn parse<I, T>(args: I) -> Result<Settings, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Cli::try_parse_from(args).map(|cli| cli.settings)
    }

    #[test]
    fn test_flags_override_defaults() {
        let settings = parse([
            "pizzeria",
            "--orders-file",
            "/tmp/pedidos.json",
            "--refresh-secs",
            "0",
            "--channel-capacity",
            "4",
        ])
        .unwrap();

        assert_eq!(settings.orders_file, PathBuf::from("/tmp/pedidos.json"));
        assert_eq!(settings.channel_capacity, 4);
        assert_eq!(settings.refresh_period(), Duration::from_secs(1));
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let result = parse(["pizzeria", "--refresh-secs", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_catalog_file_uses_house_menu() {
        let dir = tempfile::tempdir().unwrap();
        let settings = parse([
            "pizzeria".into(),
            "--catalog-file".into(),
            dir.path().join("absent.json").into_os_string(),
        ])
        .unwrap();

        assert_eq!(settings.catalog().products().len(), 11);
    }
}
