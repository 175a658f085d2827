use std::path::Path;

use anyhow::Context;
use clap::Parser;
use qaboard::{Config, Notice};
use tracing::instrument;

use super::terminal::print_notice;

#[derive(Debug, Parser)]
#[command(about = "Write a configuration file with the default settings")]
pub struct Init {
    /// Simulated network delay in milliseconds
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Leave scores untouched when voting
    #[arg(long)]
    no_tally: bool,

    /// Overwrite an existing configuration file
    #[arg(long)]
    force: bool,
}

impl Init {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, path: &Path) -> anyhow::Result<()> {
        if path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite it)",
                path.display()
            );
        }

        let mut config = Config::default();
        if let Some(ms) = self.delay {
            config.set_submit_delay(std::time::Duration::from_millis(ms));
        }
        config.tally_votes = !self.no_tally;

        config
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;

        print_notice(&Notice::new(
            "Configuration written",
            format!("Settings saved to {}.", path.display()),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn writes_a_loadable_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("qa.toml");
        let init = Init {
            delay: Some(0),
            no_tally: true,
            force: false,
        };

        init.run(&path).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.submit_delay(), Duration::ZERO);
        assert!(!config.tally_votes);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("qa.toml");
        std::fs::write(&path, "_version = \"1\"\n").unwrap();

        let keep = Init {
            delay: None,
            no_tally: false,
            force: false,
        };
        assert!(keep.run(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "_version = \"1\"\n");

        let overwrite = Init {
            delay: None,
            no_tally: false,
            force: true,
        };
        overwrite.run(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }
}
