use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

use crate::cli::parser::Commands;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        let path = Config::config_file();

        // ---- PRINT CONFIG ----
        if *print_config {
            println!("📄 Current configuration:\n");
            println!(
                "{}",
                serde_yaml::to_string(&cfg)
                    .map_err(|e| crate::errors::AppError::Config(e.to_string()))?
            );
        }

        // ---- CHECK CONFIG ----
        if *check {
            if !path.exists() {
                warning(format!(
                    "No config file at {}; defaults are in effect. Run 'campusgate init' to create one.",
                    path.display()
                ));
                return Ok(());
            }

            if !std::path::Path::new(&cfg.database).exists() {
                warning(format!(
                    "Configured database does not exist yet: {}",
                    cfg.database
                ));
            }

            // reject silently-misparsed values early
            if crate::utils::time::parse_time(&cfg.after_hours_cutoff).is_none() {
                warning(format!(
                    "after_hours_cutoff '{}' is not a valid HH:MM time (falling back to 18:00)",
                    cfg.after_hours_cutoff
                ));
            }

            if cfg.repeated_failure_threshold < 1 {
                warning(format!(
                    "repeated_failure_threshold {} is below 1, every student would be flagged",
                    cfg.repeated_failure_threshold
                ));
            }

            success("Configuration file is valid.");
        }
    }

    Ok(())
}
