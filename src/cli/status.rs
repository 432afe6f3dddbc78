//! Status command implementation

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "pulpcheck Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    let loaded = Config::load_from(config_path.clone())
        .and_then(|config| config.with_overrides(opts.base_url_ref(), None));

    match loaded {
        Ok(config) => {
            println!("Config file: {}", config_path.display().to_string().cyan());
            println!();
            print!("{}", describe(&config)?);
            println!();
        }
        Err(err) => {
            println!("{} Configuration not usable: {}", "✗".red(), err);
            println!();
            println!(
                "Create {} with a base_url and auth credentials.",
                config_path.display().to_string().cyan()
            );
            println!();
        }
    }

    Ok(())
}

/// Status lines for a loaded config. Never includes the password.
fn describe(config: &Config) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("{} Server: {}\n", "✓".green(), config.base_url.cyan()));
    out.push_str(&format!("{} Username: {}\n", "✓".green(), config.auth.username));
    out.push_str(&format!("{} Auth mode: {:?}\n", "○".dimmed(), config.auth_mode));

    match config.unsupported_reason()? {
        None => out.push_str(&format!(
            "{} API version: {}\n",
            "✓".green(),
            config.api_version
        )),
        Some(reason) => out.push_str(&format!(
            "{} API version: {} ({})\n",
            "⚠".yellow(),
            config.api_version,
            reason
        )),
    }

    out.push_str(&format!("{} Fixtures: {}\n", "○".dimmed(), config.fixtures_url));
    if config.clean_artifacts {
        out.push_str(&format!(
            "{} Existing artifacts are removed before the content-unit scenario\n",
            "⚠".yellow()
        ));
    }
    Ok(out)
}
