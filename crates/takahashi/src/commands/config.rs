use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::{Config, Settings};
use crate::parser::Metadata;

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> anyhow::Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    let effective = Settings::resolve(&config, &Metadata::new());

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("  {}", "(not created yet, showing built-in defaults)".dimmed());
    }
    println!();
    println!("{}", "Defaults:".bold());
    print_setting("theme", &effective.theme);
    print_setting("font", &effective.font);
    print_setting("animations", &effective.animations.to_string());
    println!();
    println!(
        "{}",
        "A deck's own `theme:` and `font:` metadata override these.".dimmed()
    );
    Ok(())
}

fn print_setting(name: &str, value: &str) {
    println!("  defaults.{:<12} {}", name, value.cyan());
}

fn set(key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} Set {key} = {value} ({})",
        "\u{2713}".green().bold(),
        path.display()
    );
    Ok(())
}
