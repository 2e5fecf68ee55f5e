use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use mediahub_config::ConfigManager;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

fn build_cli() -> Command {
    Command::new("mediahub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage the configuration of a MediaHub media server")
        .arg(
            Arg::new("config-dir")
                .short('c')
                .long("config-dir")
                .value_name("DIR")
                .help("Config directory (defaults to the platform config directory)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(Command::new("init").about("Write a default config file if none exists"))
        .subcommand(
            Command::new("show")
                .about("Print the effective configuration, including environment overrides")
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .value_parser(["toml", "json"])
                        .default_value("toml"),
                ),
        )
        .subcommand(Command::new("validate").about("Check the config file for invalid values"))
        .subcommand(
            Command::new("reset")
                .about("Back up the current config and restore the defaults"),
        )
        .subcommand(
            Command::new("set-port")
                .about("Change the server ports")
                .arg(
                    Arg::new("http")
                        .long("http")
                        .value_name("PORT")
                        .required(true)
                        .value_parser(value_parser!(u16).range(1..)),
                )
                .arg(
                    Arg::new("websocket")
                        .long("websocket")
                        .value_name("PORT")
                        .value_parser(value_parser!(u16).range(1..)),
                ),
        )
        .subcommand(Command::new("backup").about("Take a timestamped backup of the config"))
        .subcommand(Command::new("backups").about("List config backups, newest first"))
        .subcommand(
            Command::new("restore")
                .about("Restore the config from a backup")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_name("FILE")
                        .help("Backup file name or path")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("sort-name")
                .about("Print the sort name the current rules produce")
                .arg(Arg::new("name").required(true).value_name("NAME").action(ArgAction::Set)),
        )
        .subcommand(
            Command::new("meta-location")
                .about("Print where metadata for a book at PATH is kept")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_name("PATH")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
}

fn config_manager(dir: Option<&PathBuf>) -> Result<ConfigManager> {
    match dir {
        Some(dir) => Ok(ConfigManager::with_directory(dir)),
        None => ConfigManager::new().context("Failed to locate the config directory"),
    }
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = build_cli().get_matches();
    let manager = config_manager(matches.get_one::<PathBuf>("config-dir"))?;
    log::debug!("Using config file {}", manager.config_path().display());
    let mut out = std::io::stdout().lock();
    let mut exit = ExitCode::SUCCESS;

    match matches.subcommand() {
        Some(("init", _)) => commands::init(&manager, &mut out)?,
        Some(("show", sub)) => {
            let format = sub
                .get_one::<String>("format")
                .map(String::as_str)
                .unwrap_or("toml");
            commands::show(&manager, format, &mut out)?
        }
        Some(("validate", _)) => {
            if !commands::validate(&manager, &mut out)? {
                exit = ExitCode::FAILURE;
            }
        }
        Some(("reset", _)) => commands::reset(&manager, &mut out)?,
        Some(("set-port", sub)) => {
            let http = *sub
                .get_one::<u16>("http")
                .ok_or_else(|| anyhow::anyhow!("HTTP port is required"))?;
            let websocket = sub.get_one::<u16>("websocket").copied();
            commands::set_port(&manager, http, websocket, &mut out)?
        }
        Some(("backup", _)) => commands::backup(&manager, &mut out)?,
        Some(("backups", _)) => commands::list_backups(&manager, &mut out)?,
        Some(("restore", sub)) => {
            let file = sub
                .get_one::<PathBuf>("file")
                .ok_or_else(|| anyhow::anyhow!("Backup file is required"))?;
            commands::restore(&manager, file, &mut out)?
        }
        Some(("sort-name", sub)) => {
            let name = sub
                .get_one::<String>("name")
                .ok_or_else(|| anyhow::anyhow!("Name is required"))?;
            commands::sort_name(&manager, name, &mut out)?
        }
        Some(("meta-location", sub)) => {
            let path = sub
                .get_one::<PathBuf>("path")
                .ok_or_else(|| anyhow::anyhow!("Path is required"))?;
            commands::meta_location(path, &mut out)?
        }
        _ => {
            build_cli().print_help()?;
        }
    }

    out.flush()?;
    Ok(exit)
}
