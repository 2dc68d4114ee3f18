use crate::{
    cli::{Config, actions::Action, commands, location::S3Location},
    s3::S3,
};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// # Errors
///
/// Will return `Err` if the config directory can not be created
pub fn get_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));

    let config_path = Path::new(&home_dir).join(".config").join("s3kit");
    fs::create_dir_all(&config_path)
        .context(format!("unable to create: {}", &config_path.display()))?;

    Ok(config_path)
}

// return the destination and the action of the subcommand
fn dispatch(matches: &ArgMatches) -> Result<(S3Location, Action)> {
    let (name, sub_m) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing command, try {}", "--help".green()))?;

    let location = S3Location::parse(
        sub_m
            .get_one::<String>("location")
            .context("location missing")?,
    )?;

    let bucket = location.bucket.clone();
    let key = location.key.clone();

    let action = match name {
        "put" => Action::PutObject {
            bucket,
            key,
            file: sub_m.get_one::<PathBuf>("file").cloned(),
            part_size: sub_m.get_one::<u64>("part-size").copied().unwrap_or_default(),
            max_requests: sub_m.get_one::<u8>("parallel").copied().unwrap_or(1),
            content_type: sub_m.get_one::<String>("content-type").cloned(),
        },

        "get" => Action::GetObject {
            bucket,
            key,
            file: sub_m
                .get_one::<PathBuf>("file")
                .cloned()
                .context("file missing")?,
        },

        "compose" => {
            let sources = sub_m
                .get_many::<String>("sources")
                .unwrap_or_default()
                .map(|src| S3Location::parse(src))
                .collect::<Result<Vec<S3Location>>>()?;

            if let Some(src) = sources.iter().find(|src| src.host != location.host) {
                return Err(anyhow!(
                    "source {} must be on host {}",
                    src.host.red(),
                    location.host
                ));
            }

            Action::ComposeObject {
                bucket,
                key,
                sources,
            }
        }

        "share" => Action::ShareObject {
            bucket,
            key,
            expire: sub_m.get_one::<u64>("expire").copied().unwrap_or(43_200),
        },

        other => return Err(anyhow!("unknown command: {other}")),
    };

    Ok((location, action))
}

/// Parse the command line, set up logging and build the client of the host
///
/// # Errors
///
/// Will return `Err` if the config file or the arguments are invalid
pub fn start() -> Result<(S3, Action)> {
    let config_path = get_config_path()?;

    // start the command line interface
    let matches = commands::new(&config_path).get_matches();

    let verbosity_level = match matches.get_count("verbose") {
        0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(verbosity_level)
        .init();

    let config_file = matches
        .get_one::<PathBuf>("config")
        .context("no config file found")?;

    log::info!("config file: {}", config_file.display());

    // load the config file
    let config = Config::new(config_file)?;

    log::debug!("config: {config:#?}");

    let (location, action) = dispatch(&matches)?;

    let host = config.get_host(&location.host).map_err(|_| {
        anyhow!(
            "could not find host: \"{}\". Check config file {}, For more information try {}",
            location.host.red(),
            config_file.display(),
            "--help".green()
        )
    })?;

    let s3 = host.client(matches.get_flag("no-sign-request"))?;

    log::debug!("action: {action:#?}");

    Ok((s3, action))
}
