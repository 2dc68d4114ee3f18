use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
    value_parser,
};
use std::{cmp, path::Path};

fn location(help: &'static str) -> Arg {
    Arg::new("location").help(help).required(true).num_args(1)
}

pub fn new(config_path: &Path) -> Command {
    // get config file path (default: ~/.config/s3kit/config.yml)
    let config_file_path = config_path.join("config.yml");

    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    // physical cores - 2, at least 1
    let num_threads = cmp::min(
        num_cpus::get_physical().saturating_sub(2).max(1),
        usize::from(u8::MAX),
    )
    .to_string();

    Command::new("s3kit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Client for S3-compatible object storage")
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .default_value(config_file_path.into_os_string())
                .env("S3KIT_CONFIG")
                .long("config")
                .short('c')
                .global(true)
                .num_args(1)
                .value_parser(value_parser!(std::path::PathBuf))
                .value_name("config.yml"),
        )
        .arg(
            Arg::new("verbose")
                .help("Verbosity level")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("no-sign-request")
                .help("Make requests as anonymous user (no credentials used)")
                .long("no-sign-request")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(put_command(num_threads))
        .subcommand(get_command())
        .subcommand(compose_command())
        .subcommand(share_command())
}

fn put_command(num_threads: String) -> Command {
    Command::new("put")
        .about("Upload a file, or STDIN when no file is given")
        .arg(location("<s3 provider>/<bucket>/<key>"))
        .arg(
            Arg::new("file")
                .help("/path/to/file")
                .num_args(1)
                .value_parser(value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("part-size")
                .help("Part size in bytes, required by STDIN")
                .long("part-size")
                .short('s')
                .default_value("10485760")
                .num_args(1)
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("parallel")
                .help("Number of max concurrent requests")
                .short('n')
                .long("parallel")
                .default_value(num_threads)
                .value_parser(value_parser!(u8).range(1..=255))
                .num_args(1),
        )
        .arg(Arg::new("content-type").long("content-type").num_args(1))
}

fn get_command() -> Command {
    Command::new("get")
        .about("Download an object")
        .arg(location("<s3 provider>/<bucket>/<key>"))
        .arg(
            Arg::new("file")
                .help("/path/to/file")
                .required(true)
                .num_args(1)
                .value_parser(value_parser!(std::path::PathBuf)),
        )
}

fn compose_command() -> Command {
    Command::new("compose")
        .about("Create an object from other objects with server-side copies")
        .arg(location("<s3 provider>/<bucket>/<key> of the new object"))
        .arg(
            Arg::new("sources")
                .help("<s3 provider>/<bucket>/<key> of each source, in order")
                .required(true)
                .num_args(1..),
        )
}

fn share_command() -> Command {
    Command::new("share")
        .about("Share object using a presigned URL")
        .arg(location("<s3 provider>/<bucket>/<key>"))
        .arg(
            Arg::new("expire")
                .help("Time period in seconds, max value 604800 (seven days)")
                .long("expire")
                .short('e')
                .default_value("43200")
                .num_args(1)
                .value_parser(value_parser!(u64)),
        )
}
