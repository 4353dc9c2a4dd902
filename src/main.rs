use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use keyframes2json::{
    config::{self, ConfigFile, PathPair, RunConfig},
    logger, ConvertError, DuplicateNames,
};
use log::LevelFilter;

#[derive(clap::Parser)]
#[clap(version, about)]
struct Args {
    /// Input stylesheet, must end with `.css`
    input: PathBuf,

    /// Output file, must end with `.json`
    output: PathBuf,

    /// TOML config file
    #[clap(long)]
    config: Option<PathBuf>,

    /// Resolve relative paths against this directory instead of the program's own
    #[clap(long)]
    base_dir: Option<PathBuf>,

    /// How to combine `@keyframes` rules sharing a name
    #[clap(long, value_enum)]
    duplicate_names: Option<DuplicateNames>,

    /// Pretty-print the output
    #[clap(long)]
    pretty: bool,

    /// Log more (`-v` for debug, `-vv` for trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8, configured: Option<LevelFilter>) -> LevelFilter {
    match verbose {
        0 => configured.unwrap_or(LevelFilter::Info),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

async fn convert(args: Args) -> Result<PathBuf, ConvertError> {
    let file_config = match &args.config {
        Some(path) => ConfigFile::load(path).await,
        None => Ok(ConfigFile::default()),
    };
    let file_config = file_config.inspect_err(|_| logger::set_level(log_level(args.verbose, None)))?;
    logger::set_level(log_level(args.verbose, file_config.log_level));

    let base_dir = match args.base_dir {
        Some(x) => x,
        None => config::base_dir(file_config.resolve_from)?,
    };
    let paths = PathPair::resolve(&args.input, &args.output, &base_dir)?;
    log::debug!("Converting {} into {}", paths.input.display(), paths.output.display());

    let mut options = file_config.options();
    if let Some(x) = args.duplicate_names {
        options.duplicate_names = x;
    }
    options.pretty |= args.pretty;

    let config = RunConfig { paths, options };
    keyframes2json::run(&config).await?;
    Ok(config.paths.output)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logger::init();
    let args = Args::parse();
    match convert(args).await {
        Ok(output) => {
            println!("success: file created at: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
