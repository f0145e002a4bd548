use clap::Parser;

mod cli;
mod config;
mod setup;

fn main() -> anyhow::Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Unable to load .env file: {err}");
        }
    }
    env_logger::init();
    let args = cli::Cli::parse();
    let cfg = config::Config::try_load_from_file_or_default(args.config.as_ref())?;
    cli::run(args, cfg)
}
