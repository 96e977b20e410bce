use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo nextest with default configuration
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Run the lint and test sequence used before a release
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, release } => run_nextest(profile, release)?,
        Commands::Ci => run_ci()?,
    }
    Ok(())
}

fn run_nextest(profile: Option<String>, release: bool) -> Result<()> {
    let mut args = vec!["nextest".to_owned(), "run".to_owned()];
    if let Some(profile) = profile {
        args.push("--profile".to_owned());
        args.push(profile);
    }
    if release {
        args.push("--release".to_owned());
    }
    run_cargo(&args)
}

fn run_ci() -> Result<()> {
    run_cargo(&["fmt", "--all", "--check"])?;
    run_cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;
    run_cargo(&["nextest", "run", "--workspace"])
}

fn run_cargo<S: AsRef<std::ffi::OsStr>>(args: &[S]) -> Result<()> {
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        let rendered: Vec<_> = args
            .iter()
            .map(|arg| arg.as_ref().to_string_lossy().into_owned())
            .collect();
        anyhow::bail!("cargo {} failed", rendered.join(" "));
    }
    Ok(())
}
