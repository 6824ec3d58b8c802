use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use addonman::commands::{self, Config};
use addonman::runtime::RealRuntime;

/// addonman - Editor add-on manager
///
/// Installs add-on packages (zip archives carrying an install.inf manifest)
/// into an editor installation and keeps track of them in
/// settings/packages.ini.
///
/// Examples:
///   addonman list                                    # Show installed add-ons
///   addonman install https://host/plugin.Foo.zip plugin.Foo.zip 1.2
///   addonman remove cuda_foo                         # Move a plugin to the trash
#[derive(Parser, Debug)]
#[command(author, version = env!("ADDONMAN_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Application root directory (defaults to <config dir>/cudatext; also via ADDONMAN_ROOT)
    #[arg(
        long = "root",
        short = 'r',
        env = "ADDONMAN_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub root: Option<PathBuf>,

    /// Directory receiving removed add-ons (defaults to <root>/py/__trash; also via ADDONMAN_TRASH)
    #[arg(long = "trash", env = "ADDONMAN_TRASH", value_name = "PATH", global = true)]
    pub trash: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List installed add-ons
    List(ListArgs),

    /// List installed plugin modules
    Modules,

    /// List installed lexers
    Lexers,

    /// Show how a package archive would be installed
    Inspect(InspectArgs),

    /// Install a package archive and record it
    Install(PackageArgs),

    /// Record a package archive as installed without unpacking it
    Register(PackageArgs),

    /// Print the recorded version of a package
    Version(UrlArgs),

    /// Print the registry record of a package
    Record(UrlArgs),

    /// Remove an installed add-on
    Remove(RemoveArgs),

    /// Show details of an installed plugin
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Package archive
    #[arg(value_name = "ZIP")]
    pub archive: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct PackageArgs {
    /// URL the package was downloaded from; its last segment identifies the package
    #[arg(value_name = "URL")]
    pub url: String,

    /// Package archive
    #[arg(value_name = "ZIP")]
    pub archive: PathBuf,

    /// Version to record
    #[arg(value_name = "VERSION", default_value = "")]
    pub version: String,
}

#[derive(clap::Args, Debug)]
pub struct UrlArgs {
    /// Package URL or identifier
    #[arg(value_name = "URL")]
    pub url: String,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Plugin module or add-on name; prompts for a plugin when omitted
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Plugin module name, e.g. cuda_foo
    #[arg(value_name = "MODULE")]
    pub module: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let Cli {
        command,
        root,
        trash,
    } = Cli::parse();
    let runtime = RealRuntime;
    let config = || Config::new(&RealRuntime, root, trash);

    match command {
        Commands::List(args) => commands::list(runtime, config()?, args.json)?,
        Commands::Modules => commands::modules(runtime, config()?)?,
        Commands::Lexers => commands::lexers(runtime, config()?)?,
        Commands::Inspect(args) => commands::inspect(runtime, &args.archive)?,
        Commands::Install(args) => {
            commands::install(runtime, &args.url, &args.archive, &args.version, config()?)?
        }
        Commands::Register(args) => {
            commands::register(runtime, &args.url, &args.archive, &args.version, config()?)?
        }
        Commands::Version(args) => commands::version(runtime, &args.url, config()?)?,
        Commands::Record(args) => commands::record(runtime, &args.url, config()?)?,
        Commands::Remove(args) => {
            commands::remove(runtime, args.name.as_deref(), args.yes, config()?)?
        }
        Commands::Show(args) => commands::show(runtime, &args.module, config()?)?,
    }
    Ok(())
}
