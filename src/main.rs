use eyre::{Result, WrapErr};
use std::path::PathBuf;
use structopt::StructOpt;
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

mod assembly;
mod environment;
mod error;
mod list_stacks;
mod order;
mod output;
mod selection;

use crate::assembly::AssemblyDirectory;
use crate::error::Error;
use crate::list_stacks::{list_stacks, ListStacksOptions};
use crate::output::{OutputFormat, Printer};
use crate::selection::ExtendedSelection;

#[derive(StructOpt)]
#[structopt(about = "List the stacks of a CDK cloud assembly in dependency order")]
struct Opts {
    /// Stack ids or glob patterns, all stacks when omitted
    selectors: Vec<String>,

    /// Directory containing the synthesized cloud assembly
    #[structopt(
        short,
        long,
        default_value = "cdk.out",
        env = "CDK_OUTDIR",
        parse(from_os_str)
    )]
    app: PathBuf,

    #[structopt(
        short,
        long,
        default_value = "ids",
        possible_values = &["ids", "long", "json", "tree"]
    )]
    format: OutputFormat,

    /// Also list the stacks the selected stacks depend on
    #[structopt(short = "e", long)]
    with_dependencies: bool,

    /// Also list the stacks that depend on the selected stacks
    #[structopt(long, conflicts_with = "with-dependencies")]
    with_dependents: bool,
}

impl Opts {
    fn extend(&self) -> ExtendedSelection {
        if self.with_dependencies {
            ExtendedSelection::Upstream
        } else if self.with_dependents {
            ExtendedSelection::Downstream
        } else {
            ExtendedSelection::None
        }
    }
}

async fn run(opts: Opts) -> Result<()> {
    let extend = opts.extend();
    let Opts {
        app,
        selectors,
        format,
        ..
    } = opts;
    let options = ListStacksOptions { selectors, extend };
    tracing::info!(app = %app.display(), selectors = ?options.selectors, "listing stacks");

    let assembly = AssemblyDirectory::new(&app);
    let stacks = list_stacks(&assembly, &options)
        .await
        .wrap_err_with(|| format!("listing stacks in {}", app.display()))?;

    let stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut printer = Printer::new(stdout.lock());
    if let Some((width, _)) = term_size::dimensions() {
        tracing::debug!(width, "terminal width");
        printer = printer.with_width(width);
    }
    printer.print(&stacks, format)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    if let Err(e) = color_eyre::install() {
        tracing::warn!(err = %e, "could not install error reporter");
    }

    let opts = Opts::from_args();

    if let Err(e) = run(opts).await {
        let code = match e.downcast_ref::<Error>() {
            Some(err @ Error::CyclicDependencies(_)) | Some(err @ Error::NoStacksMatch(_)) => {
                eprintln!("{}", err);
                err.exit_code()
            }
            Some(Error::Io(io)) => {
                eprintln!("could not read cloud assembly: {}", io);
                1
            }
            Some(_) | None => {
                eprintln!("{:?}", e);
                1
            }
        };
        std::process::exit(code);
    }
}
