mod logging;

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use charfinder::{read_options, MimeType, Options, Resolver};
use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files to inspect
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long)]
    debug: bool,

    /// Read options from a configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use this mime type instead of guessing it from the file name, e.g. text/x-python
    #[arg(short, long, value_name = "MIME")]
    mime: Option<String>,

    /// Only report whether each file is text or binary
    #[arg(short, long, conflicts_with = "print")]
    text: bool,

    /// Print the contents decoded to UTF-8
    #[arg(short, long)]
    print: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::setup(cli.debug) {
        eprintln!("Failed to setup logging: {e}");
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns false if some file could not be read
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let options = match &cli.config {
        Some(path) => {
            read_options(path).with_context(|| format!("Failed to read config {path:?}"))?
        }
        None => Options::default(),
    };
    let resolver = Resolver::new(&options)?;
    let mime = cli
        .mime
        .as_deref()
        .map(str::parse::<MimeType>)
        .transpose()?;

    let mut all_read = true;
    for path in &cli.files {
        let result = if cli.print {
            print(&resolver, path, mime.as_ref())
        } else {
            report(&resolver, path, mime.as_ref(), cli.text)
        };

        if let Err(e) = result {
            log::error!("{}: {e}", path.display());
            all_read = false;
        }
    }

    Ok(all_read)
}

fn report(
    resolver: &Resolver,
    path: &Path,
    mime: Option<&MimeType>,
    text: bool,
) -> anyhow::Result<()> {
    let mut file = fs::File::open(path)?;
    let guessed = resolver.guess_mime(path);
    let mime = mime.or(guessed.as_ref());

    if text {
        let kind = if resolver.detect_text(&mut file, Some(path), mime) {
            "text"
        } else {
            "binary"
        };
        println!("{}: {kind}", path.display());
    } else {
        let found = resolver.detect(&mut file, Some(path), mime);
        println!("{}: {} ({})", path.display(), found.name(), found.layer());
    }

    Ok(())
}

fn print(resolver: &Resolver, path: &Path, mime: Option<&MimeType>) -> anyhow::Result<()> {
    let doc = resolver.load_as(path, mime)?;
    print!("{}", doc.text());
    Ok(())
}
