use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use toak::{Options, Pipeline};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "toak",
    version,
    about = "A CLI tool for tokenizing git repositories into markdown files",
    long_about = "Tokenize a git repository into a single LLM-ready markdown document.\n\n\
    Tracked files are filtered through layered exclusions and hierarchical \
    .toak-ignore files, mechanically cleaned, stripped of credential-shaped \
    content, and assembled into one fenced-section markdown file together \
    with a token count.\n\n\
    USAGE EXAMPLES:\n  \
      # Process the current directory\n  \
      toak\n\n  \
      # Process a specific project into a custom file\n  \
      toak --dir ./my-project --output-file-path ./ctx.md\n\n  \
      # Append a canned review prompt instead of the todo file\n  \
      toak --prompt code-review"
)]
struct Cli {
    /// Project directory to process
    #[arg(long, short = 'd', value_name = "PATH")]
    dir: Option<PathBuf>,

    /// Output file path for the generated markdown
    #[arg(long, short = 'o', value_name = "PATH")]
    output_file_path: Option<PathBuf>,

    /// Disable verbose output
    #[arg(long)]
    quiet: bool,

    /// Preset prompt name or free-form appendix text
    #[arg(long, short = 'p', value_name = "PROMPT")]
    prompt: Option<String>,
}

impl Cli {
    fn verbose(&self) -> bool {
        !self.quiet
    }

    fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    fn output_file_path(&self) -> PathBuf {
        self.output_file_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("prompt.md"))
    }
}

fn main() -> anyhow::Result<()> {
    // a bare `version` word behaves like --version
    if std::env::args().nth(1).as_deref() == Some("version") {
        println!("toak {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let cli = Cli::parse();

    setup_tracing(cli.verbose())?;

    let mut builder = Options::builder()
        .dir(cli.dir())
        .output_file_path(cli.output_file_path())
        .verbose(cli.verbose());

    if let Some(prompt) = cli.prompt {
        builder = builder.todo_prompt(prompt);
    }

    let options = builder.build().context("Failed to build configuration")?;

    let pipeline = Pipeline::new(options).context("Failed to create pipeline")?;
    let result = pipeline.create_markdown_document();

    if !result.success {
        if let Some(error) = result.error {
            eprintln!("Error: {error}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn setup_tracing(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("toak=info")
    } else {
        EnvFilter::new("toak=warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();

    Ok(())
}
