use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "undulate", version, about = "Draw timing diagrams from wave descriptions")]
struct Cli {
    /// Input diagram (JSON, or its relaxed hand-written form).
    #[arg(long, short)]
    input: PathBuf,

    /// Output file; stdout when omitted.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Output format; guessed from the output extension when omitted.
    #[arg(long, short, value_enum)]
    format: Option<Format>,

    #[arg(long)]
    brick_width: Option<f64>,

    #[arg(long)]
    brick_height: Option<f64>,

    /// Read the input as a register description.
    #[arg(long)]
    register: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Png,
    Json,
}

impl Format {
    fn guess(path: Option<&Path>) -> Self {
        match path.and_then(Path::extension).and_then(|e| e.to_str()) {
            Some("png") => Self::Png,
            Some("json") => Self::Json,
            _ => Self::Svg,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<undulate::UndulateError>()
                .map_or(1, undulate::UndulateError::exit_code);
            eprintln!("error: {err:#}");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("read diagram '{}'", cli.input.display()))?;
    let doc = undulate::parse_document(&text)?;

    let mut options = undulate::DrawOptions {
        is_reg: cli.register,
        ..undulate::DrawOptions::default()
    };
    if let Some(w) = cli.brick_width {
        options.brick_width = w;
    }
    if let Some(h) = cli.brick_height {
        options.brick_height = h;
    }

    let format = cli.format.unwrap_or_else(|| Format::guess(cli.output.as_deref()));
    let bytes = match format {
        Format::Svg => undulate::draw_svg(&doc, &options)?.into_bytes(),
        Format::Png => undulate::draw_png(&doc, &options)?,
        Format::Json => undulate::compile_json(&doc, &options)?.into_bytes(),
    };

    match &cli.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, &bytes)
                .with_context(|| format!("write '{}'", path.display()))?;
            tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote diagram");
        }
        None => {
            use std::io::Write as _;
            let mut out = std::io::stdout().lock();
            out.write_all(&bytes).context("write stdout")?;
            out.flush().context("flush stdout")?;
        }
    }
    Ok(())
}
