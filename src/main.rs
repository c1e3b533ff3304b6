use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use sirds::config::load_config;
use sirds::error::EncodeError;
use sirds::{run, DepthChannel, PatternSource, RandomStyle, RunError, RunOptions};
use tracing_subscriber::EnvFilter;

const EXIT_CONFIG: u8 = 64;

#[derive(Parser)]
#[command(name = "sirds")]
#[command(version, about = "Turn a depth map into a single-image random-dot stereogram", long_about = None)]
struct Cli {
    /// Depth image, `-` for stdin
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output PNG, `-` for stdout
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Pattern image, or "random" for noise
    #[arg(short, long, value_name = "FILE|random")]
    pattern: Option<String>,

    /// Maximum separation as a fraction of the image width
    #[arg(short, long, value_name = "FLOAT")]
    strength: Option<f64>,

    /// Swap near and far
    #[arg(short, long)]
    invert_depth: bool,

    /// Channel that holds depth: red, green, blue or luminance
    #[arg(short, long, value_name = "CHANNEL")]
    channel: Option<DepthChannel>,

    /// Seed for the random pattern
    #[arg(long, value_name = "U64")]
    seed: Option<u64>,

    /// Random pattern look: color, grayscale or dots
    #[arg(long, value_name = "STYLE")]
    random_style: Option<RandomStyle>,

    /// Synthesize rows on a single thread
    #[arg(long)]
    sequential: bool,

    /// YAML config file (default: sirds.yml in the working directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn open_input(path: &Path) -> io::Result<Box<dyn Read>> {
    if is_stdio(path) {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if is_stdio(path) {
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()
    } else {
        File::create(path)?.write_all(bytes)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let handle = match load_config(cli.config.as_deref(), &cwd) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    let mut config = handle.config;

    if let Some(p) = cli.pattern {
        config.pattern = p;
    }
    if let Some(s) = cli.strength {
        config.strength = s;
    }
    if cli.invert_depth {
        config.invert_depth = true;
    }
    if let Some(c) = cli.channel {
        config.channel = c;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(style) = cli.random_style {
        config.random_style = style;
    }
    if cli.sequential {
        config.parallel = false;
    }

    let options = RunOptions {
        pattern: config.pattern_source(),
        params: config.parameters(),
    };
    if let PatternSource::Random { seed, style } = &options.pattern {
        tracing::debug!(seed, %style, "using random pattern");
    }

    let result = open_input(&cli.input)
        .map_err(|e| RunError::Decode(e.into()))
        .and_then(|input| {
            // Encode into memory so a failed run never truncates OUTPUT.
            let mut png = Vec::new();
            run(input, &mut png, options)?;
            write_output(&cli.output, &png).map_err(|e| RunError::Encode(EncodeError::Io(e)))
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
