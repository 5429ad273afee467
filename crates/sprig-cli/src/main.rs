use sprig::{Config, Graph, MstBuilder, StartVertex};
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Graph(sprig::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Graph(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<sprig::Error> for CliError {
    fn from(value: sprig::Error) -> Self {
        Self::Graph(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Mst,
    Validate,
}

#[derive(Debug, Clone, Copy, Default)]
enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    points: bool,
    start: Option<StartVertex>,
    seed: Option<u64>,
    format: OutputFormat,
    pretty: bool,
    config: Option<String>,
    out: Option<String>,
    verbose: bool,
}

fn usage() -> &'static str {
    "sprig-cli\n\
\n\
USAGE:\n\
  sprig-cli [mst] [--points] [--start first|random|<n>] [--seed <n>] [--format json|csv] [--pretty] [--config <path>] [--out <path>] [--verbose] [<path>|-]\n\
  sprig-cli validate [--points] [--config <path>] [--verbose] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a comma or whitespace delimited adjacency matrix; 0 means no edge.\n\
  - --points reads one coordinate row per line and uses pairwise Euclidean distances.\n\
  - mst prints a JSON summary by default; --format csv prints the MST adjacency matrix.\n\
  - --config reads a JSON file: { \"graph\": { ... }, \"mst\": { ... } }. Flags take precedence.\n\
  - Log verbosity follows RUST_LOG; --verbose forces debug output on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "mst" => args.command = Command::Mst,
            "validate" => args.command = Command::Validate,
            "--points" => args.points = true,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--start" => {
                let Some(start) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.start = Some(
                    start
                        .parse::<StartVertex>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--seed" => {
                let Some(seed) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.seed = Some(seed.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format = fmt
                    .parse::<OutputFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(args: &Args) -> Result<Config, CliError> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => Config::from_json_str(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    if let Some(start) = args.start {
        cfg.mst.start = start;
    }
    if let Some(seed) = args.seed {
        cfg.mst.seed = Some(seed);
    }
    Ok(cfg)
}

fn load_graph(args: &Args, cfg: &Config) -> Result<Graph, CliError> {
    let graph = match args.input.as_deref() {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            if args.points {
                Graph::from_points_str(&buf, cfg.graph)?
            } else {
                Graph::from_delimited_str(&buf, cfg.graph)?
            }
        }
        Some(path) if args.points => Graph::from_points_path(path, cfg.graph)?,
        Some(path) => Graph::with_options(path, cfg.graph)?,
    };
    Ok(graph)
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let cfg = load_config(&args)?;
    let mut graph = load_graph(&args, &cfg)?;
    tracing::debug!(nodes = graph.node_count(), points = args.points, "loaded graph");

    match args.command {
        Command::Validate => {
            println!("ok: {} vertices", graph.node_count());
            Ok(())
        }
        Command::Mst => {
            let builder = MstBuilder::with_options(cfg.mst);
            let mst = graph.construct_mst_with(&builder)?;
            let text = match args.format {
                OutputFormat::Json => {
                    let mut s = if args.pretty {
                        serde_json::to_string_pretty(mst)?
                    } else {
                        serde_json::to_string(mst)?
                    };
                    s.push('\n');
                    s
                }
                OutputFormat::Csv => mst.to_delimited(","),
            };
            write_text(&text, args.out.as_deref())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    setup_logging(args.verbose);

    match run(args) {
        Ok(()) => {}
        Err(CliError::Graph(err)) if err.is_invalid_graph() => {
            eprintln!("invalid graph: {err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
