mod config;

use std::path::{Path, PathBuf};
use std::time::Duration;

use autocompletor_ai::{AiOptions, Backend, infer_tree};
use autocompletor_core::{Command, DEFAULT_MAX_DEPTH, validate_tree};
use autocompletor_discovery::output::{OutputFormat, format_report, format_tree};
use autocompletor_discovery::{BuildOptions, DEFAULT_TIMEOUT, DiscoveryError, TreeBuilder};
use autocompletor_shell::{Shell, generate, install};
use clap::Parser;
use tracing::{debug, warn};

use crate::config::Config;

/// Tree dump formats accepted by `--dump`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum DumpFormat {
    Json,
    Yaml,
}

impl From<DumpFormat> for OutputFormat {
    fn from(fmt: DumpFormat) -> Self {
        match fmt {
            DumpFormat::Json => Self::Json,
            DumpFormat::Yaml => Self::Yaml,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "autocompletor", version)]
#[command(about = "Generate shell completions for any CLI program")]
#[command(long_about = "Generates shell completion scripts by analyzing a program's man page, \
--help output, and subcommands recursively.\n\n\
If the program cannot be analyzed, an AI fallback (Ollama or OpenAI) can be used.\n\n\
Examples:\n  autocompletor gobuster\n  autocompletor gobuster --install\n  \
autocompletor gobuster --shell fish --install\n  autocompletor gobuster --ai ollama\n  \
autocompletor gobuster --ai openai --api-key sk-...")]
struct Cli {
    /// Program to generate completions for (a name on PATH or a path).
    program: String,
    /// Target shell: fish, bash, zsh (auto-detected if not set).
    #[arg(long)]
    shell: Option<Shell>,
    /// Install completions to the shell's completions directory.
    #[arg(long)]
    install: bool,
    /// AI fallback to use when nothing can be extracted: ollama, openai.
    #[arg(long, value_name = "BACKEND")]
    ai: Option<Backend>,
    /// API key for OpenAI (or set OPENAI_API_KEY).
    #[arg(long)]
    api_key: Option<String>,
    /// AI model to use (default: llama3 for ollama, gpt-4o-mini for openai).
    #[arg(long)]
    model: Option<String>,
    /// Subcommand levels to explore below the program.
    #[arg(long)]
    max_depth: Option<usize>,
    /// Seconds to wait for each man or --help invocation.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
    /// Probe sibling subcommands in parallel with this many workers.
    #[arg(long)]
    jobs: Option<usize>,
    /// Print the discovered command tree instead of a completion script.
    #[arg(long, value_enum, value_name = "FORMAT")]
    dump: Option<DumpFormat>,
    /// Print the discovery report to stderr.
    #[arg(long)]
    report: bool,
    /// Config file (default: <config dir>/autocompletor/config.yml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Effective settings after merging flags, config file and defaults.
#[derive(Debug)]
struct Settings {
    build: BuildOptions,
    ai: Option<Backend>,
    ai_options: AiOptions,
}

impl Settings {
    fn resolve(cli: &Cli, config: &Config) -> Result<Self, String> {
        let discovery = &config.discovery;
        let timeout_secs = cli
            .timeout
            .or(discovery.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT.as_secs());
        if timeout_secs == 0 {
            return Err("--timeout must be at least 1 second".to_string());
        }
        let jobs = cli.jobs.or(discovery.jobs).unwrap_or(1);
        if jobs == 0 {
            return Err("--jobs must be at least 1".to_string());
        }

        let build = BuildOptions {
            max_depth: cli
                .max_depth
                .or(discovery.max_depth)
                .unwrap_or(DEFAULT_MAX_DEPTH),
            timeout: Duration::from_secs(timeout_secs),
            jobs,
        };
        let ai_options = AiOptions {
            model: cli.model.clone().or_else(|| config.ai.model.clone()),
            api_key: cli.api_key.clone(),
            ollama_url: config.ai.ollama_url.clone(),
            ..AiOptions::default()
        };

        Ok(Self {
            build,
            ai: cli.ai.or(config.ai.backend),
            ai_options,
        })
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    }
    .map_err(|e| e.to_string())?;
    let settings = Settings::resolve(&cli, &config)?;
    debug!(?settings, "Resolved settings");

    let shell = match cli.shell.or(config.shell) {
        Some(shell) => shell,
        None => Shell::detect().map_err(|e| e.to_string())?,
    };
    if cli.dump.is_none() {
        eprintln!("Generating {shell} completions for \"{}\"", cli.program);
    }

    let tree = discover(&cli, &settings, shell)?;
    for issue in validate_tree(&tree, settings.build.max_depth) {
        warn!(program = %cli.program, %issue, "Command tree has a validation issue");
    }

    if let Some(format) = cli.dump {
        let text = format_tree(&tree, format.into())?;
        println!("{}", text.trim_end());
        return Ok(());
    }

    let script = generate(shell, &tree);
    if cli.install {
        let path = install(shell, &tree.name, &script)
            .map_err(|e| format!("install failed: {e}"))?;
        eprintln!("Completions installed to {}", path.display());
    } else {
        print!("{script}");
    }
    Ok(())
}

/// Builds the tree from man/help output, falling back to the AI backend when
/// nothing was found and a backend is configured.
fn discover(cli: &Cli, settings: &Settings, shell: Shell) -> Result<Command, String> {
    let runner = settings.build.system_runner();
    let builder = TreeBuilder::new(&runner, settings.build);

    match builder.build(&cli.program) {
        Ok(run) => {
            if cli.report {
                eprint!("{}", format_report(&run.report, OutputFormat::Table)?);
            }
            Ok(run.tree)
        }
        Err(err @ DiscoveryError::NoCompletionsFound { .. }) => {
            let Some(backend) = settings.ai else {
                return Err(format!(
                    "{err}\nTip: use --ai ollama or --ai openai to use AI as fallback"
                ));
            };
            eprintln!("No completions found via help/man, falling back to AI ({backend})");

            let client = backend
                .client(&settings.ai_options)
                .map_err(|e| format!("AI fallback failed: {e}"))?;
            infer_tree(client.as_ref(), &program_name(&cli.program), shell.as_str())
                .map_err(|e| format!("AI fallback failed: {e}"))
        }
        Err(err) => Err(err.to_string()),
    }
}

fn program_name(program: &str) -> String {
    Path::new(program)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program)
        .to_string()
}
