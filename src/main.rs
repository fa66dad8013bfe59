use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use acroscore::config::Config;
use acroscore::session::Session;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_REJECTED: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive scoring session (default if no subcommand)
    Tui {
        /// Session script to preload (YAML or JSON, "-" for stdin)
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Score one set of 16 criterion values (1-5, canonical order)
    Score {
        #[arg(num_args = 1.., allow_negative_numbers = true)]
        scores: Vec<i64>,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Replay a session script and print the ranking
    Batch {
        /// Session script (YAML or JSON, "-" for stdin)
        file: PathBuf,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Also print the dimension breakdown for this acronym
        #[arg(long)]
        detail: Option<String>,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "acroscore")]
#[command(about = "Score and rank acronym proposals on a weighted rubric", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/acroscore/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    acroscore::stderr_buffer::init_logging(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);
    let command = cli.command.unwrap_or(Commands::Tui { script: None });

    // Init writes the config, so it must not require a valid one
    if let Commands::Init = command {
        if let Err(e) = acroscore::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match acroscore::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = acroscore::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    tracing::debug!(?config, "config loaded");

    let code = match command {
        Commands::Score { scores, format } => run_score(&scores, format),
        Commands::Batch {
            file,
            format,
            detail,
        } => run_batch(&config, &file, format, detail.as_deref()),
        Commands::Tui { script } => run_interactive(config, script).await,
        Commands::Init => EXIT_SUCCESS,
    };

    std::process::exit(code);
}

fn run_score(scores: &[i64], format: OutputFormat) -> i32 {
    let result = match acroscore::scoring::calculate_score(scores) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Invalid scores: {}", e);
            return EXIT_REJECTED;
        }
    };

    match format {
        OutputFormat::Table => {
            let use_colors = acroscore::output::should_use_colors();
            println!("{}", acroscore::output::format_score_result(&result, use_colors));
        }
        OutputFormat::Tsv => {
            println!("score\t{}", result.score);
            for part in &result.breakdown.dimensions {
                println!("{}\t{}", part.dimension, part.mean);
            }
        }
        OutputFormat::Json => match acroscore::output::format_json(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{:#}", e);
                return EXIT_FAILURE;
            }
        },
    }

    EXIT_SUCCESS
}

fn run_batch(config: &Config, file: &Path, format: OutputFormat, detail: Option<&str>) -> i32 {
    let script = match acroscore::script::load_script(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Script error: {:#}", e);
            return EXIT_REJECTED;
        }
    };

    let mut session = Session::new(config.session_policy());
    let summary = acroscore::script::replay(&script, &mut session);
    for rejection in &summary.rejected {
        eprintln!("Rejected {}", rejection);
    }
    tracing::debug!(
        accepted = summary.accepted,
        rejected = summary.rejected.len(),
        "script replayed"
    );

    let ranking = session.ranking();
    let breakdown = match detail.map(|acronym| session.detail_breakdown(acronym)) {
        Some(Ok(b)) => detail.map(|acronym| (acronym.trim().to_string(), b)),
        Some(Err(e)) => {
            eprintln!("{}", e);
            return EXIT_REJECTED;
        }
        None => None,
    };

    match format {
        OutputFormat::Table => {
            let use_colors = acroscore::output::should_use_colors();
            println!(
                "{}",
                acroscore::output::format_ranking_table(&ranking, use_colors)
            );
            if let Some((acronym, b)) = &breakdown {
                println!();
                println!(
                    "{}",
                    acroscore::output::format_breakdown(acronym, b, use_colors)
                );
            }
        }
        OutputFormat::Tsv => {
            if !ranking.is_empty() {
                println!("{}", acroscore::output::format_ranking_tsv(&ranking));
            }
            if let Some((acronym, b)) = &breakdown {
                for (dimension, value) in b.values() {
                    println!("{}\t{}\t{}", acronym, dimension, value);
                }
            }
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "proposals": session.proposals(),
                "ranking": ranking,
                "detail": breakdown.as_ref().map(|(acronym, b)| {
                    serde_json::json!({ "acronym": acronym, "breakdown": b })
                }),
                "rejected": summary.rejected.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
            });
            match acroscore::output::format_json(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("{:#}", e);
                    return EXIT_FAILURE;
                }
            }
        }
    }

    if summary.rejected.is_empty() {
        EXIT_SUCCESS
    } else {
        EXIT_REJECTED
    }
}

async fn run_interactive(config: Config, script: Option<PathBuf>) -> i32 {
    let mut session = Session::new(config.session_policy());

    let mut loaded = None;
    if let Some(path) = script {
        match acroscore::script::load_script(&path) {
            Ok(s) => {
                let summary = acroscore::script::replay(&s, &mut session);
                for rejection in &summary.rejected {
                    tracing::warn!(%rejection, "script entry rejected");
                }
                loaded = Some(summary);
            }
            Err(e) => {
                eprintln!("Script error: {:#}", e);
                return EXIT_REJECTED;
            }
        }
    }

    let theme = acroscore::tui::resolve_theme(config.theme);
    let mut app = acroscore::tui::App::new(session, config, theme);
    if let Some(summary) = loaded {
        let kind = if summary.rejected.is_empty() {
            acroscore::tui::app::FlashKind::Success
        } else {
            acroscore::tui::app::FlashKind::Error
        };
        app.show_flash(
            format!(
                "Script loaded: {} accepted, {} rejected",
                summary.accepted,
                summary.rejected.len()
            ),
            kind,
        );
    }

    match acroscore::tui::run_tui(app).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("TUI error: {:#}", e);
            EXIT_FAILURE
        }
    }
}
