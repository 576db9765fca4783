use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use edumaster::export::ExportFormat;
use edumaster::models::MaterialKind;
use edumaster::Result;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "edumaster")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "교육 콘텐츠 마스터: 커리큘럼 설계부터 피드백 분석까지", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// State directory (default: platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Design a curriculum for a course topic
    Plan {
        /// Course topic
        topic: String,

        /// Target audience; repeatable (e.g. --target "초등학교 5학년" --target 교사)
        #[arg(long)]
        target: Vec<String>,

        /// Number of students
        #[arg(long)]
        students: Option<String>,

        /// Learning goal
        #[arg(long)]
        goal: Option<String>,

        /// Training format (e.g. "대면 강의", "온라인")
        #[arg(long)]
        format: Option<String>,

        /// Free-form duration, used when no structured schedule is given
        #[arg(long)]
        duration: Option<String>,

        /// Schedule: total weeks (requires --sessions-per-week and --hours)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=52))]
        weeks: Option<u32>,

        /// Schedule: sessions per week
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=7))]
        sessions_per_week: Option<u32>,

        /// Schedule: hours per session
        #[arg(long)]
        hours: Option<f64>,
    },

    /// Generate one kind of teaching material from the planned curriculum
    Material {
        /// Material kind
        #[arg(value_enum)]
        kind: MaterialKind,

        /// Question count for quiz/worksheet (1-50)
        #[arg(long)]
        count: Option<u32>,
    },

    /// Write promotional copy for a distribution channel
    Promo {
        /// Channel number (see --list)
        #[arg(long, value_name = "N")]
        channel: Option<usize>,

        /// Expected benefit; defaults to a sentence built from the goal
        #[arg(long)]
        benefit: Option<String>,

        /// Save the copy as a .doc file
        #[arg(long)]
        out: Option<PathBuf>,

        /// List the preset channels and exit
        #[arg(long)]
        list: bool,
    },

    /// Create and manage the satisfaction survey
    Survey {
        #[command(subcommand)]
        command: SurveyCommands,
    },

    /// Analyze collected feedback into a report
    Analyze {
        /// Data file (.csv, .xlsx, .xls, .txt, .md)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Literal feedback text
        #[arg(long)]
        data: Option<String>,

        /// Use the answers collected with `survey fill`
        #[arg(long)]
        collected: bool,

        /// Save the report as a .doc file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export materials to .doc/.xlsx/.pptx, or everything as one zip
    Export {
        /// Material kind to export
        #[arg(value_enum)]
        kind: Option<MaterialKind>,

        /// Export the curriculum instead of a material
        #[arg(long)]
        plan: bool,

        /// Generate whatever is missing and pack all six kinds into a zip
        #[arg(long)]
        all: bool,

        /// File format (default: pptx for slide-outline, doc otherwise)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,

        /// Output path
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show the program, materials, and survey at a glance
    Status,

    /// Delete all state
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum SurveyCommands {
    /// Generate a survey draft for the planned course
    Create {
        /// Replace an existing draft without asking
        #[arg(long)]
        force: bool,
    },

    /// Print the current survey draft
    Show,

    /// Answer the survey interactively; progress is saved per question
    Fill,

    /// Export the survey form (.doc) or collected answers (.xlsx)
    Export {
        /// File format
        #[arg(long, value_enum, default_value = "doc")]
        format: ExportFormat,

        /// Include the most recent response in the form
        #[arg(long)]
        filled: bool,

        /// Output path
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete the survey draft and collected answers
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    let state_dir = cli.state_dir.as_deref();

    match cli.command {
        Commands::Plan {
            topic,
            target,
            students,
            goal,
            format,
            duration,
            weeks,
            sessions_per_week,
            hours,
        } => {
            edumaster::cli::plan::run(
                state_dir,
                &topic,
                target,
                students,
                goal,
                format,
                duration,
                weeks,
                sessions_per_week,
                hours,
            )
            .await?;
        }

        Commands::Material { kind, count } => {
            edumaster::cli::material::run(state_dir, kind, count).await?;
        }

        Commands::Promo {
            channel,
            benefit,
            out,
            list,
        } => {
            if list {
                edumaster::cli::promo::list_channels();
            } else {
                edumaster::cli::promo::run(state_dir, channel, benefit, out).await?;
            }
        }

        Commands::Survey { command } => match command {
            SurveyCommands::Create { force } => {
                edumaster::cli::survey::create(state_dir, force).await?;
            }
            SurveyCommands::Show => {
                edumaster::cli::survey::show(state_dir)?;
            }
            SurveyCommands::Fill => {
                edumaster::cli::survey::fill(state_dir)?;
            }
            SurveyCommands::Export {
                format,
                filled,
                out,
            } => {
                edumaster::cli::survey::export(state_dir, format, filled, out)?;
            }
            SurveyCommands::Reset { force } => {
                edumaster::cli::survey::reset(state_dir, force)?;
            }
        },

        Commands::Analyze {
            file,
            data,
            collected,
            out,
        } => {
            edumaster::cli::analyze::run(state_dir, file, data, collected, out).await?;
        }

        Commands::Export {
            kind,
            plan,
            all,
            format,
            out,
        } => {
            edumaster::cli::export::run(state_dir, kind, plan, all, format, out).await?;
        }

        Commands::Status => {
            edumaster::cli::status::run(state_dir)?;
        }

        Commands::Reset { force } => {
            edumaster::cli::reset::run(state_dir, force)?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "edumaster", &mut io::stdout());
        }
    }

    Ok(())
}
