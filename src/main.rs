use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use timed_quiz::{App, QuizConfig, QuizError, Selection, check_questions, telemetry};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV or JSON file to load the questions from
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// TOML settings file (defaults to $QUIZ_CONFIG_PATH)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Category to quiz on instead of choosing from a menu
    #[arg(long)]
    category: Option<String>,

    /// Subcategory to quiz on instead of choosing from a menu
    #[arg(long)]
    subcategory: Option<String>,

    /// Number of questions to ask
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Seconds allowed per question (10-60)
    #[arg(short, long)]
    time_limit: Option<u32>,

    /// Read whole lines from stdin instead of raw key presses
    #[arg(long)]
    plain: bool,

    /// Print the final report as JSON after the quiz
    #[arg(long)]
    json: bool,

    /// Validate the question file, list its topics and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), QuizError> {
    let mut config = QuizConfig::load(args.config.as_deref())?;
    if let Some(questions) = args.questions {
        config.questions_path = questions;
    }
    if let Some(time_limit) = args.time_limit {
        config.time_limit_seconds = time_limit;
    }
    if args.count.is_some() {
        config.question_count = args.count;
    }
    config.plain_input |= args.plain;

    if args.check {
        let total = check_questions(&config.questions_path)?;
        println!("{} questions OK", total);
        return Ok(());
    }

    let selection = Selection {
        category: args.category,
        subcategory: args.subcategory,
    };
    let mut app = App::new(config, selection);
    if args.json {
        app = app.single_round();
    }

    let reports = app.run().await?;

    if args.json {
        for report in &reports {
            let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
            println!("{}", json);
        }
    }
    Ok(())
}
