use std::fmt;

use quiz_core::model::{AnswerId, QuizId};
use services::{ApiConfig, AppServices};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt as log_fmt, layer::SubscriberExt, util::SubscriberInitExt};
use ui::vm::{
    QuestionReviewVm, QuizIntent, QuizTakingOutcome, QuizTakingVm, load_performance,
    map_available_quiz_cards, map_completed_quiz_cards, start_quiz,
};
use ui::{ViewError, ViewState};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingQuizId,
    UnknownArg(String),
    InvalidQuizId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingQuizId => write!(f, "--quiz-id is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidQuizId { raw } => write!(f, "invalid --quiz-id value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug)]
enum AppError {
    View(ViewError),
    QuizNotFound(QuizId),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::View(err) => f.write_str(err.message()),
            AppError::QuizNotFound(id) => write!(f, "quiz {id} is not available"),
        }
    }
}

impl std::error::Error for AppError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- quizzes");
    eprintln!("  cargo run -p app -- completed");
    eprintln!("  cargo run -p app -- performance --quiz-id <id>");
    eprintln!("  cargo run -p app -- take --quiz-id <id>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_API_BASE_URL, QUIZ_API_TOKEN, QUIZ_API_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quizzes,
    Completed,
    Performance(QuizId),
    Take(QuizId),
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let Some(name) = args.next() else {
            return Ok(None);
        };
        match name.as_str() {
            "quizzes" => Self::no_flags(args).map(|()| Some(Self::Quizzes)),
            "completed" => Self::no_flags(args).map(|()| Some(Self::Completed)),
            "performance" => Self::parse_quiz_id(args).map(|id| Some(Self::Performance(id))),
            "take" => Self::parse_quiz_id(args).map(|id| Some(Self::Take(id))),
            "--help" | "-h" => Ok(None),
            _ => Err(ArgsError::UnknownArg(name)),
        }
    }

    fn no_flags(mut args: impl Iterator<Item = String>) -> Result<(), ArgsError> {
        match args.next() {
            Some(arg) => Err(ArgsError::UnknownArg(arg)),
            None => Ok(()),
        }
    }

    fn parse_quiz_id(mut args: impl Iterator<Item = String>) -> Result<QuizId, ArgsError> {
        let mut quiz_id = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quiz-id" => {
                    let value = require_value(&mut args, "--quiz-id")?;
                    let parsed = value
                        .parse::<QuizId>()
                        .map_err(|_| ArgsError::InvalidQuizId { raw: value.clone() })?;
                    quiz_id = Some(parsed);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        quiz_id.ok_or(ArgsError::MissingQuizId)
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the quiz screens.
    let stderr_layer = log_fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

async fn list_quizzes(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let quizzes = services.available_quizzes().await?;
    if quizzes.is_empty() {
        println!("No quizzes available.");
    }
    for card in map_available_quiz_cards(&quizzes) {
        println!(
            "[{}] {} ({}, {} questions, {}, published {})",
            card.id,
            card.title,
            card.time_limit_label,
            card.question_count,
            card.max_score_label,
            card.created_at_str
        );
        if !card.description.is_empty() {
            println!("    {}", card.description);
        }
    }
    Ok(())
}

async fn list_completed(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let completed = services.performance().completed_quizzes().await?;
    if completed.is_empty() {
        println!("No completed quizzes yet.");
    }
    for card in map_completed_quiz_cards(&completed) {
        println!(
            "[{}] {}  {}  {:.0}%  {}",
            card.quiz_id, card.title, card.score_line, card.progress_percent, card.completed_at_str
        );
    }
    Ok(())
}

async fn show_performance(
    services: &AppServices,
    quiz_id: QuizId,
) -> Result<(), Box<dyn std::error::Error>> {
    let vm = match load_performance(services, quiz_id).await {
        ViewState::Ready(vm) => vm,
        ViewState::Error(err) => return Err(AppError::View(err).into()),
    };

    println!("{}", vm.title);
    println!("Score: {} ({})", vm.score_line, vm.percentage_label);
    println!("Rating: {}", vm.band_label);
    println!("Completed: {}", vm.completed_at_str);
    for question in &vm.questions {
        println!();
        println!("{} ({})", question.heading, question.points_label);
        println!("  {}", question.text);
        if question.has_answers() {
            for answer in &question.answers {
                let mark = if answer.correct { "+" } else { "-" };
                println!("  {mark} {}", answer.text);
            }
        } else {
            println!("  {}", QuestionReviewVm::NO_ANSWER);
        }
        if let Some(correct) = &question.correct_answers {
            println!("  Correct: {}", correct.join(", "));
        }
    }
    Ok(())
}

fn render_question(vm: &QuizTakingVm) {
    println!();
    println!("{} [{}]", vm.title(), vm.countdown_text());
    println!("{} ({})", vm.question_label(), vm.points_label());
    println!("  {}", vm.question_text());
    for option in vm.answer_options() {
        let mark = if option.checked { "x" } else { " " };
        println!("  [{mark}] {} {}", option.id, option.text);
    }
    if vm.confirm_open() {
        println!("Submit your answers? (y = confirm, n = keep answering)");
    } else if vm.shows_finish() {
        println!("t <answer-id> | p | g <n> | f = finish | q = quit");
    } else {
        println!("t <answer-id> | n | p | g <n> | q = quit");
    }
}

fn parse_intent(line: &str, confirming: bool) -> Option<QuizIntent> {
    let mut parts = line.split_whitespace();
    let word = parts.next()?;
    let arg = parts.next();
    match (word, confirming) {
        ("y", true) => Some(QuizIntent::Confirm),
        ("n", true) => Some(QuizIntent::CancelConfirm),
        ("n", false) => Some(QuizIntent::Next),
        ("p", _) => Some(QuizIntent::Previous),
        ("f", _) => Some(QuizIntent::Finish),
        ("q", _) => Some(QuizIntent::Close),
        ("t", _) => arg?.parse::<AnswerId>().ok().map(QuizIntent::Toggle),
        ("g", _) => {
            let page = arg?.parse::<usize>().ok()?;
            Some(QuizIntent::GoTo(page.checked_sub(1)?))
        }
        _ => None,
    }
}

async fn take_quiz(
    services: &AppServices,
    quiz_id: QuizId,
) -> Result<(), Box<dyn std::error::Error>> {
    let quiz = services
        .available_quizzes()
        .await?
        .into_iter()
        .find(|quiz| quiz.id == quiz_id)
        .ok_or(AppError::QuizNotFound(quiz_id))?;
    let vm = start_quiz(services, quiz).map_err(AppError::View)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    render_question(&vm);
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = vm.session().wait_completed() => {
                println!("Time is up.");
                break;
            }
        };
        let Some(line) = line else {
            vm.dispatch(QuizIntent::Close).await;
            return Ok(());
        };
        let Some(intent) = parse_intent(&line, vm.confirm_open()) else {
            println!("Unrecognised command.");
            continue;
        };
        match vm.dispatch(intent).await {
            QuizTakingOutcome::Continue => render_question(&vm),
            QuizTakingOutcome::Closed(None) => return Ok(()),
            QuizTakingOutcome::Closed(Some(notice)) => {
                println!("{}", notice.message());
                return Ok(());
            }
        }
    }

    if let Some(notice) = vm.completion_notice() {
        println!("{}", notice.message());
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let command = Command::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let Some(command) = command else {
        print_usage();
        return Ok(());
    };

    let config = ApiConfig::from_env()?;
    tracing::debug!(base_url = %config.base_url, "using quiz api");
    let services = AppServices::from_config(&config)?;

    match command {
        Command::Quizzes => list_quizzes(&services).await,
        Command::Completed => list_completed(&services).await,
        Command::Performance(quiz_id) => show_performance(&services, quiz_id).await,
        Command::Take(quiz_id) => take_quiz(&services, quiz_id).await,
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
