//! Command-line surface: one-shot subcommands and a line-driven interactive
//! session. Everything goes through `SessionController`, so the one-shot
//! commands obey the same validation and busy rules as the interactive mode.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::cursor::MoveToColumn;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::tty::IsTty;
use crossterm::{execute, queue};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::models::ResumeFile;
use crate::presentation::ScoreRingAnimation;
use crate::session::{Outcome, Route, SessionController};
use crate::views::{self, about, dashboard, Palette};

#[derive(Parser, Debug)]
#[command(name = "ats", version)]
#[command(about = "Upload a resume and get an ATS compatibility score", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Default, Clone)]
pub struct JobDescriptionArgs {
    /// Job description to score against
    #[arg(short = 'j', long, conflicts_with = "job_description_file")]
    pub job_description: Option<String>,
    /// Read the job description from a file
    #[arg(long, value_name = "PATH")]
    pub job_description_file: Option<PathBuf>,
}

impl JobDescriptionArgs {
    pub async fn load(&self) -> Result<Option<String>> {
        if let Some(text) = &self.job_description {
            return Ok(Some(text.clone()));
        }
        match &self.job_description_file {
            Some(path) => {
                let text = tokio::fs::read_to_string(path).await.with_context(|| {
                    format!("Failed to read job description: {}", path.display())
                })?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a resume and print its id
    Upload {
        file: PathBuf,
        #[command(flatten)]
        jd: JobDescriptionArgs,
    },
    /// Score an already uploaded resume
    Score {
        resume_id: String,
        #[command(flatten)]
        jd: JobDescriptionArgs,
    },
    /// Upload a resume, score it and show the results
    Analyze {
        file: PathBuf,
        #[command(flatten)]
        jd: JobDescriptionArgs,
    },
    /// Generate and download the PDF report for a resume
    Report {
        resume_id: String,
        #[command(flatten)]
        jd: JobDescriptionArgs,
    },
    /// Start a line-driven session
    Interactive,
    /// What the scorer does and how it works
    About,
}

/// Rendering options resolved from the terminal.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub palette: Palette,
    /// Play the score fill animation before showing results.
    pub animate: bool,
}

impl Output {
    pub fn detect() -> Self {
        let tty = std::io::stdout().is_tty();
        Self {
            palette: if tty { Palette::styled() } else { Palette::plain() },
            animate: tty,
        }
    }
}

/// One score ring per session. A new score replays it from zero, which
/// also ends any fill still running for the previous score.
#[derive(Clone, Default)]
struct ScoreRing(Arc<Mutex<Option<ScoreRingAnimation>>>);

impl ScoreRing {
    async fn play(&self, target: f64) -> watch::Receiver<f64> {
        let mut slot = self.0.lock().await;
        match slot.as_mut() {
            Some(animation) => {
                animation.replay(target);
                animation.subscribe()
            }
            None => {
                let animation = ScoreRingAnimation::play(target);
                let frames = animation.subscribe();
                *slot = Some(animation);
                frames
            }
        }
    }
}

pub async fn run(cli: Cli, controller: SessionController, output: Output) -> Result<()> {
    match cli.command {
        Command::Upload { file, jd } => {
            prepare(&controller, &file, &jd).await?;
            let route = navigated(controller.submit_upload().await)?;
            let session = controller.snapshot().await;
            println!("Uploaded. Resume id: {}", session.state().resume_id().unwrap_or_default());
            println!("{}", output.palette.dim(&format!("Dashboard: {route}")));
        }
        Command::Score { resume_id, jd } => {
            open(&controller, &resume_id, &jd).await?;
            applied(controller.submit_analysis().await)?;
            show_results(&controller, output, &ScoreRing::default()).await?;
        }
        Command::Analyze { file, jd } => {
            prepare(&controller, &file, &jd).await?;
            navigated(controller.submit_upload().await)?;
            applied(controller.submit_analysis().await)?;
            show_results(&controller, output, &ScoreRing::default()).await?;
        }
        Command::Report { resume_id, jd } => {
            open(&controller, &resume_id, &jd).await?;
            match controller.download_report().await {
                Outcome::Saved(path) => println!("Report saved to {}", path.display()),
                other => bail!(failure(other)),
            }
        }
        Command::Interactive => interactive(controller, output).await?,
        Command::About => print!("{}", about::render(output.palette)),
    }
    Ok(())
}

async fn prepare(controller: &SessionController, file: &Path, jd: &JobDescriptionArgs) -> Result<()> {
    if let Some(text) = jd.load().await? {
        controller.set_job_description(text).await;
    }
    let file = ResumeFile::from_path(file).await?;
    applied(controller.select_file(file).await)?;
    Ok(())
}

async fn open(controller: &SessionController, resume_id: &str, jd: &JobDescriptionArgs) -> Result<()> {
    if let Some(text) = jd.load().await? {
        controller.set_job_description(text).await;
    }
    navigated(controller.open_dashboard(resume_id).await)?;
    Ok(())
}

fn applied(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Applied | Outcome::Navigated(_) | Outcome::Saved(_) => Ok(()),
        other => bail!(failure(other)),
    }
}

fn navigated(outcome: Outcome) -> Result<Route> {
    match outcome {
        Outcome::Navigated(route) => Ok(route),
        other => bail!(failure(other)),
    }
}

fn failure(outcome: Outcome) -> String {
    match outcome {
        Outcome::Rejected(message) => message,
        other => format!("Nothing to do ({other:?})"),
    }
}

/// Plays the score fill, then prints the dashboard.
async fn show_results(
    controller: &SessionController,
    output: Output,
    ring: &ScoreRing,
) -> std::io::Result<()> {
    let session = controller.snapshot().await;
    let mut stdout = std::io::stdout();
    if let (true, Some(result)) = (output.animate, session.state().result()) {
        let mut frames = ring.play(result.overall).await;
        while frames.changed().await.is_ok() {
            let display = *frames.borrow_and_update();
            execute!(
                stdout,
                MoveToColumn(0),
                Clear(ClearType::CurrentLine),
                Print(dashboard::score_line(result.overall, display, output.palette))
            )?;
        }
        queue!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    }
    let page = views::render_current(&session, output.palette, Instant::now());
    execute!(stdout, Print(page))
}

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Select(PathBuf),
    Remove,
    JobDescription(String),
    Upload,
    Analyze,
    Reset,
    Copy(usize),
    Report,
    Open(String),
    Restart,
    Show,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Action, String> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let action = match command.to_lowercase().as_str() {
        "select" | "file" if !rest.is_empty() => Action::Select(PathBuf::from(rest)),
        "select" | "file" => return Err("Usage: select <path>".to_string()),
        "remove" => Action::Remove,
        "jd" => Action::JobDescription(rest.to_string()),
        "upload" => Action::Upload,
        "analyze" | "analyse" => Action::Analyze,
        "reset" | "reanalyze" => Action::Reset,
        "copy" => match rest.parse::<usize>() {
            Ok(number) if number > 0 => Action::Copy(number),
            _ => return Err("Usage: copy <tip number>".to_string()),
        },
        "report" | "download" => Action::Report,
        "open" if !rest.is_empty() => Action::Open(rest.to_string()),
        "open" => return Err("Usage: open <resume id>".to_string()),
        "restart" => Action::Restart,
        "" | "show" => Action::Show,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => return Err(format!("Unknown command '{other}'. Type 'help'.")),
    };
    Ok(action)
}

const HELP: &str = "\
Commands:
  select <path>   pick a resume file (PDF or DOCX)
  remove          drop the picked file
  jd [text]       set the job description (empty clears it)
  upload          upload the picked file
  analyze         score the uploaded resume
  reset           clear results to analyze again
  copy <n>        copy tip n to the clipboard
  report          download the PDF report
  open <id>       jump to the dashboard of an uploaded resume
  restart         start over
  show            redraw the current page
  quit            leave";

async fn interactive(controller: SessionController, output: Output) -> Result<()> {
    run_session(controller, output, BufReader::new(tokio::io::stdin())).await
}

/// Drives the session from `input` until `quit` or end of input, then waits
/// for any request still in flight.
async fn run_session<R>(controller: SessionController, output: Output, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    info!("Interactive session started");
    let ring = ScoreRing::default();
    let mut requests = JoinSet::new();

    redraw(&controller, output).await?;
    prompt()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let action = match parse_line(&line) {
            Ok(action) => action,
            Err(message) => {
                println!("{}", output.palette.error(&message));
                prompt()?;
                continue;
            }
        };
        debug!("Interactive action: {:?}", action);

        match action {
            Action::Quit => break,
            Action::Help => println!("{HELP}"),
            Action::Show => redraw(&controller, output).await?,
            Action::Select(path) => {
                match ResumeFile::from_path(&path).await {
                    Ok(file) => {
                        controller.select_file(file).await;
                    }
                    Err(e) => println!("{}", output.palette.error(&format!("{e:#}"))),
                }
                redraw(&controller, output).await?;
            }
            Action::Remove => {
                controller.remove_file().await;
                redraw(&controller, output).await?;
            }
            Action::JobDescription(text) => {
                controller.set_job_description(text).await;
                redraw(&controller, output).await?;
            }
            // Requests run in the background; further input is taken
            // meanwhile and bounces off the busy session.
            Action::Upload => {
                let task = controller.clone();
                requests.spawn(async move {
                    task.submit_upload().await;
                    finish_request(redraw(&task, output).await);
                });
                redraw(&controller, output).await?;
            }
            Action::Analyze => {
                let task = controller.clone();
                let ring = ring.clone();
                requests.spawn(async move {
                    let drawn = match task.submit_analysis().await {
                        Outcome::Applied => show_results(&task, output, &ring).await,
                        _ => redraw(&task, output).await,
                    };
                    finish_request(drawn);
                });
                redraw(&controller, output).await?;
            }
            Action::Report => {
                let task = controller.clone();
                requests.spawn(async move {
                    task.download_report().await;
                    finish_request(redraw(&task, output).await);
                });
            }
            Action::Copy(number) => {
                if let Outcome::Ignored = controller.copy_tip(number).await {
                    println!("{}", output.palette.error(&format!("No tip {number}")));
                }
                redraw(&controller, output).await?;
            }
            Action::Reset => {
                controller.reset_results().await;
                redraw(&controller, output).await?;
            }
            Action::Open(resume_id) => {
                controller.open_dashboard(&resume_id).await;
                redraw(&controller, output).await?;
            }
            Action::Restart => {
                controller.start_over().await;
                redraw(&controller, output).await?;
            }
        }
        prompt()?;
    }

    if controller.snapshot().await.is_busy() {
        println!("Waiting for the request in flight to finish...");
    }
    while let Some(joined) = requests.join_next().await {
        if let Err(e) = joined {
            warn!("Background request failed: {}", e);
        }
    }

    info!("Interactive session ended");
    Ok(())
}

async fn redraw(controller: &SessionController, output: Output) -> std::io::Result<()> {
    let session = controller.snapshot().await;
    let page = views::render_current(&session, output.palette, Instant::now());
    execute!(std::io::stdout(), Print("\n"), Print(page))
}

/// Tail of a background request: the page is already drawn, hand the
/// prompt back.
fn finish_request(drawn: std::io::Result<()>) {
    if let Err(e) = drawn.and_then(|()| prompt()) {
        warn!("Failed to draw page: {}", e);
    }
}

fn prompt() -> std::io::Result<()> {
    execute!(std::io::stdout(), Print("ats> "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::ScoringBackend;
    use crate::errors::{ClientError, Operation};
    use crate::models::{ReportRequest, ReportResponse, ScoreRequest, ScoreResult, UploadResponse};
    use crate::platform::testing::MemoryPlatform;
    use crate::session::UploadPolicy;
    use async_trait::async_trait;
    use bytes::Bytes;
    use clap::CommandFactory;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_with_inline_job_description() {
        let cli = Cli::try_parse_from(["ats", "analyze", "cv.pdf", "-j", "Rust engineer"]).unwrap();
        match cli.command {
            Command::Analyze { file, jd } => {
                assert_eq!(file, PathBuf::from("cv.pdf"));
                assert_eq!(jd.job_description.as_deref(), Some("Rust engineer"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_job_description_sources_conflict() {
        let parsed = Cli::try_parse_from([
            "ats",
            "score",
            "abc123",
            "--job-description",
            "x",
            "--job-description-file",
            "jd.txt",
        ]);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_job_description_loaded_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jd.txt");
        tokio::fs::write(&path, "Senior Rust engineer").await.unwrap();

        let args = JobDescriptionArgs {
            job_description: None,
            job_description_file: Some(path),
        };
        assert_eq!(args.load().await.unwrap().as_deref(), Some("Senior Rust engineer"));
        assert_eq!(JobDescriptionArgs::default().load().await.unwrap(), None);
    }

    #[test]
    fn test_parse_line_commands() {
        assert_eq!(
            parse_line("select ~/My Resume.pdf"),
            Ok(Action::Select(PathBuf::from("~/My Resume.pdf")))
        );
        assert_eq!(
            parse_line("jd  Backend engineer, Rust "),
            Ok(Action::JobDescription("Backend engineer, Rust".to_string()))
        );
        assert_eq!(parse_line("jd"), Ok(Action::JobDescription(String::new())));
        assert_eq!(parse_line("copy 2"), Ok(Action::Copy(2)));
        assert_eq!(parse_line("ANALYZE"), Ok(Action::Analyze));
        assert_eq!(parse_line(""), Ok(Action::Show));
        assert_eq!(parse_line("q"), Ok(Action::Quit));
    }

    #[test]
    fn test_parse_line_rejects_bad_input() {
        assert!(parse_line("copy 0").is_err());
        assert!(parse_line("copy two").is_err());
        assert!(parse_line("select").is_err());
        assert_eq!(
            parse_line("frobnicate"),
            Err("Unknown command 'frobnicate'. Type 'help'.".to_string())
        );
    }

    struct SlowBackend {
        scores: AtomicUsize,
    }

    #[async_trait]
    impl ScoringBackend for SlowBackend {
        async fn upload_resume(
            &self,
            _file: &ResumeFile,
            _job_description: Option<&str>,
        ) -> Result<UploadResponse, ClientError> {
            Err(Operation::Upload.fallback())
        }

        async fn score_resume(&self, _request: &ScoreRequest) -> Result<ScoreResult, ClientError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.scores.fetch_add(1, Ordering::SeqCst);
            Ok(ScoreResult {
                overall: 72.5,
                ..ScoreResult::default()
            })
        }

        async fn request_report(
            &self,
            _request: &ReportRequest,
        ) -> Result<ReportResponse, ClientError> {
            Err(Operation::Report.fallback())
        }

        async fn download_report(&self, _report_id: &str) -> Result<Bytes, ClientError> {
            Err(Operation::Download.fallback())
        }
    }

    fn plain_output() -> Output {
        Output {
            palette: Palette::plain(),
            animate: false,
        }
    }

    #[tokio::test]
    async fn test_quit_waits_for_request_in_flight() {
        let backend = Arc::new(SlowBackend {
            scores: AtomicUsize::new(0),
        });
        let controller = SessionController::new(
            UploadPolicy::default(),
            backend.clone(),
            Arc::new(MemoryPlatform::default()),
        );
        let input: &[u8] = b"open abc123\nanalyze\nanalyze\nquit\n";

        run_session(controller.clone(), plain_output(), input).await.unwrap();

        assert_eq!(backend.scores.load(Ordering::SeqCst), 1);
        let session = controller.snapshot().await;
        assert_eq!(session.state().result().map(|r| r.overall), Some(72.5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_score_ring_replays_for_new_score() {
        let ring = ScoreRing::default();
        let mut first = ring.play(50.0).await;
        let mut second = ring.play(90.0).await;

        // the first fill was cut short by the replay
        while first.changed().await.is_ok() {}
        assert!(*first.borrow() < 50.0);

        let mut last = 0.0;
        while second.changed().await.is_ok() {
            last = *second.borrow_and_update();
        }
        assert_eq!(last, 90.0);
    }
}
