//! Interactive quiz flow: pick a topic, run a session, show the results.

use std::io;
use std::path::Path;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::QuizError;
use crate::config::QuizConfig;
use crate::data::{CacheInfo, QuestionCache, catalog};
use crate::input::{AnswerSource, KeyboardSource, LineSource};
use crate::models::QuestionRecord;
use crate::session::{Cancellation, ConfigureError, FinalReport, Session};
use crate::ui::menu::{read_line, select_count, select_option};
use crate::ui::{ConsolePresenter, Presenter};

/// Category and subcategory fixed up front. Whatever is left unset is
/// asked for with a menu.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

pub struct App {
    config: QuizConfig,
    selection: Selection,
    cache: QuestionCache,
    replay: bool,
}

impl App {
    pub fn new(config: QuizConfig, selection: Selection) -> Self {
        Self {
            config,
            selection,
            cache: QuestionCache::new(),
            replay: true,
        }
    }

    /// Run a single round and stop, without offering another.
    pub fn single_round(mut self) -> Self {
        self.replay = false;
        self
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn cache_info(&self) -> CacheInfo {
        self.cache.info()
    }

    /// Play on the real terminal. Returns the report of every finished round.
    pub async fn run(&mut self) -> Result<Vec<FinalReport>, QuizError> {
        let cancel = Cancellation::new();
        let watcher = watch_ctrl_c(cancel.clone());

        let result = if self.config.plain_input {
            let mut source = LineSource::stdin()?;
            let mut presenter = ConsolePresenter::new(io::stdout(), false);
            self.play(&mut source, &mut presenter, &cancel).await
        } else {
            let mut source = KeyboardSource::new()?;
            let mut presenter = ConsolePresenter::new(io::stdout(), true);
            self.play(&mut source, &mut presenter, &cancel).await
        };

        watcher.abort();
        result
    }

    /// Play rounds until the operator declines another or cancels.
    pub async fn play<S, P>(
        &mut self,
        source: &mut S,
        presenter: &mut P,
        cancel: &Cancellation,
    ) -> Result<Vec<FinalReport>, QuizError>
    where
        S: AnswerSource,
        P: Presenter,
    {
        let mut reports = Vec::new();

        loop {
            let pool = self.cache.load(&self.config.questions_path)?;
            let Some(report) = self.round(&pool, source, presenter, cancel).await? else {
                break;
            };
            reports.push(report);

            if !self.replay || cancel.is_cancelled() {
                break;
            }
            source.discard_pending();
            let again = read_line(source, presenter, cancel, "Play another round? (y/n)").await?;
            if !matches!(again.as_deref().map(str::trim), Some("y" | "Y" | "yes" | "Yes")) {
                break;
            }
        }

        Ok(reports)
    }

    /// One round. `None` means the operator backed out before it started.
    async fn round<S, P>(
        &self,
        pool: &[QuestionRecord],
        source: &mut S,
        presenter: &mut P,
        cancel: &Cancellation,
    ) -> Result<Option<FinalReport>, QuizError>
    where
        S: AnswerSource,
        P: Presenter,
    {
        let session_limit = crate::session::clamp_time_limit(self.config.time_limit_seconds);
        presenter.show_banner(pool.len(), std::time::Duration::from_secs(u64::from(session_limit)))?;

        let catalog = catalog::categories(pool);

        let category = match &self.selection.category {
            Some(category) => category.clone(),
            None => {
                let choices: Vec<String> = catalog.keys().cloned().collect();
                match pick(source, presenter, cancel, "Choose a category", &choices).await? {
                    Some(category) => category,
                    None => return Ok(None),
                }
            }
        };

        let Some(subcategories) = catalog.get(&category) else {
            return Err(ConfigureError::EmptyPool {
                category,
                subcategory: self.selection.subcategory.clone().unwrap_or_default(),
            }
            .into());
        };
        let subcategory = match &self.selection.subcategory {
            Some(subcategory) => subcategory.clone(),
            None => {
                let title = format!("Choose a subcategory of {}", category);
                match pick(source, presenter, cancel, &title, subcategories).await? {
                    Some(subcategory) => subcategory,
                    None => return Ok(None),
                }
            }
        };

        let available = catalog::count_in(pool, &category, &subcategory);
        let topic_from_menu =
            self.selection.category.is_none() || self.selection.subcategory.is_none();
        let count = match self.config.question_count {
            _ if available == 0 => 0,
            Some(count) if (1..=available).contains(&count) || !topic_from_menu => count,
            requested => {
                if let Some(count) = requested {
                    presenter.show_notice(&format!(
                        "{} > {} has {} questions, cannot ask {}.",
                        category, subcategory, available, count
                    ))?;
                }
                match select_count(source, presenter, cancel, available).await? {
                    Some(count) => count,
                    None => return Ok(None),
                }
            }
        };

        let session = Session::configure(
            pool,
            &category,
            &subcategory,
            count,
            self.config.time_limit_seconds,
        )?
        .with_pause(self.config.pause());
        info!(%category, %subcategory, count, "Starting quiz");

        let report = session.run(source, presenter, cancel).await;
        presenter.show_report(&report)?;
        Ok(Some(report))
    }
}

/// Menu over `choices`, skipped when there is only one.
async fn pick<S, P>(
    source: &mut S,
    presenter: &mut P,
    cancel: &Cancellation,
    title: &str,
    choices: &[String],
) -> io::Result<Option<String>>
where
    S: AnswerSource,
    P: Presenter,
{
    if let [only] = choices {
        presenter.show_notice(&format!("{}: {}", title, only))?;
        return Ok(Some(only.clone()));
    }
    let picked = select_option(source, presenter, cancel, title, choices).await?;
    Ok(picked.and_then(|index| choices.get(index).cloned()))
}

/// Ctrl-C outside raw mode arrives as a signal rather than a key press.
fn watch_ctrl_c(cancel: Cancellation) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                debug!("Interrupt signal received");
                cancel.cancel();
            }
            Err(e) => warn!(error = %e, "Could not listen for the interrupt signal"),
        }
    })
}

/// Load the question file without starting a quiz, for `--check`.
pub fn check_questions(path: &Path) -> Result<usize, QuizError> {
    let mut cache = QuestionCache::new();
    let pool = cache.load(path)?;
    for (category, subcategories) in catalog::categories(&pool) {
        for subcategory in subcategories {
            let count = catalog::count_in(&pool, &category, &subcategory);
            println!("{} > {}: {} questions", category, subcategory, count);
        }
    }
    Ok(pool.len())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::session::testing::{Recorded, RecordingPresenter, ScriptedSource};

    const CSV: &str = "\
Category,Subcategory,Question,Option A,Option B,Option C,Option D,Correct Option
Geography,Capitals,Capital of France?,Paris,Rome,Madrid,Berlin,A
Geography,Capitals,Capital of Italy?,Paris,Rome,Madrid,Berlin,B
Geography,Rivers,Longest river?,Nile,Amazon,Yangtze,Danube,A
History,Ancient,First emperor of Rome?,Augustus,Nero,Caesar,,A
";

    fn write_questions() -> PathBuf {
        let path = std::env::temp_dir().join(format!("quiz-app-{}.csv", uuid::Uuid::new_v4()));
        fs::write(&path, CSV).unwrap();
        path
    }

    fn config(path: PathBuf) -> QuizConfig {
        QuizConfig {
            questions_path: path,
            time_limit_seconds: 10,
            pause_between_questions_ms: 0,
            ..QuizConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_menu_driven_round() {
        let path = write_questions();
        let mut app = App::new(config(path.clone()), Selection::default());
        let mut source = ScriptedSource::new()
            .submit_after(1, "1") // Geography
            .submit_after(1, "1") // Capitals
            .submit_after(1, "2") // two questions
            .submit_after(1, "b")
            .submit_after(1, "b")
            .submit_after(1, "n");
        let mut presenter = RecordingPresenter::default();

        let reports = app
            .play(&mut source, &mut presenter, &Cancellation::new())
            .await
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].total_questions, 2);
        assert_eq!(reports[0].answered_count, 2);
        assert_eq!(reports[0].score, 1);
        assert!(presenter.events.contains(&Recorded::Report));
        fs::remove_file(path).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_preselected_round_with_fixed_count() {
        let path = write_questions();
        let selection = Selection {
            category: Some("History".to_string()),
            subcategory: Some("Ancient".to_string()),
        };
        let config = QuizConfig {
            question_count: Some(1),
            ..config(path.clone())
        };
        let mut app = App::new(config, selection).single_round();
        let mut source = ScriptedSource::new().submit_after(2, "first");
        let mut presenter = RecordingPresenter::default();

        let reports = app
            .play(&mut source, &mut presenter, &Cancellation::new())
            .await
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].score, 1);
        assert!(!presenter.events.iter().any(|e| matches!(e, Recorded::Menu { .. })));
        assert!(presenter.events.contains(&Recorded::Question {
            position: 1,
            total: 1,
            limit: Duration::from_secs(10),
        }));
        fs::remove_file(path).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_reuses_cached_questions() {
        let path = write_questions();
        let selection = Selection {
            category: Some("Geography".to_string()),
            subcategory: Some("Rivers".to_string()),
        };
        let mut app = App::new(config(path.clone()), selection);
        let mut source = ScriptedSource::new()
            .submit_after(1, "1")
            .submit_after(1, "a")
            .submit_after(1, "y")
            .submit_after(1, "1")
            .submit_after(1, "b")
            .submit_after(1, "no");
        let mut presenter = RecordingPresenter::default();

        let reports = app
            .play(&mut source, &mut presenter, &Cancellation::new())
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].score, 1);
        assert_eq!(reports[1].score, 0);
        assert_eq!(app.cache_info().cached_files.len(), 1);
        fs::remove_file(path).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_category_is_an_error() {
        let path = write_questions();
        let selection = Selection {
            category: Some("Music".to_string()),
            subcategory: None,
        };
        let mut app = App::new(config(path.clone()), selection);
        let mut presenter = RecordingPresenter::default();

        let err = app
            .play(&mut ScriptedSource::new(), &mut presenter, &Cancellation::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuizError::Configure(ConfigureError::EmptyPool { .. })
        ));
        fs::remove_file(path).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_count_too_large_is_an_error() {
        let path = write_questions();
        let selection = Selection {
            category: Some("Geography".to_string()),
            subcategory: Some("Capitals".to_string()),
        };
        let config = QuizConfig {
            question_count: Some(5),
            ..config(path.clone())
        };
        let mut app = App::new(config, selection);

        let err = app
            .play(
                &mut ScriptedSource::new(),
                &mut RecordingPresenter::default(),
                &Cancellation::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuizError::Configure(ConfigureError::Range {
                requested: 5,
                available: 2
            })
        ));
        fs::remove_file(path).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_count_too_large_for_menu_topic_asks_again() {
        let path = write_questions();
        let config = QuizConfig {
            question_count: Some(5),
            ..config(path.clone())
        };
        let mut app = App::new(config, Selection::default()).single_round();
        let mut source = ScriptedSource::new()
            .submit_after(1, "1") // Geography
            .submit_after(1, "1") // Capitals, two questions
            .submit_after(1, "2")
            .submit_after(1, "a")
            .submit_after(1, "b");
        let mut presenter = RecordingPresenter::default();

        let reports = app
            .play(&mut source, &mut presenter, &Cancellation::new())
            .await
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].total_questions, 2);
        assert_eq!(reports[0].answered_count, 2);
        assert!(presenter.events.contains(&Recorded::Notice(
            "Geography > Capitals has 2 questions, cannot ask 5.".to_string()
        )));
        fs::remove_file(path).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_backing_out_of_menu() {
        let path = write_questions();
        let mut app = App::new(config(path.clone()), Selection::default());
        let mut source = ScriptedSource::new().close_after(1);

        let reports = app
            .play(&mut source, &mut RecordingPresenter::default(), &Cancellation::new())
            .await
            .unwrap();
        assert!(reports.is_empty());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_question_file() {
        let err = check_questions(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, QuizError::Load(_)));
    }
}
