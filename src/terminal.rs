//! Terminal wizard: intake, the question loop and the finished plan on a
//! line-oriented terminal.

use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

use crate::error::{Error, FlowError};
use crate::flow::{FlowState, QuestionFlowEngine};
use crate::intake::{CATEGORIES, FieldKind, IntakeCollector, IntakeStep, Profile, find_category};
use crate::question::{AnswerDraft, InputControl, OTHER_OPTION, Question};
use crate::question::control::OTHER_PLACEHOLDER;
use crate::render;

/// Runs the whole questionnaire over an input/output pair.
pub struct TerminalWizard<R, W> {
    lines: Lines<R>,
    output: W,
    engine: QuestionFlowEngine,
    html_path: Option<PathBuf>,
}

impl<R, W> TerminalWizard<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W, engine: QuestionFlowEngine) -> Self {
        Self {
            lines: input.lines(),
            output,
            engine,
            html_path: None,
        }
    }

    /// Also write the rendered plan as an HTML page to `path`.
    pub fn with_html_output(mut self, path: Option<PathBuf>) -> Self {
        self.html_path = path;
        self
    }

    /// Run until a plan is produced or the user gives up.
    ///
    /// Returns the plan text, or `None` when input ended or the user declined
    /// to start over after a failure.
    pub async fn run(&mut self) -> Result<Option<String>, Error> {
        self.say("🎯 Let's build your resolution plan.\n").await?;
        loop {
            let Some(profile) = self.collect_profile().await? else {
                return Ok(None);
            };

            match self.ask_questions(&profile).await {
                Ok(Some(plan)) => {
                    self.show_plan(&plan).await?;
                    return Ok(Some(plan));
                }
                Ok(None) => return Ok(None),
                Err(Error::Flow(e)) => {
                    tracing::warn!(error = %e, "Questionnaire failed");
                    self.say(&format!("\n😕 {}\n", e.user_message())).await?;
                    if !self.confirm("Start over? [y/N] ").await? {
                        return Ok(None);
                    }
                    self.engine.restart();
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn collect_profile(&mut self) -> Result<Option<Profile>, Error> {
        let mut collector = IntakeCollector::new();
        while let Some(spec) = collector.current_spec() {
            let mut prompt = format!("\nStep {} of {}: {}\n", spec.step, spec.total_steps, spec.prompt);
            if let FieldKind::Select { options } = &spec.kind {
                for (i, option) in options.iter().enumerate() {
                    prompt.push_str(&format!("  {}) {}\n", i + 1, describe_option(option)));
                }
            }
            prompt.push_str("> ");
            self.say(&prompt).await?;

            let Some(line) = self.read_line().await? else {
                return Ok(None);
            };
            let value = match &spec.kind {
                FieldKind::Select { options } => pick(options, &line).unwrap_or(line),
                FieldKind::Text { .. } => line,
            };

            match collector.submit_field(spec.id, &value) {
                Ok(IntakeStep::Done(profile)) => {
                    self.say(&format!("\nGot it: {}\n", profile.summary())).await?;
                    return Ok(Some(profile));
                }
                Ok(IntakeStep::Next(_)) => {}
                Err(e) => self.say(&format!("⚠️  {e}\n")).await?,
            }
        }
        Ok(None)
    }

    async fn ask_questions(&mut self, profile: &Profile) -> Result<Option<String>, Error> {
        self.say("\n⏳ Preparing your first question...\n").await?;
        self.engine.start(profile).await?;

        loop {
            let question = match self.engine.state() {
                FlowState::AwaitingAnswer(q) => q.clone(),
                FlowState::Terminal(plan) => return Ok(Some(plan.clone())),
                FlowState::Failed(reason) => {
                    return Err(FlowError::Transport(reason.clone()).into());
                }
                FlowState::Idle | FlowState::AwaitingFirstQuestion => return Ok(None),
            };

            let number = self.engine.session().current_question_index + 1;
            let Some(answer) = self.compose_answer(number, &question).await? else {
                return Ok(None);
            };

            match self.engine.submit_answer(&answer).await {
                Ok(_) => {}
                Err(e) if !e.is_fatal() => {
                    self.say(&format!("⚠️  {e}\n")).await?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Prompt until the draft can be submitted. `None` on end of input.
    async fn compose_answer(&mut self, number: u32, question: &Question) -> Result<Option<String>, Error> {
        let mut draft = AnswerDraft::new(question);
        let mut text = format!("\nQuestion {number}: {}\n", question.prompt);
        match draft.control() {
            InputControl::Binary { .. } | InputControl::ExclusiveChoice { .. } => {
                for (i, label) in draft.control().buttons().iter().enumerate() {
                    text.push_str(&format!("  {}) {}\n", i + 1, label));
                }
            }
            InputControl::Slider { min, max, .. } => {
                text.push_str(&format!("  (a number from {min} to {max})\n"));
            }
            InputControl::Numeric => text.push_str("  (a number)\n"),
            InputControl::FreeText { placeholder } => text.push_str(&format!("  {placeholder}\n")),
        }
        self.say(&text).await?;

        loop {
            self.say("> ").await?;
            let Some(line) = self.read_line().await? else {
                return Ok(None);
            };

            let buttons: Vec<String> = draft.control().buttons().iter().map(|b| b.to_string()).collect();
            if buttons.is_empty() {
                draft.type_text(&line);
            } else {
                let label = pick(&buttons, &line).unwrap_or(line);
                if !draft.select(&label) {
                    self.say("Please pick one of the numbered options.\n").await?;
                    continue;
                }
                if label == OTHER_OPTION && draft.other_active() {
                    self.say(&format!("{OTHER_PLACEHOLDER}\n> ")).await?;
                    let Some(other) = self.read_line().await? else {
                        return Ok(None);
                    };
                    draft.type_text(&other);
                }
            }

            match draft.continue_answer() {
                Some(answer) => return Ok(Some(answer)),
                None => {
                    // Re-selecting Other would hide the field again.
                    if draft.other_active() {
                        draft.select(OTHER_OPTION);
                    }
                    let hint = match draft.control() {
                        InputControl::Slider { min, max, .. } => {
                            format!("Please enter a whole number from {min} to {max}.\n")
                        }
                        InputControl::Numeric => "Please enter a number.\n".to_string(),
                        _ => "Please enter an answer.\n".to_string(),
                    };
                    self.say(&hint).await?;
                }
            }
        }
    }

    async fn show_plan(&mut self, plan: &str) -> Result<(), Error> {
        self.say("\n✨ Your Personal Resolution Plan\n\n").await?;
        self.say(plan).await?;
        self.say("\n").await?;

        if let Some(path) = self.html_path.clone() {
            let page = html_page(&render::render(plan).to_html());
            tokio::fs::write(&path, page).await?;
            tracing::info!(path = %path.display(), "Resolution written");
            self.say(&format!("\nSaved to {}\n", path.display())).await?;
        }
        Ok(())
    }

    async fn confirm(&mut self, prompt: &str) -> Result<bool, Error> {
        self.say(prompt).await?;
        Ok(self
            .read_line()
            .await?
            .is_some_and(|l| matches!(l.to_lowercase().as_str(), "y" | "yes")))
    }

    async fn read_line(&mut self) -> Result<Option<String>, Error> {
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }

    async fn say(&mut self, text: &str) -> Result<(), Error> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}

/// Resolve a 1-based option number to its label.
fn pick(options: &[String], line: &str) -> Option<String> {
    let n: usize = line.trim().parse().ok()?;
    options.get(n.checked_sub(1)?).cloned()
}

/// Option text with the catalogue's icon or blurb.
fn describe_option(option: &str) -> String {
    if let Some(category) = find_category(option) {
        return category.label();
    }
    CATEGORIES
        .iter()
        .find_map(|c| c.sub_category(option))
        .map(|s| format!("{} ({})", s.title, s.blurb))
        .unwrap_or_else(|| option.to_string())
}

fn html_page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Your Personal Resolution Plan</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}
