//! Research command - run a full research session and print the report.

use anyhow::Result;
use clap::Args;
use console::Style;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use std::path::PathBuf;

use taliesin_research::{
    Clarifier, EngineConfig, FsReportStore, MAX_ITERATIONS, ResearchEngine, ResearchError,
};

use super::Context;

/// Arguments for the research command.
#[derive(Args, Debug)]
pub struct ResearchArgs {
    /// The research topic or question
    #[arg(required = true)]
    pub topic: String,

    /// Model to use for every generation call
    #[arg(short, long)]
    pub model: Option<String>,

    /// Directory where the report is saved
    #[arg(long, default_value = "reports")]
    pub reports_dir: PathBuf,

    /// Skip the clarifying questions and research the topic as given
    #[arg(long)]
    pub no_clarify: bool,
}

/// Run the research command.
pub async fn run(args: ResearchArgs, ctx: &Context) -> Result<()> {
    let cyan = Style::new().cyan().bold();
    let dim = Style::new().dim();
    let green = Style::new().green();
    let red = Style::new().red();

    let model = args
        .model
        .clone()
        .unwrap_or_else(|| taliesin_llm::DEFAULT_MODEL.to_string());

    let llm = taliesin_llm::create_shared_backend(taliesin_llm::OpenAiConfig::openai_from_env()?)?;
    let search = taliesin_search::create_shared_backend(taliesin_search::ExaConfig::from_env()?)?;
    let store = FsReportStore::new(&args.reports_dir);

    if ctx.verbose {
        println!("{}", dim.apply_to(format!("Model: {}", model)));
        println!(
            "{}",
            dim.apply_to(format!("Reports dir: {}", args.reports_dir.display()))
        );
    }

    let engine = ResearchEngine::new(
        llm,
        search,
        Box::new(store),
        EngineConfig {
            model,
            clarify: !args.no_clarify,
        },
    );

    if !ctx.json_output {
        println!("{}", cyan.apply_to(format!("Researching: {}", args.topic)));
        println!();
    }

    let mut clarifier = ConsoleClarifier::new()?;
    match engine.run(&args.topic, &mut clarifier).await {
        Ok(outcome) => {
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }

            println!("{}", outcome.report);
            println!();
            println!(
                "{}",
                dim.apply_to(format!(
                    "{} search rounds, {} sources gathered, {} cited",
                    outcome.session.iteration,
                    outcome.session.evidence().len(),
                    outcome.citations_used.len()
                ))
            );
            match &outcome.saved {
                Some(saved) => {
                    println!(
                        "{}",
                        green.apply_to(format!(
                            "Saved: {} and {}",
                            saved.markdown_path.display(),
                            saved.pdf_path.display()
                        ))
                    );
                }
                None => {
                    println!(
                        "{}",
                        dim.apply_to("Report was not saved to disk; see logs for the persistence error")
                    );
                }
            }
            Ok(())
        }
        Err(error) => {
            if let Some(partial) = error.partial_session() {
                eprintln!();
                eprintln!("{} {}", red.apply_to("Research aborted:"), error);
                eprintln!(
                    "{}",
                    dim.apply_to(format!(
                        "Completed {} of {} rounds with {} sources before failing",
                        partial.iteration,
                        MAX_ITERATIONS,
                        partial.evidence().len()
                    ))
                );
            }
            Err(error.into())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Console Clarifier
// ─────────────────────────────────────────────────────────────────────────────

/// Asks clarifying questions over the terminal, one readline per question.
struct ConsoleClarifier {
    editor: Editor<(), DefaultHistory>,
}

impl ConsoleClarifier {
    fn new() -> Result<Self> {
        let config = Config::builder().auto_add_history(false).build();
        let editor = Editor::with_config(config)?;
        Ok(Self { editor })
    }
}

impl Clarifier for ConsoleClarifier {
    fn ask(
        &mut self,
        questions: &[String],
    ) -> std::result::Result<Vec<String>, ResearchError> {
        let bold = Style::new().bold();
        println!(
            "{}",
            bold.apply_to("To better understand your research needs, I have a few questions:")
        );
        println!();
        for (i, question) in questions.iter().enumerate() {
            println!("{}. {}", i + 1, question);
        }
        println!();

        let mut answers = Vec::with_capacity(questions.len());
        for i in 0..questions.len() {
            match self.editor.readline(&format!("Answer {}: ", i + 1)) {
                Ok(line) => answers.push(line.trim().to_string()),
                // Ctrl+D skips the question
                Err(ReadlineError::Eof) => answers.push(String::new()),
                Err(ReadlineError::Interrupted) => {
                    return Err(ResearchError::input("clarification interrupted"));
                }
                Err(e) => {
                    return Err(ResearchError::input(format!("could not read answer: {e}")));
                }
            }
        }
        println!();
        Ok(answers)
    }
}
