use std::{
    io::{self, Write},
    sync::Arc,
};

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::{
    ai::{Completion, GenerationOutcome, OpenAiClient, SuggestionGenerator},
    config::AppConfig,
    domain::{GenerationRequest, GenerationResult, META_BOUNDS, TITLE_BOUNDS, WorklistEntry},
    export::ApprovedLedger,
    infrastructure::{directories::ResolvedPaths, shutdown::StopSignal},
    ingest, worklist,
};

const PREVIEW_ROWS: usize = 25;

pub struct ReviewApp {
    config: Arc<AppConfig>,
    paths: ResolvedPaths,
    worklist: Vec<WorklistEntry>,
    generator: SuggestionGenerator,
    stop: StopSignal,
}

impl ReviewApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths, stop: StopSignal) -> Result<Self> {
        let config = Arc::new(config);
        let csv_path = &config.review.crawl_csv;
        let records = ingest::load_crawl_export(csv_path)
            .with_context(|| format!("failed to load crawl export {}", csv_path.display()))?;
        let worklist = worklist::build(&records);

        let http_client = Client::builder()
            .user_agent(format!("seo-meta-agent/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        if config.openai.api_key.is_none() {
            tracing::warn!(
                target: "session",
                "OPENAI_API_KEY is not set; suggestions cannot be generated"
            );
        }
        let generator = SuggestionGenerator::new(Arc::new(OpenAiClient::new(
            http_client,
            config.openai.clone(),
        )));

        Ok(Self {
            config,
            paths,
            worklist,
            generator,
            stop,
        })
    }

    pub async fn run(self) -> Result<()> {
        let ReviewApp {
            config,
            paths,
            worklist,
            generator,
            stop,
        } = self;

        let selected = worklist::filter_by_issues(&worklist, &config.review.issue_filter);
        print_overview(&worklist, &selected);
        tracing::info!(
            target: "session",
            model = generator.model_name(),
            flagged = worklist.len(),
            selected = selected.len(),
            "review started"
        );

        let mut reviewer = Reviewer::new(
            generator,
            Console::stdin(),
            stop,
            config.review.extra_instructions.clone(),
        );
        let mut ledger = ApprovedLedger::new();
        for (idx, entry) in selected.iter().enumerate() {
            println!("\n=== Page {} of {} ===", idx + 1, selected.len());
            if reviewer.review(entry, &mut ledger).await? == Flow::Quit {
                break;
            }
        }

        if ledger.is_empty() {
            println!("\nNo approved items; nothing exported.");
        } else {
            print_approved(&ledger);
            ledger.save(&paths.export_path).with_context(|| {
                format!("failed to export approved items to {}", paths.export_path.display())
            })?;
            println!(
                "\nExported {} approved item(s) to {}",
                ledger.len(),
                paths.export_path.display()
            );
        }
        tracing::info!(target: "session", approved = ledger.len(), "review finished");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Approve,
    Regenerate,
    Instructions,
    Skip,
    Quit,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "a" | "approve" => Some(Self::Approve),
            "r" | "regenerate" | "retry" => Some(Self::Regenerate),
            "i" | "instructions" => Some(Self::Instructions),
            "s" | "skip" => Some(Self::Skip),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

struct Console<R> {
    lines: Lines<R>,
}

impl Console<BufReader<Stdin>> {
    fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Console<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// `None` when input ends or a stop is requested.
    async fn ask(&mut self, question: &str, stop: &mut StopSignal) -> Result<Option<String>> {
        print!("{question} ");
        io::stdout().flush()?;
        tokio::select! {
            line = self.lines.next_line() => Ok(line?),
            _ = stop.requested() => Ok(None),
        }
    }
}

struct Reviewer<R> {
    generator: SuggestionGenerator,
    console: Console<R>,
    stop: StopSignal,
    default_instructions: String,
}

impl<R: AsyncBufRead + Unpin> Reviewer<R> {
    fn new(
        generator: SuggestionGenerator,
        console: Console<R>,
        stop: StopSignal,
        default_instructions: String,
    ) -> Self {
        Self {
            generator,
            console,
            stop,
            default_instructions,
        }
    }

    async fn review(&mut self, entry: &WorklistEntry, ledger: &mut ApprovedLedger) -> Result<Flow> {
        if self.stop.is_requested() {
            return Ok(Flow::Quit);
        }
        print_entry(entry);
        let mut instructions = self.default_instructions.clone();

        loop {
            let request = GenerationRequest::from_entry(entry, instructions.clone());
            let outcome = tokio::select! {
                res = self.generator.generate(&request) => res,
                _ = self.stop.requested() => {
                    tracing::info!(
                        target: "session",
                        address = %entry.address,
                        "stop requested during generation; abandoning page"
                    );
                    return Ok(Flow::Quit);
                }
            };

            let suggestion = match outcome {
                Ok(outcome) => {
                    print_outcome(&outcome);
                    Some(outcome.result)
                }
                Err(err) => {
                    tracing::warn!(
                        target: "session",
                        address = %entry.address,
                        error = %err,
                        transient = err.is_transient(),
                        "generation failed"
                    );
                    println!("AI error: {err}");
                    None
                }
            };

            let question = if suggestion.is_some() {
                "[a]pprove [r]egenerate [i]nstructions [s]kip [q]uit >"
            } else {
                "[r]etry [i]nstructions [s]kip [q]uit >"
            };

            loop {
                let Some(answer) = self.console.ask(question, &mut self.stop).await? else {
                    return Ok(Flow::Quit);
                };
                match (Command::parse(&answer), &suggestion) {
                    (Some(Command::Approve), Some(result)) => {
                        ledger.approve(entry, result.clone());
                        println!("Added to export list ({} approved).", ledger.len());
                        return Ok(Flow::Next);
                    }
                    (Some(Command::Approve), None) => println!("Nothing to approve yet."),
                    (Some(Command::Regenerate), _) => break,
                    (Some(Command::Instructions), _) => {
                        let Some(text) = self
                            .console
                            .ask("Instructions (tone, keywords, constraints) >", &mut self.stop)
                            .await?
                        else {
                            return Ok(Flow::Quit);
                        };
                        instructions = text.trim().to_string();
                        break;
                    }
                    (Some(Command::Skip), _) => return Ok(Flow::Next),
                    (Some(Command::Quit), _) => return Ok(Flow::Quit),
                    (None, _) => println!("Unknown command: {answer:?}"),
                }
            }
        }
    }
}

fn print_overview(worklist: &[WorklistEntry], selected: &[&WorklistEntry]) {
    println!("Worklist (HTML + 200 + missing/length issues): {} pages flagged", worklist.len());
    let catalog = worklist::issue_catalog(worklist);
    if !catalog.is_empty() {
        let labels: Vec<&str> = catalog.iter().map(|issue| issue.label()).collect();
        println!("Issue types present: {}", labels.join(", "));
    }
    if selected.len() != worklist.len() {
        println!("{} pages match the issue filter", selected.len());
    }
    for entry in selected.iter().take(PREVIEW_ROWS) {
        println!(
            "  {} | {} | title {} | meta {}",
            entry.address, entry.issues, entry.title_length, entry.meta_length
        );
    }
    if selected.len() > PREVIEW_ROWS {
        println!("  ... {} more", selected.len() - PREVIEW_ROWS);
    }
}

fn print_entry(entry: &WorklistEntry) {
    println!("URL:           {}", entry.address);
    println!("Issue Type:    {}", entry.issues);
    println!("H1:            {}", display(&entry.h1));
    println!("Current Title: {}", display(&entry.title));
    println!("Title Length:  {}", entry.title_length);
    println!("Current Meta:  {}", display(&entry.meta_description));
    println!("Meta Length:   {}", entry.meta_length);
}

fn print_outcome(outcome: &GenerationOutcome) {
    let result: &GenerationResult = &outcome.result;
    println!("\n--- AI Suggestion ({} call(s)) ---", outcome.calls);
    if outcome.completion == Completion::ExhaustedAccepted {
        println!("Length limits still not met after retries; review or regenerate.");
    }
    println!("AI Title:          {}", display(&result.ai_title));
    println!(
        "AI Title Length:   {} {}",
        result.ai_title_length,
        TITLE_BOUNDS.indicator(result.ai_title_length)
    );
    println!("AI Meta:           {}", display(&result.ai_meta));
    println!(
        "AI Meta Length:    {} {}",
        result.ai_meta_length,
        META_BOUNDS.indicator(result.ai_meta_length)
    );
    println!("Primary Keyword:   {}", display(&result.primary_keyword));
    println!("Secondary Keyword: {}", display(&result.secondary_keyword));
}

fn print_approved(ledger: &ApprovedLedger) {
    println!("\nApproved items:");
    for item in ledger.items() {
        println!(
            "  {} | {} | AI title {} | AI meta {}",
            item.address, item.issues, item.result.ai_title_length, item.result.ai_meta_length
        );
    }
}

fn display(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(none)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ai::{
            error::GenerationError,
            mock::{ScriptedGenerator, response_with_lengths},
        },
        domain::IssueSet,
        infrastructure::shutdown::stop_channel,
    };

    fn entry() -> WorklistEntry {
        WorklistEntry {
            address: "https://example.com/".to_string(),
            status_code: 200,
            title: None,
            h1: Some("Welcome".to_string()),
            meta_description: None,
            title_length: 0,
            meta_length: 0,
            issues: IssueSet::classify(true, None, true, None),
        }
    }

    fn reviewer(script: &ScriptedGenerator, input: &'static str) -> Reviewer<&'static [u8]> {
        let (_sender, stop) = stop_channel();
        Reviewer::new(
            SuggestionGenerator::new(Arc::new(script.clone())),
            Console::new(input.as_bytes()),
            stop,
            "Friendly tone".to_string(),
        )
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse(" A "), Some(Command::Approve));
        assert_eq!(Command::parse("retry"), Some(Command::Regenerate));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("x"), None);
    }

    #[tokio::test]
    async fn approving_adds_current_suggestion_to_ledger() {
        let script = ScriptedGenerator::new().with_response(response_with_lengths(45, 100));
        let mut ledger = ApprovedLedger::new();
        let flow = reviewer(&script, "a\n").review(&entry(), &mut ledger).await.unwrap();

        assert_eq!(flow, Flow::Next);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.items()[0].result.ai_title_length, 45);
        assert!(script.calls()[0].prompt.contains("Friendly tone"));
    }

    #[tokio::test]
    async fn regenerate_with_new_instructions_then_approve() {
        let script = ScriptedGenerator::new()
            .with_response(response_with_lengths(45, 100))
            .with_response(response_with_lengths(50, 120));
        let mut ledger = ApprovedLedger::new();
        let flow = reviewer(&script, "x\ni\nMention free shipping\na\n")
            .review(&entry(), &mut ledger)
            .await
            .unwrap();

        assert_eq!(flow, Flow::Next);
        assert_eq!(script.call_count(), 2);
        assert!(script.calls()[1].prompt.contains("Mention free shipping"));
        assert_eq!(ledger.items()[0].result.ai_title_length, 50);
    }

    #[tokio::test]
    async fn generation_error_allows_retry_but_not_approval() {
        let script = ScriptedGenerator::new()
            .with_error(GenerationError::Quota("slow down".into()))
            .with_response(response_with_lengths(45, 100));
        let mut ledger = ApprovedLedger::new();
        let flow = reviewer(&script, "a\nr\na\n").review(&entry(), &mut ledger).await.unwrap();

        assert_eq!(flow, Flow::Next);
        assert_eq!(script.call_count(), 2);
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn skip_and_end_of_input() {
        let script = ScriptedGenerator::new()
            .with_response(response_with_lengths(45, 100))
            .with_response(response_with_lengths(45, 100));
        let mut ledger = ApprovedLedger::new();

        let flow = reviewer(&script, "s\n").review(&entry(), &mut ledger).await.unwrap();
        assert_eq!(flow, Flow::Next);

        let flow = reviewer(&script, "").review(&entry(), &mut ledger).await.unwrap();
        assert_eq!(flow, Flow::Quit);
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn stop_before_review_makes_no_calls() {
        let script = ScriptedGenerator::new().with_response(response_with_lengths(45, 100));
        let (sender, stop) = stop_channel();
        sender.send(true).unwrap();
        let mut reviewer = Reviewer::new(
            SuggestionGenerator::new(Arc::new(script.clone())),
            Console::new("a\n".as_bytes()),
            stop,
            String::new(),
        );
        let mut ledger = ApprovedLedger::new();

        assert_eq!(reviewer.review(&entry(), &mut ledger).await.unwrap(), Flow::Quit);
        assert_eq!(script.call_count(), 0);
    }
}
