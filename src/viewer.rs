use crate::render::render_page;
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;
use wrapped_analytics::aggregations::StatisticsSummary;
use wrapped_analytics::ReportGenerator;
use wrapped_core::config::StoryConfig;
use wrapped_story::{Navigation, Presentation};

const HELP: &str = "  Enter/n — next page   p — previous page   q — quit   h — help";

/// Build the story pages and bind them to `summary`.
pub fn prepare(summary: &Arc<StatisticsSummary>, story: &StoryConfig) -> Result<Presentation> {
    let mut presentation = Presentation::new(story);
    presentation.bind(Arc::clone(summary))?;
    Ok(presentation)
}

/// Run the interactive story viewer until the last page or the user quits.
pub fn run(summary: Arc<StatisticsSummary>, story: &StoryConfig, heading: &str) -> Result<()> {
    let mut presentation = prepare(&summary, story)?;
    let mut rl = DefaultEditor::new()?;
    println!("{}", HELP);
    let mut show = true;

    loop {
        if show {
            let page = presentation.current()?;
            let index = presentation
                .sequence()
                .map(|s| s.current_index())
                .unwrap_or(0);
            print!(
                "{}",
                render_page(page, (index, presentation.pages().len()), heading)
            );
        }
        show = true;

        match rl.readline("\x1b[1;32m❯\x1b[0m ") {
            Ok(line) => match line.trim() {
                "" | "n" | "next" => {
                    if presentation.advance() == Some(Navigation::AtEnd) {
                        println!("\n\x1b[1mThat's a wrap!\x1b[0m\n");
                        print!("{}", ReportGenerator::text_summary(&summary));
                        break;
                    }
                }
                "p" | "prev" | "back" => {
                    if presentation.retreat() == Some(Navigation::AtStart) {
                        println!("  Already on the first page.");
                        show = false;
                    }
                }
                "q" | "quit" | "exit" => break,
                "h" | "help" | "?" => {
                    println!("{}", HELP);
                    show = false;
                }
                other => {
                    println!("  Unknown command: {} (h for help)", other);
                    show = false;
                }
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapped_analytics::aggregate;
    use wrapped_core::types::PageKind;

    #[test]
    fn test_prepare_binds_every_page() {
        let summary = Arc::new(aggregate(&[]));
        let mut presentation = prepare(&summary, &StoryConfig::default()).unwrap();
        assert!(presentation.is_ready());
        assert_eq!(presentation.pages().len(), PageKind::ALL.len());
        assert!(presentation.pages().iter().all(|p| p.is_bound()));
        assert_eq!(presentation.advance(), Some(Navigation::Moved(1)));
    }

    #[test]
    fn test_prepare_follows_story_config() {
        let summary = Arc::new(aggregate(&[]));
        let story = StoryConfig {
            pages: vec![PageKind::SummaryStats],
            ..StoryConfig::default()
        };
        let mut presentation = prepare(&summary, &story).unwrap();
        assert_eq!(presentation.current().unwrap().kind, PageKind::SummaryStats);
        assert_eq!(presentation.advance(), Some(Navigation::AtEnd));
    }
}
