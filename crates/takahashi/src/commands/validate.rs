use colored::Colorize;

use crate::parser::{self, Validation};
use crate::source::ContentSource;

/// One line per finding, headed by a summary line.
pub fn report(name: &str, validation: &Validation, parse_warnings: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    if validation.is_valid {
        lines.push(format!(
            "{} {name}: {} slides",
            "\u{2713}".green().bold(),
            validation.slide_count
        ));
    } else {
        lines.push(format!("{} {name}", "\u{2717}".red().bold()));
    }
    for error in &validation.errors {
        lines.push(format!("  {} {error}", "error:".red().bold()));
    }
    for warning in parse_warnings.iter().chain(&validation.warnings) {
        lines.push(format!("  {} {warning}", "warning:".yellow().bold()));
    }
    lines
}

pub fn run(source: &dyn ContentSource) -> anyhow::Result<()> {
    let content = source.load()?;
    let validation = parser::validate(&content);
    let parse_warnings: Vec<String> = parser::parse_presentation(&content)
        .warnings
        .iter()
        .map(ToString::to_string)
        .collect();

    for line in report(&source.name(), &validation, &parse_warnings) {
        println!("{line}");
    }

    if !validation.is_valid {
        anyhow::bail!("{} is not a valid presentation", source.name());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FileSource;

    #[test]
    fn test_report_for_valid_deck() {
        let validation = parser::validate("# Hi\n\nthere");
        let lines = report("talk.txt", &validation, &[]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("talk.txt: 2 slides"));
    }

    #[test]
    fn test_report_lists_errors_and_warnings() {
        let validation = parser::validate("");
        let lines = report("empty.txt", &validation, &["Slide 1: odd".to_string()]);
        assert!(lines.iter().any(|l| l.contains("No slides found")));
        assert!(lines.iter().any(|l| l.contains("Slide 1: odd")));
    }

    #[test]
    fn test_run_fails_on_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("empty.txt"));
        source.save("\n\n").unwrap();
        assert!(run(&source).is_err());

        source.save("one\n\ntwo").unwrap();
        assert!(run(&source).is_ok());
    }
}
