use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use fdiff_sdk::{AlignmentType, FilingDiff, Section, SectionPair, TaggedSentencePair};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => cmd_run(args, cli.format),
        Command::Align(args) => cmd_align(args, cli.format),
        Command::Tag(args) => cmd_tag(args, cli.format),
    }
}

fn load_pipeline(config: Option<&Path>) -> anyhow::Result<FilingDiff> {
    match config {
        Some(path) => FilingDiff::from_config_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(FilingDiff::default()),
    }
}

fn load_editions(old: &Path, new: &Path) -> anyhow::Result<(Vec<Section>, Vec<Section>)> {
    let old = FilingDiff::load_sections(old)
        .with_context(|| format!("loading old edition {}", old.display()))?;
    let new = FilingDiff::load_sections(new)
        .with_context(|| format!("loading new edition {}", new.display()))?;
    Ok((old, new))
}

fn cmd_run(args: RunArgs, format: OutputFormat) -> anyhow::Result<()> {
    let diff = load_pipeline(args.config.as_deref())?;
    let (old, new) = load_editions(&args.old, &args.new)?;
    let report = diff.run(old, new);

    if args.save {
        let written = report
            .save(&args.result_dir, &args.ticker)
            .with_context(|| format!("saving artifacts under {}", args.result_dir.display()))?;
        if format == OutputFormat::Text {
            for path in &written {
                println!("  {} {}", "wrote".green(), path.display());
            }
        }
    }

    let summary = report.summary();
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "ticker": args.ticker,
                "summary": summary,
                "processed": report.tagged,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "Ticker".bold(), args.ticker.yellow());
            println!(
                "  Sections: {} matched, {} deleted, {} added",
                summary.matched.to_string().green(),
                summary.deleted.to_string().red(),
                summary.added.to_string().cyan(),
            );
            println!("  Changed sections: {}", summary.sentence_pairs.to_string().bold());
            println!("  Edit units: {}", summary.edits.to_string().bold());
            print_tagged(&report.tagged);
        }
    }
    Ok(())
}

fn cmd_align(args: AlignArgs, format: OutputFormat) -> anyhow::Result<()> {
    let diff = load_pipeline(args.config.as_deref())?;
    let (old, new) = load_editions(&args.old, &args.new)?;
    let pairs = diff.align_sections(old, new);

    match format {
        OutputFormat::Json => println!("{}", SectionPair::list_to_json(&pairs)?),
        OutputFormat::Text => {
            for pair in &pairs {
                print_pair(pair);
            }
        }
    }
    Ok(())
}

fn cmd_tag(args: TagArgs, format: OutputFormat) -> anyhow::Result<()> {
    let tagged = tag_file(&args)?;
    match format {
        OutputFormat::Json => println!("{}", TaggedSentencePair::list_to_json(&tagged)?),
        OutputFormat::Text => print_tagged(&tagged),
    }
    Ok(())
}

fn tag_file(args: &TagArgs) -> anyhow::Result<Vec<TaggedSentencePair>> {
    let diff = load_pipeline(args.config.as_deref())?;
    let pairs = FilingDiff::load_sentence_pairs(&args.sentence_pairs)
        .with_context(|| format!("loading sentence pairs {}", args.sentence_pairs.display()))?;
    Ok(diff.tag(&pairs))
}

fn print_pair(pair: &SectionPair) {
    let indent = "  ".repeat(pair.level);
    match pair.alignment_type {
        AlignmentType::Matched => {
            let old = pair.old_heading.as_deref().unwrap_or_default();
            let new = pair.new_heading.as_deref().unwrap_or_default();
            let heading = if old == new { old.to_string() } else { format!("{old} → {new}") };
            println!(
                "{indent}{} {} ({:.2})",
                "=".green(),
                heading,
                pair.scores.overall
            );
        }
        AlignmentType::Deleted => println!(
            "{indent}{} {}",
            "-".red(),
            pair.old_heading.as_deref().unwrap_or_default().red()
        ),
        AlignmentType::Added => println!(
            "{indent}{} {}",
            "+".cyan(),
            pair.new_heading.as_deref().unwrap_or_default().cyan()
        ),
    }
    for child in &pair.subsections {
        print_pair(child);
    }
}

fn print_tagged(tagged: &[TaggedSentencePair]) {
    for pair in tagged {
        if pair.edit_units.is_empty() {
            continue;
        }
        println!("\n{}", pair.new_heading.bold());
        for unit in &pair.edit_units {
            println!("  {}", unit.markup);
        }
    }
}
