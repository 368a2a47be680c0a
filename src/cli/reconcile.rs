use std::path::PathBuf;

use clap::Args;

use crate::catalog::abbreviations::AbbreviationDictionary;
use crate::cli::{OutputFormat, TableArgs};
use crate::config::{DatasetConfig, JobConfig};
use crate::core::types::KeepSide;
use crate::matching::engine::{MatchEngine, MatchSummary};
use crate::matching::report::{MatchReport, MatchTable};
use crate::normalize::records::{NormalizedSet, RecordNormalizer};
use crate::parsing::table::{delimiter_for, load_table};

#[derive(Args)]
pub struct MatchArgs {
    /// TOML job file describing both datasets and the match
    #[arg(required = true)]
    pub job: PathBuf,

    /// Write matched pairs to this file (overrides [output] in the job)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Which dataset to keep in the join: 1, 2 or both (overrides the job)
    #[arg(long)]
    pub keep: Option<String>,

    /// Word-level Jaro threshold for name comparison (overrides the job)
    #[arg(long)]
    pub jaro_threshold: Option<f64>,

    #[command(flatten)]
    pub tables: TableArgs,
}

/// Execute match subcommand
///
/// # Errors
///
/// Returns an error if the job file is invalid, an input cannot be loaded or
/// normalized, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut job = JobConfig::load(&args.job)?;

    if let Some(keep) = &args.keep {
        job.matching.keep = KeepSide::from_flag(keep);
    }
    if let Some(threshold) = args.jaro_threshold {
        job.matching.jaro_threshold = threshold;
    }
    job.validate()?;

    let dictionary = if args.tables.is_set() {
        args.tables.load(verbose)?
    } else if let Some(tables) = &job.dictionary {
        AbbreviationDictionary::load_from_files(&tables.street_suffixes, &tables.unit_designators)?
    } else {
        args.tables.load(verbose)?
    };

    let first = normalize_dataset(&job, &job.dataset1, &dictionary, verbose)?;
    let second = normalize_dataset(&job, &job.dataset2, &dictionary, verbose)?;

    let engine = MatchEngine::new(job.matching.clone())?;
    let output = engine.run(&first, &second)?;
    let table = MatchTable::build(&first, &second, &engine.config().hard_keys, &output);

    let output_path = args.output.clone().or_else(|| job.output.file.clone());

    match (&output_path, format) {
        (Some(path), _) => {
            let file = std::fs::File::create(path)?;
            table.write_delimited(file, delimiter_for(path))?;
            if verbose {
                eprintln!("Wrote {} matched pairs to {}", table.rows.len(), path.display());
            }
        }
        (None, OutputFormat::Text) => table.write_delimited(std::io::stdout().lock(), b',')?,
        (None, OutputFormat::Tsv) => table.write_delimited(std::io::stdout().lock(), b'\t')?,
        (None, OutputFormat::Json) => {}
    }

    match format {
        OutputFormat::Json => {
            let report = MatchReport::new(&first, &second, &output, &table);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text if output_path.is_some() => {
            print_summary(&output.summary, &mut std::io::stdout())?;
        }
        OutputFormat::Tsv if output_path.is_some() => print_summary_tsv(&output.summary),
        // stdout carries the table
        _ => {
            if verbose {
                print_summary(&output.summary, &mut std::io::stderr())?;
            }
        }
    }

    Ok(())
}

fn normalize_dataset(
    job: &JobConfig,
    dataset: &DatasetConfig,
    dictionary: &AbbreviationDictionary,
    verbose: bool,
) -> anyhow::Result<NormalizedSet> {
    let table = load_table(&dataset.file)
        .map_err(|e| anyhow::anyhow!("{}: {e}", dataset.file.display()))?;

    let set = RecordNormalizer::new(dictionary)
        .with_policy(job.passthrough_policy)
        .normalize(&table, &dataset.spec)
        .map_err(|e| anyhow::anyhow!("{}: {e}", dataset.file.display()))?;

    if verbose {
        eprintln!(
            "{}: {} rows, {} unique, {} normalized, {} excluded",
            dataset.file.display(),
            set.report.input_rows,
            set.report.unique_combinations,
            set.report.normalized,
            set.report.excluded()
        );
    }

    Ok(set)
}

fn summary_rows(summary: &MatchSummary) -> [(&'static str, usize); 7] {
    [
        ("joined_rows", summary.joined_rows),
        ("ambiguous_groups", summary.ambiguous_groups),
        ("left_only", summary.left_only),
        ("right_only", summary.right_only),
        ("both", summary.both),
        ("matched", summary.matched),
        ("flagged", summary.flagged),
    ]
}

fn print_summary(summary: &MatchSummary, out: &mut impl std::io::Write) -> std::io::Result<()> {
    writeln!(out, "Match Summary")?;
    writeln!(out, "{}", "-".repeat(30))?;
    for (name, count) in summary_rows(summary) {
        writeln!(out, "{name:<20} {count:>9}")?;
    }
    Ok(())
}

fn print_summary_tsv(summary: &MatchSummary) {
    println!("metric\tcount");
    for (name, count) in summary_rows(summary) {
        println!("{name}\t{count}");
    }
}
