use std::path::PathBuf;

use clap::Args;

use crate::cli::{OutputFormat, TableArgs};
use crate::core::types::AddressRole;
use crate::normalize::records::{
    DatasetSpec, NormalizeReport, NormalizedSet, PassthroughPolicy, RecordNormalizer,
};
use crate::parsing::table::{delimiter_for, load_table};

#[derive(Args)]
pub struct NormalizeArgs {
    /// Input table (CSV, or TSV for .tsv/.tab files)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Address-bearing columns, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub columns: Vec<String>,

    /// Role of each address column, comma separated and parallel to --columns
    /// (address1, address2, address, streetNumber, streetName, streetType,
    /// unitType, unitNumber, city, zip, name)
    #[arg(long, value_delimiter = ',', required = true)]
    pub roles: Vec<AddressRole>,

    /// Columns carried through unchanged, comma separated
    #[arg(long, value_delimiter = ',')]
    pub keep: Vec<String>,

    /// Write normalized records to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail when one raw address carries differing passthrough values
    #[arg(long)]
    pub reject_inconsistent: bool,

    #[command(flatten)]
    pub tables: TableArgs,
}

/// Execute normalize subcommand
///
/// # Errors
///
/// Returns an error if the tables or input cannot be loaded, the roles are
/// invalid, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: NormalizeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let dictionary = args.tables.load(verbose)?;
    let table = load_table(&args.input)?;

    if verbose {
        eprintln!(
            "Loaded {} rows with {} columns from {}",
            table.len(),
            table.headers.len(),
            args.input.display()
        );
    }

    let spec = DatasetSpec {
        keep_columns: args.keep.clone(),
        address_columns: args.columns.clone(),
        address_roles: args.roles.clone(),
    };
    let policy = if args.reject_inconsistent {
        PassthroughPolicy::Reject
    } else {
        PassthroughPolicy::Warn
    };

    let set = RecordNormalizer::new(&dictionary)
        .with_policy(policy)
        .normalize(&table, &spec)?;

    if let Some(path) = &args.output {
        let file = std::fs::File::create(path)?;
        set.write_delimited(file, delimiter_for(path))?;
        print_report(&set.report, format)?;
        if verbose {
            eprintln!("Wrote {} records to {}", set.records.len(), path.display());
        }
        return Ok(());
    }

    match format {
        OutputFormat::Text => set.write_delimited(std::io::stdout().lock(), b',')?,
        OutputFormat::Tsv => set.write_delimited(std::io::stdout().lock(), b'\t')?,
        OutputFormat::Json => print_json(&set)?,
    }

    if verbose {
        print_text_report(&set.report, &mut std::io::stderr())?;
    }

    Ok(())
}

fn print_json(set: &NormalizedSet) -> anyhow::Result<()> {
    let columns = set.columns();
    let records: Vec<serde_json::Map<String, serde_json::Value>> = set
        .records
        .iter()
        .map(|record| {
            columns
                .iter()
                .cloned()
                .zip(set.row(record).into_iter().map(serde_json::Value::String))
                .collect()
        })
        .collect();

    let output = serde_json::json!({
        "report": set.report,
        "columns": columns,
        "records": records,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_report(report: &NormalizeReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print_text_report(report, &mut std::io::stdout())?,
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Tsv => {
            println!("metric\tcount");
            for (name, count) in report_rows(report) {
                println!("{name}\t{count}");
            }
        }
    }
    Ok(())
}

fn print_text_report(report: &NormalizeReport, out: &mut impl std::io::Write) -> std::io::Result<()> {
    writeln!(out, "Normalization Summary")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for (name, count) in report_rows(report) {
        writeln!(out, "{name:<32} {count:>7}")?;
    }
    Ok(())
}

fn report_rows(report: &NormalizeReport) -> [(&'static str, usize); 6] {
    [
        ("input_rows", report.input_rows),
        ("unique_combinations", report.unique_combinations),
        ("unparseable", report.unparseable),
        ("incompatible", report.incompatible),
        ("normalized", report.normalized),
        (
            "inconsistent_passthrough_groups",
            report.inconsistent_passthrough_groups,
        ),
    ]
}
