use clap::Args;

use crate::catalog::abbreviations::AbbreviationDictionary;
use crate::cli::{OutputFormat, TableArgs};
use crate::parsing::canonical::{clean, Canonicalizer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TableKindArg {
    Street,
    Unit,
}

#[derive(Args)]
pub struct DictionaryArgs {
    /// Only list one table
    #[arg(long, value_enum)]
    pub kind: Option<TableKindArg>,

    /// Canonicalize one token and report how it is classified
    #[arg(long)]
    pub lookup: Option<String>,

    #[command(flatten)]
    pub tables: TableArgs,
}

/// Execute dictionary subcommand
///
/// # Errors
///
/// Returns an error if the abbreviation tables cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DictionaryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let dictionary = args.tables.load(verbose)?;

    if let Some(token) = &args.lookup {
        return run_lookup(&dictionary, token, format);
    }

    let show_street = args.kind != Some(TableKindArg::Unit);
    let show_unit = args.kind != Some(TableKindArg::Street);

    match format {
        OutputFormat::Text => {
            if show_street {
                println!("Street Suffixes ({} entries)\n", dictionary.street_rows().len());
                println!("{:<14} {:<10} {:<8}", "Long", "Medium", "Abbrev");
                println!("{}", "-".repeat(34));
                for row in dictionary.street_rows() {
                    println!("{:<14} {:<10} {:<8}", row.long, row.medium, row.abbrev);
                }
            }
            if show_street && show_unit {
                println!();
            }
            if show_unit {
                println!("Unit Designators ({} entries)\n", dictionary.unit_rows().len());
                println!("{:<14} {:<8}", "Long", "Abbrev");
                println!("{}", "-".repeat(23));
                for row in dictionary.unit_rows() {
                    println!("{:<14} {:<8}", row.long, row.abbrev);
                }
            }
        }
        OutputFormat::Json => {
            let mut output = serde_json::Map::new();
            if show_street {
                output.insert(
                    "street_suffixes".to_string(),
                    serde_json::to_value(dictionary.street_rows())?,
                );
            }
            if show_unit {
                output.insert(
                    "unit_designators".to_string(),
                    serde_json::to_value(dictionary.unit_rows())?,
                );
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("kind\tlong\tmedium\tabbrev");
            if show_street {
                for row in dictionary.street_rows() {
                    println!("street\t{}\t{}\t{}", row.long, row.medium, row.abbrev);
                }
            }
            if show_unit {
                for row in dictionary.unit_rows() {
                    println!("unit\t{}\t\t{}", row.long, row.abbrev);
                }
            }
        }
    }

    Ok(())
}

fn run_lookup(
    dictionary: &AbbreviationDictionary,
    token: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let cleaned = clean(token);
    let canonical = Canonicalizer::new(dictionary).canonicalize(token);
    let street_type = dictionary.is_street_type(&cleaned);
    let unit_type = dictionary.is_unit_type(&cleaned);

    match format {
        OutputFormat::Text => {
            println!("{token} -> {canonical}");
            if street_type {
                println!("  street type");
            }
            if unit_type {
                println!("  unit type");
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "input": token,
                "canonical": canonical,
                "street_type": street_type,
                "unit_type": unit_type,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("input\tcanonical\tstreet_type\tunit_type");
            println!("{token}\t{canonical}\t{street_type}\t{unit_type}");
        }
    }

    Ok(())
}
