use clap::Args;

use crate::cli::{OutputFormat, TableArgs};
use crate::core::address::ParsedAddress;
use crate::core::types::{MatchField, ParseMode};
use crate::parsing::street::StreetAddressParser;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ModeArg {
    /// Street line: number, name, type
    Street,
    /// Secondary line: unit type and number
    Unit,
    /// Combined line holding both
    Both,
    /// No hint; only type markers in the line decide
    None,
}

impl From<ModeArg> for ParseMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Street => ParseMode::Street,
            ModeArg::Unit => ParseMode::Unit,
            ModeArg::Both => ParseMode::Both,
            ModeArg::None => ParseMode::Unhinted,
        }
    }
}

#[derive(Args)]
pub struct ParseArgs {
    /// Address line to parse
    #[arg(required = true)]
    pub line: String,

    /// Which components the line is expected to hold
    #[arg(short, long, value_enum, default_value = "none")]
    pub mode: ModeArg,

    #[command(flatten)]
    pub tables: TableArgs,
}

/// Execute parse subcommand
///
/// # Errors
///
/// Returns an error if the abbreviation tables cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ParseArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let dictionary = args.tables.load(verbose)?;
    let parsed = StreetAddressParser::new(&dictionary).parse(&args.line, args.mode.into());

    match format {
        OutputFormat::Text => print_text(&args.line, &parsed),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "line": args.line,
                "field_count": parsed.field_count(),
                "components": components(&parsed)
                    .into_iter()
                    .map(|(field, value)| (field.as_str().to_string(), serde_json::json!(value)))
                    .collect::<serde_json::Map<_, _>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("field\tvalue");
            for (field, value) in components(&parsed) {
                println!("{field}\t{value}");
            }
        }
    }

    Ok(())
}

/// Present components in output order
fn components(parsed: &ParsedAddress) -> Vec<(MatchField, &str)> {
    MatchField::ALL
        .into_iter()
        .filter_map(|field| parsed.get(field).map(|value| (field, value)))
        .collect()
}

fn print_text(line: &str, parsed: &ParsedAddress) {
    println!("Input: {line}");
    if parsed.is_empty() {
        println!("No street or unit components found");
        return;
    }

    let shape = if parsed.is_full() {
        "full address"
    } else if parsed.street.is_some() {
        "street only"
    } else {
        "unit only"
    };
    println!("Parsed {} fields ({shape})\n", parsed.field_count());

    for (field, value) in components(parsed) {
        let shown = if value.is_empty() { "-" } else { value };
        println!("  {:<14} {shown}", field.as_str());
    }
}
