//! Parse command - turn Arabic sentences into structured commands.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use qat_core::{CommandParser, ParseResult, ParsedCommand, RuleCommandParser};

use super::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Command text (read from stdin when neither text nor --file is given)
    text: Option<String>,

    /// Read commands from a file, one per line
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include the matching rules and warnings
    #[arg(long)]
    details: bool,

    /// Report validation issues on stderr
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = RuleCommandParser::from_config(&config);

    let lines = read_input(&args)?;
    if lines.is_empty() {
        anyhow::bail!("No command text given");
    }

    info!("Parsing {} command(s)", lines.len());

    let results: Vec<ParseResult> = lines.iter().map(|line| parser.parse(line)).collect();

    // Validate if requested
    if args.validate {
        for result in &results {
            if !result.warnings.is_empty() {
                eprintln!(
                    "{} {}",
                    style("Validation issues:").yellow(),
                    result.command.raw_text
                );
                for issue in &result.warnings {
                    eprintln!("  - {}", issue);
                }
            }
        }
    }

    // Format output
    let output = format_results(&results, args.format, args.details)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Command lines to parse: the text argument, a file, or stdin.
fn read_input(args: &ParseArgs) -> anyhow::Result<Vec<String>> {
    if let Some(text) = &args.text {
        return Ok(vec![text.clone()]);
    }

    let content = match &args.file {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            fs::read_to_string(path)?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    Ok(command_lines(&content))
}

/// Non-empty, trimmed lines of `content`.
pub fn command_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render parse results; a single result is not wrapped in a JSON array.
pub fn format_results(
    results: &[ParseResult],
    format: OutputFormat,
    details: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(results, details),
        OutputFormat::Csv => {
            let commands: Vec<&ParsedCommand> = results.iter().map(|r| &r.command).collect();
            format_csv(&commands)
        }
        OutputFormat::Text => Ok(results
            .iter()
            .map(|r| format_text(r, details))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn format_json(results: &[ParseResult], details: bool) -> anyhow::Result<String> {
    let json = match (results, details) {
        ([single], true) => serde_json::to_string(single)?,
        ([single], false) => serde_json::to_string(&single.command)?,
        (many, true) => serde_json::to_string(many)?,
        (many, false) => {
            let commands: Vec<&ParsedCommand> = many.iter().map(|r| &r.command).collect();
            serde_json::to_string(&commands)?
        }
    };
    Ok(json)
}

pub fn format_csv(commands: &[&ParsedCommand]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Write header
    wtr.write_record([
        "action",
        "product_name",
        "quantity",
        "price",
        "customer_name",
        "payment_status",
        "raw_text",
    ])?;

    // Write data
    for command in commands {
        let quantity = command.quantity.to_string();
        let price = command.price.to_string();
        wtr.write_record([
            command.action.as_str(),
            command.product_name.as_deref().unwrap_or_default(),
            quantity.as_str(),
            price.as_str(),
            command.customer_name.as_deref().unwrap_or_default(),
            command.payment_status.as_str(),
            command.raw_text.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(result: &ParseResult, details: bool) -> String {
    let command = &result.command;
    let mut output = String::new();

    output.push_str(&format!("Command: {}\n", command.raw_text));
    output.push_str(&format!("Action: {}\n", command.action));
    output.push_str(&format!(
        "Product: {}\n",
        command.product_name.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("Quantity: {}\n", command.quantity));
    output.push_str(&format!("Price: {}\n", command.price));
    output.push_str(&format!(
        "Customer: {}\n",
        command.customer_name.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("Payment: {}\n", command.payment_status));

    if details {
        output.push_str("\nRules:\n");
        for m in &result.matches {
            output.push_str(&format!("  {}: {} ({})\n", m.field, m.rule, m.source));
        }
        if !result.warnings.is_empty() {
            output.push_str("\nWarnings:\n");
            for warning in &result.warnings {
                output.push_str(&format!("  - {}\n", warning));
            }
        }
    }

    output
}
