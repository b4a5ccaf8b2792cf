//! Batch command - parse every command in a set of files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use qat_core::{Action, CommandParser, ParseResult, ParsedCommand, RuleCommandParser};

use super::load_config;
use super::parse::{command_lines, format_results, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern (one command per line)
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Commands parsed from a single file.
struct FileResult {
    path: PathBuf,
    results: Vec<ParseResult>,
    error: Option<String>,
}

/// Totals over a set of parsed commands.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchTotals {
    pub commands: usize,
    pub sales: usize,
    pub debts: usize,
    pub queries: usize,
    pub pending: usize,
    pub total_price: Decimal,
    pub warnings: usize,
}

impl BatchTotals {
    pub fn add(&mut self, result: &ParseResult) {
        let command = &result.command;

        self.commands += 1;
        match command.action {
            Action::CreateSale => self.sales += 1,
            Action::CreateDebt => self.debts += 1,
            Action::Query => self.queries += 1,
        }
        if command.is_pending() {
            self.pending += 1;
        }
        self.total_price += command.price;
        if !result.warnings.is_empty() {
            self.warnings += 1;
        }
    }

    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ParseResult>) -> Self {
        let mut totals = Self::default();
        for result in results {
            totals.add(result);
        }
        totals
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // Read every file up front; lines are tagged with their file index
    let mut file_results = Vec::with_capacity(files.len());
    let mut lines: Vec<(usize, String)> = Vec::new();

    for path in files {
        match fs::read_to_string(&path) {
            Ok(content) => {
                let index = file_results.len();
                lines.extend(command_lines(&content).into_iter().map(|l| (index, l)));
                file_results.push(FileResult {
                    path,
                    results: Vec::new(),
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to read {}: {}", path.display(), error_msg);
                    file_results.push(FileResult {
                        path,
                        results: Vec::new(),
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to read {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }
    }

    // Set up progress bar
    let overall_pb = ProgressBar::new(lines.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} commands")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(RuleCommandParser::from_config(&config));
    for (index, result) in parse_concurrently(parser, lines, args.jobs, &overall_pb).await? {
        file_results[index].results.push(result);
    }

    overall_pb.finish_with_message("Complete");

    // Write outputs
    if let Some(output_dir) = &args.output_dir {
        for file in file_results.iter().filter(|f| f.error.is_none()) {
            let output_name = file
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("commands");

            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            let content = match args.format {
                // Always an array, even for one-line files
                OutputFormat::Json => {
                    let commands: Vec<&ParsedCommand> =
                        file.results.iter().map(|r| &r.command).collect();
                    serde_json::to_string(&commands)?
                }
                format => format_results(&file.results, format, false)?,
            };

            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &file_results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let totals = BatchTotals::from_results(file_results.iter().flat_map(|f| &f.results));
    let failed: Vec<_> = file_results.iter().filter(|f| f.error.is_some()).collect();

    // Print summary
    println!();
    println!(
        "{} Parsed {} commands from {} files in {:?}",
        style("✓").green(),
        totals.commands,
        file_results.len(),
        start.elapsed()
    );
    println!(
        "   {} sales, {} debts, {} queries, {} pending",
        style(totals.sales).green(),
        style(totals.debts).yellow(),
        style(totals.queries).blue(),
        style(totals.pending).yellow()
    );
    println!("   Total price: {}", totals.total_price);
    if totals.warnings > 0 {
        println!(
            "   {} commands with validation warnings",
            style(totals.warnings).yellow()
        );
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for file in &failed {
            println!(
                "  - {}: {}",
                file.path.display(),
                file.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Parse tagged lines on blocking tasks, one contiguous chunk per worker.
/// Results come back in input order.
async fn parse_concurrently(
    parser: Arc<RuleCommandParser>,
    lines: Vec<(usize, String)>,
    jobs: usize,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<(usize, ParseResult)>> {
    let chunk_size = lines.len().div_ceil(jobs.max(1)).max(1);

    let handles: Vec<_> = lines
        .chunks(chunk_size)
        .map(|chunk| {
            let chunk = chunk.to_vec();
            let parser = Arc::clone(&parser);
            let pb = pb.clone();
            tokio::task::spawn_blocking(move || {
                chunk
                    .into_iter()
                    .map(|(index, line)| {
                        let result = parser.parse(&line);
                        pb.inc(1);
                        (index, result)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut parsed = Vec::with_capacity(lines.len());
    for handle in handles {
        parsed.extend(handle.await?);
    }

    Ok(parsed)
}

fn write_summary(path: &Path, files: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "commands",
        "sales",
        "debts",
        "queries",
        "pending",
        "total_price",
        "warnings",
        "error",
    ])?;

    for file in files {
        let filename = file.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if let Some(error) = &file.error {
            wtr.write_record([filename, "error", "", "", "", "", "", "", "", error.as_str()])?;
            continue;
        }

        let totals = BatchTotals::from_results(&file.results);
        wtr.write_record([
            filename.to_string(),
            "success".to_string(),
            totals.commands.to_string(),
            totals.sales.to_string(),
            totals.debts.to_string(),
            totals.queries.to_string(),
            totals.pending.to_string(),
            totals.total_price.to_string(),
            totals.warnings.to_string(),
            String::new(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let parser = RuleCommandParser::new();
        let results = vec![
            parser.parse("سجل بيع طوفان 5 كيلو بسعر 10000 ريال للزبون أحمد"),
            parser.parse("سجل بيع حسين 3 وحدة بسعر 15000 معلق"),
            parser.parse("سجل دين على محمد بمبلغ 50000 ريال"),
            parser.parse("كم المبيعات اليوم"),
        ];

        let totals = BatchTotals::from_results(&results);
        assert_eq!(totals.commands, 4);
        assert_eq!(totals.sales, 2);
        assert_eq!(totals.debts, 1);
        assert_eq!(totals.queries, 1);
        assert_eq!(totals.pending, 2);
        assert_eq!(totals.total_price, Decimal::from(75_000));
    }

    #[tokio::test]
    async fn test_parse_concurrently_keeps_order() {
        let parser = Arc::new(RuleCommandParser::new());
        let lines: Vec<(usize, String)> = (0..25)
            .map(|i| (i % 3, format!("بيع طوفان {} حبات بسعر {}", i + 1, (i + 1) * 1000)))
            .collect();

        let pb = ProgressBar::hidden();
        let parsed = parse_concurrently(parser, lines.clone(), 4, &pb).await.unwrap();

        assert_eq!(parsed.len(), 25);
        for ((index, line), (parsed_index, result)) in lines.iter().zip(&parsed) {
            assert_eq!(index, parsed_index);
            assert_eq!(&result.command.raw_text, line);
        }
        assert_eq!(pb.position(), 25);
    }

    #[tokio::test]
    async fn test_parse_concurrently_empty() {
        let parser = Arc::new(RuleCommandParser::new());
        let parsed = parse_concurrently(parser, Vec::new(), 0, &ProgressBar::hidden())
            .await
            .unwrap();
        assert!(parsed.is_empty());
    }
}
