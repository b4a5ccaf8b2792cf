//! Number command - convert spelled-out Arabic numbers.

use clap::Args;

use qat_core::{words_to_number, words_to_number_detailed};

/// Arguments for the number command.
#[derive(Args)]
pub struct NumberArgs {
    /// Number in Arabic words or digits (e.g. "خمسة وعشرين ألف")
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,

    /// Print JSON including the words that were not understood
    #[arg(long)]
    residual: bool,
}

pub async fn run(args: NumberArgs) -> anyhow::Result<()> {
    let text = args.text.join(" ");

    if args.residual {
        let detailed = words_to_number_detailed(&text);
        println!("{}", serde_json::to_string(&detailed)?);
    } else {
        println!("{}", words_to_number(&text));
    }

    Ok(())
}
