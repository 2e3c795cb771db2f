//! Command-line entry point: `tiktoken encode|decode|count`.

use std::io::{self, Read};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tiktoken_core::{encoding_for_model, get_encoding_cached, Encoding};

#[derive(Parser)]
#[command(name = "tiktoken", about = "OpenAI-compatible BPE tokenizer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token ids for some text.
    Encode {
        text: Option<String>,
        #[arg(long, default_value = "cl100k_base")]
        encoding: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        no_special: bool,
    },
    /// Print the text for a space-separated list of token ids.
    Decode {
        ids: Vec<usize>,
        #[arg(long, default_value = "cl100k_base")]
        encoding: String,
        #[arg(long)]
        model: Option<String>,
    },
    /// Print the number of tokens some text encodes to.
    Count {
        text: Option<String>,
        #[arg(long, default_value = "cl100k_base")]
        encoding: String,
        #[arg(long)]
        model: Option<String>,
    },
}

fn read_text_or_stdin(text: Option<String>) -> anyhow::Result<String> {
    match text {
        Some(t) => Ok(t),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn resolve(encoding: &str, model: &Option<String>) -> anyhow::Result<Arc<Encoding>> {
    match model {
        Some(m) => Ok(Arc::new(encoding_for_model(m)?)),
        None => Ok(get_encoding_cached(encoding)?),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Encode { text, encoding, model, no_special } => {
            let enc = resolve(&encoding, &model)?;
            let text = read_text_or_stdin(text)?;
            let ids = enc.encode(&text, !no_special)?;
            println!(
                "{}",
                ids.iter().map(usize::to_string).collect::<Vec<_>>().join(" ")
            );
        }
        Command::Decode { ids, encoding, model } => {
            let enc = resolve(&encoding, &model)?;
            println!("{}", enc.decode(&ids)?);
        }
        Command::Count { text, encoding, model } => {
            let enc = resolve(&encoding, &model)?;
            let text = read_text_or_stdin(text)?;
            println!("{}", enc.encode(&text, true)?.len());
        }
    }

    Ok(())
}
