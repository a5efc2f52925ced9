//! Keystroke-replay demo for the penmark autoformat engine.
//!
//! Feeds a string through the insertion interceptor one character at a time
//! (newlines start fresh paragraphs) and prints the resulting document tree.

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use penmark_core::autoformat;
use penmark_core::{ShortcutTables, TreeEditor};

#[derive(Parser)]
#[command(version, about = "Penmark - live markdown autoformat engine demo", long_about = None)]
struct Cli {
    /// Keystrokes to replay; a newline starts a new paragraph.
    /// Reads stdin when omitted.
    input: Option<String>,

    /// Apply N backward deletions after replaying the input
    #[arg(long, default_value_t = 0)]
    backspaces: usize,

    /// Show shortcut resolution decisions
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let input = match cli.input {
        Some(input) => input,
        None => std::io::read_to_string(std::io::stdin()).into_diagnostic()?,
    };

    let tables = ShortcutTables::builtin();
    let mut editor = TreeEditor::with_text("");

    let mut buf = [0u8; 4];
    for ch in input.chars() {
        if ch == '\n' {
            editor.insert_paragraph();
            continue;
        }
        let outcome = autoformat::insert_text(&mut editor, tables, ch.encode_utf8(&mut buf));
        tracing::debug!(?ch, ?outcome, "keystroke");
    }
    for _ in 0..cli.backspaces {
        let outcome = autoformat::delete_backward(&mut editor);
        tracing::debug!(?outcome, "backspace");
    }

    print!("{}", editor.doc().outline());
    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
