use clap::{Parser, Subcommand};
use lbmark::{
    Report, append_report, count, format_report, list_documents, read_document, renumber,
    write_document, DocumentError,
};
use serde::Serialize;

/// Line-break marker tools for manuscript transcriptions
#[derive(Parser, Debug)]
#[command(name = "lbmark")]
#[command(version = "0.1.0")]
#[command(about = "Count and renumber lb markers in transcription XML", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count line-break markers per page and column
    Count {
        /// Document to count (omit to process every .xml file in the current directory)
        #[arg(short, long)]
        input: Option<String>,

        /// Log file to append the report to (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Output the report as JSON instead of tab-separated text
        #[arg(short, long)]
        json: bool,
    },

    /// Renumber lb markers sequentially, restarting at each page and column
    Number {
        /// Document to renumber (omit to rewrite every .xml file in the current directory)
        #[arg(short, long)]
        input: Option<String>,

        /// Destination file (defaults to rewriting the input in place)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Report plus the name of the document it describes, for JSON output
#[derive(Serialize)]
struct DocumentReport<'a> {
    document: &'a str,
    #[serde(flatten)]
    report: &'a Report,
}

fn main() {
    let args = Args::parse();

    let result = match args.command {
        Command::Count {
            input,
            output,
            json,
        } => run_count(input.as_deref(), output.as_deref(), json),
        Command::Number { input, output } => run_number(input.as_deref(), output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(2);
    }
}

/// Format a report for output, as text or JSON
fn render_report(name: &str, report: &Report, json_mode: bool) -> String {
    if json_mode {
        let document_report = DocumentReport {
            document: name,
            report,
        };
        let mut rendered = serde_json::to_string_pretty(&document_report)
            .unwrap_or_else(|_| r#"{"error": "Failed to serialize report"}"#.to_string());
        rendered.push('\n');
        rendered
    } else {
        format_report(name, report)
    }
}

/// Run the count subcommand
///
/// With an input path, the report goes to the output log (appended) or to
/// stdout. Without one, every XML document in the current directory is
/// counted and its report appended to `<document>_lb.txt`; documents that
/// cannot be read are reported and skipped.
fn run_count(input: Option<&str>, output: Option<&str>, json_mode: bool) -> Result<(), DocumentError> {
    match input {
        Some(path) => {
            let doc = read_document(path)?;
            let report = count(&doc.lines());
            let rendered = render_report(&doc.name, &report, json_mode);
            match output {
                Some(dest) => append_report(dest, &rendered)?,
                None => print!("{}", rendered),
            }
            Ok(())
        }
        None => {
            for path in list_documents(".")? {
                let doc = match read_document(&path) {
                    Ok(doc) => doc,
                    Err(e) => {
                        eprintln!("Skipping {}: {}", path.display(), e);
                        continue;
                    }
                };
                let report = count(&doc.lines());
                let rendered = render_report(&doc.name, &report, json_mode);
                append_report(format!("{}_lb.txt", path.display()), &rendered)?;
            }
            Ok(())
        }
    }
}

/// Run the number subcommand
///
/// With an input path, the rewritten document goes to the output path, or
/// back to the input when none is given. Without one, every XML document in
/// the current directory is rewritten in place and its name printed.
fn run_number(input: Option<&str>, output: Option<&str>) -> Result<(), DocumentError> {
    match input {
        Some(path) => {
            let doc = read_document(path)?;
            let rewritten = renumber(&doc.lines());
            write_document(output.unwrap_or(path), &rewritten)
        }
        None => {
            for path in list_documents(".")? {
                let doc = match read_document(&path) {
                    Ok(doc) => doc,
                    Err(e) => {
                        eprintln!("Skipping {}: {}", path.display(), e);
                        continue;
                    }
                };
                let rewritten = renumber(&doc.lines());
                write_document(&path, &rewritten)?;
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}
