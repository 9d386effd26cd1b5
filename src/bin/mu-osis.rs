use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use mu_osis::{render_osis_file, OsisError, RenderLimits, RenderParameters};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// HTML fragment only
    Html,
    /// HTML, notes and issues as JSON
    Json,
    /// Extracted notes as JSON
    Notes,
}

/// Render an OSIS passage to HTML
#[derive(Parser, Debug)]
#[command(name = "mu-osis")]
#[command(about = "Renders an OSIS XML passage to an HTML fragment with extracted notes")]
struct Args {
    /// OSIS XML file to render
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "html")]
    format: Format,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Hide verse numbers
    #[arg(long)]
    no_verse_numbers: bool,

    /// Hide non-canonical titles
    #[arg(long)]
    no_titles: bool,

    /// Hide note markers
    #[arg(long)]
    no_notes: bool,

    /// Link Strong's numbers
    #[arg(long)]
    strongs: bool,

    /// Link morphology codes
    #[arg(long)]
    morphology: bool,

    /// Red-letter words of Jesus
    #[arg(long)]
    red_letter: bool,

    /// One verse per line
    #[arg(long)]
    verse_per_line: bool,

    /// Turn references outside notes into reference notes
    #[arg(long)]
    auto_wrap_refs: bool,

    /// Document language (BCP-47)
    #[arg(long, default_value = "en")]
    lang: String,

    /// Right-to-left text direction
    #[arg(long)]
    rtl: bool,

    /// Versification name added to reference links
    #[arg(long)]
    v11n: Option<String>,

    /// Base path for figures
    #[arg(long)]
    base_path: Option<String>,

    /// Use the constrained-device limits
    #[arg(long)]
    embedded: bool,

    /// Print render issues to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn parameters(&self) -> RenderParameters {
        let mut params = RenderParameters::new()
            .with_verse_numbers(!self.no_verse_numbers)
            .with_titles(!self.no_titles)
            .with_notes(!self.no_notes)
            .with_strongs(self.strongs)
            .with_morphology(self.morphology)
            .with_red_letter(self.red_letter)
            .with_verse_per_line(self.verse_per_line)
            .with_auto_wrap_refs(self.auto_wrap_refs)
            .with_language(&self.lang, !self.rtl);
        if let Some(v11n) = &self.v11n {
            params = params.with_versification(v11n);
        }
        if let Some(base) = &self.base_path {
            params = params.with_base_path(base);
        }
        if self.embedded {
            params = params.with_limits(RenderLimits::embedded());
        }
        params
    }
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let params = args.parameters();
    let passage = render_osis_file(&args.file, &params).map_err(display_err)?;

    if args.verbose {
        for issue in &passage.issues {
            eprintln!("warning: {}", issue);
        }
    }

    match args.format {
        Format::Html => println!("{}", passage.html),
        Format::Json => println!("{}", to_json(&passage, args.pretty)?),
        Format::Notes => println!("{}", to_json(&passage.notes, args.pretty)?),
    }

    if !passage.is_complete() {
        return Err(format!("{} was not rendered completely", args.file.display()));
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map_err(|e| e.to_string())
}

fn display_err(err: OsisError) -> String {
    err.to_string()
}

