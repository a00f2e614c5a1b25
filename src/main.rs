use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use unnest_spec::matcher::{self, MatchOptions};
use unnest_spec::{Result, diagnostics, render, report, spec};

#[derive(Parser)]
#[command(name = "unnest-spec")]
#[command(about = "Match declarative unnest specs against nested JSON", long_about = None)]
struct Cli {
    /// Default log filter when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a spec against an input document and write the match records.
    Match {
        #[arg(long)]
        spec: String,

        #[arg(long)]
        input: String,

        #[arg(short = 'o', long)]
        out: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Fail on the first structural mismatch instead of skipping the branch.
        #[arg(long)]
        strict: bool,
    },
    /// Print the finalized spec tree.
    Describe {
        #[arg(long)]
        spec: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init_logging(&cli.log_level);

    match cli.cmd {
        Commands::Match {
            spec,
            input,
            out,
            format,
            strict,
        } => {
            // 1) Translate the spec description.
            let spec_tree = load_spec(&spec)?;

            // 2) Load the input document.
            let value = load_json(&input)?;

            // 3) Match.
            let match_report = matcher::match_with(&spec_tree, &value, MatchOptions { strict })
                .with_context(|| {
                    diagnostics::error_message(format!("match {} against {}", spec, input))
                })?;
            tracing::info!(
                records = match_report.matches.len(),
                skipped = match_report.mismatches.len(),
                "matched {}",
                input
            );

            // 4) Render.
            let data = report::build_report_data(&spec_tree, &match_report);
            let rendered = match format {
                Format::Json => render::render_json_report(&data)?,
                Format::Text => render::render_text_report(&data),
            };

            match out {
                Some(out) => {
                    std::fs::write(&out, rendered)
                        .with_context(|| diagnostics::error_message(format!("write {}", out)))?;
                    println!("Wrote {}", out);
                }
                None => print!("{}", rendered),
            }
        }
        Commands::Describe { spec } => {
            let spec_tree = load_spec(&spec)?;
            print!("{}", render::render_spec_tree(&spec_tree));
        }
    }

    Ok(())
}

fn load_spec(path: &str) -> Result<spec::Spec> {
    let description = load_json(path)?;
    if !spec::is_spec(&description) {
        diagnostics::warn(format!("{} does not look like a spec description", path));
    }
    spec::spec_from_json(&description)
        .with_context(|| diagnostics::error_message(format!("invalid spec in {}", path)))
}

fn load_json(path: &str) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| diagnostics::error_message(format!("read {}", path)))?;
    serde_json::from_str(&text)
        .with_context(|| diagnostics::error_message(format!("parse JSON in {}", path)))
}
