use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use polars::prelude::{AnyValue, DataFrame};
use schedule_normalizer::{
    JsonScheduleReader, NormalizerConfig, ParsedSchedule, ScheduleParser, export,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "schedule-normalizer", version, about = "Normalize project schedules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a JSON schedule document and print or save the result
    Parse {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        #[arg(long)]
        output: Option<PathBuf>,
        /// TOML file with normalizer settings
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        hours_per_day: Option<f64>,
        /// Normalize tasks on the rayon thread pool
        #[arg(long)]
        parallel: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Summary,
    Table,
}

const TABLE_COLUMNS: [&str; 6] = [
    "id",
    "name",
    "hierarchy_type",
    "folder",
    "start_date",
    "end_date",
];

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cell = |ci: usize, row_idx: usize| -> String {
        match columns[ci].get(row_idx) {
            Ok(AnyValue::Null) | Err(_) => String::new(),
            Ok(AnyValue::String(s)) => s.to_string(),
            Ok(AnyValue::StringOwned(s)) => s.to_string(),
            Ok(av) => av.to_string(),
        }
    };

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, width) in widths.iter_mut().enumerate() {
        for row_idx in 0..df.height() {
            *width = (*width).max(cell(ci, row_idx).chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_row = |out: &mut String, values: &[String]| {
        out.push('|');
        for (value, width) in values.iter().zip(&widths) {
            let pad = width.saturating_sub(value.chars().count());
            out.push(' ');
            out.push_str(value);
            out.push_str(&" ".repeat(pad));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names);
    out.push_str(&sep);
    out.push('\n');
    for row_idx in 0..df.height() {
        let values: Vec<String> = (0..columns.len()).map(|ci| cell(ci, row_idx)).collect();
        push_row(&mut out, &values);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_summary(parsed: &ParsedSchedule) -> String {
    let summary = &parsed.summary;
    let deps = &summary.dependencies;
    format!(
        "Project: {}\n\
         Rows: {} (projects {}, units {}, phases {}, tasks {}, sub-tasks {})\n\
         Links: {} predecessor, {} successor\n\
         Leaf tasks: {} linked, {} isolated, coverage {:.2}%\n\
         Collected {} of {} candidates\n",
        parsed.project.name,
        summary.total_rows,
        summary.projects,
        summary.units,
        summary.phases,
        summary.tasks,
        summary.sub_tasks,
        deps.total_predecessor_links,
        deps.total_successor_links,
        deps.linked_leaf_tasks,
        deps.isolated_leaf_tasks,
        deps.coverage_percent,
        summary.task_collection.collected_task_count,
        summary.task_collection.candidate_count,
    )
}

fn write_output(output: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("writing {}", path.display()))?,
        None => io::stdout().write_all(content.as_bytes())?,
    }
    Ok(())
}

fn run_parse(
    file: PathBuf,
    format: OutputFormat,
    output: Option<PathBuf>,
    config: NormalizerConfig,
) -> anyhow::Result<()> {
    let project = JsonScheduleReader::new()
        .read_path(&file)
        .with_context(|| format!("reading {}", file.display()))?;
    let parsed = ScheduleParser::new(config).parse(&&project)?;

    match format {
        OutputFormat::Json => match &output {
            Some(path) => export::save_parsed_to_json(&parsed, path)?,
            None => write_output(None, &serde_json::to_string_pretty(&parsed)?)?,
        },
        OutputFormat::Csv => match &output {
            Some(path) => export::save_records_to_csv(&parsed.tasks, path)?,
            None => export::write_records_csv(&parsed.tasks, io::stdout())?,
        },
        OutputFormat::Summary => write_output(output.as_ref(), &render_summary(&parsed))?,
        OutputFormat::Table => {
            let df = export::records_to_dataframe(&parsed.tasks)?.select(TABLE_COLUMNS)?;
            write_output(output.as_ref(), &render_df_as_text_table(&df))?;
        }
    }
    if let Some(path) = &output {
        eprintln!("Wrote {} tasks to {}", parsed.tasks.len(), path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Parse {
            file,
            format,
            output,
            config,
            hours_per_day,
            parallel,
        } => {
            let mut settings = NormalizerConfig::resolve(config.as_deref())?;
            if let Some(hours) = hours_per_day {
                settings = settings.with_hours_per_day(hours);
                settings.validate()?;
            }
            if parallel {
                settings = settings.with_parallel(true);
            }
            run_parse(file, format, output, settings)
        }
    }
}
