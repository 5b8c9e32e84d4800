//! gridmark CLI - Render JSON or CSV tables with formulas and cell spans to HTML

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use gridmark::{
    core::options::{parse_index_list, NamePosition},
    data::loading::{grid_to_csv, load_options_toml, load_table_csv, load_table_json},
    data::MATH_FUNCTIONS,
    RenderError, RenderOptions, RenderResult, RenderWarning, Table, TableRenderer,
};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read};
#[cfg(feature = "cli")]
use std::process::ExitCode;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "gridmark")]
#[command(version)]
#[command(about = "gridmark - Render tables with formulas and cell spans to HTML", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Strict mode: exit with error if any render warnings occur
    #[arg(long, global = true)]
    strict: bool,

    /// Quiet mode: suppress warning output to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log pipeline stages to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored warning output
    #[arg(long, global = true)]
    no_color: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Render a table to HTML (default action)
    Render {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        overrides: OptionOverrides,

        /// Output file path (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the filtered, evaluated grid as CSV
    Eval {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        overrides: OptionOverrides,

        /// Output file path (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show version, functions and span triggers
    Info,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct InputArgs {
    /// Input file path (reads from stdin if not provided)
    input: Option<String>,

    /// Input format
    #[arg(short, long, value_enum, default_value_t = InputFormat::Auto)]
    format: InputFormat,

    /// TOML file with render options
    #[arg(long)]
    options: Option<String>,

    /// Table id (used for CSV input and bare JSON rows)
    #[arg(long, default_value = "1")]
    id: String,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct OptionOverrides {
    /// First row to render, 1-based
    #[arg(long)]
    row_offset: Option<usize>,

    /// Number of rows to render
    #[arg(long)]
    row_count: Option<usize>,

    /// Rows to hide, e.g. "2,4-6"
    #[arg(long)]
    hide_rows: Option<String>,

    /// Rows to show even when hidden
    #[arg(long)]
    show_rows: Option<String>,

    /// Columns to hide, e.g. "1" or "all"
    #[arg(long)]
    hide_columns: Option<String>,

    /// Columns to show even when hidden
    #[arg(long)]
    show_columns: Option<String>,

    /// Promote the first row to a header
    #[arg(long)]
    table_head: Option<bool>,

    /// Promote the last row to a footer
    #[arg(long)]
    table_foot: Option<bool>,

    /// Render the first column with header cells
    #[arg(long)]
    first_column_th: bool,

    /// Add odd/even classes to body rows
    #[arg(long)]
    alternating_row_colors: Option<bool>,

    /// Add the row-hover class to the table body
    #[arg(long)]
    row_hover: Option<bool>,

    /// Print the table name: above, below or off
    #[arg(long, value_parser = parse_name_position)]
    print_name: Option<NamePosition>,

    /// Print the table description: above, below or off
    #[arg(long, value_parser = parse_name_position)]
    print_description: Option<NamePosition>,

    /// id attribute of the table element
    #[arg(long)]
    html_id: Option<String>,

    /// Additional classes for the table element
    #[arg(long)]
    extra_css_classes: Option<String>,

    /// Comma separated column widths, e.g. "40px,,20%"
    #[arg(long)]
    column_widths: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    /// Detect from the file extension, JSON otherwise
    Auto,
    Json,
    Csv,
}

#[cfg(feature = "cli")]
fn parse_name_position(value: &str) -> Result<NamePosition, String> {
    NamePosition::parse(value).ok_or_else(|| format!("expected above, below or off, got '{}'", value))
}

#[cfg(feature = "cli")]
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    // warnings are printed separately, so the default level stays below them
    let level = match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gridmark={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "cli")]
fn run(cli: &Cli) -> RenderResult<ExitCode> {
    match &cli.command {
        Commands::Render {
            input,
            overrides,
            output,
        } => {
            let (table, options) = read_input(input, overrides)?;
            let mut renderer = TableRenderer::new();
            renderer.set_input(table, options);
            let rendered = renderer.render();

            if !cli.quiet && rendered.has_warnings() {
                print_warnings_to_stderr(&rendered.warnings, !cli.no_color);
            }
            if cli.strict && rendered.has_warnings() {
                eprintln!(
                    "Error: {} render warning(s) in strict mode",
                    rendered.warnings.len()
                );
                return Ok(ExitCode::FAILURE);
            }

            write_output(output.as_deref(), &rendered.content, rendered.warnings.len())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Eval {
            input,
            overrides,
            output,
        } => {
            let (table, options) = read_input(input, overrides)?;
            let mut renderer = TableRenderer::new();
            renderer.set_input(table, options);
            let data = renderer.evaluated_data();
            write_output(output.as_deref(), &grid_to_csv(&data)?, 0)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Info => {
            print_info();
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(feature = "cli")]
fn read_input(input: &InputArgs, overrides: &OptionOverrides) -> RenderResult<(Table, RenderOptions)> {
    let text = match &input.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let format = match input.format {
        InputFormat::Auto => match &input.input {
            Some(path) if path.to_lowercase().ends_with(".csv") => InputFormat::Csv,
            _ => InputFormat::Json,
        },
        format => format,
    };
    let table = match format {
        InputFormat::Csv => load_table_csv(&text, &input.id)?,
        _ => load_table_json(&text, &input.id)?,
    };

    let mut options = match &input.options {
        Some(path) => load_options_toml(&fs::read_to_string(path)?)?,
        None => RenderOptions::default(),
    };
    apply_overrides(&mut options, overrides, &table)?;

    Ok((table, options))
}

#[cfg(feature = "cli")]
fn apply_overrides(
    options: &mut RenderOptions,
    overrides: &OptionOverrides,
    table: &Table,
) -> RenderResult<()> {
    let rows = table.num_rows();
    let columns = table.num_cols();

    if let Some(offset) = overrides.row_offset {
        if offset == 0 {
            return Err(RenderError::invalid("--row-offset is 1-based"));
        }
        options.row_offset = offset;
    }
    if overrides.row_count.is_some() {
        options.row_count = overrides.row_count;
    }
    if let Some(list) = &overrides.hide_rows {
        options.hide_rows = parse_index_list(list, rows)?;
    }
    if let Some(list) = &overrides.show_rows {
        options.show_rows = parse_index_list(list, rows)?;
    }
    if let Some(list) = &overrides.hide_columns {
        options.hide_columns = parse_index_list(list, columns)?;
    }
    if let Some(list) = &overrides.show_columns {
        options.show_columns = parse_index_list(list, columns)?;
    }
    if let Some(value) = overrides.table_head {
        options.table_head = value.into();
    }
    if let Some(value) = overrides.table_foot {
        options.table_foot = value.into();
    }
    if overrides.first_column_th {
        options.first_column_th = true;
    }
    if let Some(value) = overrides.alternating_row_colors {
        options.alternating_row_colors = value.into();
    }
    if let Some(value) = overrides.row_hover {
        options.row_hover = value.into();
    }
    if let Some(position) = overrides.print_name {
        options.print_name = position;
    }
    if let Some(position) = overrides.print_description {
        options.print_description = position;
    }
    if let Some(html_id) = &overrides.html_id {
        options.html_id = html_id.clone();
    }
    if let Some(classes) = &overrides.extra_css_classes {
        options.extra_css_classes = classes.clone();
    }
    if let Some(widths) = &overrides.column_widths {
        options.column_widths = widths.split(',').map(|w| w.trim().to_string()).collect();
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn write_output(path: Option<&str>, content: &str, warning_count: usize) -> RenderResult<()> {
    match path {
        Some(path) => {
            fs::write(path, content)?;
            if warning_count == 0 {
                eprintln!("✓ Output written to: {}", path);
            } else {
                eprintln!(
                    "⚠ Output written to: {} ({} warning(s))",
                    path, warning_count
                );
            }
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Print warnings to stderr with optional color coding
#[cfg(feature = "cli")]
fn print_warnings_to_stderr(warnings: &[RenderWarning], use_color: bool) {
    let (yellow, reset) = if use_color {
        ("\x1b[33m", "\x1b[0m")
    } else {
        ("", "")
    };

    eprintln!();
    eprintln!("{}Render Warnings ({}):{}", yellow, warnings.len(), reset);
    eprintln!();
    for warning in warnings {
        match warning.location() {
            Some(loc) => eprintln!(
                "  {}[{}]{} {}: {}",
                yellow, warning.kind, reset, loc, warning.message
            ),
            None => eprintln!("  {}[{}]{} {}", yellow, warning.kind, reset, warning.message),
        }
    }
    eprintln!();
}

#[cfg(feature = "cli")]
fn print_info() {
    let triggers = gridmark::SpanTriggers::default();
    let mut functions: Vec<&str> = MATH_FUNCTIONS.keys().copied().collect();
    functions.sort_unstable();

    println!("gridmark v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Span triggers:");
    println!("  rowspan  {}", triggers.rowspan);
    println!("  colspan  {}", triggers.colspan);
    println!("  span     {}", triggers.span);
    println!();
    println!("Formula functions:");
    for chunk in functions.chunks(8) {
        println!("  {}", chunk.join(" "));
    }
    println!();
    println!("Constants: pi e");
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install gridmark --features cli");
    eprintln!("  gridmark render [OPTIONS] [INPUT_FILE]");
}
