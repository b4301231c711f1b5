//! Command-line front end: load a schema and initial data, apply scripted
//! edits, preview the form, submit it, and write the submitted data.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, Read};
use std::path::{Path as FsPath, PathBuf};

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use schemaform::{
    DocumentFormat, FormCommand, FormOptions, FormSession, MoveDirection, OutputDestination,
    OutputOptions, Path, PathSegment, SubmitOutcome, ViewOptions, emit, form_text,
    parse_document_str, text_to_plain,
};

const LOG_ENV: &str = "SCHEMAFORM_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "schemaform",
    version,
    about = "Fill and submit JSON Schema driven forms from the command line",
    after_help = "Edits are applied in this order: --set, --toggle, --add, --move, --remove."
)]
struct Cli {
    /// Schema spec: file path, inline payload, or "-" for stdin
    #[arg(short = 's', long = "schema", value_name = "SPEC")]
    schema: String,

    /// Initial data spec: file path, inline payload, or "-" for stdin
    #[arg(short = 'd', long = "data", value_name = "SPEC")]
    data: Option<String>,

    /// Title shown above the form preview
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Commit text to a field, e.g. --set /firstName=John
    #[arg(long = "set", value_name = "PTR=VALUE", action = ArgAction::Append)]
    set: Vec<String>,

    /// Flip a boolean field
    #[arg(long = "toggle", value_name = "PTR", action = ArgAction::Append)]
    toggle: Vec<String>,

    /// Append a default item to an array
    #[arg(long = "add", value_name = "PTR", action = ArgAction::Append)]
    add: Vec<String>,

    /// Move an array item, e.g. --move /tags/2:up
    #[arg(long = "move", value_name = "PTR:up|down", action = ArgAction::Append)]
    moves: Vec<String>,

    /// Remove an array item, e.g. --remove /tags/1
    #[arg(long = "remove", value_name = "PTR", action = ArgAction::Append)]
    remove: Vec<String>,

    /// Print the rendered form before submitting
    #[arg(long = "preview")]
    preview: bool,

    /// Output destinations ("-" writes to stdout). Defaults to stdout.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DEST",
        num_args = 1..,
        action = ArgAction::Append
    )]
    outputs: Vec<String>,

    /// Output format; inferred from the output file extension when omitted
    #[arg(long = "format", value_name = "FORMAT")]
    format: Option<DocumentFormat>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force")]
    force: bool,

    /// On a rejected submit, also print the error list as JSON on stdout
    #[arg(long = "errors-json")]
    errors_json: bool,

    /// Skip seeding schema defaults into the initial data
    #[arg(long = "no-defaults")]
    no_defaults: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();

    let mut diagnostics = DiagnosticCollector::default();
    if cli.schema == "-" && cli.data.as_deref() == Some("-") {
        diagnostics.push_input(
            "schema/data",
            "cannot read schema and data from stdin simultaneously; provide inline content or files",
        );
    }
    let schema = match load_value(&cli.schema, "schema") {
        Ok(value) => Some(value),
        Err(err) => {
            diagnostics.push_input("schema", err.to_string());
            None
        }
    };
    let data = match cli.data.as_deref() {
        Some(spec) => match load_value(spec, "data") {
            Ok(value) => value,
            Err(err) => {
                diagnostics.push_input("data", err.to_string());
                Value::Null
            }
        },
        None => Value::Null,
    };
    let output = build_output_options(&cli, &mut diagnostics);
    diagnostics.into_result()?;
    let Some(schema) = schema else {
        return Err(eyre!("no schema loaded"));
    };

    let mut options = FormOptions::default().with_defaults(!cli.no_defaults);
    if let Some(title) = &cli.title {
        options = options.with_title(title.clone());
    }
    let mut session =
        FormSession::with_options(&schema, data, options).wrap_err("failed to load schema")?;

    for command in scripted_commands(&cli, session.form_data())? {
        let pointer = command.path().to_string();
        let changed = session
            .dispatch(command)
            .wrap_err_with(|| format!("failed to edit {pointer}"))?;
        debug!(%pointer, changed, "applied scripted edit");
    }

    // Preview after submitting so rejected fields carry their messages.
    let outcome = session.submit();
    if cli.preview {
        print_preview(&session)?;
    }

    match outcome {
        SubmitOutcome::Submitted(value) => {
            emit(&value, &output).map_err(|err| eyre!("{err:#}"))?;
            Ok(())
        }
        SubmitOutcome::Rejected(errors) => {
            if cli.errors_json {
                let payload =
                    serde_json::to_string_pretty(&errors).wrap_err("failed to serialize errors")?;
                println!("{payload}");
            }
            let mut body = format!("form submission rejected with {} error(s):\n", errors.len());
            for error in &errors {
                let _ = writeln!(body, "  {error}");
            }
            Err(eyre!(body))
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_preview(session: &FormSession) -> Result<()> {
    let form = session.render().wrap_err("failed to render form")?;
    let text = form_text(&form, &ViewOptions::default());
    println!("{}\n", text_to_plain(&text));
    Ok(())
}

/// Turns the edit flags into commands, resolving each pointer against the
/// initial data so numeric segments address array items only where arrays exist.
fn scripted_commands(cli: &Cli, data: &Value) -> Result<Vec<FormCommand>> {
    let mut commands = Vec::new();
    for raw in &cli.set {
        let (pointer, text) = raw
            .split_once('=')
            .ok_or_else(|| eyre!("--set expects PTR=VALUE, got '{raw}'"))?;
        commands.push(FormCommand::Input {
            path: Path::from_pointer_in(pointer, data),
            text: text.to_string(),
        });
    }
    for pointer in &cli.toggle {
        commands.push(FormCommand::Toggle {
            path: Path::from_pointer_in(pointer, data),
        });
    }
    for pointer in &cli.add {
        commands.push(FormCommand::AddItem {
            path: Path::from_pointer_in(pointer, data),
        });
    }
    for raw in &cli.moves {
        let (pointer, direction) = raw
            .rsplit_once(':')
            .ok_or_else(|| eyre!("--move expects PTR:up|down, got '{raw}'"))?;
        let direction = direction
            .parse::<MoveDirection>()
            .map_err(|err| eyre!("--move {raw}: {err}"))?;
        let (path, index) = split_item_pointer(pointer, data)?;
        commands.push(FormCommand::MoveItem {
            path,
            index,
            direction,
        });
    }
    for pointer in &cli.remove {
        let (path, index) = split_item_pointer(pointer, data)?;
        commands.push(FormCommand::RemoveItem { path, index });
    }
    Ok(commands)
}

/// `/tags/2` becomes the array path `/tags` and index 2.
fn split_item_pointer(pointer: &str, data: &Value) -> Result<(Path, usize)> {
    let (parent, last) = pointer
        .rsplit_once('/')
        .ok_or_else(|| eyre!("'{pointer}' is not a JSON pointer"))?;
    let index = last
        .parse::<usize>()
        .map_err(|_| eyre!("'{pointer}' does not end in an array index"))?;
    let path = Path::from_pointer_in(parent, data);
    if matches!(path.last(), Some(PathSegment::Key(key)) if key.is_empty()) {
        return Err(eyre!("'{pointer}' has an empty segment"));
    }
    Ok((path, index))
}

fn load_value(spec: &str, label: &str) -> Result<Value> {
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read from stdin")?;
        return parse_contents(&buffer, DocumentFormat::default(), label);
    }

    let path = PathBuf::from(spec);
    match fs::read_to_string(&path) {
        Ok(contents) => {
            let format = probe_format_from_extension(&path).unwrap_or_default();
            parse_contents(&contents, format, label)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            parse_contents(spec, DocumentFormat::default(), &format!("inline {label}"))
        }
        Err(err) => Err(err)
            .wrap_err_with(|| format!("failed to load {label} from {}", path.display())),
    }
}

/// Tries the hinted format first, then every other compiled-in format.
fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    match parse_document_str(contents, format) {
        Ok(value) => Ok(value),
        Err(primary) => {
            for candidate in DocumentFormat::available_formats() {
                if candidate == format {
                    continue;
                }
                if let Ok(value) = parse_document_str(contents, candidate) {
                    return Ok(value);
                }
            }
            Err(eyre!(
                "failed to parse {label}: tried {} (first error: {primary:#})",
                format_list()
            ))
        }
    }
}

fn format_list() -> String {
    DocumentFormat::available_formats()
        .into_iter()
        .map(|format| format.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn probe_format_from_extension(path: &FsPath) -> Option<DocumentFormat> {
    DocumentFormat::from_path(path)
}

fn build_output_options(cli: &Cli, diagnostics: &mut DiagnosticCollector) -> OutputOptions {
    let mut destinations = Vec::new();
    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
            continue;
        }
        destinations.push(OutputDestination::parse(raw));
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    let mut detected: Option<DocumentFormat> = None;
    for destination in &destinations {
        let OutputDestination::File(path) = destination else {
            continue;
        };
        if !cli.force && path.exists() {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
        if cli.format.is_some() {
            continue;
        }
        match (probe_format_from_extension(path), detected) {
            (Some(format), Some(existing)) if format != existing => {
                diagnostics.push_output(format!(
                    "output file {} uses {format} but other destinations use {existing}; align extensions or pass --format",
                    path.display()
                ))
            }
            (Some(format), _) => detected = Some(format),
            (None, _) => diagnostics.push_output(format!(
                "cannot infer format from output file {}; pass --format",
                path.display()
            )),
        }
    }

    OutputOptions::new(cli.format.or(detected).unwrap_or_default())
        .with_pretty(!cli.no_pretty)
        .with_destinations(destinations)
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_item_pointers() {
        let data = serde_json::json!({"tags": ["a", "b", "c"], "2024": ["x"]});
        let (path, index) = split_item_pointer("/tags/2", &data).expect("valid pointer");
        assert_eq!(path, Path::root().child("tags"));
        assert_eq!(index, 2);
        let (path, index) = split_item_pointer("/2024/0", &data).expect("numeric key");
        assert_eq!(path, Path::root().child("2024"));
        assert_eq!(index, 0);
        assert!(split_item_pointer("/tags/last", &data).is_err());
        assert!(split_item_pointer("tags", &data).is_err());
    }

    #[test]
    fn parses_edit_flags_in_order() {
        let cli = Cli::parse_from([
            "schemaform",
            "--schema",
            "{}",
            "--set",
            "/name=John",
            "--move",
            "/tags/1:up",
            "--remove",
            "/tags/0",
        ]);
        let commands = scripted_commands(&cli, &serde_json::json!({"tags": ["a", "b"]}))
            .expect("valid edits");
        assert_eq!(commands.len(), 3);
        assert!(matches!(&commands[0], FormCommand::Input { text, .. } if text == "John"));
        assert!(matches!(
            &commands[1],
            FormCommand::MoveItem { index: 1, direction: MoveDirection::Up, .. }
        ));
        assert!(matches!(&commands[2], FormCommand::RemoveItem { index: 0, .. }));
    }
}
