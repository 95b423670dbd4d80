//! FormFix CLI - Command-line interface for FormFix
//!
//! Commands:
//! - ingest: Validate metric payloads and append them to an NDJSON store
//! - dump: Print a store's full history as a JSON array
//! - analyze: Generate friction insights from collected metrics
//! - capture: Replay recorded field interactions through the tracker
//! - validate: Validate metric payloads
//! - doctor: Diagnose store and configuration health
//! - schema: Describe input and output formats

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use formfix::analysis::{AnalysisResponse, InsightsProcessor};
use formfix::capture::{
    FieldDescriptor, FormDescriptor, FormTracker, IngestTransport, Interaction, NdjsonTransport,
    SessionId, SubmitTrigger, Transport,
};
use formfix::config::FormFixConfig;
use formfix::encoder::InsightEncoder;
use formfix::ingest::{Ingestor, Rejected};
use formfix::schema::{MetricAdapter, MetricPayload, SCHEMA_VERSION};
use formfix::store::{MetricStore, NdjsonFileStore};
use formfix::types::EventType;
use formfix::{FormFixError, StoreError, FORMFIX_VERSION, PRODUCER_NAME};

/// FormFix - form-field friction capture and analysis
#[derive(Parser)]
#[command(name = "formfix")]
#[command(version = FORMFIX_VERSION)]
#[command(about = "Capture and analyze form-field friction", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate metric payloads and append accepted ones to a store
    Ingest {
        /// NDJSON input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// NDJSON store file (created if missing)
        #[arg(short, long)]
        store: PathBuf,

        /// Output ingestion report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print every stored event, in receipt order, as a JSON array
    Dump {
        /// NDJSON store file
        #[arg(short, long)]
        store: PathBuf,

        /// Pretty-print output
        #[arg(long)]
        pretty: bool,
    },

    /// Generate friction insights from collected metrics
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Threshold overrides (FormFix config JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Wrap insights in a report with producer metadata
        #[arg(long)]
        envelope: bool,

        /// Pretty-print output
        #[arg(long)]
        pretty: bool,
    },

    /// Replay recorded field interactions and print the emitted metrics
    Capture {
        /// NDJSON replay steps (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Form descriptor JSON (fields and labels)
        #[arg(long)]
        form: Option<PathBuf>,

        /// Reuse a session id instead of generating one
        #[arg(long)]
        session_id: Option<String>,

        /// Form id when no descriptor is given
        #[arg(long)]
        form_id: Option<String>,

        /// Deliver to this NDJSON store instead of stdout
        #[arg(long)]
        store: Option<PathBuf>,

        /// Capture thresholds (FormFix config JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate metric payloads
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose store and configuration health
    Doctor {
        /// Check an NDJSON store file
        #[arg(long)]
        store: Option<PathBuf>,

        /// Check a config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one metric per line)
    Ndjson,
    /// JSON array of metrics
    Json,
    /// Analysis request body ({ "metrics": [...] })
    Request,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Metric payload schema (formfix.metric.v1)
    Input,
    /// Analysis response schema
    Output,
}

/// One line of a capture replay
#[derive(Debug, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
enum ReplayStep {
    Field {
        field: String,
        at: i64,
        interaction: Interaction,
    },
    Submit {
        at: i64,
        #[serde(default)]
        trigger: Option<SubmitTrigger>,
    },
    Teardown {
        at: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string()));
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn run(cli: Cli) -> Result<(), FormFixCliError> {
    match cli.command {
        Commands::Ingest { input, store, json } => cmd_ingest(&input, &store, json),

        Commands::Dump { store, pretty } => cmd_dump(&store, pretty),

        Commands::Analyze {
            input,
            input_format,
            config,
            envelope,
            pretty,
        } => cmd_analyze(&input, input_format, config.as_deref(), envelope, pretty),

        Commands::Capture {
            input,
            form,
            session_id,
            form_id,
            store,
            config,
        } => cmd_capture(
            &input,
            form.as_deref(),
            session_id,
            form_id,
            store.as_deref(),
            config.as_deref(),
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor { store, config, json } => cmd_doctor(store.as_deref(), config.as_deref(), json),

        Commands::Schema { schema_type, json_schema } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_ingest(input: &Path, store_path: &Path, json: bool) -> Result<(), FormFixCliError> {
    let input_data = read_input(input)?;
    let store = NdjsonFileStore::open(store_path)?;
    let ingestor = Ingestor::new(&store);

    let mut report = IngestReport {
        total_metrics: 0,
        accepted: 0,
        rejected: 0,
        errors: Vec::new(),
    };

    for (line_num, line) in input_data.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        report.total_metrics += 1;

        let outcome = serde_json::from_str::<MetricPayload>(trimmed)
            .map_err(|e| format!("Invalid JSON: {}", e))
            .and_then(|payload| match ingestor.ingest(payload) {
                Ok(_) => Ok(()),
                Err(Rejected::Invalid(e)) => Err(e.to_string()),
                Err(Rejected::Store(e)) => Err(format!("Store error: {}", e)),
            });

        match outcome {
            Ok(()) => report.accepted += 1,
            Err(error) => {
                report.rejected += 1;
                report.errors.push(LineError {
                    line: line_num + 1,
                    error,
                });
            }
        }
    }

    log::info!(
        "Ingested {} of {} metrics into {}",
        report.accepted,
        report.total_metrics,
        store.path().display()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Ingestion Report");
        println!("================");
        println!("Store:    {}", store.path().display());
        println!("Total:    {}", report.total_metrics);
        println!("Accepted: {}", report.accepted);
        println!("Rejected: {}", report.rejected);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Line {}: {}", err.line, err.error);
            }
        }
    }

    if report.rejected > 0 {
        Err(FormFixCliError::IngestRejected(report.rejected))
    } else {
        Ok(())
    }
}

fn cmd_dump(store_path: &Path, pretty: bool) -> Result<(), FormFixCliError> {
    if !store_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Store {} does not exist", store_path.display()),
        )
        .into());
    }
    let store = NdjsonFileStore::open(store_path)?;
    let events = store.read_all()?;
    log::info!("Read {} events from {}", events.len(), store.path().display());
    println!("{}", to_json(&events, pretty)?);
    Ok(())
}

fn cmd_analyze(
    input: &Path,
    input_format: InputFormat,
    config: Option<&Path>,
    envelope: bool,
    pretty: bool,
) -> Result<(), FormFixCliError> {
    let input_data = read_input(input)?;
    let config = load_config(config)?;
    let processor = InsightsProcessor::with_config(config.analysis);

    // Request bodies answered exactly as the analysis endpoint would
    if matches!(input_format, InputFormat::Request) && !envelope {
        let response = processor.respond(&input_data);
        println!("{}", to_json(&response, pretty)?);
        return if response.success {
            Ok(())
        } else {
            Err(FormFixCliError::AnalysisFailed)
        };
    }

    let payloads = parse_payloads(&input_data, &input_format)?;
    let (events, skipped) = MetricAdapter::to_events(payloads);
    if skipped > 0 {
        log::warn!("Skipped {} invalid metrics", skipped);
    }

    let insights = processor.insights(&events);

    let output = if envelope {
        let report = InsightEncoder::new().encode(insights, events.len(), skipped);
        to_json(&report, pretty)?
    } else {
        to_json(&AnalysisResponse::ok(insights), pretty)?
    };
    println!("{}", output);

    Ok(())
}

fn cmd_capture(
    input: &Path,
    form: Option<&Path>,
    session_id: Option<String>,
    form_id: Option<String>,
    store: Option<&Path>,
    config: Option<&Path>,
) -> Result<(), FormFixCliError> {
    let input_data = read_input(input)?;
    let config = load_config(config)?;

    let descriptor = match form {
        Some(path) => serde_json::from_str::<FormDescriptor>(&fs::read_to_string(path)?)?,
        None => FormDescriptor {
            id: form_id,
            ..FormDescriptor::default()
        },
    };
    let session_id = session_id
        .map(SessionId::from_existing)
        .unwrap_or_else(SessionId::generate);

    let steps = parse_replay(&input_data)?;

    match store {
        Some(path) => {
            let store = NdjsonFileStore::open(path)?;
            let emitted = replay(&steps, &descriptor, session_id, IngestTransport::new(&store), &config);
            log::info!("Delivered {} metrics to {}", emitted, store.path().display());
        }
        None => {
            let transport = NdjsonTransport::new(io::stdout());
            replay(&steps, &descriptor, session_id, transport, &config);
            io::stdout().flush()?;
        }
    }

    Ok(())
}

fn replay<T: Transport>(
    steps: &[ReplayStep],
    descriptor: &FormDescriptor,
    session_id: SessionId,
    transport: T,
    config: &FormFixConfig,
) -> usize {
    let mut tracker = FormTracker::with_config(session_id, descriptor, transport, config.capture.clone());
    for field in &descriptor.fields {
        tracker.register_field(field.key(), &field.to_field_descriptor());
    }

    let mut emitted = 0;
    for step in steps {
        match step {
            ReplayStep::Field { field, at, interaction } => {
                // Fields missing from the descriptor are tracked under their own name
                tracker.register_field(field.as_str(), &FieldDescriptor::named(field.as_str()));
                emitted += tracker.record(field, *interaction, *at).len();
            }
            ReplayStep::Submit { at, trigger } => {
                tracker.submit(trigger.unwrap_or(SubmitTrigger::Form), *at);
                emitted += 1;
            }
            ReplayStep::Teardown { at } => {
                emitted += tracker.teardown(*at).map_or(0, |_| 1);
            }
        }
    }
    emitted
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), FormFixCliError> {
    let input_data = read_input(input)?;
    let payloads = parse_payloads(&input_data, &input_format)?;
    let results = MetricAdapter::validate_payloads(&payloads);

    let report = ValidationReport {
        total_metrics: payloads.len(),
        valid_metrics: payloads.len() - results.len(),
        invalid_metrics: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                field: r.field.clone(),
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total metrics:   {}", report.total_metrics);
        println!("Valid metrics:   {}", report.valid_metrics);
        println!("Invalid metrics: {}", report.invalid_metrics);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Metric {} (field {}): {}",
                    err.index,
                    err.field.as_deref().unwrap_or("unknown"),
                    err.error
                );
            }
        }
    }

    if report.invalid_metrics > 0 {
        Err(FormFixCliError::ValidationFailed(report.invalid_metrics))
    } else {
        Ok(())
    }
}

fn cmd_doctor(store: Option<&Path>, config: Option<&Path>, json: bool) -> Result<(), FormFixCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck::ok("formfix_version", format!("FormFix version {}", FORMFIX_VERSION)));
    checks.push(DoctorCheck::ok("schema_version", format!("Input schema: {}", SCHEMA_VERSION)));

    if let Some(store_path) = store {
        let check = if !store_path.exists() {
            DoctorCheck::warning("store", "Store file does not exist (it is created on first ingest)")
        } else {
            match NdjsonFileStore::open(store_path).and_then(|s| s.len()) {
                Ok(count) => DoctorCheck::ok("store", format!("Store readable ({} events)", count)),
                Err(e) => DoctorCheck::error("store", format!("Store unusable: {}", e)),
            }
        };
        checks.push(check);
    }

    if let Some(config_path) = config {
        let check = match fs::read_to_string(config_path) {
            Ok(content) => match FormFixConfig::from_json(&content) {
                Ok(_) => DoctorCheck::ok("config", "Config file valid"),
                Err(e) => DoctorCheck::error("config", format!("Invalid config JSON: {}", e)),
            },
            Err(e) => DoctorCheck::error("config", format!("Cannot read config file: {}", e)),
        };
        checks.push(check);
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck::ok("stdin", "stdin is a TTY (interactive mode)")
    } else {
        DoctorCheck::ok("stdin", "stdin is a pipe (ready for --input -)")
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: FORMFIX_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("FormFix Doctor Report");
        println!("=====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(FormFixCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), FormFixCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: {}", SCHEMA_VERSION);
                println!();
                println!("One metric per record:");
                println!("- sessionId: tracking-session token, string or number (defaults to \"unknown\")");
                println!("- form:      form identifier (defaults to \"unknown\")");
                println!("- field:     human-readable field label (required)");
                println!("- type:      metric type (required)");
                println!("- data:      metric-specific numbers and markers");
                println!("- ts:        capture time, epoch milliseconds (number or numeric string)");
                println!();
                println!("Metric types:");
                for event_type in EventType::ALL {
                    println!("  - {}", event_type);
                }
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: analysis response");
                println!();
                println!("- success: true on success");
                println!("- insights:");
                println!("  - frictionScore: High or Low");
                println!("  - problematicFields: [{{ field, frictionScore, issues }}]");
                println!("  - dropOffPoints: [{{ sessionId, timestamp, lastField }}]");
                println!("  - dropOffSummary: {{ totalSessions, abandonments, completions, dropOffRate }}");
                println!("  - recommendations: [{{ type, field, suggestion, impact, reasoning }}]");
                println!("  - predictedCompletionRate: rounded percentage or null");
                println!("  - userJourneyInsights: [{{ sessionId, fieldOrder, completed, abandoned }}]");
                println!("- error: \"Insights generation failed\" on failure");
            }
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, FormFixCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn load_config(path: Option<&Path>) -> Result<FormFixConfig, FormFixCliError> {
    match path {
        Some(path) => Ok(FormFixConfig::from_json(&fs::read_to_string(path)?)?),
        None => Ok(FormFixConfig::default()),
    }
}

fn parse_payloads(input_data: &str, format: &InputFormat) -> Result<Vec<MetricPayload>, FormFixCliError> {
    let payloads = match format {
        InputFormat::Ndjson => MetricAdapter::parse_ndjson(input_data)?,
        InputFormat::Json => MetricAdapter::parse_array(input_data)?,
        InputFormat::Request => MetricAdapter::parse_request(input_data)?.metrics,
    };
    Ok(payloads)
}

fn parse_replay(input_data: &str) -> Result<Vec<ReplayStep>, FormFixCliError> {
    let mut steps = Vec::new();
    for (line_num, line) in input_data.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let step = serde_json::from_str(trimmed).map_err(|e| {
            FormFixCliError::ParseError(format!("Failed to parse replay line {}: {}", line_num + 1, e))
        })?;
        steps.push(step);
    }
    Ok(steps)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, FormFixCliError> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

fn get_input_json_schema() -> String {
    let types: Vec<&str> = EventType::ALL.iter().map(|t| t.as_str()).collect();
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": SCHEMA_VERSION,
        "description": "FormFix friction metric payload",
        "type": "object",
        "required": ["field", "type"],
        "properties": {
            "sessionId": { "type": ["string", "number"] },
            "form": { "type": ["string", "number"] },
            "field": { "type": "string", "minLength": 1 },
            "type": { "type": "string", "enum": types },
            "data": {
                "type": "object",
                "additionalProperties": { "type": ["number", "string"] }
            },
            "ts": { "type": ["number", "string"] },
            "receivedAt": { "type": ["number", "string"] }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "formfix.insights",
        "description": "FormFix analysis response",
        "type": "object",
        "required": ["success"],
        "properties": {
            "success": { "type": "boolean" },
            "error": { "type": "string" },
            "insights": {
                "type": "object",
                "properties": {
                    "frictionScore": { "type": "string", "enum": ["High", "Low"] },
                    "problematicFields": { "type": "array", "items": { "type": "object" } },
                    "dropOffPoints": { "type": "array", "items": { "type": "object" } },
                    "dropOffSummary": {
                        "type": "object",
                        "properties": {
                            "totalSessions": { "type": "integer" },
                            "abandonments": { "type": "integer" },
                            "completions": { "type": "integer" },
                            "dropOffRate": { "type": ["number", "null"] }
                        }
                    },
                    "recommendations": { "type": "array", "items": { "type": "object" } },
                    "predictedCompletionRate": { "type": ["integer", "null"] },
                    "userJourneyInsights": { "type": "array", "items": { "type": "object" } }
                }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum FormFixCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Input(FormFixError),
    Store(StoreError),
    IngestRejected(usize),
    ValidationFailed(usize),
    AnalysisFailed,
    DoctorFailed,
    ParseError(String),
}

impl From<io::Error> for FormFixCliError {
    fn from(e: io::Error) -> Self {
        FormFixCliError::Io(e)
    }
}

impl From<serde_json::Error> for FormFixCliError {
    fn from(e: serde_json::Error) -> Self {
        FormFixCliError::Json(e)
    }
}

impl From<FormFixError> for FormFixCliError {
    fn from(e: FormFixError) -> Self {
        FormFixCliError::Input(e)
    }
}

impl From<StoreError> for FormFixCliError {
    fn from(e: StoreError) -> Self {
        FormFixCliError::Store(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<FormFixCliError> for CliError {
    fn from(e: FormFixCliError) -> Self {
        match e {
            FormFixCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            FormFixCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            FormFixCliError::Input(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some(format!("Ensure input matches the {} schema", SCHEMA_VERSION)),
            },
            FormFixCliError::Store(e) => CliError {
                code: "STORE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'formfix doctor --store <file>' for details".to_string()),
            },
            FormFixCliError::IngestRejected(count) => CliError {
                code: "INGEST_REJECTED".to_string(),
                message: format!("{} metrics were rejected", count),
                hint: Some("Run 'formfix validate' for details".to_string()),
            },
            FormFixCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} metrics failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            FormFixCliError::AnalysisFailed => CliError {
                code: "ANALYSIS_FAILED".to_string(),
                message: "Insights generation failed".to_string(),
                hint: Some("Re-run with -v for the underlying error".to_string()),
            },
            FormFixCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            FormFixCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct IngestReport {
    total_metrics: usize,
    accepted: usize,
    rejected: usize,
    errors: Vec<LineError>,
}

#[derive(serde::Serialize)]
struct LineError {
    line: usize,
    error: String,
}

#[derive(serde::Serialize)]
struct ValidationReport {
    total_metrics: usize,
    valid_metrics: usize,
    invalid_metrics: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    field: Option<String>,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

impl DoctorCheck {
    fn ok(name: &str, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Ok, message)
    }

    fn warning(name: &str, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Warning, message)
    }

    fn error(name: &str, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Error, message)
    }

    fn with_status(name: &str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
        }
    }
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
