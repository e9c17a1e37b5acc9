use amps_app::{
    AppError, AppResult, ApplyOutcome, Edit, EditStatus, ShueSource, WizardSession, query,
    session_service,
};
use amps_config::{
    CheckLevel, DriverSource, ElectricFieldKind, FieldEvaluation, FieldId, FieldModelKind,
    FluxKind, MhdSource, OuterBoundaryKind, OutputDomainKind, OutputFormat, SpeciesPreset,
    SpectrumKind, TemporalKind, TemporalMode, WizardStep,
};
use amps_param::sections::Keyword;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "amps-cli")]
#[command(
    about = "AMPS parameter wizard - build and check AMPS_PARAM.in run files",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a session file with the default storm configuration
    Init {
        /// Session file (.yaml or .json)
        session: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Run all range and consistency checks
    Check {
        /// Session file (.yaml or .json)
        session: PathBuf,
    },
    /// Show derived values and the active numeric fields
    Derive {
        /// Session file (.yaml or .json)
        session: PathBuf,
    },
    /// Set a field by its param-file key (e.g. DST, RUN_NAME, START_TIME)
    Set {
        /// Session file (.yaml or .json)
        session: PathBuf,
        /// Param-file key
        key: String,
        /// New value as typed
        value: String,
    },
    /// Choose a variant (field model, boundary, spectrum, ...)
    Select {
        /// Session file (.yaml or .json)
        session: PathBuf,
        /// What to choose
        #[arg(value_enum)]
        what: Selector,
        /// Param-file keyword of the choice (e.g. TS05, SHUE, BAND)
        choice: String,
    },
    /// List wizard steps, optionally moving between them
    Steps {
        /// Session file (.yaml or .json)
        session: PathBuf,
        /// Advance to the next enabled step
        #[arg(long, conflicts_with_all = ["back", "go"])]
        next: bool,
        /// Return to the previous enabled step
        #[arg(long, conflicts_with = "go")]
        back: bool,
        /// Jump to a step by number (1-based)
        #[arg(long)]
        go: Option<usize>,
    },
    /// Print the param file (no submission gate)
    Render {
        /// Session file (.yaml or .json)
        session: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write AMPS_PARAM.in and the submission manifest
    Manifest {
        /// Session file (.yaml or .json)
        session: PathBuf,
        /// Output directory
        out_dir: PathBuf,
    },
    /// Rebuild a session from an existing param file
    Import {
        /// Param file to read
        param_file: PathBuf,
        /// Session file to write (.yaml or .json)
        session: PathBuf,
    },
    /// Sample the magnetopause boundary as CSV (x_re, rho_re)
    Boundary {
        /// Session file (.yaml or .json)
        session: PathBuf,
        /// Largest polar angle in degrees
        #[arg(long, default_value_t = 150.0)]
        theta_max: f64,
        /// Number of samples
        #[arg(long, default_value_t = 31)]
        points: usize,
    },
    /// Sample the energy spectrum as CSV (E_mev, flux)
    Spectrum {
        /// Session file (.yaml or .json)
        session: PathBuf,
        /// Number of log-spaced samples
        #[arg(long, default_value_t = 20)]
        points: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Selector {
    Species,
    Evaluation,
    FieldModel,
    MhdSource,
    Boundary,
    ShueMode,
    Efield,
    Temporal,
    DriverSource,
    Spectrum,
    OutputDomain,
    Flux,
    Format,
    Cutoff,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { session, force } => cmd_init(&session, force),
        Commands::Check { session } => cmd_check(&session),
        Commands::Derive { session } => cmd_derive(&session),
        Commands::Set {
            session,
            key,
            value,
        } => cmd_set(&session, &key, &value),
        Commands::Select {
            session,
            what,
            choice,
        } => cmd_select(&session, what, &choice),
        Commands::Steps {
            session,
            next,
            back,
            go,
        } => cmd_steps(&session, next, back, go),
        Commands::Render { session, output } => cmd_render(&session, output.as_deref()),
        Commands::Manifest { session, out_dir } => cmd_manifest(&session, &out_dir),
        Commands::Import {
            param_file,
            session,
        } => cmd_import(&param_file, &session),
        Commands::Boundary {
            session,
            theta_max,
            points,
        } => cmd_boundary(&session, theta_max, points),
        Commands::Spectrum { session, points } => cmd_spectrum(&session, points),
    }
}

fn cmd_init(session_path: &Path, force: bool) -> AppResult<()> {
    if session_path.exists() && !force {
        return Err(AppError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            session_path.display()
        )));
    }
    let session = WizardSession::default();
    session_service::save_session(session_path, &session)?;
    println!("✓ Session created: {}", session_path.display());
    println!("  Run: {}", session.config().run.run_name);
    Ok(())
}

fn level_marker(level: CheckLevel) -> &'static str {
    match level {
        CheckLevel::Ok => "✓",
        CheckLevel::Warn => "!",
        CheckLevel::Error => "✗",
    }
}

fn cmd_check(session_path: &Path) -> AppResult<()> {
    let session = session_service::load_session(session_path)?;
    let report = session.check();

    for check in &report.checks {
        let key = check.key.as_deref().unwrap_or("-");
        println!(
            "{} [{}] {:<16} {}",
            level_marker(check.level),
            check.step.title(),
            key,
            check.message
        );
    }

    if report.can_submit() {
        println!(
            "✓ Ready to submit ({} warning(s))",
            report.warning_count()
        );
    } else {
        println!(
            "✗ {} error(s), {} warning(s); submission blocked",
            report.error_count(),
            report.warning_count()
        );
    }
    Ok(())
}

fn cmd_derive(session_path: &Path) -> AppResult<()> {
    let session = session_service::load_session(session_path)?;
    let cfg = session.config();
    let derived = session.derived();

    println!("Derived values:");
    match derived.reference_rigidity_gv {
        Some(r) => println!("  Rigidity at 100 MeV/n: {:.4} GV", r),
        None => println!("  Rigidity at 100 MeV/n: n/a"),
    }
    println!(
        "  Shue from drivers: r0 = {:.3} RE, alpha = {:.4}",
        derived.shue_from_drivers.r0_re, derived.shue_from_drivers.alpha
    );
    if let Some(shue) = derived.boundary_shue {
        println!(
            "  Boundary Shue:     r0 = {:.3} RE, alpha = {:.4}",
            shue.r0_re, shue.alpha
        );
    }
    println!(
        "  Pdyn from plasma: {:.3} nPa (entered {:.3} nPa)",
        derived.pdyn_from_plasma_npa, cfg.field.drivers.pdyn_npa
    );
    let edges = &derived.energy_edges_mev;
    if let (Some(lo), Some(hi)) = (edges.first(), edges.last()) {
        println!(
            "  Energy bins: {} from {:.4} to {:.4} MeV/n",
            edges.len().saturating_sub(1),
            lo,
            hi
        );
    }

    println!("Active fields:");
    for row in query::field_rows(&session) {
        println!(
            "  {} {:<16} {:>14} {:<6} {}",
            level_marker(row.level),
            row.key,
            row.formatted,
            row.unit,
            row.label
        );
    }
    Ok(())
}

fn report_outcome(outcome: &ApplyOutcome) -> AppResult<()> {
    match &outcome.status {
        EditStatus::Applied => println!("✓ Updated"),
        EditStatus::Unchanged => println!("  No change"),
        EditStatus::Rejected { reason } => {
            return Err(AppError::InvalidInput(reason.clone()));
        }
    }
    for note in &outcome.notes {
        println!("  note: {}", note);
    }
    Ok(())
}

fn parse_time(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AppError::InvalidInput(format!("'{}' is not an RFC 3339 time: {}", value, e)))
}

fn text_edit(session: &WizardSession, key: &str, value: &str) -> AppResult<Edit> {
    let edit = match key {
        "RUN_NAME" => Edit::SetRunName(value.to_string()),
        "DESCRIPTION" => Edit::SetDescription(value.to_string()),
        "CONTACT_EMAIL" => Edit::SetContactEmail(Some(value.to_string())),
        "MHD_RUN_ID" => Edit::SetMhdRunId(value.to_string()),
        "EPOCH" => Edit::SetEpoch(parse_time(value)?),
        "START_TIME" | "END_TIME" => {
            let TemporalMode::TimeSeries { start, end, .. } = &session.config().temporal else {
                return Err(AppError::InvalidInput(
                    "time window requires TIME_SERIES mode".to_string(),
                ));
            };
            let t = parse_time(value)?;
            let (start, end) = if key == "START_TIME" {
                (t, *end)
            } else {
                (*start, t)
            };
            Edit::SetTimeWindow { start, end }
        }
        "DRIVER_FILE" => Edit::SetDriverSource(DriverSource::File {
            path: value.to_string(),
        }),
        "SPECTRUM_FILE" => Edit::SetSpectrumFile(value.to_string()),
        "SHELL_ALTITUDES" => Edit::SetShellAltitudes(value.to_string()),
        "TRAJECTORY_FILE" => Edit::SetTrajectoryFile(value.to_string()),
        "POINTS" => Edit::SetPoints(parse_points(value)?),
        _ => return Err(AppError::InvalidInput(format!("Unknown key: {}", key))),
    };
    Ok(edit)
}

/// `x y z; x y z; ...` in Earth radii.
fn parse_points(value: &str) -> AppResult<Vec<[f64; 3]>> {
    value
        .split(';')
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            let coords: Vec<f64> = p
                .split_whitespace()
                .map(|t| t.parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|_| AppError::InvalidInput(format!("bad point '{}'", p.trim())))?;
            match coords.as_slice() {
                &[x, y, z] => Ok([x, y, z]),
                _ => Err(AppError::InvalidInput(format!(
                    "point '{}' needs three coordinates",
                    p.trim()
                ))),
            }
        })
        .collect()
}

fn cmd_set(session_path: &Path, key: &str, value: &str) -> AppResult<()> {
    let mut session = session_service::load_session(session_path)?;
    let key = key.trim().to_ascii_uppercase();

    let edit = match FieldId::from_key(&key) {
        Some(field) => Edit::SetScalar {
            field,
            input: value.to_string(),
        },
        None => text_edit(&session, &key, value)?,
    };

    let outcome = session.apply(edit);
    report_outcome(&outcome)?;
    session_service::save_session(session_path, &session)
}

fn keyword<K: Keyword>(choice: &str) -> AppResult<K> {
    K::from_keyword(choice).ok_or_else(|| {
        let choices: Vec<&str> = K::TABLE.iter().map(|(_, k)| *k).collect();
        AppError::InvalidInput(format!(
            "Unknown choice '{}'; expected one of {}",
            choice,
            choices.join(", ")
        ))
    })
}

fn flag(choice: &str) -> AppResult<bool> {
    match choice.to_ascii_uppercase().as_str() {
        "T" | "TRUE" | "ON" | "YES" => Ok(true),
        "F" | "FALSE" | "OFF" | "NO" => Ok(false),
        _ => Err(AppError::InvalidInput(format!("expected T or F, got '{}'", choice))),
    }
}

fn cmd_select(session_path: &Path, what: Selector, choice: &str) -> AppResult<()> {
    let mut session = session_service::load_session(session_path)?;

    let edit = match what {
        Selector::Species => Edit::SelectSpecies(keyword::<SpeciesPreset>(choice)?),
        Selector::Evaluation => Edit::SetEvaluation(keyword::<FieldEvaluation>(choice)?),
        Selector::FieldModel => Edit::SelectFieldModel(keyword::<FieldModelKind>(choice)?),
        Selector::MhdSource => Edit::SetMhdSource(keyword::<MhdSource>(choice)?),
        Selector::Boundary => Edit::SelectBoundary(keyword::<OuterBoundaryKind>(choice)?),
        Selector::ShueMode => match choice.to_ascii_uppercase().as_str() {
            "AUTO" => Edit::SetShueManual(false),
            "MANUAL" => Edit::SetShueManual(true),
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "expected AUTO or MANUAL, got '{}'",
                    choice
                )));
            }
        },
        Selector::Efield => Edit::SelectElectricField(keyword::<ElectricFieldKind>(choice)?),
        Selector::Temporal => Edit::SelectTemporal(keyword::<TemporalKind>(choice)?),
        Selector::DriverSource => match choice.to_ascii_uppercase().as_str() {
            "OMNIWEB" => Edit::SetDriverSource(DriverSource::Omniweb),
            "MANUAL" => Edit::SetDriverSource(DriverSource::Manual),
            "FILE" => Edit::SetDriverSource(DriverSource::File {
                path: String::new(),
            }),
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "expected OMNIWEB, FILE or MANUAL, got '{}'",
                    choice
                )));
            }
        },
        Selector::Spectrum => Edit::SelectSpectrum(keyword::<SpectrumKind>(choice)?),
        Selector::OutputDomain => Edit::SelectOutputDomain(keyword::<OutputDomainKind>(choice)?),
        Selector::Flux => Edit::SetFluxKind(keyword::<FluxKind>(choice)?),
        Selector::Format => Edit::SetOutputFormat(keyword::<OutputFormat>(choice)?),
        Selector::Cutoff => Edit::SetCutoffRigidity(flag(choice)?),
    };

    let outcome = session.apply(edit);
    report_outcome(&outcome)?;
    session_service::save_session(session_path, &session)
}

fn cmd_steps(session_path: &Path, next: bool, back: bool, go: Option<usize>) -> AppResult<()> {
    let mut session = session_service::load_session(session_path)?;
    let before = session.step();

    if next {
        session.next();
    } else if back {
        session.back();
    } else if let Some(n) = go {
        let step = n
            .checked_sub(1)
            .and_then(|i| WizardStep::ALL.get(i).copied())
            .ok_or_else(|| AppError::InvalidInput(format!("No step {}", n)))?;
        if !session.go_to(step) {
            return Err(AppError::InvalidInput(format!(
                "Step '{}' is disabled",
                step.title()
            )));
        }
    }

    let report = session.check();
    for step in WizardStep::ALL {
        let cursor = if step == session.step() { ">" } else { " " };
        if session.is_step_enabled(step) {
            println!(
                "{} {}. {} {}",
                cursor,
                step.index() + 1,
                level_marker(report.level_for_step(step)),
                step.title()
            );
        } else {
            println!("{} {}. - {} (disabled)", cursor, step.index() + 1, step.title());
        }
    }

    if session.step() != before {
        session_service::save_session(session_path, &session)?;
    }
    Ok(())
}

fn cmd_render(session_path: &Path, output: Option<&Path>) -> AppResult<()> {
    let session = session_service::load_session(session_path)?;
    let text = session_service::render(&session);
    match output {
        Some(path) => {
            session_service::write_file(path, &text)?;
            println!("✓ Param file written: {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn cmd_manifest(session_path: &Path, out_dir: &Path) -> AppResult<()> {
    let session = session_service::load_session(session_path)?;
    let files = session_service::write_submission(out_dir, &session)?;
    println!("✓ Param file: {}", files.param_path.display());
    println!("✓ Manifest:   {}", files.manifest_path.display());
    Ok(())
}

fn cmd_import(param_file: &Path, session_path: &Path) -> AppResult<()> {
    let session = session_service::import_param_file(param_file)?;
    session_service::save_session(session_path, &session)?;
    let report = session.check();
    println!("✓ Imported {} into {}", param_file.display(), session_path.display());
    println!(
        "  Checks: {} error(s), {} warning(s)",
        report.error_count(),
        report.warning_count()
    );
    Ok(())
}

fn cmd_boundary(session_path: &Path, theta_max: f64, points: usize) -> AppResult<()> {
    let session = session_service::load_session(session_path)?;
    let profile = query::boundary_profile(&session, theta_max, points)?;
    let source = match profile.source {
        ShueSource::Auto => "auto",
        ShueSource::Manual => "manual",
        ShueSource::Reference => "reference (box boundary)",
    };
    println!(
        "# Shue {}: r0 = {:.3} RE, alpha = {:.4}",
        source, profile.params.r0_re, profile.params.alpha
    );
    println!("x_re,rho_re");
    for (x, rho) in profile.points {
        println!("{:.4},{:.4}", x, rho);
    }
    Ok(())
}

fn cmd_spectrum(session_path: &Path, points: usize) -> AppResult<()> {
    let session = session_service::load_session(session_path)?;
    let curve = query::spectrum_profile(&session, points)?;
    println!("e_mev_per_n,flux");
    for (e, j) in curve {
        println!("{:.6e},{:.6e}", e, j);
    }
    Ok(())
}
