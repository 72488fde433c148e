use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tk_app::{
    AppError, AppResult, ClosedLoopResponse, PidOverride, PidParameters, Session, SessionConfig,
    TuningMethod,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tunekit")]
#[command(about = "TuneKit CLI - FOPDT identification and PID tuning from step tests", long_about = None)]
#[command(after_help = "Reads CSV and MAT v5 files. MAT v7.3 (HDF5) files need a build with \
`cargo install --path apps/tk-cli --features hdf5` and a system HDF5 library.")]
struct Cli {
    /// Session configuration YAML
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Controller selection shared by `simulate` and `export`.
#[derive(clap::Args)]
struct ControllerArgs {
    /// Tuning rule, e.g. IMC or Cohen-Coon
    #[arg(long)]
    method: Option<String>,
    /// IMC closed-loop time constant
    #[arg(long)]
    lambda: Option<f64>,
    /// Proportional gain override
    #[arg(long)]
    kp: Option<f64>,
    /// Integral time override (s)
    #[arg(long)]
    ti: Option<f64>,
    /// Derivative time override (s)
    #[arg(long)]
    td: Option<f64>,
    /// Set-point; defaults to the experiment's final output level
    #[arg(long)]
    setpoint: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportKind {
    /// t, y_exp, y_fit
    Fit,
    /// t, y_cl
    ClosedLoop,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a data file and print the detected step
    Inspect {
        /// Path to the .mat or .csv file
        data_path: PathBuf,
    },
    /// Identify an FOPDT model
    Identify {
        /// Path to the .mat or .csv file
        data_path: PathBuf,
    },
    /// Identify, then compute PID gains
    Tune {
        /// Path to the .mat or .csv file
        data_path: PathBuf,
        /// Tuning rule name, or "all"
        #[arg(long, default_value = "all")]
        method: String,
        /// IMC closed-loop time constant
        #[arg(long)]
        lambda: Option<f64>,
    },
    /// Identify, tune and simulate the closed loop
    Simulate {
        /// Path to the .mat or .csv file
        data_path: PathBuf,
        #[command(flatten)]
        controller: ControllerArgs,
    },
    /// Export fitted or closed-loop curves as CSV
    Export {
        /// Path to the .mat or .csv file
        data_path: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportKind::Fit)]
        kind: ExportKind,
        #[command(flatten)]
        controller: ControllerArgs,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SessionConfig::load_yaml(path)?,
        None => SessionConfig::default(),
    };
    tracing::debug!(?config, "session configured");
    let mut session = Session::new(config);

    match cli.command {
        Commands::Inspect { data_path } => cmd_inspect(&mut session, &data_path, cli.json),
        Commands::Identify { data_path } => cmd_identify(&mut session, &data_path, cli.json),
        Commands::Tune {
            data_path,
            method,
            lambda,
        } => cmd_tune(&mut session, &data_path, &method, lambda, cli.json),
        Commands::Simulate {
            data_path,
            controller,
        } => cmd_simulate(&mut session, &data_path, &controller, cli.json),
        Commands::Export {
            data_path,
            kind,
            controller,
            output,
        } => cmd_export(&mut session, &data_path, kind, &controller, output.as_deref()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |x| format!("{x:.4}"))
}

fn cmd_inspect(session: &mut Session, data_path: &Path, json: bool) -> AppResult<()> {
    let ds = session.load(data_path)?;
    if json {
        return print_json(&ds.step);
    }
    let s = &ds.step;
    println!("Dataset: {} ({} samples)", data_path.display(), ds.len());
    println!("  step at t = {:.4} (index {}, window {})", s.step_time, s.step_index, s.window);
    println!("  u0 = {:.6}, du = {:.6}", s.u0, s.du);
    println!("  y0 = {:.6}, dy = {:.6}", s.y0, s.dy);
    println!("  k  = {:.6}", s.k);
    Ok(())
}

fn cmd_identify(session: &mut Session, data_path: &Path, json: bool) -> AppResult<()> {
    session.load(data_path)?;
    let id = session.identify()?;
    if json {
        return print_json(&id.model);
    }
    let m = &id.model;
    println!("Model ({}): k = {:.6}, tau = {:.6}, theta = {:.6}", m.method, m.k, m.tau, m.theta);
    println!("  RMSE = {:.6e}, theta/tau = {:.4}", m.rmse, m.ratio());
    println!();
    println!("{:<12} {:>10} {:>10} {:>10} {:>10} {:>12}", "method", "t1", "t2", "tau", "theta", "rmse");
    for c in &id.candidates {
        println!(
            "{:<12} {:>10} {:>10} {:>10.4} {:>10.4} {:>12}",
            c.method.label(),
            fmt_opt(c.t1),
            fmt_opt(c.t2),
            c.tau,
            c.theta,
            c.rmse.map_or_else(|| "discarded".to_string(), |r| format!("{r:.4e}")),
        );
    }
    Ok(())
}

fn cmd_tune(session: &mut Session, data_path: &Path, method: &str, lambda: Option<f64>, json: bool) -> AppResult<()> {
    session.load(data_path)?;
    session.identify()?;

    let rows: Vec<(TuningMethod, PidParameters)> = if method.eq_ignore_ascii_case("all") {
        session.tune_all(lambda)
    } else {
        let m: TuningMethod = method.parse()?;
        vec![(m, session.tune(m, lambda))]
    };

    if json {
        let named: Vec<_> = rows.iter().map(|(m, p)| (m.name(), p)).collect();
        return print_json(&named);
    }
    println!("{:<26} {:>12} {:>12} {:>12}", "method", "Kp", "Ti", "Td");
    for (m, p) in &rows {
        let note = match p.validate() {
            Ok(()) => String::new(),
            Err(e) => format!("  ({e})"),
        };
        println!("{:<26} {:>12.6} {:>12.6} {:>12.6}{}", m.name(), p.kp, p.ti, p.td, note);
    }
    Ok(())
}

/// Load, identify, pick the controller and simulate.
fn run_closed_loop(session: &mut Session, data_path: &Path, args: &ControllerArgs) -> AppResult<ClosedLoopResponse> {
    session.load(data_path)?;
    session.identify()?;
    if let Some(method) = &args.method {
        let m: TuningMethod = method.parse()?;
        session.tune(m, args.lambda);
    }
    let setpoint = match args.setpoint {
        Some(sp) => sp,
        None => session.dataset().ok_or(AppError::NoDataset)?.step.y_final(),
    };
    let overrides = PidOverride {
        kp: args.kp,
        ti: args.ti,
        td: args.td,
    };
    session.simulate(setpoint, overrides)
}

fn cmd_simulate(session: &mut Session, data_path: &Path, args: &ControllerArgs, json: bool) -> AppResult<()> {
    let response = run_closed_loop(session, data_path, args)?;
    if json {
        return print_json(&response.metrics);
    }
    let pid = session.pid();
    let m = &response.metrics;
    println!("Controller: Kp = {:.6}, Ti = {:.6}, Td = {:.6}", pid.kp, pid.ti, pid.td);
    println!("Set-point change: {:.6}", response.target);
    println!("  rise time (10-90%):    {}", fmt_opt(m.tr));
    println!("  settling time (band):  {}", fmt_opt(m.ts));
    println!("  overshoot (%):         {}", fmt_opt(m.mp));
    println!("  steady-state error:    {}", fmt_opt(m.ess));
    Ok(())
}

fn cmd_export(
    session: &mut Session,
    data_path: &Path,
    kind: ExportKind,
    args: &ControllerArgs,
    output: Option<&Path>,
) -> AppResult<()> {
    let (header, columns): ([&str; 3], [Vec<f64>; 3]) = match kind {
        ExportKind::Fit => {
            session.load(data_path)?;
            let id = session.identify()?;
            (["t", "y_exp", "y_fit"], [id.t.clone(), id.y_exp.clone(), id.y_fit.clone()])
        }
        ExportKind::ClosedLoop => {
            let r = run_closed_loop(session, data_path, args)?;
            let y0 = session.dataset().map_or(0.0, |ds| ds.step.y0);
            let y_abs = r.absolute(y0);
            (["t", "y_cl", "y_cl_abs"], [r.t, r.y, y_abs])
        }
    };

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            write_csv(file, &header, &columns)?;
            println!("✓ Exported {} data points to {}", columns[0].len(), path.display());
        }
        None => write_csv(io::stdout().lock(), &header, &columns)?,
    }
    Ok(())
}

fn write_csv<W: Write>(out: W, header: &[&str; 3], columns: &[Vec<f64>; 3]) -> AppResult<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(header).map_err(io::Error::from)?;
    for i in 0..columns[0].len() {
        wtr.write_record(columns.iter().map(|c| c[i].to_string()))
            .map_err(io::Error::from)?;
    }
    wtr.flush()?;
    Ok(())
}
