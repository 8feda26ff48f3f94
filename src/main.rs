use clap::{Parser, ValueEnum};
use env_logger::Env;
use ods_report::{ReportConfig, ReportError, ReportKind, ReportPipelineBuilder};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Technical,
    Enhanced,
    All,
}

impl KindArg {
    fn kinds(self) -> Vec<ReportKind> {
        match self {
            KindArg::Technical => vec![ReportKind::Technical],
            KindArg::Enhanced => vec![ReportKind::Enhanced],
            KindArg::All => ReportKind::ALL.to_vec(),
        }
    }
}

/// Generates the ODS 12 recycled waste reports as PDF files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file. Defaults to config/default.toml when present.
    #[arg(long, env = "ODS_REPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the indicator record.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON dataset replacing the built-in reference data.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Directory the PDFs are written to.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Which report to generate.
    #[arg(long, value_enum, default_value_t = KindArg::All)]
    kind: KindArg,

    /// Print the projection analysis as JSON to stdout.
    #[arg(long, default_value_t = false)]
    print_analysis: bool,
}

fn run(args: Args) -> Result<(), ReportError> {
    let mut config = ReportConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(dataset) = args.dataset {
        config.dataset_file = Some(dataset);
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }

    let pipeline = ReportPipelineBuilder::new().with_config(config).build()?;

    if args.print_analysis {
        let analysis = pipeline.analyze()?;
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    }

    let written = pipeline.generate_to_dir(&args.kind.kinds())?;
    for path in written {
        println!("✓ Generated {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("ods_report=info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                log::error!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
