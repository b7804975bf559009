//! weft debug driver

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use weft_descriptors::SemanticModel;
use weft_error::{DiagnosticRenderer, Diagnostics, FileTable, IrError};
use weft_ir::{lower_declarations, IrModuleFragment, IrSession, SessionConfig};
use weft_lowering::SyntheticImplGenerator;

#[derive(Parser)]
#[command(name = "weft")]
#[command(author = "Guilherme Mendes")]
#[command(version = "0.1.0")]
#[command(about = "Canonical IR construction for frontend semantic models", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints the canonical type of every declared property
    Types {
        /// Semantic model (JSON)
        #[arg(value_name = "MODEL")]
        input: PathBuf,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Generates implementation classes for annotation classes
    Impl {
        /// Semantic model (JSON)
        #[arg(value_name = "MODEL")]
        input: PathBuf,

        /// Only this annotation class (e.g. `demo/Tag`)
        #[arg(long, value_name = "ID")]
        class: Option<String>,

        #[command(flatten)]
        session: SessionArgs,
    },
}

#[derive(Args)]
struct SessionArgs {
    /// Session configuration (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Name of the nested implementation slot
    #[arg(long, value_name = "NAME")]
    impl_name: Option<String>,

    /// Prefix of synthesized backing fields
    #[arg(long, value_name = "PREFIX")]
    field_prefix: Option<String>,

    /// Keep expanded types instead of their type-alias spelling
    #[arg(long)]
    no_abbreviations: bool,
}

impl SessionArgs {
    fn load(&self) -> Result<SessionConfig, IrError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = read(path)?;
                serde_json::from_str(&text)
                    .map_err(|e| IrError::Model(format!("{}: {}", path.display(), e)))?
            }
            None => SessionConfig::default(),
        };
        if let Some(name) = &self.impl_name {
            config.impl_class_name = name.clone();
        }
        if let Some(prefix) = &self.field_prefix {
            config.backing_field_prefix = prefix.clone();
        }
        if self.no_abbreviations {
            config.use_abbreviations = false;
        }
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (input, result) = match &cli.command {
        Commands::Types { input, session } => (input, run_types(input, session)),
        Commands::Impl {
            input,
            class,
            session,
        } => (input, run_impl(input, class.as_deref(), session)),
    };

    if let Err((files, error)) = result {
        let diagnostics = Diagnostics::from(error);
        eprintln!("{}", diagnostics.render_with(&DiagnosticRenderer::new(&files)));
        if diagnostics.has_errors() {
            eprintln!("Failed to process {}", input.display());
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

type Outcome = Result<(), (FileTable, IrError)>;

fn run_types(input: &Path, args: &SessionArgs) -> Outcome {
    let (_, session, fragment) = prepare(input, args)?;

    for class in &fragment.classes {
        let class = class.read();
        for property in &class.properties {
            println!("{}.{}: {}", class.id, property.name, property.ty);
        }
    }

    println!();
    println!(
        "{} distinct types, {} cache hits, {} classifier ids",
        session.interner().len(),
        session.interner().hits(),
        session.classifier_ids().len()
    );
    Ok(())
}

fn run_impl(input: &Path, only: Option<&str>, args: &SessionArgs) -> Outcome {
    let (model, session, fragment) = prepare(input, args)?;
    let files = FileTable::from_names(model.files.iter().cloned());
    let generator = SyntheticImplGenerator::new(&session);

    let impls = match only {
        Some(id) => {
            let declaration = fragment.find(id).ok_or_else(|| {
                (
                    files.clone(),
                    IrError::Model(format!("no class `{}` in the model", id)),
                )
            })?;
            generator
                .get_impl_class(declaration)
                .map(|class| vec![class])
        }
        None => generator.generate_all(&fragment),
    }
    .map_err(|e| (files.clone(), e))?;

    let mut output = IrModuleFragment::new();
    for class in impls {
        output.add_class(class);
    }
    print!("{}", output);
    Ok(())
}

fn prepare(
    input: &Path,
    args: &SessionArgs,
) -> Result<(SemanticModel, IrSession, IrModuleFragment), (FileTable, IrError)> {
    let config = args.load().map_err(|e| (FileTable::new(), e))?;
    let text = read(input).map_err(|e| (FileTable::new(), e))?;
    let model = SemanticModel::from_json(&text).map_err(|e| (FileTable::new(), e))?;
    let files = FileTable::from_names(model.files.iter().cloned());

    let session = IrSession::with_config(config);
    let fragment = lower_declarations(&session, &model).map_err(|e| (files, e))?;
    Ok((model, session, fragment))
}

fn read(path: &Path) -> Result<String, IrError> {
    fs::read_to_string(path).map_err(|e| IrError::Model(format!("{}: {}", path.display(), e)))
}
