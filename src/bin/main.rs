//! dcdsvm Command Line Interface
//!
//! A command-line interface for training, evaluating, and using linear SVM
//! models with LibSVM and CSV data formats.

use clap::{Args, Parser, Subcommand, ValueEnum};
use dcdsvm::api::{quick, LinearSVM};
use dcdsvm::core::{Regularization, Result, SVMError};
use dcdsvm::persistence::SerializableModel;
use dcdsvm::{CSVDataset, Dataset, LibSVMDataset};
use env_logger::Env;
use log::{error, info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "dcdsvm")]
#[command(about = "Linear SVM training by dual coordinate descent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new SVM model
    Train(TrainArgs),
    /// Make predictions using a trained model
    Predict(PredictArgs),
    /// Evaluate a model on test data
    Evaluate(EvaluateArgs),
    /// Display model information
    Info(InfoArgs),
    /// Quick operations without model saving
    Quick(QuickArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DataFormat {
    /// Pick by file extension
    Auto,
    Libsvm,
    Csv,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliRegularization {
    /// Hinge loss, alpha bounded by C
    L1,
    /// Squared hinge loss, alpha unbounded
    L2,
}

impl From<CliRegularization> for Regularization {
    fn from(cli: CliRegularization) -> Self {
        match cli {
            CliRegularization::L1 => Regularization::L1,
            CliRegularization::L2 => Regularization::L2,
        }
    }
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file (LibSVM or CSV format)
    #[arg(long)]
    data: PathBuf,

    /// Output model file
    #[arg(short, long)]
    output: PathBuf,

    /// Data format
    #[arg(short, long, value_enum, default_value = "auto")]
    format: DataFormat,

    /// Box bound C for both classes
    #[arg(short = 'C', long, default_value = "1.0")]
    c: f64,

    /// Box bound for positive samples (overrides C)
    #[arg(long)]
    cp: Option<f64>,

    /// Box bound for negative samples (overrides C)
    #[arg(long)]
    cn: Option<f64>,

    /// Loss variant
    #[arg(long, value_enum, default_value = "l1")]
    regularization: CliRegularization,

    /// Maximum number of epochs; 0 uses --iterations instead
    #[arg(long, default_value = "100")]
    epochs: usize,

    /// Number of coordinate steps when --epochs is 0
    #[arg(long, default_value = "0")]
    iterations: usize,

    /// Projected gradient gap tolerance
    #[arg(long, default_value = "0.001")]
    accuracy: f64,

    /// Seed for the per-epoch permutation
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Skip coordinates stuck at a bound
    #[arg(long)]
    shrinking: bool,

    /// Log dual and primal objectives after training
    #[arg(long)]
    objective: bool,
}

#[derive(Args)]
struct PredictArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Input data file
    #[arg(long)]
    data: PathBuf,

    /// Output predictions file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Data format
    #[arg(short, long, value_enum, default_value = "auto")]
    format: DataFormat,

    /// Show confidence scores
    #[arg(long)]
    confidence: bool,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Test data file
    #[arg(long)]
    data: PathBuf,

    /// Data format
    #[arg(short, long, value_enum, default_value = "auto")]
    format: DataFormat,

    /// Show detailed metrics
    #[arg(long)]
    detailed: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
}

#[derive(Args)]
struct QuickArgs {
    #[command(subcommand)]
    operation: QuickOperation,
}

#[derive(Subcommand)]
enum QuickOperation {
    /// Quick train and evaluate with train/test files (LibSVM)
    Eval {
        /// Training data file
        train: PathBuf,
        /// Test data file
        test: PathBuf,
        /// Box bound C
        #[arg(short = 'C', long, default_value = "1.0")]
        c: f64,
    },
    /// Hold-out validation on a single dataset
    Cv {
        /// Data file
        data: PathBuf,
        /// Training ratio (0.0-1.0)
        #[arg(short, long, default_value = "0.8")]
        ratio: f64,
        /// Box bound C
        #[arg(short = 'C', long, default_value = "1.0")]
        c: f64,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Predict(args) => predict_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Info(args) => info_command(args),
        Commands::Quick(args) => quick_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    info!("Training SVM model...");
    info!("Data file: {:?}", args.data);

    let dataset = load_dataset(&args.data, args.format)?;
    info!(
        "Loaded {} samples with {} dimensions",
        dataset.len(),
        dataset.dim()
    );

    let cp = args.cp.unwrap_or(args.c);
    let cn = args.cn.unwrap_or(args.c);
    info!(
        "Parameters: Cp={}, Cn={}, regularization={:?}, epochs={}, accuracy={}",
        cp, cn, args.regularization, args.epochs, args.accuracy
    );

    let model = LinearSVM::new()
        .with_class_weights(cp, cn)
        .with_regularization(args.regularization.into())
        .with_epochs(args.epochs)
        .with_iterations(args.iterations)
        .with_accuracy(args.accuracy)
        .with_seed(args.seed)
        .with_shrinking(args.shrinking)
        .with_report(args.objective)
        .train(dataset.as_ref())?;

    let info = model.info();
    info!(
        "Training finished after {} epoch(s): {:?}",
        info.epochs, info.stop_reason
    );
    info!("Support vectors: {}", info.n_support_vectors);
    info!("Bias: {:.6}", info.bias);

    // Save model
    let serializable = SerializableModel::from_trained_model(&model);
    serializable.save_to_file(&args.output)?;
    info!("Model saved to: {:?}", args.output);

    // Quick evaluation on training data
    let accuracy = model.evaluate(dataset.as_ref());
    info!("Training accuracy: {:.2}%", accuracy * 100.0);

    Ok(())
}

fn predict_command(args: PredictArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable_model = SerializableModel::load_from_file(&args.model)?;
    let model = serializable_model.to_trained_model()?;

    info!("Loading prediction data from: {:?}", args.data);
    let dataset = load_dataset(&args.data, args.format)?;
    warn_on_width(serializable_model.weights.len(), dataset.dim());

    let predictions = model.predict_dataset(dataset.as_ref());

    let header = format!(
        "# Predictions for {} samples\n# Format: sample_index predicted_label{}",
        predictions.len(),
        if args.confidence { " confidence" } else { "" }
    );

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).map_err(SVMError::IoError)?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    writeln!(out, "{header}").map_err(SVMError::IoError)?;
    for (i, pred) in predictions.iter().enumerate() {
        let written = if args.confidence {
            writeln!(out, "{} {:.0} {:.6}", i, pred.label, pred.confidence())
        } else {
            writeln!(out, "{} {:.0}", i, pred.label)
        };
        written.map_err(SVMError::IoError)?;
    }
    out.flush().map_err(SVMError::IoError)?;

    if let Some(path) = &args.output {
        info!("Predictions saved to: {path:?}");
    }

    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable_model = SerializableModel::load_from_file(&args.model)?;
    let model = serializable_model.to_trained_model()?;

    info!("Loading test data from: {:?}", args.data);
    let dataset = load_dataset(&args.data, args.format)?;
    warn_on_width(serializable_model.weights.len(), dataset.dim());

    let metrics = model.evaluate_detailed(dataset.as_ref());

    // Show evaluation results
    println!("=== Model Evaluation ===");
    serializable_model.print_summary();

    println!("\nTest Results:");
    println!("  Samples:  {}", metrics.total());
    println!("  Accuracy: {:.2}%", metrics.accuracy() * 100.0);

    if args.detailed {
        println!("\nDetailed Metrics:");
        println!("  True Positives:  {}", metrics.true_positives);
        println!("  True Negatives:  {}", metrics.true_negatives);
        println!("  False Positives: {}", metrics.false_positives);
        println!("  False Negatives: {}", metrics.false_negatives);
        println!("  Precision:       {:.4}", metrics.precision());
        println!("  Recall:          {:.4}", metrics.recall());
        println!("  F1 Score:        {:.4}", metrics.f1_score());
        println!("  Specificity:     {:.4}", metrics.specificity());
    }

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let serializable_model = SerializableModel::load_from_file(&args.model)?;

    serializable_model.print_summary();

    println!("\nWeights:");
    let weights = &serializable_model.weights;
    let n_show = weights.len().min(10);
    for (i, w) in weights.iter().enumerate().take(n_show) {
        println!("  w{}: {w:.6}", i + 1);
    }
    if weights.len() > n_show {
        println!("  ... ({} more)", weights.len() - n_show);
    }

    Ok(())
}

fn quick_command(args: QuickArgs) -> Result<()> {
    match args.operation {
        QuickOperation::Eval { train, test, c } => {
            info!("Quick evaluation: train on {train:?}, test on {test:?}");

            let model = quick::train_libsvm_with_c(&train, c)?;
            let accuracy = model.evaluate_from_file(&test)?;

            println!("=== Quick Evaluation Results ===");
            println!("Training file: {train:?}");
            println!("Test file: {test:?}");
            println!("C parameter: {c}");
            println!("Test accuracy: {:.2}%", accuracy * 100.0);

            Ok(())
        }
        QuickOperation::Cv { data, ratio, c } => {
            info!("Hold-out validation on {data:?} with ratio {ratio}");

            let dataset = load_dataset(&data, DataFormat::Auto)?;
            let accuracy = quick::simple_validation(dataset.as_ref(), ratio, c)?;

            println!("=== Validation Results ===");
            println!("Data file: {data:?}");
            println!("Train/test ratio: {ratio:.1}/{:.1}", 1.0 - ratio);
            println!("C parameter: {c}");
            println!("Validation accuracy: {:.2}%", accuracy * 100.0);

            Ok(())
        }
    }
}

fn load_dataset(path: &Path, format: DataFormat) -> Result<Box<dyn Dataset>> {
    let format = match format {
        DataFormat::Auto => detect_format(path),
        explicit => explicit,
    };
    info!("Loading dataset as {format:?} format");

    Ok(match format {
        DataFormat::Csv => Box::new(CSVDataset::from_file(path)?),
        _ => Box::new(LibSVMDataset::from_file(path)?),
    })
}

fn warn_on_width(model_features: usize, data_features: usize) {
    if data_features > model_features {
        warn!(
            "Data has {data_features} features but the model only {model_features}; extra features are ignored"
        );
    }
}

fn detect_format(path: &Path) -> DataFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => DataFormat::Csv,
        Some("libsvm") | Some("svm") => DataFormat::Libsvm,
        Some(_) => {
            warn!("Unknown file extension, assuming LibSVM format");
            DataFormat::Libsvm
        }
        None => {
            warn!("No file extension, assuming LibSVM format");
            DataFormat::Libsvm
        }
    }
}
