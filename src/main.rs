use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use t2l::cli::{self, GenerateArgs};
use t2l::config::AppConfig;
use t2l::error::T2lResult;
use t2l::logging;
use t2l::types::Brand;

#[derive(Parser)]
#[command(name = "t2l")]
#[command(about = "T2L helper: chassis numbers + stock file → HS, G3, packaging and document lists")]
#[command(long_about = "T2L - transit document helper
Matches chassis numbers against a stock export and renders the T2L lists.

COMMANDS:
  generate  - Build C3/G3/packaging/document lists (+ Excel)
  mapping   - Manage destination code → name mappings
  hs        - Manage per-VIN HS code overrides (Toyota)
  theme     - Show or toggle the colour theme
  lang      - Show or toggle the label language

EXAMPLES:
  t2l generate --stock stock.csv --chassis vins.txt --swb SWB123 --xlsx
  t2l generate --brand toyota --chassis - --diz diz.txt < vins.txt
  t2l mapping add ITGOA GENOVA
  t2l hs add --vins vins.txt --codes codes.txt")]
#[command(version)]
struct Cli {
    /// Store file for mappings, HS codes and preferences
    #[arg(long, global = true, env = "T2L_STORE")]
    store: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, global = true, env = "T2L_CONFIG")]
    config: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Generate the T2L lists.

Each chassis number is looked up in the stock file (first row whose chassis
column contains it). DIZ values are paired with chassis numbers by position.

OUTPUT:
  C3        HS code
  G3        SWB - item - weight - VIN - model - destination
  Pack 1/2  SWB item / VIN DIZ
  Doc 1/2   SWB item / DIZ

A stock file is required for VW, optional for Toyota.")]
    /// Generate T2L lists from chassis numbers and a stock file
    Generate {
        /// Stock export (.csv or .xlsx)
        #[arg(short, long)]
        stock: Option<PathBuf>,

        /// Chassis numbers, one per line ('-' reads stdin)
        #[arg(short, long)]
        chassis: PathBuf,

        /// DIZ numbers, one per line
        #[arg(short, long)]
        diz: Option<PathBuf>,

        /// SWB shipment number
        #[arg(long, default_value = "")]
        swb: String,

        /// Brand variant: vw or toyota
        #[arg(short, long)]
        brand: Option<Brand>,

        /// Write the T2L workbook (default name T2L_Export_<SWB>.xlsx)
        #[arg(long, num_args = 0..=1, value_name = "PATH")]
        xlsx: Option<Option<PathBuf>>,

        /// Write the attached list workbook
        #[arg(long, value_name = "PATH")]
        attached_list: Option<PathBuf>,

        /// Write each list to <DIR>/<list>.txt
        #[arg(long, value_name = "DIR")]
        lists_dir: Option<PathBuf>,
    },

    /// Manage destination mappings
    Mapping {
        #[command(subcommand)]
        action: MappingAction,
    },

    /// Manage per-VIN HS code overrides
    Hs {
        #[command(subcommand)]
        action: HsAction,
    },

    /// Show or toggle the colour theme
    Theme {
        #[arg(value_enum, default_value = "show")]
        action: PrefAction,
    },

    /// Show or toggle the label language
    Lang {
        #[arg(value_enum, default_value = "show")]
        action: PrefAction,
    },
}

#[derive(Subcommand)]
enum MappingAction {
    /// List mappings with their positions
    List,
    /// Add a mapping (code and name are upper-cased)
    Add { code: String, name: String },
    /// Remove the mapping at a position shown by 'list'
    Remove { position: usize },
    /// Restore the default mappings
    Reset,
}

#[derive(Subcommand)]
enum HsAction {
    /// List saved HS codes
    List,
    /// Add VIN/code pairs from two files with one entry per line
    Add {
        #[arg(long)]
        vins: PathBuf,
        #[arg(long)]
        codes: PathBuf,
    },
    /// Remove the HS code of a VIN
    Remove { vin: String },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum PrefAction {
    Show,
    Toggle,
}

fn run(cli: Cli, config: &AppConfig) -> T2lResult<()> {
    match cli.command {
        Commands::Generate {
            stock,
            chassis,
            diz,
            swb,
            brand,
            xlsx,
            attached_list,
            lists_dir,
        } => cli::generate(
            config,
            GenerateArgs {
                stock,
                chassis,
                diz,
                swb,
                brand,
                xlsx,
                attached_list,
                lists_dir,
            },
        ),

        Commands::Mapping { action } => match action {
            MappingAction::List => cli::mapping_list(config),
            MappingAction::Add { code, name } => cli::mapping_add(config, code, name),
            MappingAction::Remove { position } => cli::mapping_remove(config, position),
            MappingAction::Reset => cli::mapping_reset(config),
        },

        Commands::Hs { action } => match action {
            HsAction::List => cli::hs_list(config),
            HsAction::Add { vins, codes } => cli::hs_add(config, vins, codes),
            HsAction::Remove { vin } => cli::hs_remove(config, vin),
        },

        Commands::Theme { action } => cli::theme(config, matches!(action, PrefAction::Toggle)),

        Commands::Lang { action } => cli::lang(config, matches!(action, PrefAction::Toggle)),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    };
    if let Some(ref store) = cli.store {
        config.store_path = store.clone();
    }

    cli::apply_theme(&config);

    if let Err(e) = run(cli, &config) {
        let labels = cli::labels(&config);
        eprintln!(
            "{} {}",
            "Error:".red().bold(),
            cli::error_message(&e, labels)
        );
        std::process::exit(1);
    }
}
