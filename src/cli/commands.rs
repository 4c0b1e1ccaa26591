use crate::config::AppConfig;
use crate::error::{T2lError, T2lResult};
use crate::excel::{default_file_name, AttachedListExporter, T2lExporter};
use crate::pipeline::{generate as run_pipeline, GenerateRequest, GenerateSettings};
use crate::prefs::{Labels, Preferences, Theme};
use crate::render::{ListKind, T2lReport};
use crate::stock::StockTable;
use crate::storage::JsonFileStore;
use crate::store::{HsCodeStore, MappingStore};
use crate::types::Brand;
use colored::Colorize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// Inputs of the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Stock file (.csv or .xlsx)
    pub stock: Option<PathBuf>,
    /// File with one chassis number per line, `-` for stdin
    pub chassis: PathBuf,
    /// File with one DIZ per line
    pub diz: Option<PathBuf>,
    pub swb: String,
    /// Overrides the configured brand
    pub brand: Option<Brand>,
    /// `Some(None)` writes to the default file name
    pub xlsx: Option<Option<PathBuf>>,
    pub attached_list: Option<PathBuf>,
    pub lists_dir: Option<PathBuf>,
}

fn store_backend(config: &AppConfig) -> JsonFileStore {
    JsonFileStore::new(&config.store_path)
}

/// Labels of the stored language; English if the store cannot be read
pub fn labels(config: &AppConfig) -> &'static Labels {
    Preferences::new(store_backend(config))
        .language()
        .unwrap_or_default()
        .labels()
}

/// Light theme forces plain output; dark leaves colour detection to `colored`
pub fn apply_theme(config: &AppConfig) {
    let theme = Preferences::new(store_backend(config))
        .theme()
        .unwrap_or_default();
    set_color_mode(theme);
}

fn set_color_mode(theme: Theme) {
    if theme.colored_output() {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }
}

/// Text shown to the operator for a failed command
pub fn error_message(error: &T2lError, labels: &Labels) -> String {
    match error {
        T2lError::NoChassis => labels.no_chassis.to_string(),
        T2lError::NoStock => labels.no_stock.to_string(),
        other => other.to_string(),
    }
}

fn read_input(path: &Path) -> T2lResult<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(fs::read_to_string(path)?)
}

//==============================================================================
// generate
//==============================================================================

/// Execute the generate command
pub fn generate(config: &AppConfig, args: GenerateArgs) -> T2lResult<()> {
    let brand = args.brand.unwrap_or(config.brand);
    let labels = labels(config);

    println!("{}", format!("🚢 T2L - {}", brand).bold().green());
    if let Some(ref stock) = args.stock {
        println!("   Stock: {}", stock.display());
    }
    println!();

    let stock = args.stock.as_deref().map(StockTable::load).transpose()?;
    let request = GenerateRequest {
        chassis_text: read_input(&args.chassis)?,
        diz_text: match args.diz {
            Some(ref path) => read_input(path)?,
            None => String::new(),
        },
        swb: args.swb.clone(),
        brand,
    };

    let mappings = MappingStore::load(store_backend(config))?;
    let hs_codes = HsCodeStore::load(store_backend(config))?;
    let settings = GenerateSettings {
        mappings: mappings.entries(),
        hs_overrides: hs_codes.codes(),
        weight: &config.weight,
        default_hs_code: &config.default_hs_code,
    };

    let output = run_pipeline(&request, stock.as_ref(), &settings)?;

    println!("{}", format!("✅ {}", labels.processed(output.report.len())).bold().green());
    println!();
    print_report(&output.report);

    if let Some(ref dir) = args.lists_dir {
        write_lists(&output.report, dir)?;
        println!("📝 Lists written to {}", dir.display().to_string().cyan());
    }

    if let Some(ref target) = args.xlsx {
        let path = target
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_file_name(&output.report.swb)));
        T2lExporter::new(&output.report).export(&path)?;
        info!(path = %path.display(), "T2L workbook written");
        println!("📊 Excel: {}", path.display().to_string().cyan());
    }

    if let Some(ref path) = args.attached_list {
        AttachedListExporter::new(
            &output.records,
            mappings.entries(),
            &output.report.swb,
            brand,
        )
        .with_chunk_size(config.chunk_size)
        .export(path)?;
        info!(path = %path.display(), "attached list written");
        println!("📊 Attached list: {}", path.display().to_string().cyan());
    }

    Ok(())
}

fn print_report(report: &T2lReport) {
    for kind in ListKind::ALL {
        println!("{}", kind.title().bold().cyan());
        for line in report.lines(kind) {
            println!("{}", line);
        }
        println!();
    }
}

/// One text file per list, named after [`ListKind::name`]
pub fn write_lists(report: &T2lReport, dir: &Path) -> T2lResult<()> {
    fs::create_dir_all(dir)?;
    for kind in ListKind::ALL {
        let mut text = report.list_text(kind);
        text.push('\n');
        fs::write(dir.join(format!("{}.txt", kind.name())), text)?;
    }
    Ok(())
}

//==============================================================================
// mapping
//==============================================================================

pub fn mapping_list(config: &AppConfig) -> T2lResult<()> {
    let store = MappingStore::load(store_backend(config))?;
    let labels = labels(config);
    println!("{}", format!("⚙️  {}", labels.settings).bold().green());
    for (idx, entry) in store.entries().iter().enumerate() {
        println!(
            "   {:>3}. {} = {}",
            idx + 1,
            entry.code.bold(),
            entry.name
        );
    }
    Ok(())
}

pub fn mapping_add(config: &AppConfig, code: String, name: String) -> T2lResult<()> {
    let mut store = MappingStore::load(store_backend(config))?;
    if !store.add(&code, &name)? {
        return Err(T2lError::Validation(
            "Both code and name are required".to_string(),
        ));
    }
    if let Some(entry) = store.entries().last() {
        println!("{} {} = {}", "✅".green(), entry.code.bold(), entry.name);
    }
    Ok(())
}

/// Remove by 1-based position as printed by `mapping list`
pub fn mapping_remove(config: &AppConfig, position: usize) -> T2lResult<()> {
    let mut store = MappingStore::load(store_backend(config))?;
    let index = position.checked_sub(1).ok_or_else(|| {
        T2lError::Validation("Positions start at 1".to_string())
    })?;
    let removed = store.remove(index)?;
    println!("{} {} = {}", "🗑️ ".red(), removed.code.bold(), removed.name);
    Ok(())
}

pub fn mapping_reset(config: &AppConfig) -> T2lResult<()> {
    let mut store = MappingStore::load(store_backend(config))?;
    store.reset()?;
    println!("{} {} mappings", "✅".green(), store.entries().len());
    Ok(())
}

//==============================================================================
// hs
//==============================================================================

pub fn hs_list(config: &AppConfig) -> T2lResult<()> {
    let store = HsCodeStore::load(store_backend(config))?;
    let labels = labels(config);
    println!("{}", format!("🏷️  {}", labels.hs_codes).bold().green());
    if store.codes().is_empty() {
        println!("   {}", labels.no_hs_codes.dimmed());
        return Ok(());
    }
    for (vin, code) in store.codes() {
        println!("   {}: {}", vin, code.bold());
    }
    Ok(())
}

pub fn hs_add(config: &AppConfig, vins: PathBuf, codes: PathBuf) -> T2lResult<()> {
    let vins_text = read_input(&vins)?;
    let codes_text = read_input(&codes)?;
    let mut store = HsCodeStore::load(store_backend(config))?;
    let added = store.add_bulk(&vins_text, &codes_text)?;
    println!("{} {} HS codes saved", "✅".green(), added);
    Ok(())
}

pub fn hs_remove(config: &AppConfig, vin: String) -> T2lResult<()> {
    let mut store = HsCodeStore::load(store_backend(config))?;
    if store.remove(vin.trim())? {
        println!("{} {}", "🗑️ ".red(), vin.trim());
    } else {
        println!("{}", format!("⚠️  No HS code saved for {}", vin.trim()).yellow());
    }
    Ok(())
}

//==============================================================================
// theme / lang
//==============================================================================

pub fn theme(config: &AppConfig, toggle: bool) -> T2lResult<()> {
    let mut prefs = Preferences::new(store_backend(config));
    let theme = if toggle {
        let next = prefs.toggle_theme()?;
        set_color_mode(next);
        next
    } else {
        prefs.theme()?
    };
    let labels = prefs.language()?.labels();
    println!("{}: {}", labels.theme, theme.to_string().bold());
    Ok(())
}

pub fn lang(config: &AppConfig, toggle: bool) -> T2lResult<()> {
    let mut prefs = Preferences::new(store_backend(config));
    let language = if toggle {
        prefs.toggle_language()?
    } else {
        prefs.language()?
    };
    let labels = language.labels();
    println!(
        "{}: {} ({})",
        labels.language,
        labels.language_name.bold(),
        language
    );
    Ok(())
}
