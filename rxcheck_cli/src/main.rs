use clap::{Parser, Subcommand};
use rxcheck_core::engine::write_rows_csv;
use rxcheck_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rxcheck", version)]
#[command(about = "Drug interaction and overdose-risk reference", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table, json or csv (defaults to the configured format)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze interactions between two or more substances
    Interact {
        /// Substance identifiers (e.g. fentanyl xanax)
        #[arg(required = true, num_args = 1..)]
        substances: Vec<String>,
    },

    /// Assess overdose risk of one substance or a combination
    Overdose {
        /// Substance identifiers
        #[arg(required = true, num_args = 1..)]
        substances: Vec<String>,
    },

    /// Show the profile of one substance
    Info {
        substance: String,
    },

    /// List the substance catalogue
    List {
        /// Only list one class (opioid, stimulant, benzodiazepine, ...)
        #[arg(long)]
        class: Option<String>,
    },

    /// Search substance identifiers
    Search {
        term: String,
    },

    /// Show tabled overdose-risk percentages by category
    Risks {
        /// Only show one category (extremely-high, very-high, high, moderate, low, very-low)
        #[arg(long)]
        category: Option<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    rxcheck_core::logging::init_with_level(&config.logging.level);

    let format = match &cli.output {
        Some(name) => OutputFormat::parse(name)?,
        None => config.output.format,
    };
    tracing::debug!("Output format: {}", format);

    let analyzer = Analyzer::with_defaults(config.risk_table());
    analyzer.ensure_valid()?;

    match cli.command {
        Commands::Interact { substances } => cmd_interact(&analyzer, &substances, format),
        Commands::Overdose { substances } => cmd_overdose(&analyzer, &substances, format),
        Commands::Info { substance } => cmd_info(&analyzer, &substance, format),
        Commands::List { class } => cmd_list(&analyzer, class.as_deref(), format),
        Commands::Search { term } => cmd_search(&analyzer, &term, format),
        Commands::Risks { category } => cmd_risks(&analyzer, category.as_deref(), format),
    }
}

fn reject_csv(format: OutputFormat, command: &str) -> Result<()> {
    if format == OutputFormat::Csv {
        return Err(Error::Config(format!(
            "csv output is not available for '{}' (use table or json)",
            command
        )));
    }
    Ok(())
}

fn warn_unknown(unknown: &[String]) {
    for name in unknown {
        eprintln!("Warning: Substance '{}' not found.", name);
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_interact(analyzer: &Analyzer, substances: &[String], format: OutputFormat) -> Result<()> {
    reject_csv(format, "interact")?;

    // Warn before a possible "not enough substances" error
    warn_unknown(&analyzer.select_for_interaction(substances).unknown);
    let report = analyzer.analyze_interactions(substances)?;

    if format == OutputFormat::Json {
        return print_json(&report);
    }

    println!("\n=== INTERACTION ANALYSIS RESULTS ===");
    println!("Analyzing combination of: {}", report.substances.join(" + "));
    println!();

    for effect in &report.effects {
        println!("{}", effect.effect);
        println!("   Severity: {}", effect.severity);
        println!("   Probability: {:.0}%", effect.probability * 100.0);
        println!("   Description: {}", effect.description);
        if let Some(ref detail) = effect.detail {
            println!("   Mechanism: {:?}", detail.mechanism);
            println!(
                "   Onset: ~{}h, lasting ~{}h",
                detail.onset_hours, detail.duration_hours
            );
            if !detail.warning_signs_early.is_empty() {
                println!("   Early signs: {}", detail.warning_signs_early.join(", "));
            }
            if !detail.warning_signs_late.is_empty() {
                println!("   Late signs: {}", detail.warning_signs_late.join(", "));
            }
            if detail.requires_special_treatment {
                println!("   Treatment: {}", detail.treatment_notes);
            }
        }
        println!();
    }

    println!("=== RISK ASSESSMENT ===");
    for line in report.assessment.advice() {
        println!("   {}", line);
    }

    Ok(())
}

fn print_advisory(advisory: &Advisory) {
    println!("   {}", advisory.title);
    for line in &advisory.lines {
        println!("   - {}", line);
    }
}

fn cmd_overdose(analyzer: &Analyzer, substances: &[String], format: OutputFormat) -> Result<()> {
    reject_csv(format, "overdose")?;

    warn_unknown(&analyzer.select_for_overdose(substances).unknown);
    let report = analyzer.assess_overdose(substances)?;

    if format == OutputFormat::Json {
        return print_json(&report);
    }

    println!("\n=== OVERDOSE RISK ANALYSIS ===");

    match &report.assessment {
        OverdoseAssessment::Single {
            risk,
            recommendations,
        } => {
            println!("Substance: {}", risk.name);
            println!("Overdose Risk Percentage: {}%", risk.percentage);
            println!("Risk Level: {}", risk.description);
            println!();
            println!("=== SAFETY RECOMMENDATIONS ===");
            print_advisory(recommendations);
        }
        OverdoseAssessment::Combination {
            individual,
            breakdown,
            description,
            warnings,
        } => {
            println!("Analyzing combination of: {}", report.substances.join(" + "));
            println!();
            println!("Individual Risks:");
            for risk in individual {
                println!("  {}: {}% risk", risk.name, risk.percentage);
            }
            println!();
            println!("Combined Overdose Risk: {}%", breakdown.percentage);
            if breakdown.speedball {
                println!("  (includes stimulant + respiratory depressant multiplier)");
            }
            println!("Combined Risk Level: {}", description);
            println!();
            println!("=== COMBINATION WARNINGS ===");
            if warnings.is_empty() {
                println!("   No class-specific warnings.");
            }
            for warning in warnings {
                print_advisory(warning);
            }
        }
    }

    Ok(())
}

fn cmd_info(analyzer: &Analyzer, name: &str, format: OutputFormat) -> Result<()> {
    reject_csv(format, "info")?;

    let substance = analyzer
        .catalogue
        .get(name)
        .ok_or_else(|| Error::Other(format!("Substance '{}' not found in catalogue", name)))?;

    if format == OutputFormat::Json {
        return print_json(substance);
    }

    let pk = &substance.pharmacokinetics;
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };

    println!("\n=== {} ===", substance.id);
    println!("Class: {}", substance.class);
    println!("Half-life: {} hours", pk.half_life_hours);
    println!("Onset: {} hours", pk.onset_hours);
    println!("Peak: {} hours", pk.peak_hours);
    println!("Respiratory Depression: {}", yes_no(substance.respiratory_depression));
    println!("Stimulant Potency: {}/10", substance.stimulant_potency);
    println!("Depressant Potency: {}/10", substance.depressant_potency);
    println!("Masks Other Drugs: {}", yes_no(substance.masks_other_drugs));

    if !substance.effects.is_empty() {
        let effects: Vec<&str> = substance.effects.iter().map(|e| e.label()).collect();
        println!("Primary Effects: {}", effects.join(", "));
    }
    if !substance.metabolic_pathways.is_empty() {
        println!("Metabolism: {}", substance.metabolic_pathways.join(", "));
    }
    if !substance.receptor_affinities.is_empty() {
        let affinities: Vec<String> = substance
            .receptor_affinities
            .iter()
            .map(|(receptor, affinity)| format!("{} ({:.2})", receptor, affinity))
            .collect();
        println!("Receptors: {}", affinities.join(", "));
    }

    println!(
        "Lethal Dose Range: {} - {}",
        substance.lethal_dose.min, substance.lethal_dose.max
    );

    let percentage = analyzer.risks.percentage(&substance.id);
    println!(
        "Overdose Risk: {}% ({})",
        percentage,
        RiskCategory::from_percentage(percentage)
    );

    Ok(())
}

fn cmd_list(analyzer: &Analyzer, class: Option<&str>, format: OutputFormat) -> Result<()> {
    let class = class
        .map(|name| {
            SubstanceClass::parse(name)
                .ok_or_else(|| Error::Other(format!("Unknown substance class: {}", name)))
        })
        .transpose()?;

    let rows = analyzer.catalogue_rows(class);

    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => write_rows_csv(&rows, std::io::stdout().lock()),
        OutputFormat::Table => {
            println!("\n=== SUBSTANCE CATALOGUE ===");
            for class in SubstanceClass::ALL {
                let in_class: Vec<_> = rows.iter().filter(|r| r.class == class).collect();
                if in_class.is_empty() {
                    continue;
                }
                println!("\n## {}", class.as_str().to_uppercase());
                for row in in_class {
                    println!("- {:<18} {:>3}% risk", row.id, row.risk_percentage);
                }
            }
            println!("\nTotal substances: {}", rows.len());
            Ok(())
        }
    }
}

fn cmd_search(analyzer: &Analyzer, term: &str, format: OutputFormat) -> Result<()> {
    reject_csv(format, "search")?;

    let matches = analyzer.catalogue.search(term);

    if format == OutputFormat::Json {
        return print_json(&matches);
    }

    if matches.is_empty() {
        println!("No substances match '{}'.", term);
    }
    for name in matches {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_risks(analyzer: &Analyzer, category: Option<&str>, format: OutputFormat) -> Result<()> {
    reject_csv(format, "risks")?;

    let categories: Vec<RiskCategory> = match category {
        Some(name) => vec![RiskCategory::parse(name)
            .ok_or_else(|| Error::Other(format!("Unknown risk category: {}", name)))?],
        None => RiskCategory::ALL.to_vec(),
    };

    let grouped: Vec<(RiskCategory, Vec<SubstanceRisk>)> = categories
        .into_iter()
        .map(|category| {
            let entries = analyzer
                .risks
                .by_category(category)
                .into_iter()
                .map(|name| SubstanceRisk {
                    name: name.to_string(),
                    percentage: analyzer.risks.percentage(name),
                    category,
                    description: category.description(),
                })
                .collect();
            (category, entries)
        })
        .collect();

    if format == OutputFormat::Json {
        let flat: Vec<&SubstanceRisk> = grouped.iter().flat_map(|(_, entries)| entries).collect();
        return print_json(&flat);
    }

    for (category, entries) in &grouped {
        println!("\n## {}", category.description());
        for entry in entries {
            println!("- {:<20} {:>3}%", entry.name, entry.percentage);
        }
    }
    Ok(())
}
