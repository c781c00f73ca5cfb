use brew_core::{
    core_types::{Bitterness, Colour, Density, IngredientAddition, Percentage, Temperature, Time, Weight},
    physics::{strike_water_temperature, MashThermalMass},
    process::{BatchSparge, Boil, Cool, Ferment, Lauter, Mash, Package, Stand},
    water::{best_fit, Ion},
    Carbonation, EquipmentProfile, FluidVolume, InMemoryReferenceData, LogLevel, MapSettings,
    MashPhModel, ProcessStep, Recipe, ReferenceData, SettingKey, StepKind, WaterProfile,
    WaterSalt,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Brewing recipe engine demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "brew-headless")]
#[command(about = "Runs a sample all-grain recipe through the brewing engine", long_about = None)]
struct Args {
    /// Base malt in kilograms
    #[arg(short, long, default_value_t = 4.5)]
    grain: f64,

    /// Crystal malt in kilograms
    #[arg(long, default_value_t = 0.3)]
    crystal: f64,

    /// Strike water in litres
    #[arg(long, default_value_t = 15.0)]
    strike: f64,

    /// Target mash temperature in °C
    #[arg(short = 't', long, default_value_t = 66.0)]
    mash_temperature: f64,

    /// Batch sparge water in litres
    #[arg(long, default_value_t = 12.0)]
    sparge: f64,

    /// Boil length in minutes
    #[arg(short, long, default_value_t = 60.0)]
    boil: f64,

    /// Bittering hop (Magnum) at the start of the boil, grams
    #[arg(long, default_value_t = 20.0)]
    bittering: f64,

    /// Whirlpool hop (Cascade) in grams, 0 to skip the stand
    #[arg(long, default_value_t = 50.0)]
    whirlpool: f64,

    /// Style to check the packaged beer against
    #[arg(short, long, default_value = "American Pale Ale")]
    style: String,

    /// Mash pH model (ezwater, kolbach)
    #[arg(long, default_value = "ezwater")]
    ph_model: String,

    /// Load the recipe from a JSON file instead of building the sample
    #[arg(short, long)]
    recipe: Option<PathBuf>,

    /// Print the recipe as JSON and exit
    #[arg(long)]
    dump: bool,

    /// Only validate the recipe structure
    #[arg(long)]
    dry_run: bool,

    /// Solve salt additions toward a target profile "Ca,Mg,Na,SO4,Cl,HCO3" (ppm)
    #[arg(long)]
    water_target: Option<String>,

    /// Water the solver starts from
    #[arg(long, default_value = "Hard Tap")]
    water_source: String,
}

fn sample_recipe(args: &Args, equipment: &EquipmentProfile) -> Recipe {
    let grain_temperature = Temperature::new(20.0);
    let strike_volume = FluidVolume::from_litres(args.strike);
    let mass = MashThermalMass {
        grain: Weight::from_kilograms(args.grain + args.crystal),
        grain_temperature,
        tun_water_equivalent: equipment.mash_tun_water_equivalent(),
        tun_temperature: grain_temperature,
    };
    let strike_temperature =
        strike_water_temperature(Temperature::new(args.mash_temperature), strike_volume, &mass);
    println!(
        "Strike water: {:.1} L at {:.1}°C for a {:.1}°C mash",
        args.strike,
        strike_temperature.celsius(),
        args.mash_temperature
    );

    let mash_time = Time::from_minutes(60.0);
    let boil_time = Time::from_minutes(args.boil);
    let mut recipe = Recipe::new("Sample Pale Ale", &equipment.name)
        .with_step(
            ProcessStep::new(
                "Mash",
                StepKind::Mash(Mash::new("mash", mash_time, grain_temperature)),
            )
            .with_description("Single infusion")
            .with_addition(IngredientAddition::fermentable(
                "Pale Malt (2 Row)",
                Weight::from_kilograms(args.grain),
                mash_time,
            ))
            .with_addition(IngredientAddition::fermentable(
                "Crystal 60",
                Weight::from_kilograms(args.crystal),
                mash_time,
            ))
            .with_addition(IngredientAddition::water(
                "Hard Tap",
                strike_volume,
                strike_temperature,
                mash_time,
            ))
            .with_addition(IngredientAddition::misc(
                WaterSalt::CalciumSulfate.name(),
                Weight::new(5.0),
                mash_time,
            )),
        )
        .with_step(ProcessStep::new(
            "Lauter",
            StepKind::Lauter(Lauter::new("mash", "wort")),
        ))
        .with_step(
            ProcessStep::new(
                "Sparge",
                StepKind::BatchSparge(BatchSparge::new("mash", "wort")),
            )
            .with_addition(IngredientAddition::water(
                "Distilled",
                FluidVolume::from_litres(args.sparge),
                Temperature::new(80.0),
                Time::ZERO,
            )),
        )
        .with_step(
            ProcessStep::new(
                "Boil",
                StepKind::Boil(Boil::new("wort", "boiled", boil_time)),
            )
            .with_addition(IngredientAddition::hop(
                "Magnum",
                Weight::new(args.bittering),
                boil_time,
            )),
        );

    let chill_input = if args.whirlpool > 0.0 {
        recipe.add_step(
            ProcessStep::new(
                "Whirlpool",
                StepKind::Stand(Stand::new("boiled", "whirlpooled", Time::from_minutes(20.0))),
            )
            .with_addition(IngredientAddition::hop(
                "Cascade",
                Weight::new(args.whirlpool),
                Time::from_minutes(20.0),
            )),
        );
        "whirlpooled"
    } else {
        "boiled"
    };

    recipe
        .with_step(ProcessStep::new(
            "Chill",
            StepKind::Cool(Cool::new(chill_input, "cooled", Temperature::new(19.0))),
        ))
        .with_step(
            ProcessStep::new(
                "Primary",
                StepKind::Ferment(Ferment::new(
                    "cooled",
                    "beer",
                    Temperature::new(19.0),
                    Time::from_days(14.0),
                )),
            )
            .with_addition(IngredientAddition::yeast(
                "American Ale",
                Weight::new(11.5),
                Time::ZERO,
            )),
        )
        .with_step(ProcessStep::new(
            "Keg",
            StepKind::Package(
                Package::new("beer", "keg", FluidVolume::from_litres(0.5))
                    .with_forced_carbonation(Carbonation::from_volumes(2.4))
                    .with_style(&args.style),
            ),
        ))
}

fn load_recipe(path: &Path) -> Result<Recipe, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("cannot parse {}: {e}", path.display()))
}

fn parse_profile(text: &str) -> Result<WaterProfile, String> {
    let values: Vec<f64> = text
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid water target '{text}': {e}"))?;
    let [ca, mg, na, so4, cl, hco3] = values.as_slice() else {
        return Err(format!(
            "water target needs 6 values (Ca,Mg,Na,SO4,Cl,HCO3), got {}",
            values.len()
        ));
    };
    Ok(WaterProfile::from_ppm(*ca, *mg, *na, *so4, *cl, *hco3))
}

fn run_water_solver(
    reference: &InMemoryReferenceData,
    source: &str,
    target: &str,
) -> Result<(), String> {
    let start = reference
        .require_water(source)
        .map_err(|e| e.to_string())?
        .profile
        .clone();
    let target = parse_profile(target)?;

    println!("=== Water Treatment ===\n");
    println!("Source: {start}");
    println!("Target: {target}\n");

    let Some(fit) = best_fit(&start, &target, &WaterSalt::ALL) else {
        return Err("no feasible salt additions for this target".to_string());
    };

    println!("Best fit (combination {}, {:?}), MSE {:.2}", fit.index, fit.goal, fit.mse);
    println!("Addition           | mg/L   | g per 20 L");
    println!("-------------------|--------|-----------");
    let batch = FluidVolume::from_litres(20.0);
    for (salt, rate) in fit.additions.iter() {
        println!(
            "{:<18} | {:6.1} | {:9.2}",
            salt.name(),
            rate,
            fit.additions.weight_for(salt, batch).grams()
        );
    }
    println!("\nIon         | Source | Target | Treated");
    println!("------------|--------|--------|--------");
    for ion in Ion::ALL {
        println!(
            "{:<11} | {:6.1} | {:6.1} | {:7.1}",
            ion.to_string(),
            start.get(ion).ppm(),
            target.get(ion).ppm(),
            fit.profile.get(ion).ppm()
        );
    }
    Ok(())
}

fn print_results(recipe: &Recipe) {
    println!("\n=== Volumes ===\n");
    println!("Name         | Type  | Litres | Temp °C | SG     | SRM  | IBU   | ABV %");
    println!("-------------|-------|--------|---------|--------|------|-------|------");
    let cell = |v: Option<f64>, precision: usize| {
        v.map_or_else(|| "-".to_string(), |x| format!("{x:.precision$}"))
    };
    for volume in recipe.volumes().iter() {
        println!(
            "{:<12} | {:<5} | {:>6} | {:>7} | {:>6} | {:>4} | {:>5} | {:>5}",
            volume.name(),
            volume.volume_type().to_string(),
            cell(volume.volume().map(FluidVolume::litres), 1),
            cell(volume.temperature().map(Temperature::celsius), 1),
            cell(volume.gravity().map(Density::specific_gravity), 3),
            cell(volume.colour().map(Colour::srm), 1),
            cell(volume.bitterness().map(Bitterness::ibu), 1),
            cell(volume.abv().map(Percentage::percent), 2),
        );
    }

    println!("\n=== Log ===\n");
    for entry in recipe.log().entries() {
        if entry.level != LogLevel::Message {
            println!("{entry}");
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let reference = InMemoryReferenceData::standard();

    if let Some(target) = &args.water_target {
        return match run_water_solver(&reference, &args.water_source, target) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    let settings = match args.ph_model.parse::<MashPhModel>() {
        Ok(model) => MapSettings::new().with(SettingKey::MashPhModel, format!("{model:?}")),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    println!("=== Brewing Engine Demo ===\n");
    let mut recipe = match &args.recipe {
        Some(path) => match load_recipe(path) {
            Ok(recipe) => recipe,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => sample_recipe(&args, &EquipmentProfile::homebrew_20l()),
    };

    if args.dump {
        return match serde_json::to_string_pretty(&recipe) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("cannot serialise recipe: {e}");
                ExitCode::FAILURE
            }
        };
    }

    if args.dry_run {
        return match recipe.dry_run(&reference, &settings) {
            Ok(()) => {
                println!("'{}' is structurally valid:", recipe.name);
                for step in recipe.steps() {
                    println!(
                        "  {:<10} {:<14} {:?} -> {:?}",
                        step.name,
                        step.kind.label(),
                        step.input_volumes(),
                        step.output_volumes()
                    );
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("'{}' is invalid: {e}", recipe.name);
                ExitCode::FAILURE
            }
        };
    }

    println!("Running '{}' on {}", recipe.name, recipe.equipment);
    recipe.run(&reference, &settings);
    print_results(&recipe);

    let errors = recipe.log().errors().count();
    println!(
        "\n=== Run Complete: {} warning(s), {} error(s) ===",
        recipe.log().warnings().count(),
        errors
    );
    if errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
