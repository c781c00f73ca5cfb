//! End-to-end brew day: mash to keg through the recipe runner
//!
//! Run tests with: cargo test --test `brew_day`

use approx::assert_relative_eq;
use brew_core::{
    core_types::{Density, FluidVolume, IngredientAddition, Metric, Temperature, Time, Weight},
    process::{BatchSparge, Boil, Cool, Ferment, Lauter, Mash, Package},
    Carbonation, InMemoryReferenceData, MapSettings, ProcessStep, Recipe, StepKind, Volume,
    VolumeType,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const EXPECTED_ORDER: [&str; 7] = [
    "Mash", "Lauter", "Sparge", "Boil", "Chill", "Primary", "Keg",
];

fn pale_ale_steps() -> Vec<ProcessStep> {
    vec![
        ProcessStep::new(
            "Keg",
            StepKind::Package(
                Package::new("beer", "keg", FluidVolume::from_litres(0.5))
                    .with_forced_carbonation(Carbonation::from_volumes(2.4))
                    .with_style("American Pale Ale"),
            ),
        ),
        ProcessStep::new(
            "Primary",
            StepKind::Ferment(Ferment::new(
                "cooled",
                "beer",
                Temperature::new(19.0),
                Time::from_days(14.0),
            )),
        )
        .with_addition(IngredientAddition::yeast("American Ale", Weight::new(11.5), Time::ZERO)),
        ProcessStep::new(
            "Chill",
            StepKind::Cool(Cool::new("boiled", "cooled", Temperature::new(19.0))),
        ),
        ProcessStep::new(
            "Boil",
            StepKind::Boil(Boil::new("wort", "boiled", Time::from_minutes(60.0))),
        )
        .with_addition(IngredientAddition::hop("Magnum", Weight::new(20.0), Time::from_minutes(60.0)))
        .with_addition(IngredientAddition::hop("Cascade", Weight::new(30.0), Time::from_minutes(10.0))),
        ProcessStep::new("Sparge", StepKind::BatchSparge(BatchSparge::new("mash", "wort")))
            .with_addition(IngredientAddition::water(
                "Distilled",
                FluidVolume::from_litres(12.0),
                Temperature::new(80.0),
                Time::ZERO,
            )),
        ProcessStep::new("Lauter", StepKind::Lauter(Lauter::new("mash", "wort"))),
        ProcessStep::new(
            "Mash",
            StepKind::Mash(Mash::new("mash", Time::from_minutes(60.0), Temperature::new(20.0))),
        )
        .with_addition(IngredientAddition::fermentable(
            "Pale Malt (2 Row)",
            Weight::from_kilograms(4.5),
            Time::from_minutes(60.0),
        ))
        .with_addition(IngredientAddition::fermentable(
            "Crystal 60",
            Weight::from_kilograms(0.3),
            Time::from_minutes(60.0),
        ))
        .with_addition(IngredientAddition::water(
            "Distilled",
            FluidVolume::from_litres(15.0),
            Temperature::new(74.0),
            Time::from_minutes(60.0),
        )),
    ]
}

fn pale_ale() -> Recipe {
    pale_ale_steps()
        .into_iter()
        .fold(Recipe::new("Pale Ale", "Homebrew 20L"), Recipe::with_step)
}

fn step_names(recipe: &Recipe) -> Vec<&str> {
    recipe.steps().iter().map(|s| s.name.as_str()).collect()
}

#[test]
fn test_full_brew_day() {
    let mut recipe = pale_ale();
    recipe.run(&InMemoryReferenceData::standard(), &MapSettings::new());

    let errors: Vec<_> = recipe.log().errors().collect();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(step_names(&recipe), EXPECTED_ORDER);

    let volumes = recipe.volumes();
    for name in ["mash", "wort", "boiled", "cooled", "beer", "keg"] {
        assert!(volumes.contains(name), "missing volume {name}");
    }

    let wort = volumes.get("wort").unwrap();
    let boiled = volumes.get("boiled").unwrap();
    assert_eq!(wort.volume_type(), VolumeType::Wort);
    assert!(boiled.volume().unwrap().litres() < wort.volume().unwrap().litres());
    assert!(boiled.gravity().unwrap().points() > wort.gravity().unwrap().points());
    assert!(boiled.bitterness().unwrap().ibu() > 0.0);

    let keg = volumes.get("keg").unwrap();
    assert_eq!(keg.volume_type(), VolumeType::Beer);
    let og = keg.original_gravity().unwrap();
    let fg = keg.gravity().unwrap();
    assert!(og.points() > fg.points());
    assert!(fg.points() > Density::WATER.points());
    let abv = keg.abv().unwrap().fraction();
    assert!(abv > 0.02 && abv < 0.12, "abv {abv}");
    assert_relative_eq!(keg.carbonation().unwrap().volumes(), 2.4, epsilon = 1e-9);
    assert!(keg.colour().unwrap().srm() > 0.0);
}

#[test]
fn test_step_order_does_not_depend_on_declaration_order() {
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut steps = pale_ale_steps();
        steps.shuffle(&mut rng);
        let mut recipe = steps
            .into_iter()
            .fold(Recipe::new("Shuffled", "Homebrew 20L"), Recipe::with_step);
        recipe.sort_steps().unwrap();
        assert_eq!(step_names(&recipe), EXPECTED_ORDER, "seed {seed}");
    }
}

#[test]
fn test_runs_are_repeatable() {
    let reference = InMemoryReferenceData::standard();
    let settings = MapSettings::new();
    let mut recipe = pale_ale();
    recipe.run(&reference, &settings);
    let first = recipe.volumes().get("keg").unwrap().clone();
    let first_log = recipe.log().entries().len();

    recipe.run(&reference, &settings);
    assert_eq!(recipe.volumes().get("keg").unwrap(), &first);
    assert_eq!(recipe.log().entries().len(), first_log);
}

#[test]
fn test_dry_run_leaves_typed_placeholders() {
    let mut recipe = pale_ale();
    recipe
        .dry_run(&InMemoryReferenceData::standard(), &MapSettings::new())
        .unwrap();

    let keg = recipe.volumes().get("keg").unwrap();
    assert_eq!(keg.volume_type(), VolumeType::Beer);
    assert!(keg.metrics().next().is_none());
    assert_eq!(recipe.volumes().get("mash").unwrap().volume_type(), VolumeType::Mash);
}

#[test]
fn test_missing_yeast_fails_only_downstream() {
    let mut steps = pale_ale_steps();
    let primary = steps.iter_mut().find(|s| s.name == "Primary").unwrap();
    primary.additions.clear();
    let mut recipe = steps
        .into_iter()
        .fold(Recipe::new("No Yeast", "Homebrew 20L"), Recipe::with_step);
    recipe.run(&InMemoryReferenceData::standard(), &MapSettings::new());

    // Primary fails on its additions, Keg then fails on the missing beer
    let failed: Vec<_> = recipe
        .log()
        .errors()
        .filter_map(|e| e.step.as_deref())
        .collect();
    assert_eq!(failed, vec!["Primary", "Keg"]);
    assert!(recipe.volumes().contains("cooled"));
    assert!(!recipe.volumes().contains("beer"));
}

#[test]
fn test_seeded_wort_can_skip_the_mash() {
    let mut wort = Volume::new("wort", VolumeType::Wort);
    wort.set(Metric::Volume, FluidVolume::from_litres(20.0));
    wort.set(Metric::Gravity, Density::from_gravity_units(45.0));
    wort.set(Metric::Temperature, Temperature::new(70.0));

    let mut recipe = Recipe::new("Extract Batch", "Homebrew 20L")
        .with_initial_volume(wort)
        .with_step(ProcessStep::new(
            "Boil",
            StepKind::Boil(Boil::new("wort", "boiled", Time::from_minutes(60.0))),
        ));
    recipe.run(&InMemoryReferenceData::standard(), &MapSettings::new());

    let boiled = recipe.volumes().get("boiled").unwrap();
    assert_relative_eq!(boiled.volume().unwrap().litres(), 18.0, epsilon = 1e-9);
    assert_relative_eq!(boiled.gravity().unwrap().gravity_units(), 50.0, epsilon = 1e-9);
}
