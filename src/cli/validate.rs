//! Dataset validation command implementation.

use super::output::print_check;
use super::{CliError, DataArgs};
use geodash::{Continent, CountryCode, CountryGraph, NameResolver, Names, Tier, World};
use std::collections::{HashSet, VecDeque};

/// Execute the validate command.
///
/// Integrity rules are enforced by `World` construction; this command reports
/// what was loaded plus a few softer checks.
///
/// # Errors
///
/// Returns an error if the dataset or locale fails to load.
pub(crate) fn execute(data: &DataArgs) -> Result<(), CliError> {
    match &data.dir {
        Some(dir) => println!("Validating: {}", dir.display()),
        None => println!("Validating: embedded dataset"),
    }
    println!();

    let world = data.world()?;
    print_check("Catalog, borders and tiers load", true);

    let catalog = world.catalog();
    let graph = world.graph();

    let names_ok = catalog
        .iter()
        .all(|c| !c.name.trim().is_empty() && !c.capital.trim().is_empty());
    print_check("Every country has a name and capital", names_ok);

    let english = world.names();
    let resolvable = catalog
        .iter()
        .all(|c| english.resolve_country(&c.name) == Some(c.code));
    print_check("Every English name resolves to its code", resolvable);

    if let Some(locale) = data.locale()? {
        let localized = Names::with_locale(catalog, &locale);
        println!();
        println!("Locale: {}", localized.locale());
        let translated = catalog
            .iter()
            .filter(|c| localized.country_name(c.code) != Some(c.name.as_str()))
            .count();
        println!("  Translated country names: {translated}/{}", catalog.len());
    }

    let components = components(graph);
    let largest = components.iter().map(Vec::len).max().unwrap_or(0);

    println!();
    println!("Summary:");
    println!("  Countries:            {}", catalog.len());
    println!("  With land borders:    {}", graph.len());
    println!("  Islands:              {}", catalog.len().saturating_sub(graph.len()));
    println!("  Border components:    {}", components.len());
    println!("  Largest component:    {largest}");
    println!();
    print_continents(&world);

    println!();
    println!("Validation successful!");
    Ok(())
}

fn print_continents(world: &World) {
    let catalog = world.catalog();
    println!(
        "  {:<15} {:>6} {:>8} {:>8} {:>8}",
        "Continent", "Total", "Famous", "Moderate", "Obscure"
    );
    for continent in Continent::ALL {
        let of = |tier: Tier| {
            catalog
                .iter()
                .filter(|c| c.continent == continent && catalog.tier(c.code) == tier)
                .count()
        };
        let (famous, moderate, obscure) = (of(Tier::Famous), of(Tier::Moderate), of(Tier::Obscure));
        println!(
            "  {:<15} {:>6} {:>8} {:>8} {:>8}",
            continent.name(),
            famous + moderate + obscure,
            famous,
            moderate,
            obscure
        );
    }
}

/// Connected components of the border graph.
fn components(graph: &CountryGraph) -> Vec<Vec<CountryCode>> {
    let mut seen: HashSet<CountryCode> = HashSet::new();
    let mut result = Vec::new();

    for start in graph.connected() {
        if !seen.insert(start) {
            continue;
        }
        let mut component = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for &next in graph.neighbors(current) {
                if seen.insert(next) {
                    component.push(next);
                    queue.push_back(next);
                }
            }
        }
        result.push(component);
    }

    result
}
