//! Route command implementation.

use super::CliError;
use super::output::format_path;
use geodash::{CountryCode, NameResolver, Names, Region, World};
use std::collections::HashSet;

/// Execute the route command.
///
/// # Errors
///
/// Returns an error if a country cannot be resolved or the dataset fails to load.
pub(crate) fn execute(
    data: &super::DataArgs,
    from: &str,
    to: Option<&str>,
    exclude: &[String],
    at_distance: Option<usize>,
    region: Region,
) -> Result<(), CliError> {
    let world = data.world()?;
    let locale = data.locale()?;
    let names = match &locale {
        Some(locale) => Names::with_locale(world.catalog(), locale),
        None => world.names(),
    };

    let start = resolve(&names, from)?;

    if let Some(depth) = at_distance {
        let mut frontier = world.countries_at_distance(start, depth, region);
        frontier.sort_unstable();
        println!(
            "{} countries exactly {depth} crossings from {} (region: {region}):",
            frontier.len(),
            label(&names, start)
        );
        for code in frontier {
            println!("  {code}  {}", label(&names, code));
        }
        return Ok(());
    }

    let Some(to) = to else {
        return Err(CliError::new("A destination or --at-distance is required"));
    };
    let end = resolve(&names, to)?;
    let excluded: HashSet<CountryCode> = exclude
        .iter()
        .map(|text| resolve(&names, text))
        .collect::<Result<_, _>>()?;

    print_route(&world, &names, start, end, &excluded);
    Ok(())
}

fn print_route(
    world: &World,
    names: &Names<'_>,
    start: CountryCode,
    end: CountryCode,
    excluded: &HashSet<CountryCode>,
) {
    let exclude = (!excluded.is_empty()).then_some(excluded);
    match world.graph().shortest_path(start, end, exclude) {
        Some(path) => {
            println!("{}", format_path(&path, |c| label(names, c)));
            println!("  Crossings: {}", path.len().saturating_sub(1));
            println!("  Countries to name: {}", path.len().saturating_sub(2));
        }
        None => {
            println!(
                "No land route from {} to {}",
                label(names, start),
                label(names, end)
            );
        }
    }
}

fn resolve(names: &Names<'_>, text: &str) -> Result<CountryCode, CliError> {
    names
        .resolve_country(text)
        .ok_or_else(|| CliError::new(format!("Unknown country: {text:?}")))
}

fn label(names: &Names<'_>, code: CountryCode) -> String {
    names
        .country_name(code)
        .map_or_else(|| code.to_string(), str::to_string)
}
