//! lovemap: headless front end for the love map.
//!
//! Usage:
//!   lovemap set-person 1 --name Ana --lat 48.8566 --lng 2.3522 [--image ana.jpg]
//!   lovemap add-memory --title "First Date" --date 2023-02-14 --lat 48.86 --lng 2.35
//!   lovemap delete-memory <id>
//!   lovemap list
//!   lovemap show
//!   lovemap export [--out love-map.geojson]
//!   lovemap animate [--frames 180]
//!
//! Global flags: --config <file.json>, --db <path>

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use lovemap_core::{
    config::LoveMapConfig,
    error::{LoveError, MapFailure},
    facts::{group_thousands, TravelMode},
    overlay::RecordingSurface,
    session::LoveMap,
    timeline::{display_coordinates, display_date},
    types::{GeoPoint, Location, MemoryDraft, Person},
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match flag_value(&args, "--config") {
        Some(path) => LoveMapConfig::load(path)?,
        None => LoveMapConfig::default(),
    };
    if let Some(db) = flag_value(&args, "--db") {
        config.db_path = db.to_string();
    }

    let Some(command) = positional(&args).first().cloned() else {
        print_usage();
        return Ok(());
    };

    let mut map = LoveMap::open(config, RecordingSurface::new())
        .context("cannot open the local store")?;
    map.on_map_failure(Box::new(|failure: &MapFailure| eprintln!("! {}", failure.banner())));

    match command.as_str() {
        "set-person" => set_person(&mut map, &args)?,
        "add-memory" => add_memory(&mut map, &args)?,
        "delete-memory" => {
            let Some(id) = positional(&args).get(1).cloned() else {
                bail!("delete-memory needs an id");
            };
            let removed = map.delete_memory(&id).map_err(banner)?;
            println!("Deleted \"{}\"", removed.title);
        }
        "list" => print_timeline(&map),
        "show" => {
            show(&mut map)?;
            print_timeline(&map);
        }
        "export" => {
            let out = flag_value(&args, "--out").unwrap_or("love-map.geojson");
            let scene = map.show_connection().map_err(banner)?;
            let json = serde_json::to_string_pretty(&scene.to_geojson())?;
            std::fs::write(out, json).with_context(|| format!("cannot write {out}"))?;
            println!("Map exported to {out}");
        }
        "animate" => {
            let frames = parse_arg(&args, "--frames", 180u64);
            map.show_connection().map_err(banner)?;
            let drawn = map.run_animation(frames);
            map.stop_animation();
            println!("Animated {drawn} frames");
        }
        other => {
            print_usage();
            bail!("unknown command: {other}");
        }
    }

    if let Some(message) = map.error_banner() {
        eprintln!("! {message}");
    }
    Ok(())
}

fn set_person(map: &mut LoveMap<RecordingSurface>, args: &[String]) -> Result<()> {
    let who: Person = positional(args)
        .get(1)
        .map(|s| s.parse::<Person>())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .context("set-person needs 1 or 2")?;

    let current = map.person(who).clone();
    let name = flag_value(args, "--name").map(str::to_string).unwrap_or(current.name.clone());
    let lat = coord_arg(args, "--lat")?.unwrap_or(current.lat);
    let lng = coord_arg(args, "--lng")?.unwrap_or(current.lng);

    let mut location = Location::new(name, GeoPoint::new(lat, lng));
    location.image = current.image;
    map.set_person(who, location).map_err(banner)?;

    if let Some(image) = flag_value(args, "--image") {
        map.set_person_image(who, Path::new(image))
            .map_err(banner)?;
    }
    println!("Saved {}", map.person(who).name);
    Ok(())
}

fn add_memory(map: &mut LoveMap<RecordingSurface>, args: &[String]) -> Result<()> {
    let mut draft = MemoryDraft::today();
    if let Some(date) = flag_value(args, "--date") {
        draft.date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("bad --date {date}, expected YYYY-MM-DD"))?;
    }
    draft.title = flag_value(args, "--title").unwrap_or_default().to_string();
    draft.description = flag_value(args, "--description").unwrap_or_default().to_string();
    draft.location = GeoPoint::new(
        coord_arg(args, "--lat")?.unwrap_or(0.0),
        coord_arg(args, "--lng")?.unwrap_or(0.0),
    );
    draft.image = flag_value(args, "--image").map(str::to_string);

    let id = map.add_memory(draft).map_err(banner)?;
    println!("{id}");
    Ok(())
}

fn show(map: &mut LoveMap<RecordingSurface>) -> Result<()> {
    let (p1, p2) = (
        map.person(Person::First).name.clone(),
        map.person(Person::Second).name.clone(),
    );
    let scene = map.show_connection().map_err(banner)?;
    let facts = &scene.facts;

    println!("=== DISTANCE ===");
    println!("  between {p1} and {p2}: {} km", facts.kilometers);
    println!("  heart path:      {} points", scene.path.len());
    println!();
    println!("=== DISTANCE FACTS ===");
    println!("  Earth Circumference: {}x around Earth", facts.times_around_earth);
    println!("  Walking Steps:       {} steps", group_thousands(facts.steps));
    for mode in TravelMode::ALL {
        if let Some(time) = facts.travel_time(mode) {
            println!("  {:<20} {time}", format!("{}:", mode.label()));
        }
    }
    println!();
    Ok(())
}

fn print_timeline(map: &LoveMap<RecordingSurface>) {
    println!("=== LOVE STORY TIMELINE ===");
    if map.memories().is_empty() {
        println!("  No memories added yet. Start creating your love story!");
        return;
    }
    for memory in map.memories() {
        println!("  {} | {}", display_date(memory), memory.title);
        if !memory.description.is_empty() {
            println!("      {}", memory.description);
        }
        println!("      @ {}   [{}]", display_coordinates(memory), memory.id);
    }
}

/// The banner text a page would show, with the underlying error for context.
fn banner(e: LoveError) -> anyhow::Error {
    log::debug!("{e:?}");
    anyhow::anyhow!("{} ({e})", e.user_message())
}

fn print_usage() {
    eprintln!("usage: lovemap [--config FILE] [--db PATH] <command>");
    eprintln!("  set-person <1|2> [--name N] [--lat X] [--lng Y] [--image FILE]");
    eprintln!("  add-memory --title T [--description D] [--date YYYY-MM-DD] [--lat X] [--lng Y] [--image URL]");
    eprintln!("  delete-memory <id>");
    eprintln!("  list | show | export [--out FILE] | animate [--frames N]");
}

/// Arguments that are neither flags nor flag values.
fn positional(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.clone());
        }
    }
    out
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

/// A coordinate flag: absent is `None`, present but malformed is an error.
fn coord_arg(args: &[String], flag: &str) -> Result<Option<f64>> {
    flag_value(args, flag)
        .map(|raw| {
            raw.parse::<f64>()
                .with_context(|| format!("bad {flag} {raw:?}, expected a decimal number of degrees"))
        })
        .transpose()
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("lovemap")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn coordinate_flags_parse_or_stay_absent() {
        let a = args(&["add-memory", "--lat", "48.85", "--lng", "-2.35"]);
        assert_eq!(coord_arg(&a, "--lat").unwrap(), Some(48.85));
        assert_eq!(coord_arg(&a, "--lng").unwrap(), Some(-2.35));
        assert_eq!(coord_arg(&args(&["list"]), "--lat").unwrap(), None);
    }

    #[test]
    fn malformed_coordinate_is_rejected_not_defaulted() {
        let a = args(&["add-memory", "--title", "Paris trip", "--lat", "48,85"]);
        let err = coord_arg(&a, "--lat").unwrap_err();
        assert!(err.to_string().contains("--lat"), "error names the flag: {err}");

        let a = args(&["set-person", "1", "--lat", "4O.5"]);
        assert!(coord_arg(&a, "--lat").is_err());
    }

    #[test]
    fn malformed_memory_coordinate_saves_nothing() {
        let mut map = LoveMap::build_test().unwrap().0;
        let a = args(&["add-memory", "--title", "Paris trip", "--lat", "48,85", "--lng", "2.35"]);
        assert!(add_memory(&mut map, &a).is_err());
        assert!(map.memories().is_empty(), "no memory lands at a default coordinate");
    }

    #[test]
    fn malformed_person_coordinate_keeps_the_saved_location() {
        let mut map = LoveMap::build_test().unwrap().0;
        map.set_person(Person::First, Location::new("Ana", GeoPoint::new(40.5, -3.7)))
            .unwrap();
        let a = args(&["set-person", "1", "--lat", "4O.5"]);
        assert!(set_person(&mut map, &a).is_err());
        assert_eq!(map.person(Person::First).point(), GeoPoint::new(40.5, -3.7));
    }

    #[test]
    fn frames_still_fall_back_to_the_default() {
        assert_eq!(parse_arg(&args(&["animate", "--frames", "x"]), "--frames", 180u64), 180);
        assert_eq!(parse_arg(&args(&["animate", "--frames", "12"]), "--frames", 180u64), 12);
    }
}
