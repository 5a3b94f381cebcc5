use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::PathBuf;

use rpgkit::collision::{Direction, Edge};
use rpgkit::data::ItemKind;
use rpgkit::map::MapDefinition;
use rpgkit::party::{FlagTable, PARAM_NAMES, PartyStatsSnapshot};
use rpgkit::shop::{RateProbe, ResetMode, ShopDefinition, ShopStock, rate_table};
use rpgkit::{PluginSession, Settings};

#[derive(Debug, Parser)]
#[command(
    name = "rpgkit",
    version,
    about = "Random shop stock and pixel collision map tools"
)]
struct Cli {
    /// Settings file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory holding items.toml, weapons.toml, armors.toml and shops/
    #[arg(long, default_value = "data")]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct PartyArgs {
    /// Party average level
    #[arg(long, default_value_t = 1.0)]
    avg_level: f64,

    /// Party average params: mhp,mmp,atk,def,mat,mdf,agi,luk
    #[arg(long, value_delimiter = ',')]
    params: Option<Vec<f64>>,
}

impl PartyArgs {
    fn snapshot(&self) -> PartyStatsSnapshot {
        let mut avg_params = [0.0; 8];
        if let Some(params) = &self.params {
            for (slot, value) in avg_params.iter_mut().zip(params) {
                *slot = *value;
            }
        }
        PartyStatsSnapshot::new(self.avg_level, avg_params)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Item,
    Weapon,
    Armor,
}

impl From<KindArg> for ItemKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Item => ItemKind::Item,
            KindArg::Weapon => ItemKind::Weapon,
            KindArg::Armor => ItemKind::Armor,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate stock for every shop (or one shop) and print it
    Shops {
        #[command(flatten)]
        party: PartyArgs,

        /// Switches that are on
        #[arg(long = "switch")]
        switches: Vec<u32>,

        /// Variable values as ID=VALUE
        #[arg(long = "variable", value_parser = parse_variable)]
        variables: Vec<(u32, i32)>,

        /// Only restock this shop
        #[arg(long)]
        shop: Option<u32>,

        /// Print stock as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print how an item's appearance rate moves around the party average
    Rates {
        #[command(flatten)]
        party: PartyArgs,

        #[arg(long, value_enum)]
        kind: KindArg,

        #[arg(long)]
        id: u32,

        /// Sample a param curve instead of the level curve (0 = Max HP ... 7 = Luck)
        #[arg(long)]
        param: Option<usize>,

        /// Step between rows
        #[arg(long, default_value_t = 1.0)]
        inc: f64,
    },
    /// Query passability and pixel region on a map's collision image
    Probe {
        /// Map definition JSON
        #[arg(long)]
        map: PathBuf,

        #[arg(long)]
        x: i32,

        #[arg(long)]
        y: i32,

        /// Also test a move of a width x height box in this direction (numpad code)
        #[arg(long)]
        direction: Option<u8>,

        #[arg(long, default_value_t = 32)]
        width: i32,

        #[arg(long, default_value_t = 32)]
        height: i32,

        /// Pixels moved per step
        #[arg(long, default_value_t = 1)]
        step: i32,
    },
}

fn parse_variable(s: &str) -> Result<(u32, i32), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got {s:?}"))?;
    let id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid variable id {id:?}"))?;
    let value = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid variable value {value:?}"))?;
    Ok((id, value))
}

fn parse_probe(param: Option<usize>) -> Result<RateProbe, String> {
    match param {
        None => Ok(RateProbe::Level),
        Some(index) if index < PARAM_NAMES.len() => Ok(RateProbe::Param(index)),
        Some(index) => Err(format!("param index {index} out of range 0..8")),
    }
}

/// Leading area of a `width` x `height` box at (x, y) after moving `step` pixels
fn leading_edge(
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    direction: Direction,
    step: i32,
) -> Edge {
    let (right, bottom) = (x + width - 1, y + height - 1);
    let (start, end) = match direction {
        Direction::Right => ((right + 1, y), (right + step, bottom)),
        Direction::Left => ((x - step, y), (x - 1, bottom)),
        Direction::Down => ((x, bottom + 1), (right, bottom + step)),
        Direction::Up => ((x, y - step), (right, y - 1)),
        diagonal => {
            let dx = if matches!(diagonal, Direction::UpLeft | Direction::DownLeft) {
                -step
            } else {
                step
            };
            let dy = if matches!(diagonal, Direction::UpLeft | Direction::UpRight) {
                -step
            } else {
                step
            };
            ((x + dx, y + dy), (right + dx, bottom + dy))
        }
    };
    Edge::new(
        (start.0 as f64, start.1 as f64),
        (end.0 as f64, end.1 as f64),
    )
}

fn print_stock(session: &PluginSession, shop: &ShopDefinition, stock: &ShopStock) {
    let (id, name, count) = (shop.id, &shop.display_name, stock.len());
    println!("[{id}] {name} ({count} items)");
    for entry in stock.iter() {
        let kind = entry.kind.as_str();
        let name = session
            .items()
            .get(entry.kind, entry.item_id)
            .map_or("?", |item| item.name.as_str());
        println!("  {kind:<6} {:>4}  {name}", entry.item_id);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load(&cli.config)?;
    let mut session = PluginSession::load(settings, &cli.data)?;

    match cli.command {
        Command::Shops {
            party,
            switches,
            variables,
            shop,
            json,
        } => {
            let mut flags = FlagTable::new();
            for id in switches {
                flags.set_switch(id, true);
            }
            for (id, value) in variables {
                flags.set_variable(id, value);
            }

            let mode = shop.map_or(ResetMode::All, ResetMode::Selected);
            let restocked = session.reset_shops(mode, &party.snapshot(), &flags);

            let shops = session.shops();
            let stocked: Vec<(&ShopDefinition, &ShopStock)> = shops
                .all()
                .filter(|shop| restocked.contains(&shop.id))
                .filter_map(|shop| Some((shop, shops.current_stock(shop.id)?)))
                .collect();

            if json {
                let by_id: BTreeMap<u32, &ShopStock> = stocked
                    .iter()
                    .map(|(shop, stock)| (shop.id, *stock))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&by_id)?);
            } else {
                for (shop, stock) in stocked {
                    print_stock(&session, shop, stock);
                }
            }
        }
        Command::Rates {
            party,
            kind,
            id,
            param,
            inc,
        } => {
            let kind = ItemKind::from(kind);
            let item = session
                .items()
                .get(kind, id)
                .ok_or_else(|| format!("no {} with id {}", kind.as_str(), id))?;
            let party = party.snapshot();
            let probe = parse_probe(param)?;

            match probe {
                RateProbe::Level => println!(
                    "{} target level {} (party avg {})",
                    item.name, item.rate.target_level, party.avg_level
                ),
                RateProbe::Param(index) => println!(
                    "{} target {} {:?} (party avg {})",
                    item.name,
                    PARAM_NAMES[index],
                    item.rate.target_param(index),
                    party.avg_param(index)
                ),
            }

            let settings = &session.settings().shop;
            for sample in rate_table(&item.rate, probe, inc, &party, settings) {
                println!("  {:>8} = {}", sample.value, sample.rate);
            }
        }
        Command::Probe {
            map,
            x,
            y,
            direction,
            width,
            height,
            step,
        } => {
            let map = MapDefinition::load_from_file(&map)?;
            if !session.on_map_load(&map) {
                let id = &map.id;
                println!("map {id} has no collision image; everything is passable");
            }

            let passable = session.is_passable(x, y);
            let region = session.region_at(x, y);
            println!("({x}, {y}) passable={passable} region={region}");

            if let Some(code) = direction {
                let direction = Direction::from_u8(code)
                    .ok_or_else(|| format!("invalid direction {code}"))?;
                let edge = leading_edge(x, y, width, height, direction, step);
                let passable = session.is_passable_area(&edge, direction);
                println!("move {direction:?} by {step}: passable={passable}");
            }
        }
    }

    Ok(())
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rpgkit=info".parse().expect("static directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse_variable("2=15"), Ok((2, 15)));
        assert_eq!(parse_variable("3 = -4"), Ok((3, -4)));
        assert!(parse_variable("3").is_err());
        assert!(parse_variable("x=1").is_err());
    }

    #[test]
    fn test_parse_probe() {
        assert_eq!(parse_probe(None), Ok(RateProbe::Level));
        assert_eq!(parse_probe(Some(7)), Ok(RateProbe::Param(7)));
        assert!(parse_probe(Some(8)).is_err());
    }

    #[test]
    fn test_leading_edge() {
        let edge = leading_edge(10, 20, 4, 8, Direction::Right, 2);
        assert_eq!(edge, Edge::new((14.0, 20.0), (15.0, 27.0)));

        let edge = leading_edge(10, 20, 4, 8, Direction::Up, 1);
        assert_eq!(edge, Edge::new((10.0, 19.0), (13.0, 19.0)));

        let edge = leading_edge(10, 20, 4, 8, Direction::DownLeft, 1);
        assert_eq!(edge, Edge::new((9.0, 21.0), (12.0, 28.0)));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
