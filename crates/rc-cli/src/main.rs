//! ReelCharm headless shell
//!
//! Plays the part of the UI and reel layer: requests spins, reports reel stops
//! in random order, advances the session clock and prints results.
//!
//! Usage:
//!   reelcharm play --spins 20 --bet 10     - Play a session
//!   reelcharm play --sandbox --charm '{"kind":"global_multiplier","delta":1}'
//!   reelcharm scores                       - Show the high-score table
//!   reelcharm reset                        - Delete saved state and scores
//!   reelcharm config                       - Print the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use crossbeam_channel::Receiver;
use rand::prelude::*;

use rc_slot::{EconomyContext, Modifier, SlotConfig, SpinResult};
use rc_stage::{GamePhase, StageEvent};
use rc_state::{
    FileStore, GAME_STATE_KEY, GameNotification, HIGH_SCORES_KEY, KeyValueStore, MemoryStore,
    SpinMachine,
};

#[derive(Parser)]
#[command(name = "reelcharm", about = "ReelCharm slot machine", version)]
struct Cli {
    /// Slot configuration file (.json, .yaml or .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Save directory (defaults to the platform data directory)
    #[arg(long, global = true)]
    save_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a session
    Play {
        /// Number of spins to attempt
        #[arg(short, long, default_value_t = 10)]
        spins: u32,
        /// Coins per spin (defaults to the configured bet)
        #[arg(short, long)]
        bet: Option<u64>,
        /// Seed for reproducible boards and reel order
        #[arg(long)]
        seed: Option<u64>,
        /// Start a sandbox session with a large balance
        #[arg(long)]
        sandbox: bool,
        /// Start a new session instead of resuming the saved one
        #[arg(long)]
        new: bool,
        /// Charm to apply before spinning, as JSON (repeatable)
        #[arg(long = "charm")]
        charms: Vec<String>,
        /// Record the session's largest win under this name
        #[arg(long)]
        name: Option<String>,
        /// Do not read or write the save directory
        #[arg(long)]
        ephemeral: bool,
        /// Print every stage event
        #[arg(long)]
        trace: bool,
    },
    /// Show the high-score table
    Scores,
    /// Delete saved state and scores
    Reset,
    /// Print the effective configuration as JSON
    Config,
}

struct PlayOptions {
    spins: u32,
    bet: u64,
    seed: Option<u64>,
    sandbox: bool,
    new: bool,
    charms: Vec<Modifier>,
    name: Option<String>,
    trace: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SlotConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SlotConfig::default(),
    };
    let store = match &cli.save_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::open_default(),
    };

    match cli.command {
        Commands::Play {
            spins,
            bet,
            seed,
            sandbox,
            new,
            charms,
            name,
            ephemeral,
            trace,
        } => {
            let options = PlayOptions {
                spins,
                bet: bet.unwrap_or(config.default_bet),
                seed,
                sandbox,
                new,
                charms: parse_charms(&charms)?,
                name,
                trace,
            };
            if ephemeral {
                play(SpinMachine::new(config, MemoryStore::new())?, options)
            } else {
                log::info!("Save directory: {}", store.dir().display());
                play(SpinMachine::restore(config, store)?, options)
            }
        }
        Commands::Scores => show_scores(config, store),
        Commands::Reset => reset(store),
        Commands::Config => {
            println!("{}", config.to_json()?);
            Ok(())
        }
    }
}

fn parse_charms(raw: &[String]) -> Result<Vec<Modifier>> {
    raw.iter()
        .map(|json| {
            serde_json::from_str::<Modifier>(json).with_context(|| format!("invalid charm: {json}"))
        })
        .collect()
}

fn play<S: KeyValueStore>(mut machine: SpinMachine<S>, options: PlayOptions) -> Result<()> {
    let events = machine.subscribe();
    let mut rng = match options.seed {
        Some(seed) => {
            machine.seed(seed);
            StdRng::seed_from_u64(seed.wrapping_add(1))
        }
        None => StdRng::from_os_rng(),
    };

    let mut economy = EconomyContext::standard();

    if options.sandbox {
        machine.sandbox();
    } else if options.new || !machine.phase().is_active() {
        machine.new_game();
    }
    println!(
        "Session: {} coins, multiplier x{}",
        machine.stats().coins,
        machine.current_multiplier()
    );

    for charm in &options.charms {
        let outcome = machine
            .apply_modifier(&mut economy, charm)
            .with_context(|| format!("applying charm \"{charm}\""))?;
        println!("Charm: {charm} ({outcome:?})");
    }

    // A resumed session may still be celebrating
    machine.advance(machine.config().celebration_delay_ms);

    for spin in 1..=options.spins {
        if machine.is_out_of_coins() {
            machine.trigger_game_over();
            println!("Out of coins: game over");
            break;
        }

        let Some(planned) = machine.start_spin(&economy, options.bet)? else {
            println!(
                "Spin refused: {} coins, bet {}",
                machine.stats().coins,
                options.bet
            );
            break;
        };

        let mut order: Vec<usize> = (0..planned.len()).collect();
        order.shuffle(&mut rng);

        let mut resolved = None;
        for reel in order {
            machine.advance(120.0);
            if let Some(result) = machine.reel_stopped(&economy, reel, planned[reel].clone())? {
                resolved = Some(result);
            }
        }
        let Some(result) = resolved else {
            bail!("spin {spin} did not resolve after every reel reported");
        };

        print_spin(spin, &result, machine.stats().coins);
        if options.trace {
            print_stages(&events);
        } else {
            events.try_iter().for_each(drop);
        }

        if machine.phase() == GamePhase::Celebrating {
            machine.advance(machine.config().celebration_delay_ms);
        }
    }

    let stats = machine.stats();
    println!();
    println!(
        "Spins: {}  Wins: {}  Hit rate: {:.1}%  Largest win: {}  Coins: {}",
        stats.total_spins,
        stats.total_wins,
        stats.hit_rate(),
        stats.largest_win,
        stats.coins
    );

    if let Some(name) = &options.name {
        match machine.record_high_score(name) {
            Some(rank) => println!("High score #{} for {name}", rank + 1),
            None => println!("{} did not make the high-score table", stats.largest_win),
        }
    }

    machine.quit();
    Ok(())
}

fn print_spin(spin: u32, result: &SpinResult, balance: u64) {
    println!();
    println!("Spin {spin}");
    let board = &result.board;
    for row in 0..board.rows() {
        let line: Vec<String> = (0..board.columns())
            .filter_map(|col| board.get(row, col))
            .map(|cell| {
                let mark = if cell.is_winning { '*' } else { ' ' };
                format!("{:<8}{mark}", cell.glyph.display_name())
            })
            .collect();
        println!("  {}", line.join(" "));
    }

    for win in &result.wins {
        println!(
            "  {} x{} -> {}",
            win.combination_type, win.multiplier, win.total_value
        );
    }
    if result.is_jackpot {
        println!("  JACKPOT!");
    }
    println!("  Payout: {}  Balance: {balance}", result.total_payout);
}

fn print_stages(events: &Receiver<GameNotification>) {
    for notification in events.try_iter() {
        if let GameNotification::Stage(event) = notification {
            print_stage(&event);
        }
    }
}

fn print_stage(event: &StageEvent) {
    println!(
        "  [{:>8.1} ms] {:<20} {}",
        event.timestamp_ms,
        event.type_name(),
        event.tags.join(",")
    );
}

fn show_scores(config: SlotConfig, store: FileStore) -> Result<()> {
    let machine = SpinMachine::restore(config, store)?;
    let scores = machine.show_high_scores();
    if scores.is_empty() {
        println!("No high scores yet");
        return Ok(());
    }
    for (i, entry) in scores.iter().enumerate() {
        println!(
            "{:>2}. {:<16} {:>10}  {}",
            i + 1,
            entry.name,
            entry.score,
            entry.date.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn reset(mut store: FileStore) -> Result<()> {
    for key in [GAME_STATE_KEY, HIGH_SCORES_KEY] {
        store
            .remove(key)
            .with_context(|| format!("removing {key} from {}", store.dir().display()))?;
    }
    println!("Cleared saves in {}", store.dir().display());
    Ok(())
}
