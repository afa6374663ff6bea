//! Full spin lifecycle driven the way a reel layer would drive it

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use rc_slot::{EconomyContext, Modifier, SlotConfig};
use rc_stage::{GamePhase, Stage};
use rc_state::{GameNotification, MemoryStore, SpinMachine};

fn play_one(
    machine: &mut SpinMachine<MemoryStore>,
    economy: &EconomyContext,
    order_rng: &mut ChaCha8Rng,
    bet: u64,
) -> rc_slot::SpinResult {
    let coins_before = machine.stats().coins;
    let planned = machine.start_spin(economy, bet).unwrap().unwrap();
    assert_eq!(machine.phase(), GamePhase::Spinning);

    let mut order: Vec<usize> = (0..planned.len()).collect();
    order.shuffle(order_rng);

    let (&last, rest) = order.split_last().unwrap();
    for &reel in rest {
        assert!(
            machine
                .reel_stopped(economy, reel, planned[reel].clone())
                .unwrap()
                .is_none()
        );
        // A repeated report is ignored
        assert!(
            machine
                .reel_stopped(economy, reel, planned[reel].clone())
                .unwrap()
                .is_none()
        );
    }
    assert_eq!(machine.reels_outstanding(), 1);

    let result = machine
        .reel_stopped(economy, last, planned[last].clone())
        .unwrap()
        .expect("last reel resolves the spin");

    assert_eq!(result.board.to_columns(), planned);
    assert_eq!(machine.stats().coins, coins_before - bet + result.total_payout);

    if result.is_win() {
        assert_eq!(machine.phase(), GamePhase::Celebrating);
        machine.advance(machine.config().celebration_delay_ms);
    }
    assert_eq!(machine.phase(), GamePhase::Idle);
    assert!(machine.can_spin());
    result
}

#[test]
fn test_out_of_order_reels_resolve_planned_board() {
    let mut machine = SpinMachine::new(SlotConfig::standard(), MemoryStore::new()).unwrap();
    machine.seed(2024);
    let economy = EconomyContext::standard();
    let mut order_rng = ChaCha8Rng::seed_from_u64(11);

    machine.new_game();
    let mut wins = 0;
    for _ in 0..25 {
        if play_one(&mut machine, &economy, &mut order_rng, 10).is_win() {
            wins += 1;
        }
    }

    let stats = machine.stats();
    assert_eq!(stats.total_spins, 25);
    assert_eq!(stats.total_wins, wins);
    assert!(machine.snapshot().recent_spins.len() <= 10);
}

#[test]
fn test_generous_preset_always_celebrates() {
    let mut machine = SpinMachine::new(SlotConfig::generous(), MemoryStore::new()).unwrap();
    machine.seed(99);
    let economy = EconomyContext::standard();
    let mut order_rng = ChaCha8Rng::seed_from_u64(3);

    machine.sandbox();
    for _ in 0..10 {
        let result = play_one(&mut machine, &economy, &mut order_rng, 100);
        assert!(result.is_win());
    }
    assert_eq!(machine.stats().total_wins, 10);
    assert_eq!(machine.snapshot().recent_spins.len(), 10);
}

#[test]
fn test_stage_sequence_for_one_spin() {
    let mut machine = SpinMachine::new(SlotConfig::standard(), MemoryStore::new()).unwrap();
    machine.seed(5);
    let economy = EconomyContext::standard();
    machine.new_game();

    let events = machine.subscribe();
    play_one(&mut machine, &economy, &mut ChaCha8Rng::seed_from_u64(8), 10);

    let stages: Vec<Stage> = events
        .try_iter()
        .filter_map(|n| match n {
            GameNotification::Stage(event) => Some(event.stage),
            GameNotification::Snapshot(_) => None,
        })
        .collect();

    assert_eq!(stages[0], Stage::CoinsDeducted { amount: 10, balance: 990 });
    assert_eq!(stages[1], Stage::SpinStart { bet: 10 });
    let reel_stops = stages
        .iter()
        .filter(|s| matches!(s, Stage::ReelStop { .. }))
        .count();
    assert_eq!(reel_stops, 5);
    assert!(stages.contains(&Stage::EvaluateWins));
    assert!(
        stages
            .iter()
            .any(|s| matches!(s, Stage::PayoutCalculated { .. }))
    );
    assert_eq!(stages.last(), Some(&Stage::SpinEnd));
}

#[test]
fn test_session_multiplier_scales_payout() {
    let config = SlotConfig::generous();
    let economy = EconomyContext::standard();

    let mut plain = SpinMachine::new(config.clone(), MemoryStore::new()).unwrap();
    let mut boosted = SpinMachine::new(config, MemoryStore::new()).unwrap();
    plain.seed(42);
    boosted.seed(42);
    plain.new_game();
    boosted.new_game();

    let mut scratch = economy.clone();
    boosted
        .apply_modifier(&mut scratch, &Modifier::GlobalMultiplier { delta: 1.0 })
        .unwrap();
    assert_eq!(boosted.current_multiplier(), 2.0);

    let a = play_one(&mut plain, &economy, &mut ChaCha8Rng::seed_from_u64(1), 10);
    let b = play_one(&mut boosted, &economy, &mut ChaCha8Rng::seed_from_u64(1), 10);

    assert_eq!(a.board, b.board);
    let raw: f64 = a.wins.iter().map(|w| w.total_value).sum();
    assert_eq!(a.total_payout, raw.floor() as u64);
    assert_eq!(b.total_payout, (raw * 2.0).floor() as u64);
}
