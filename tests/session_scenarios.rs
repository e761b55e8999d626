use std::time::Duration;

use office_escape::maze::{self, OFFICE_END, OFFICE_MIN};
use office_escape::session::PLAYER_SPAWN;
use office_escape::{
    CellKind, Direction, Game, GameConfig, Grid, LeaderboardEntry, Pos, Position, PursuitState,
    Session, Task, TerminalState, GRID_SIZE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TICKS_PER_CELL: usize = 10;

fn quiet_config() -> GameConfig {
    GameConfig {
        chase_trigger_chance: 0.0,
        ..GameConfig::default()
    }
}

/// Cell-by-cell directions from `from` to the goal, walking downhill on the
/// goal's distance field.
fn route_to_goal(grid: &Grid, from: Pos) -> Vec<Direction> {
    let goal = grid.goal().expect("goal");
    let dist = grid.distances_from(goal);
    let mut cur = from;
    let mut route = Vec::new();
    while cur != goal {
        let here = dist[cur.z][cur.x].expect("cell reachable from goal");
        let (dir, next) = Direction::ALL
            .iter()
            .find_map(|dir| {
                let (dx, dz) = dir.delta();
                let nx = cur.x as isize + dx;
                let nz = cur.z as isize + dz;
                if nx < 0 || nz < 0 || nx >= GRID_SIZE as isize || nz >= GRID_SIZE as isize {
                    return None;
                }
                let next = Pos::new(nx as usize, nz as usize);
                (dist[next.z][next.x] == Some(here - 1)).then_some((*dir, next))
            })
            .expect("downhill neighbor");
        route.push(dir);
        cur = next;
    }
    route
}

/// Feeds the route one input per update tick until the session ends.
fn walk_to_goal(session: &mut Session) -> TerminalState {
    let start = session
        .grid()
        .discretize(session.player().position().x, session.player().position().z)
        .expect("player on grid");
    let route = route_to_goal(session.grid(), start);
    for dir in route {
        for _ in 0..TICKS_PER_CELL {
            session.push_input(dir);
            if session.update_tick().is_over() {
                return session.terminal();
            }
        }
    }
    session.terminal()
}

#[test]
fn every_office_cell_reaches_the_goal() {
    for seed in 0..200u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = maze::generate(&mut rng, seed).expect("maze");
        assert_eq!(grid.cells_of(CellKind::Goal).count(), 1);
        let goal = grid.goal().expect("goal");
        for z in OFFICE_MIN..OFFICE_END {
            for x in OFFICE_MIN..OFFICE_END {
                assert!(
                    grid.is_reachable(Pos::new(x, z), goal),
                    "seed {seed}: ({x}, {z}) cut off from goal"
                );
            }
        }
    }
}

#[test]
fn classification_outside_the_grid_is_wall() {
    let session = Session::new(&quiet_config(), 17).expect("session");
    let snapshot = session.snapshot();
    for v in [-5.0f32, -0.001, 20.0, 20.5, 1e9] {
        assert_eq!(snapshot.classify(v, 3.5), CellKind::Wall);
        assert_eq!(snapshot.classify(3.5, v), CellKind::Wall);
    }
}

#[test]
fn five_score_ticks_without_input() {
    let mut session = Session::new(&quiet_config(), 1).expect("session");
    let terminal = session.advance(Duration::from_secs(5));
    assert_eq!(session.score(), 50);
    assert_eq!(terminal, TerminalState::Playing);
    assert_eq!(session.player().position(), PLAYER_SPAWN);
}

#[test]
fn reaching_the_goal_wins_and_stops_scoring() {
    for seed in [2u64, 31, 404] {
        let mut session = Session::new(&quiet_config(), seed).expect("session");
        session.score_tick();
        session.score_tick();
        assert_eq!(walk_to_goal(&mut session), TerminalState::Won, "seed {seed}");
        assert_eq!(session.player().cell_kind(session.grid()), CellKind::Goal);

        session.advance(Duration::from_secs(30));
        session.score_tick();
        assert_eq!(session.score(), 20);
        assert!(!session.is_running(Task::Score));
        assert!(!session.is_running(Task::Update));
        assert!(!session.accepts_input());
    }
}

#[test]
fn coinciding_agents_while_chasing_lose() {
    let seed = 8;
    let mut rng = StdRng::seed_from_u64(seed);
    let grid = maze::generate(&mut rng, seed).expect("maze");
    let config = GameConfig {
        chase_trigger_chance: 1.0,
        ..GameConfig::default()
    };
    let mut session =
        Session::from_parts(&config, seed, grid, PLAYER_SPAWN, PLAYER_SPAWN).expect("session");

    assert_eq!(session.update_tick(), TerminalState::Playing);
    assert_eq!(session.pursuit_state(), PursuitState::Chasing);
    assert_eq!(session.update_tick(), TerminalState::Lost);

    let score = session.score();
    session.push_input(Direction::Right);
    session.advance(Duration::from_secs(3));
    assert_eq!(session.player().position(), PLAYER_SPAWN);
    assert_eq!(session.score(), score);
    assert_eq!(session.terminal(), TerminalState::Lost);
}

#[test]
fn blank_name_after_a_win_leaves_the_board_alone() {
    let mut game = Game::new(quiet_config());
    game.start_session(Some(5)).expect("start");
    let session = game.session_mut().expect("session");
    assert_eq!(walk_to_goal(session), TerminalState::Won);

    let before = game.leaderboard().entries().to_vec();
    assert!(!game.submit_score(""));
    assert!(!game.submit_score("   "));
    assert_eq!(game.leaderboard().entries(), before.as_slice());
    assert!(game.leaderboard().len() <= 10);
}

#[test]
fn winning_submission_is_ranked() {
    let mut game = Game::new(quiet_config());
    game.start_session(Some(6)).expect("start");
    let session = game.session_mut().expect("session");
    for _ in 0..300 {
        session.score_tick();
    }
    assert_eq!(walk_to_goal(session), TerminalState::Won);
    assert_eq!(session.score(), 3000);

    assert!(game.submit_score("Ana"));
    assert_eq!(
        game.leaderboard().entries(),
        &[
            LeaderboardEntry::new("Ana", 3000),
            LeaderboardEntry::new("Mark S.", 2500),
            LeaderboardEntry::new("Helly R.", 2100),
            LeaderboardEntry::new("Irving B.", 1950),
            LeaderboardEntry::new("Dylan G.", 1800),
        ]
    );
}

#[test]
fn random_play_keeps_invariants() {
    let config = GameConfig {
        chase_trigger_chance: 0.05,
        ..GameConfig::default()
    };
    for seed in 0..12u64 {
        let mut session = Session::new(&config, seed).expect("session");
        let mut input = StdRng::seed_from_u64(seed ^ 0xA5A5);
        let mut chasing = false;
        let mut frozen: Option<(u32, Position, Position, TerminalState)> = None;

        for tick in 0..4000 {
            session.push_input(Direction::ALL[input.gen_range(0..4)]);
            session.update_tick();
            if tick % 60 == 0 {
                session.score_tick();
            }

            let grid = session.grid();
            assert_ne!(session.player().cell_kind(grid), CellKind::Wall, "seed {seed}");
            assert_ne!(session.pursuer().cell_kind(grid), CellKind::Wall, "seed {seed}");

            if chasing {
                assert_eq!(session.pursuit_state(), PursuitState::Chasing, "seed {seed}");
            }
            chasing = session.pursuit_state() == PursuitState::Chasing;

            let now = (
                session.score(),
                session.player().position(),
                session.pursuer().position(),
                session.terminal(),
            );
            match frozen {
                Some(state) => assert_eq!(state, now, "seed {seed}: changed after terminal"),
                None if session.terminal().is_over() => frozen = Some(now),
                None => {}
            }
        }
    }
}

#[test]
fn teardown_without_terminal_state_stops_everything() {
    let mut game = Game::new(quiet_config());
    game.start_session(Some(12)).expect("start");
    let session = game.session_mut().expect("session");
    session.advance(Duration::from_millis(2500));
    assert_eq!(session.score(), 20);
    session.teardown();
    session.teardown();
    assert!(!session.is_running(Task::Update));
    assert!(!session.is_running(Task::Score));
    assert_eq!(session.advance(Duration::from_secs(5)), TerminalState::Playing);
    assert_eq!(session.score(), 20);
    assert!(!game.submit_score("Ghost"));
}
