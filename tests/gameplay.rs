use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use pacman_grid::components::{Cell, Dir, Pos};
use pacman_grid::config::Config;
use pacman_grid::game::{Ending, GameState, Status};
use pacman_grid::ghost::random_dir;
use pacman_grid::input::{InputEvent, ScriptedInput, TickInput};
use pacman_grid::level::Maze;
use pacman_grid::render::{DrawOp, Layout, RecordingCanvas};
use pacman_grid::runner::{FrameClock, GameContext};

fn random_input(rng: &mut SmallRng) -> TickInput {
    if rng.gen_bool(0.2) {
        TickInput { dir: Some(random_dir(rng)), quit: false }
    } else {
        TickInput::default()
    }
}

#[test]
fn long_random_games_keep_their_invariants() {
    for seed in 0..40u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let config = Config::default();
        let mut game = GameState::new(&config, &mut rng).unwrap();
        let initial = game.pellets.len();
        let spawns: Vec<Pos> = config.ghosts.iter().map(|g| g.pos).collect();
        let mut eaten = HashSet::new();
        let mut last_score = 0;

        for _ in 0..2_000 {
            let before: HashSet<Pos> = game.pellets.iter().collect();
            let status = game.tick(random_input(&mut rng), &mut rng);
            let after: HashSet<Pos> = game.pellets.iter().collect();

            assert!(after.is_subset(&before), "seed {seed}: pellet reappeared");
            for gone in before.difference(&after) {
                assert!(eaten.insert(*gone), "seed {seed}: pellet eaten twice");
            }
            assert!(game.score >= last_score);
            last_score = game.score;
            assert_eq!(game.score as usize, eaten.len());
            assert_eq!(initial - game.pellets.len(), eaten.len());

            let p = game.player.pos;
            assert!(game.maze.contains(p));
            assert!(game.maze.is_open(p) || p == config.player_start);
            for (ghost, spawn) in game.ghosts.iter().zip(&spawns) {
                assert!(game.maze.contains(ghost.pos));
                assert!(game.maze.is_open(ghost.pos) || ghost.pos == *spawn);
            }

            match status {
                Status::Running => assert!(game.ghosts.iter().all(|g| g.pos != p)),
                Status::Over(Ending::Caught { ghost }) => {
                    assert_eq!(game.ghosts[ghost].pos, game.player.pos);
                    break;
                }
                Status::Over(other) => panic!("seed {seed}: unexpected ending {other:?}"),
            }
        }
    }
}

#[test]
fn generated_board_borders_are_walls() {
    let config = Config::default();
    for seed in 0..20u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let game = GameState::new(&config, &mut rng).unwrap();
        let maze = &game.maze;
        for pos in maze.positions() {
            let border = pos.x == 0 || pos.y == 0 || pos.x + 1 == maze.cols() || pos.y + 1 == maze.rows();
            if border {
                assert_eq!(maze.cell(pos), Cell::Wall);
            }
        }
        let interior_walls = maze.wall_count() - (2 * maze.cols() + 2 * (maze.rows() - 2));
        assert!(interior_walls <= config.extra_walls);
        assert_eq!(game.pellets.len(), maze.open_cells().len());
    }
}

#[test]
fn scripted_run_steers_the_player_through_a_corridor() {
    let maze = Maze::parse(&[
        "#######",
        "#.....#",
        "#.###.#",
        "#.....#",
        "#######",
    ])
    .unwrap();
    let config = Config { player_start: Pos::new(1, 1), ghosts: vec![], ..Config::default() };
    let mut rng = SmallRng::seed_from_u64(77);
    let mut game = GameState::with_maze(maze, &config, &mut rng);

    let mut script = vec![vec![InputEvent::Key(Dir::Down)], vec![], vec![InputEvent::Key(Dir::Right)]];
    script.extend(std::iter::repeat(vec![]).take(3));
    script.push(vec![InputEvent::Key(Dir::Up), InputEvent::Quit]);

    let mut ctx = GameContext::new(
        RecordingCanvas::default(),
        ScriptedInput::new(script),
        FrameClock::new(std::time::Duration::from_millis(1)),
        Layout::new(25),
    );
    let ending = ctx.run(&mut game, &mut rng).unwrap();

    assert_eq!(ending, Ending::Quit);
    assert_eq!(game.player.pos, Pos::new(5, 3));
    assert_eq!(game.player.dir, Dir::Right);
    assert_eq!(game.score, 6);
    let hud = ctx.canvas.last_frame().and_then(|frame| {
        frame.iter().find_map(|op| match op {
            DrawOp::Text(text, _, _) => Some(text.clone()),
            _ => None,
        })
    });
    assert_eq!(hud.as_deref(), Some("Score: 6"));
}
