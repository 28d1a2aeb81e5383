use mazesim::{
    generators::Generator,
    maze::{Cell, Grid, Pos, manhattan},
    simulation::Simulation,
    solvers::{Solver, shortest_path_len},
};
use proptest::{prelude::*, sample::select};

fn generated(rows: u16, cols: u16, generator: Generator, seed: u64) -> Simulation {
    let mut sim = Simulation::new(rows, cols, Some(seed));
    sim.start_generation(generator);
    while sim.step() {}
    sim
}

fn solve(sim: &mut Simulation, solver: Solver) -> Vec<Pos> {
    sim.start_solving(solver);
    while sim.step() {}
    sim.solution_path().to_vec()
}

fn snapshot(sim: &Simulation) -> Grid {
    sim.snapshot().cloned().unwrap_or_else(|| Grid::new(1, 1, Cell::Wall))
}

fn assert_border_walls(grid: &Grid) {
    for (pos, cell) in grid.cells() {
        if grid.is_boundary(pos) {
            assert_eq!(cell, Cell::Wall, "border cell {:?} was {:?}", pos, cell);
        }
    }
}

fn generator_strategy() -> impl Strategy<Value = Generator> {
    select(Generator::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_generation_keeps_border_and_endpoints(
        rows in 5u16..32,
        cols in 5u16..32,
        generator in generator_strategy(),
        seed in any::<u64>(),
    ) {
        let sim = generated(rows, cols, generator, seed);
        prop_assert!(sim.is_generation_complete());
        let grid = sim.maze().grid();
        assert_border_walls(grid);
        prop_assert_eq!(grid.count(Cell::Start), 1);
        prop_assert_eq!(grid.count(Cell::End), 1);
        prop_assert_eq!(grid.get(sim.maze().start()), Cell::Start);
        prop_assert_eq!(grid.get(sim.maze().end()), Cell::End);
        prop_assert!(sim.maze().is_connected());
    }

    #[test]
    fn test_bfs_and_astar_find_shortest_paths(
        rows in 5u16..32,
        cols in 5u16..32,
        generator in generator_strategy(),
        seed in any::<u64>(),
    ) {
        let mut sim = generated(rows, cols, generator, seed);
        let clean = snapshot(&sim);
        let optimal = shortest_path_len(&clean, sim.maze().start(), sim.maze().end());
        prop_assert!(optimal.is_some());

        let bfs = solve(&mut sim, Solver::Bfs);
        let astar = solve(&mut sim, Solver::AStar);
        prop_assert_eq!(Some(bfs.len() - 1), optimal);
        prop_assert_eq!(Some(astar.len() - 1), optimal);
    }

    #[test]
    fn test_solution_paths_are_valid(
        rows in 5u16..32,
        cols in 5u16..32,
        generator in generator_strategy(),
        solver in select(Solver::ALL.to_vec()),
        seed in any::<u64>(),
    ) {
        let mut sim = generated(rows, cols, generator, seed);
        let clean = snapshot(&sim);
        let path = solve(&mut sim, solver);
        let (start, end) = (sim.maze().start(), sim.maze().end());

        prop_assert!(sim.solution_found());
        prop_assert_eq!(path.first().copied(), Some(start));
        prop_assert_eq!(path.last().copied(), Some(end));
        for pair in path.windows(2) {
            prop_assert_eq!(manhattan(pair[0], pair[1]), 1);
        }
        for (i, pos) in path.iter().enumerate() {
            prop_assert!(clean.get(*pos).is_walkable());
            prop_assert!(!path[..i].contains(pos), "path revisits {:?}", pos);
        }

        // Solution cells are stamped, endpoints keep their markers
        let grid = sim.maze().grid();
        for pos in &path[1..path.len() - 1] {
            prop_assert_eq!(grid.get(*pos), Cell::Solution);
        }
        prop_assert_eq!(grid.count(Cell::Start), 1);
        prop_assert_eq!(grid.count(Cell::End), 1);
        assert_border_walls(grid);
    }

    #[test]
    fn test_restore_is_idempotent(
        generator in generator_strategy(),
        solver in select(Solver::ALL.to_vec()),
        seed in any::<u64>(),
    ) {
        let mut sim = generated(15, 21, generator, seed);
        let clean = snapshot(&sim);
        solve(&mut sim, solver);

        let mut maze = sim.maze().clone();
        maze.restore(&clean);
        prop_assert_eq!(maze.grid(), &clean);
        maze.restore(&clean);
        prop_assert_eq!(maze.grid(), &clean);
        prop_assert!(maze.grid().cells().all(|(_, cell)| !cell.is_overlay()));
    }

    #[test]
    fn test_same_seed_same_maze(
        rows in 5u16..32,
        cols in 5u16..32,
        generator in generator_strategy(),
        seed in any::<u64>(),
    ) {
        let first = generated(rows, cols, generator, seed);
        let second = generated(rows, cols, generator, seed);
        prop_assert_eq!(first.maze().grid(), second.maze().grid());
        prop_assert_eq!(first.generation_step_count(), second.generation_step_count());
    }

    #[test]
    fn test_kruskal_spanning_tree(seed in any::<u64>()) {
        // 25 rooms on an 11x11 grid joined by 24 carved walls
        let sim = generated(11, 11, Generator::Kruskal, seed);
        prop_assert_eq!(sim.repaired_cells(), 0);
        let open = sim
            .maze()
            .grid()
            .cells()
            .filter(|(_, cell)| *cell != Cell::Wall)
            .count();
        prop_assert_eq!(open, 25 + 24);
    }
}
