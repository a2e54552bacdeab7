use std::ops::ControlFlow;

use grid_search::{refresh_adjacency, search_marked, Grid, Position, SearchKind, SearchOutcome};

// Builds a grid the way an interactive editor would, one placement at a time, then prints
// every intermediate state the search reports. Pass "bfs" to switch algorithms and a
// number to cancel after that many steps.

fn main() {
    let mut args = std::env::args().skip(1);
    let kind: SearchKind = args
        .next()
        .map(|s| s.parse().unwrap())
        .unwrap_or(SearchKind::AStar);
    let budget: Option<usize> = args.next().map(|s| s.parse().unwrap());

    let mut grid = Grid::new(8, 400);
    // First placement is the start, the second the end, the rest barriers.
    grid.place(Position::new(1, 1)).unwrap();
    grid.place(Position::new(6, 6)).unwrap();
    for row in 0..6 {
        grid.place(Position::new(row, 4)).unwrap();
    }
    for col in 2..7 {
        grid.place(Position::new(4, col)).unwrap();
    }
    refresh_adjacency(&mut grid);

    let mut step = 0;
    let outcome = search_marked(kind, &mut grid, |g: &Grid| {
        step += 1;
        println!("step {step}\n{g}");
        match budget {
            Some(b) if step >= b => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    })
    .unwrap();
    match outcome {
        SearchOutcome::Found(path) => println!("{kind}: {} steps\n{}", path.steps(), grid),
        SearchOutcome::NoPath => println!("{kind}: no path"),
        SearchOutcome::Cancelled => println!("{kind}: cancelled after {step} steps"),
    }
}
