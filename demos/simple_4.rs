use grid_search::{search, unobserved, Grid, Position, SearchKind};

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Both searches are run on their own copy of the grid.

fn main() {
    let grid: Grid = "S..\n.#.\n..E".parse().unwrap();
    println!("{}", grid);
    let start = Position::new(0, 0);
    let end = Position::new(2, 2);
    for kind in [SearchKind::AStar, SearchKind::Bfs] {
        let mut searched = grid.clone();
        let outcome = search(kind, &mut searched, start, end, unobserved).unwrap();
        println!("{kind}: {}", outcome.path().unwrap());
        println!("{}", searched);
    }
}
