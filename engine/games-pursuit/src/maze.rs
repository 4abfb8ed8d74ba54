//! Static maze topology: walls, pill layout, and pathing queries.
//!
//! The maze is a rectangular grid; a node index is `y * width + x`. All
//! queries are pure functions of the (immutable) layout, so the mutable
//! game state can share one maze across clones.

use maze_core::{Dir, Metric, NodeIndex};

/// Immutable maze layout parsed from ASCII rows.
///
/// Legend: `#` wall, `.` pill, `o` power pill, `P` agent start,
/// `G` ghost lair, space is open floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    walls: Vec<bool>,
    pills: Vec<NodeIndex>,
    power_pills: Vec<NodeIndex>,
    agent_start: NodeIndex,
    lair: NodeIndex,
}

impl Maze {
    /// Parse a maze from equal-length ASCII rows.
    ///
    /// # Panics
    /// Panics on ragged rows, unknown characters, or a layout missing the
    /// `P`/`G` markers. Layouts are author-time constants, so malformed
    /// input is a programming error.
    pub fn parse(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        assert!(width > 0 && height > 0, "maze must be non-empty");

        let mut walls = vec![false; width * height];
        let mut pills = Vec::new();
        let mut power_pills = Vec::new();
        let mut agent_start = None;
        let mut lair = None;

        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), width, "ragged maze row {y}");
            for (x, ch) in row.chars().enumerate() {
                let node = y * width + x;
                match ch {
                    '#' => walls[node] = true,
                    '.' => pills.push(node),
                    'o' => power_pills.push(node),
                    'P' => agent_start = Some(node),
                    'G' => lair = Some(node),
                    ' ' => {}
                    other => panic!("unknown maze character {other:?} at ({x}, {y})"),
                }
            }
        }

        Self {
            width,
            height,
            walls,
            pills,
            power_pills,
            agent_start: agent_start.expect("maze has no agent start (P)"),
            lair: lair.expect("maze has no ghost lair (G)"),
        }
    }

    /// A small symmetric layout with corridors, junctions, pills and one
    /// power pill per side. Handy default for examples and tests.
    pub fn default_layout() -> Self {
        Self::parse(&[
            "###########",
            "#o...#...o#",
            "#.##.#.##.#",
            "#.........#",
            "#.##.#.##.#",
            "#....G....#",
            "#.##.#.##.#",
            "#....P....#",
            "###########",
        ])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn agent_start(&self) -> NodeIndex {
        self.agent_start
    }

    pub fn lair(&self) -> NodeIndex {
        self.lair
    }

    pub fn pills(&self) -> &[NodeIndex] {
        &self.pills
    }

    pub fn power_pills(&self) -> &[NodeIndex] {
        &self.power_pills
    }

    pub fn is_wall(&self, node: NodeIndex) -> bool {
        self.walls.get(node).copied().unwrap_or(true)
    }

    /// The node one step in `dir`, if it is on the grid and not a wall.
    pub fn neighbour(&self, node: NodeIndex, dir: Dir) -> Option<NodeIndex> {
        let (dx, dy) = dir.offset();
        if dir == Dir::Neutral {
            return None;
        }
        let x = (node % self.width) as i32 + dx;
        let y = (node / self.width) as i32 + dy;
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let next = y as usize * self.width + x as usize;
        (!self.walls[next]).then_some(next)
    }

    /// Legal moves out of `node` in `Dir::ARMS` order.
    pub fn legal_moves(&self, node: NodeIndex) -> Vec<Dir> {
        Dir::ARMS
            .into_iter()
            .filter(|&dir| self.neighbour(node, dir).is_some())
            .collect()
    }

    /// A junction is a node with more than two ways out.
    pub fn is_junction(&self, node: NodeIndex) -> bool {
        self.legal_moves(node).len() > 2
    }

    /// Breadth-first shortest-path distance in steps. `None` when `to` is
    /// unreachable from `from`.
    pub fn bfs_distance(&self, from: NodeIndex, to: NodeIndex) -> Option<u32> {
        if from == to {
            return Some(0);
        }
        if self.is_wall(from) || self.is_wall(to) {
            return None;
        }

        let mut seen = vec![false; self.walls.len()];
        let mut frontier = std::collections::VecDeque::new();
        seen[from] = true;
        frontier.push_back((from, 0u32));

        while let Some((node, dist)) = frontier.pop_front() {
            for dir in Dir::ARMS {
                if let Some(next) = self.neighbour(node, dir) {
                    if next == to {
                        return Some(dist + 1);
                    }
                    if !seen[next] {
                        seen[next] = true;
                        frontier.push_back((next, dist + 1));
                    }
                }
            }
        }

        None
    }

    /// Grid Manhattan distance, ignoring walls.
    pub fn manhattan(&self, a: NodeIndex, b: NodeIndex) -> f64 {
        let (ax, ay) = ((a % self.width) as i64, (a / self.width) as i64);
        let (bx, by) = ((b % self.width) as i64, (b / self.width) as i64);
        ((ax - bx).abs() + (ay - by).abs()) as f64
    }

    pub fn distance(&self, from: NodeIndex, to: NodeIndex, metric: Metric) -> f64 {
        match metric {
            Metric::Path => self
                .bfs_distance(from, to)
                .map_or(f64::INFINITY, f64::from),
            Metric::Manhattan => self.manhattan(from, to),
        }
    }

    /// First step of a shortest path toward `to`; ties break in
    /// `Dir::ARMS` order. `Neutral` when already there or unreachable.
    pub fn next_move_towards(&self, from: NodeIndex, to: NodeIndex) -> Dir {
        if from == to {
            return Dir::Neutral;
        }
        let mut best = Dir::Neutral;
        let mut best_dist = u32::MAX;
        for dir in Dir::ARMS {
            if let Some(next) = self.neighbour(from, dir) {
                if let Some(dist) = self.bfs_distance(next, to) {
                    if dist < best_dist {
                        best_dist = dist;
                        best = dir;
                    }
                }
            }
        }
        best
    }

    /// The legal step that most increases path distance from `to`.
    pub fn next_move_away_from(&self, from: NodeIndex, to: NodeIndex) -> Dir {
        let mut best = Dir::Neutral;
        let mut best_dist = 0i64;
        for dir in Dir::ARMS {
            if let Some(next) = self.neighbour(from, dir) {
                let dist = self
                    .bfs_distance(next, to)
                    .map_or(i64::MAX, |d| i64::from(d));
                if dist > best_dist {
                    best_dist = dist;
                    best = dir;
                }
            }
        }
        best
    }

    /// The target nearest to `from` under `metric`; `None` for an empty
    /// target set. Ties break to the earliest target in the slice.
    pub fn closest_node(
        &self,
        from: NodeIndex,
        targets: &[NodeIndex],
        metric: Metric,
    ) -> Option<NodeIndex> {
        let mut best = None;
        let mut best_dist = f64::INFINITY;
        for &target in targets {
            let dist = self.distance(from, target, metric);
            if best.is_none() || dist < best_dist {
                best_dist = dist;
                best = Some(target);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross() -> Maze {
        // 5x5 with a plus-shaped corridor; centre is a 4-way junction.
        Maze::parse(&[
            "#####",
            "#.G.#",
            "#.P.#",
            "#. .#",
            "#####",
        ])
    }

    #[test]
    fn parse_finds_markers() {
        let maze = cross();
        assert_eq!(maze.agent_start(), 2 * 5 + 2);
        assert_eq!(maze.lair(), 5 + 2);
        assert_eq!(maze.pills().len(), 4);
    }

    #[test]
    fn neighbour_respects_walls() {
        let maze = cross();
        let start = maze.agent_start();
        assert_eq!(maze.neighbour(start, Dir::Up), Some(start - 5));
        assert_eq!(maze.neighbour(0, Dir::Up), None);
        // Node above the top-left pill is a wall.
        assert_eq!(maze.neighbour(5 + 1, Dir::Up), None);
    }

    #[test]
    fn junction_needs_three_ways_out() {
        let maze = Maze::parse(&[
            "#####",
            "#   #",
            "# # #",
            "#P G#",
            "#####",
        ]);
        // Bottom-left corner: two ways out, not a junction.
        assert!(!maze.is_junction(maze.agent_start()));

        let junction = Maze::parse(&[
            "#####",
            "# P #",
            "## ##",
            "# G #",
            "#####",
        ]);
        // Centre of the T has three ways out.
        assert!(junction.is_junction(5 + 2));
    }

    #[test]
    fn bfs_distance_walks_corridors() {
        let maze = cross();
        let start = maze.agent_start();
        assert_eq!(maze.bfs_distance(start, start), Some(0));
        assert_eq!(maze.bfs_distance(start, start - 5), Some(1));
        // Opposite ends of the horizontal bar.
        assert_eq!(maze.bfs_distance(2 * 5 + 1, 2 * 5 + 3), Some(2));
    }

    #[test]
    fn unreachable_is_none() {
        let maze = Maze::parse(&[
            "#####",
            "#P#.#",
            "#G#.#",
            "#####",
        ]);
        assert_eq!(maze.bfs_distance(maze.agent_start(), 5 + 3), None);
        assert_eq!(
            maze.distance(maze.agent_start(), 5 + 3, Metric::Path),
            f64::INFINITY
        );
    }

    #[test]
    fn next_move_towards_prefers_shortest() {
        let maze = cross();
        let start = maze.agent_start();
        assert_eq!(maze.next_move_towards(start, start - 5), Dir::Up);
        assert_eq!(maze.next_move_towards(start, start + 1), Dir::Right);
        assert_eq!(maze.next_move_towards(start, start), Dir::Neutral);
    }

    #[test]
    fn next_move_away_increases_distance() {
        let maze = cross();
        let start = maze.agent_start();
        let threat = start - 5;
        let escape = maze.next_move_away_from(start, threat);
        let here = maze.bfs_distance(start, threat).unwrap();
        let there = maze
            .bfs_distance(maze.neighbour(start, escape).unwrap(), threat)
            .unwrap();
        assert!(there > here);
    }

    #[test]
    fn closest_node_picks_nearest() {
        let maze = cross();
        let start = maze.agent_start();
        let near = start + 1;
        let far = 3 * 5 + 1;
        assert_eq!(
            maze.closest_node(start, &[far, near], Metric::Path),
            Some(near)
        );
        assert_eq!(maze.closest_node(start, &[], Metric::Path), None);
    }

    #[test]
    fn manhattan_ignores_walls() {
        let maze = Maze::parse(&[
            "#####",
            "#P#G#",
            "#   #",
            "#####",
        ]);
        assert_eq!(maze.manhattan(maze.agent_start(), maze.lair()), 2.0);
    }
}
