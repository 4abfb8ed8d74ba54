//! Post-search tree evaluators.
//!
//! Evaluators run after the simulation budget is spent and reshape the
//! decision by adding bonuses to root children. They only ever touch a
//! node's bonus, never its visit statistics, and they run in pipeline
//! order, so later evaluators observe the bonuses of earlier ones.

use maze_core::{Dir, GhostModel, MazeOracle, Metric};

use crate::node::NodeId;
use crate::search::MctsSearch;

/// A post-search pass over the root children of a finished search.
pub trait TreeEvaluator<O, G>
where
    O: MazeOracle,
    G: GhostModel<O>,
{
    fn evaluate_tree(&self, search: &mut MctsSearch<'_, O, G>);
}

/// The default evaluator pipeline, in order: chase edible ghosts, punish
/// wasted power pills, steer toward pills.
pub fn default_pipeline<O, G>() -> Vec<Box<dyn TreeEvaluator<O, G>>>
where
    O: MazeOracle,
    G: GhostModel<O>,
{
    vec![
        Box::new(EdibleGhostEvaluator::default()),
        Box::new(PowerPillWasteEvaluator::default()),
        Box::new(PillShapingEvaluator::default()),
    ]
}

fn add_bonus_to_move<O, G>(
    search: &mut MctsSearch<'_, O, G>,
    children: &[NodeId],
    mv: Dir,
    bonus: f64,
) where
    O: MazeOracle,
    G: GhostModel<O>,
{
    for &child in children {
        if search.tree().get(child).mv == mv {
            search.add_bonus(child, bonus);
            return;
        }
    }
}

fn move_towards_edible_ghost<O: MazeOracle>(state: &O) -> Dir {
    let agent = state.agent_node();
    let mut min = f64::INFINITY;
    let mut closest = None;

    for ghost in 0..state.ghost_count() {
        if state.ghost_edible_time(ghost) > 0 {
            let node = state.ghost_node(ghost);
            let distance = state.distance(agent, node, Metric::Path);
            if distance < min {
                min = distance;
                closest = Some(node);
            }
        }
    }

    match closest {
        Some(node) => state.next_move_towards(agent, node),
        None => Dir::Neutral,
    }
}

fn move_towards_pill<O: MazeOracle>(state: &O) -> Dir {
    let agent = state.agent_node();
    match state.closest_node(agent, &state.active_pills(), Metric::Path) {
        Some(pill) => state.next_move_towards(agent, pill),
        None => Dir::Neutral,
    }
}

fn nearest_pill_distance<O: MazeOracle>(state: &O) -> f64 {
    let pills = state.active_pills();
    if pills.is_empty() {
        return f64::INFINITY;
    }
    let agent = state.agent_node();
    match state.closest_node(agent, &pills, Metric::Manhattan) {
        Some(pill) => state.distance(agent, pill, Metric::Manhattan),
        None => f64::INFINITY,
    }
}

/// Rewards the move leading toward the nearest edible ghost, and the move
/// leading toward the nearest pill. Each bonus lands on the first matching
/// child only.
pub struct EdibleGhostEvaluator {
    ghost_bonus: f64,
    pill_bonus: f64,
}

impl EdibleGhostEvaluator {
    pub fn new(ghost_bonus: f64, pill_bonus: f64) -> Self {
        Self {
            ghost_bonus,
            pill_bonus,
        }
    }
}

impl Default for EdibleGhostEvaluator {
    fn default() -> Self {
        Self::new(400.0, 200.0)
    }
}

impl<O, G> TreeEvaluator<O, G> for EdibleGhostEvaluator
where
    O: MazeOracle,
    G: GhostModel<O>,
{
    fn evaluate_tree(&self, search: &mut MctsSearch<'_, O, G>) {
        let children = search.root_children();
        if children.is_empty() {
            return;
        }

        let ghost_move = move_towards_edible_ghost(search.cursor());
        if ghost_move != Dir::Neutral {
            add_bonus_to_move(search, &children, ghost_move, self.ghost_bonus);
        }

        let pill_move = move_towards_pill(search.cursor());
        add_bonus_to_move(search, &children, pill_move, self.pill_bonus);
    }
}

/// Rewards root children whose branch ends closer to a pill than the root
/// state started, measured by Manhattan distance after replaying the
/// child's move and fast-forwarding to one step past the next junction.
pub struct PillProximityEvaluator {
    bonus: f64,
    lookahead: u32,
}

impl PillProximityEvaluator {
    pub fn new(bonus: f64, lookahead: u32) -> Self {
        Self { bonus, lookahead }
    }
}

impl Default for PillProximityEvaluator {
    fn default() -> Self {
        Self::new(300.0, 40)
    }
}

impl<O, G> TreeEvaluator<O, G> for PillProximityEvaluator
where
    O: MazeOracle,
    G: GhostModel<O>,
{
    fn evaluate_tree(&self, search: &mut MctsSearch<'_, O, G>) {
        let baseline = nearest_pill_distance(search.cursor());

        for child in search.root_children() {
            let mv = search.tree().get(child).mv;

            search.push_state();
            search.advance_decision(mv);
            search.fast_forward(self.lookahead);

            if nearest_pill_distance(search.cursor()) < baseline {
                search.add_bonus(child, self.bonus);
            }
            search.pop_state();
        }
    }
}

/// Penalizes eating a power pill while a previous one is still in effect.
pub struct PowerPillWasteEvaluator {
    penalty: f64,
}

impl PowerPillWasteEvaluator {
    pub fn new(penalty: f64) -> Self {
        Self { penalty }
    }
}

impl Default for PowerPillWasteEvaluator {
    fn default() -> Self {
        Self::new(900.0)
    }
}

impl<O, G> TreeEvaluator<O, G> for PowerPillWasteEvaluator
where
    O: MazeOracle,
    G: GhostModel<O>,
{
    fn evaluate_tree(&self, search: &mut MctsSearch<'_, O, G>) {
        let state = search.cursor();
        let any_edible = (0..state.ghost_count()).any(|g| state.ghost_edible_time(g) > 0);
        if !any_edible {
            return;
        }

        for child in search.root_children() {
            if search.tree().get(child).eats_power_pill {
                search.add_bonus(child, -self.penalty);
            }
        }
    }
}

/// Rewards branches that eat pills: a larger bonus when the child's own
/// move eats one, a smaller one when a grandchild's does. Children doing
/// neither fall back to a [`PillProximityEvaluator`] pass, once per such
/// child.
pub struct PillShapingEvaluator {
    now_bonus: f64,
    later_bonus: f64,
    proximity: PillProximityEvaluator,
}

impl PillShapingEvaluator {
    pub fn new(now_bonus: f64, later_bonus: f64) -> Self {
        Self {
            now_bonus,
            later_bonus,
            proximity: PillProximityEvaluator::default(),
        }
    }
}

impl Default for PillShapingEvaluator {
    fn default() -> Self {
        Self::new(400.0, 300.0)
    }
}

impl<O, G> TreeEvaluator<O, G> for PillShapingEvaluator
where
    O: MazeOracle,
    G: GhostModel<O>,
{
    fn evaluate_tree(&self, search: &mut MctsSearch<'_, O, G>) {
        for child in search.root_children() {
            if search.tree().get(child).eats_pill {
                search.add_bonus(child, self.now_bonus);
            } else if search.tree().any_child_eats_pill(child) {
                search.add_bonus(child, self.later_bonus);
            } else {
                self.proximity.evaluate_tree(search);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MctsConfig;
    use games_pursuit::{Maze, PursuitGame, StationaryGhostModel};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(11)
    }

    // Pill-free open cross: the agent sits on a four-way junction.
    fn pill_free_cross() -> PursuitGame {
        PursuitGame::new(Maze::parse(&[
            "#####",
            "#G  #",
            "# P #",
            "#   #",
            "#####",
        ]))
    }

    fn expand_root<'a>(
        search: &mut MctsSearch<'a, PursuitGame, StationaryGhostModel>,
    ) -> Vec<NodeId> {
        let root = search.tree().root();
        let moves = search.cursor().legal_moves(search.cursor().agent_node());
        search.tree_mut().expand(root, &moves);
        search.root_children()
    }

    fn bonus_of(
        search: &MctsSearch<'_, PursuitGame, StationaryGhostModel>,
        child: NodeId,
    ) -> f64 {
        search.tree().get(child).bonus
    }

    fn child_with_move(
        search: &MctsSearch<'_, PursuitGame, StationaryGhostModel>,
        children: &[NodeId],
        mv: Dir,
    ) -> NodeId {
        children
            .iter()
            .copied()
            .find(|&id| search.tree().get(id).mv == mv)
            .unwrap()
    }

    #[test]
    fn edible_ghost_bonus_lands_on_the_chasing_move() {
        let mut game = pill_free_cross();
        // Edible ghost one step to the agent's right.
        game.set_ghost(0, game.agent_node() + 1, 20, 0);

        let ghosts = StationaryGhostModel;
        let mut rng = rng();
        let mut search = MctsSearch::new(game, &ghosts, MctsConfig::for_testing(), &mut rng);
        let children = expand_root(&mut search);
        assert_eq!(children.len(), 4);

        EdibleGhostEvaluator::default().evaluate_tree(&mut search);

        for &child in &children {
            let expected = if search.tree().get(child).mv == Dir::Right {
                400.0
            } else {
                0.0
            };
            assert!((bonus_of(&search, child) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn no_edible_ghost_and_no_pills_award_nothing() {
        let ghosts = StationaryGhostModel;
        let mut rng = rng();
        let mut search = MctsSearch::new(
            pill_free_cross(),
            &ghosts,
            MctsConfig::for_testing(),
            &mut rng,
        );
        let children = expand_root(&mut search);

        EdibleGhostEvaluator::default().evaluate_tree(&mut search);
        PillProximityEvaluator::default().evaluate_tree(&mut search);

        for &child in &children {
            assert!(bonus_of(&search, child).abs() < 1e-9);
        }
    }

    #[test]
    fn pill_bonus_lands_on_the_move_towards_the_nearest_pill() {
        let game = PursuitGame::new(Maze::parse(&[
            "#####",
            "#G  #",
            "#.P #",
            "#   #",
            "#####",
        ]));
        let ghosts = StationaryGhostModel;
        let mut rng = rng();
        let mut search = MctsSearch::new(game, &ghosts, MctsConfig::for_testing(), &mut rng);
        let children = expand_root(&mut search);

        EdibleGhostEvaluator::default().evaluate_tree(&mut search);

        let towards = child_with_move(&search, &children, Dir::Left);
        assert!((bonus_of(&search, towards) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn proximity_bonus_rewards_closing_in_on_pills() {
        // One corridor out of the start, a junction halfway along it, and
        // the pills at the far end. The fast-forward stops at the junction
        // and every random step off it lands closer to the pills.
        let game = PursuitGame::new(Maze::parse(&[
            "##########",
            "#G### ##.#",
            "##P    ..#",
            "##########",
        ]));
        let ghosts = StationaryGhostModel;
        let mut rng = rng();
        let mut search = MctsSearch::new(game, &ghosts, MctsConfig::for_testing(), &mut rng);
        let children = expand_root(&mut search);
        assert_eq!(children.len(), 1);

        PillProximityEvaluator::default().evaluate_tree(&mut search);

        assert!((bonus_of(&search, children[0]) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn power_pill_waste_needs_an_edible_ghost() {
        let ghosts = StationaryGhostModel;

        let mut rng = rng();
        let mut search = MctsSearch::new(
            pill_free_cross(),
            &ghosts,
            MctsConfig::for_testing(),
            &mut rng,
        );
        let children = expand_root(&mut search);
        search.tree_mut().get_mut(children[0]).eats_power_pill = true;

        // No ghost edible: the flag alone is not penalized.
        PowerPillWasteEvaluator::default().evaluate_tree(&mut search);
        assert!(bonus_of(&search, children[0]).abs() < 1e-9);

        let mut game = pill_free_cross();
        game.set_ghost(1, game.maze().lair(), 15, 0);
        let mut rng = self::rng();
        let mut search = MctsSearch::new(game, &ghosts, MctsConfig::for_testing(), &mut rng);
        let children = expand_root(&mut search);
        search.tree_mut().get_mut(children[0]).eats_power_pill = true;

        PowerPillWasteEvaluator::default().evaluate_tree(&mut search);
        assert!((bonus_of(&search, children[0]) + 900.0).abs() < 1e-9);
        assert!(bonus_of(&search, children[1]).abs() < 1e-9);
    }

    #[test]
    fn pill_shaping_ranks_now_over_later() {
        let ghosts = StationaryGhostModel;
        let mut rng = rng();
        let mut search = MctsSearch::new(
            pill_free_cross(),
            &ghosts,
            MctsConfig::for_testing(),
            &mut rng,
        );
        let children = expand_root(&mut search);

        // First child eats immediately; second has a grandchild that eats;
        // the rest neither (and the proximity fallback finds no pills).
        search.tree_mut().get_mut(children[0]).eats_pill = true;
        let grandchild = search.tree_mut().add_child(children[1], Dir::Up);
        search.tree_mut().get_mut(grandchild).eats_pill = true;

        PillShapingEvaluator::default().evaluate_tree(&mut search);

        assert!((bonus_of(&search, children[0]) - 400.0).abs() < 1e-9);
        assert!((bonus_of(&search, children[1]) - 300.0).abs() < 1e-9);
        assert!(bonus_of(&search, children[2]).abs() < 1e-9);
        assert!(bonus_of(&search, children[3]).abs() < 1e-9);
    }
}
