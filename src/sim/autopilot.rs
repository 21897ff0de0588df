//! Demo-mode pilot
//!
//! Looks at the nearest visible obstacle slot that has not yet passed the
//! player, classifies every lane against its hazards and picks a command:
//! steer toward a clear lane, otherwise jump or slide at the last moment.

use glam::Quat;

use super::collision::shape_bounds;
use super::patterns::ObstaclePattern;
use super::player::ActionState;
use super::slots::ObstacleSlot;
use super::state::GameState;
use super::tick::Command;
use crate::Lane;
use crate::consts::*;
use crate::tuning::Tuning;

/// How a lane can be passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clearance {
    Clear,
    Jumpable,
    Slidable,
    Blocked,
}

/// Seconds before arrival at which to commit to a jump
const JUMP_LEAD: f32 = 0.35;
/// Seconds before arrival at which to commit to a slide
const SLIDE_LEAD: f32 = 0.3;
/// A slot this far past the player still has hazards alongside it
const ALONGSIDE: f32 = 25.0;

/// Classify `lane` against the hazards of `pattern` placed at `slot`
pub fn lane_clearance(pattern: &ObstaclePattern, slot: &ObstacleSlot, lane: Lane, tuning: &Tuning) -> Clearance {
    let x = lane.offset();
    let half_x = COLLIDER_HALF_EXTENTS.x;
    let rotation: Quat = slot.rotation();

    // Collider vertical span for each pose
    let reach = |ground: f32| {
        let center = ground + COLLIDER_OFFSET.y;
        (center - COLLIDER_HALF_EXTENTS.y, center + COLLIDER_HALF_EXTENTS.y)
    };
    let standing = reach(GROUND_Y);
    let apex = reach(GROUND_Y + tuning.jump_height);
    let sliding = reach(GROUND_Y - tuning.slide_drop);

    let in_lane: Vec<_> = pattern
        .hazards
        .iter()
        .map(|shape| shape_bounds(slot.position, rotation, shape))
        .filter(|b| b.max.x >= x - half_x && b.min.x <= x + half_x)
        .collect();

    let overlaps = |(lo, hi): (f32, f32)| in_lane.iter().any(|b| b.max.y >= lo && b.min.y <= hi);

    if !overlaps(standing) {
        Clearance::Clear
    } else if !overlaps(apex) {
        Clearance::Jumpable
    } else if !overlaps(sliding) {
        Clearance::Slidable
    } else {
        Clearance::Blocked
    }
}

/// Pick the command for this frame, if any
pub fn decide(state: &GameState) -> Option<Command> {
    if state.paused || state.game_over || state.speed <= 0.0 {
        return None;
    }

    let slot = state
        .obstacles
        .slots
        .iter()
        .filter(|s| s.visible && s.position.z < PLAYER_Z + ALONGSIDE)
        .max_by(|a, b| a.position.z.total_cmp(&b.position.z))?;
    let pattern = state.obstacle_library.get(slot.pattern)?;

    let current = state.player.lane();
    let here = lane_clearance(pattern, slot, current, &state.tuning);
    if here == Clearance::Clear {
        return None;
    }

    let lanes = Lane::ALL.map(|lane| (lane, lane_clearance(pattern, slot, lane, &state.tuning)));
    let index = |lane: Lane| Lane::ALL.iter().position(|l| *l == lane).unwrap_or(1);
    let nearest = |wanted: &dyn Fn(Clearance) -> bool| {
        lanes
            .iter()
            .filter(|(_, c)| wanted(*c))
            .min_by_key(|(lane, _)| index(*lane).abs_diff(index(current)))
            .map(|(lane, _)| *lane)
    };
    let steer = |target: Lane| {
        if index(target) < index(current) {
            Command::MoveLeft
        } else {
            Command::MoveRight
        }
    };

    if let Some(target) = nearest(&|c: Clearance| c == Clearance::Clear) {
        return Some(steer(target));
    }

    let arrival = (PLAYER_Z - slot.position.z) / state.speed;
    let running = state.player.state() == ActionState::Running;
    match here {
        Clearance::Jumpable if running && arrival <= JUMP_LEAD => Some(Command::Jump),
        Clearance::Slidable if running && arrival <= SLIDE_LEAD => Some(Command::Slide),
        Clearance::Jumpable | Clearance::Slidable => None,
        _ => nearest(&|c: Clearance| c != Clearance::Blocked).map(steer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::timers::Task;
    use glam::Vec3;

    fn approaching(name: &str, distance: f32) -> GameState {
        let mut state = GameState::new(11).unwrap();
        let pattern = state.obstacle_library.position(name).unwrap();
        let other = (pattern + 1) % state.obstacle_library.len();
        state.head_start = true;
        state.timers.cancel_task(Task::HeadStart);
        state.obstacles.slots = [
            ObstacleSlot {
                pattern,
                position: Vec3::new(0.0, 0.0, PLAYER_Z - distance),
                rotation_x: 0.0,
                visible: true,
            },
            ObstacleSlot {
                pattern: other,
                position: Vec3::new(0.0, 0.0, PLAYER_Z - distance - OBSTACLE_SPACING),
                rotation_x: 0.0,
                visible: true,
            },
        ];
        state
    }

    #[test]
    fn test_classifies_lanes() {
        let state = approaching("center_slide", 100.0);
        let slot = &state.obstacles.slots[0];
        let pattern = state.obstacle_library.get(slot.pattern).unwrap();
        let t = &state.tuning;
        assert_eq!(lane_clearance(pattern, slot, Lane::Center, t), Clearance::Slidable);
        assert_eq!(lane_clearance(pattern, slot, Lane::Left, t), Clearance::Blocked);
        assert_eq!(lane_clearance(pattern, slot, Lane::Right, t), Clearance::Blocked);

        let state = approaching("center_jump", 100.0);
        let slot = &state.obstacles.slots[0];
        let pattern = state.obstacle_library.get(slot.pattern).unwrap();
        assert_eq!(lane_clearance(pattern, slot, Lane::Center, t), Clearance::Jumpable);
    }

    #[test]
    fn test_steers_to_open_lane() {
        let state = approaching("left_center_block", 300.0);
        assert_eq!(decide(&state), Some(Command::MoveRight));
    }

    #[test]
    fn test_waits_then_jumps() {
        let state = approaching("center_jump", 200.0);
        assert_eq!(decide(&state), None);
        let state = approaching("center_jump", 20.0);
        assert_eq!(decide(&state), Some(Command::Jump));
    }

    #[test]
    fn test_slides_under_barrier() {
        let state = approaching("center_slide", 20.0);
        assert_eq!(decide(&state), Some(Command::Slide));
    }

    #[test]
    fn test_idle_when_lane_clear_or_run_over() {
        let state = approaching("left_right_block", 50.0);
        assert_eq!(decide(&state), None);

        let mut state = approaching("center_jump", 20.0);
        state.game_over = true;
        assert_eq!(decide(&state), None);
    }
}
