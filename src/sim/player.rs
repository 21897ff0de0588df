//! Player state machine
//!
//! Running is the initial state and reachable from every other state.
//! Jumping and Sliding carry their pending work (the jump arc, the slide
//! recovery countdown) inside the state itself, so leaving the state drops
//! that work: a superseded slide can never restore height after a jump has
//! taken over, and vice versa. Stumbling is terminal until `reset`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::animation::{Animator, Clip, ClipLengths, LoopMode};
use super::bounds::Aabb;
use super::motion::{Chain, Easing, Tween};
use crate::Lane;
use crate::consts::*;
use crate::tuning::Tuning;

/// Externally visible action state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActionState {
    #[default]
    Running,
    Jumping,
    Sliding,
    Stumbling,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Action {
    Running,
    /// Rise chained to fall
    Jumping(Chain),
    /// Seconds until height is restored and running resumes
    Sliding { recover_in: f32 },
    Stumbling,
}

/// Things that happened to the player during one advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Jump arc completed
    Landed,
    /// Slide hold elapsed
    SlideRecovered,
    /// Lane change completed
    LaneReached(Lane),
    /// A one-shot clip reached its last frame
    ClipFinished(Clip),
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    /// Yaw (radians); forward while running
    pub facing: f32,
    /// Hidden once the game-over summary is revealed
    pub visible: bool,
    pub animator: Animator,
    /// Lane settled in, or being moved to
    lane: Lane,
    action: Action,
    shift: Option<Tween>,
}

impl Player {
    pub fn new(clips: ClipLengths) -> Self {
        Self {
            position: Vec3::new(Lane::Center.offset(), GROUND_Y, PLAYER_Z),
            facing: FACING_FORWARD,
            visible: true,
            animator: Animator::new(clips),
            lane: Lane::Center,
            action: Action::Running,
            shift: None,
        }
    }

    pub fn state(&self) -> ActionState {
        match self.action {
            Action::Running => ActionState::Running,
            Action::Jumping(_) => ActionState::Jumping,
            Action::Sliding { .. } => ActionState::Sliding,
            Action::Stumbling => ActionState::Stumbling,
        }
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    /// Collision box around the (invisible) collider
    pub fn collider(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position + COLLIDER_OFFSET, COLLIDER_HALF_EXTENTS)
    }

    pub fn move_left(&mut self, tuning: &Tuning) {
        self.shift_to(self.lane.left(), FACING_LEFT, tuning);
    }

    pub fn move_right(&mut self, tuning: &Tuning) {
        self.shift_to(self.lane.right(), FACING_RIGHT, tuning);
    }

    /// Start (or re-target) an eased lateral motion; the latest call wins
    fn shift_to(&mut self, target: Lane, facing: f32, tuning: &Tuning) {
        if self.state() == ActionState::Stumbling || target == self.lane {
            return;
        }
        self.lane = target;
        self.facing = facing;
        self.shift = Some(Tween::new(
            self.position.x,
            target.offset(),
            tuning.lane_change_duration,
            Easing::QuadraticOut,
        ));
    }

    /// Start a jump. Cancels a slide in progress. Returns false if ignored.
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        match self.action {
            Action::Jumping(_) | Action::Stumbling => return false,
            Action::Sliding { .. } => self.position.y = GROUND_Y,
            Action::Running => {}
        }

        self.animator.stop();
        self.animator.play(Clip::Jumping, LoopMode::Once { clamp: true });

        let base = GROUND_Y;
        let apex = base + tuning.jump_height;
        let arc = Chain::new(Tween::new(base, apex, tuning.jump_rise_duration, Easing::Linear))
            .then(Tween::new(apex, base, tuning.jump_fall_duration, Easing::Linear));
        self.action = Action::Jumping(arc);
        true
    }

    /// Start a slide. Cancels a jump in progress. Returns false if ignored.
    pub fn slide(&mut self, tuning: &Tuning) -> bool {
        match self.action {
            Action::Sliding { .. } | Action::Stumbling => return false,
            Action::Jumping(_) => self.position.y = GROUND_Y,
            Action::Running => {}
        }

        self.position.y = GROUND_Y - tuning.slide_drop;
        self.animator.stop();
        self.animator.play(Clip::Sliding, LoopMode::Once { clamp: true });
        self.animator
            .cross_fade_to(Clip::Running, tuning.slide_fade, LoopMode::Repeat);
        self.action = Action::Sliding {
            recover_in: tuning.slide_duration,
        };
        true
    }

    /// Fall over. Drops any jump/slide in progress; a lane change in flight
    /// still completes.
    pub fn stumble(&mut self, tuning: &Tuning) -> bool {
        if self.action == Action::Stumbling {
            return false;
        }
        self.action = Action::Stumbling;
        self.position.y = GROUND_Y;
        self.animator
            .cross_fade_to(Clip::Stumbling, tuning.stumble_fade, LoopMode::Once { clamp: true });
        true
    }

    /// Back to a fresh running pose in the center lane
    pub fn reset(&mut self) {
        self.action = Action::Running;
        self.shift = None;
        self.lane = Lane::Center;
        self.position = Vec3::new(Lane::Center.offset(), GROUND_Y, PLAYER_Z);
        self.facing = FACING_FORWARD;
        self.visible = true;
        self.animator
            .cross_fade_to(Clip::Running, 0.0, LoopMode::Repeat);
    }

    /// Advance animation and motions by `dt` seconds
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) -> Vec<PlayerEvent> {
        let mut events = Vec::new();

        if let Some(clip) = self.animator.advance(dt) {
            events.push(PlayerEvent::ClipFinished(clip));
        }

        if let Some(shift) = self.shift.as_mut() {
            shift.advance(dt);
            self.position.x = shift.value();
            if shift.is_finished() {
                self.position.x = self.lane.offset();
                self.facing = FACING_FORWARD;
                self.shift = None;
                events.push(PlayerEvent::LaneReached(self.lane));
            }
        }

        let mut back_to_running = None;
        match &mut self.action {
            Action::Jumping(arc) => {
                self.position.y = arc.advance(dt);
                if arc.is_finished() {
                    back_to_running = Some(PlayerEvent::Landed);
                }
            }
            Action::Sliding { recover_in } => {
                *recover_in -= dt;
                if *recover_in <= 0.0 {
                    back_to_running = Some(PlayerEvent::SlideRecovered);
                }
            }
            Action::Running | Action::Stumbling => {}
        }

        if let Some(event) = back_to_running {
            // Absorb drift from the chained tweens
            self.position.y = GROUND_Y;
            self.action = Action::Running;
            if event == PlayerEvent::Landed {
                self.animator
                    .cross_fade_to(Clip::Running, tuning.jump_fade, LoopMode::Repeat);
            }
            events.push(event);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> (Player, Tuning) {
        let tuning = Tuning::default();
        (Player::new(tuning.clips), tuning)
    }

    fn run_for(player: &mut Player, tuning: &Tuning, seconds: f32) -> Vec<PlayerEvent> {
        let dt = 1.0 / 64.0;
        let steps = (seconds / dt).round() as usize;
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(player.advance(dt, tuning));
        }
        events
    }

    #[test]
    fn test_lane_change_eases_and_settles() {
        let (mut p, t) = player();
        p.move_left(&t);
        assert_eq!(p.lane(), Lane::Left);
        assert_eq!(p.facing, FACING_LEFT);

        p.advance(0.1, &t);
        // Ease-out: more than halfway after half the time
        assert!(p.position.x < -9.0 && p.position.x > -18.0);

        let events = p.advance(0.2, &t);
        assert!(events.contains(&PlayerEvent::LaneReached(Lane::Left)));
        assert_eq!(p.position.x, -LANE_OFFSET);
        assert_eq!(p.facing, FACING_FORWARD);

        // Already in the leftmost lane
        p.move_left(&t);
        assert_eq!(p.facing, FACING_FORWARD);
        let events = p.advance(0.3, &t);
        assert!(events.is_empty());
        assert_eq!(p.position.x, -LANE_OFFSET);
    }

    #[test]
    fn test_lane_change_retargets() {
        let (mut p, t) = player();
        p.move_right(&t);
        p.advance(0.05, &t);
        let mid = p.position.x;
        assert!(mid > 0.0 && mid < LANE_OFFSET);

        // Latest call wins: head back to the center from wherever we are
        p.move_left(&t);
        assert_eq!(p.lane(), Lane::Center);
        p.advance(0.3, &t);
        assert_eq!(p.position.x, 0.0);
    }

    #[test]
    fn test_jump_arc_lands_on_ground() {
        let (mut p, t) = player();
        assert!(p.jump(&t));
        assert_eq!(p.state(), ActionState::Jumping);
        assert_eq!(p.animator.current(), Clip::Jumping);
        assert!(!p.jump(&t));

        p.advance(0.4, &t);
        assert!((p.position.y - (GROUND_Y + t.jump_height)).abs() < 1e-3);

        let events = p.advance(0.6, &t);
        assert!(events.contains(&PlayerEvent::Landed));
        assert_eq!(p.state(), ActionState::Running);
        assert_eq!(p.position.y, GROUND_Y);
        assert_eq!(p.animator.current(), Clip::Running);
        assert_eq!(p.animator.fading_out(), Some(Clip::Jumping));
    }

    #[test]
    fn test_slide_recovers_after_hold() {
        let (mut p, t) = player();
        assert!(p.slide(&t));
        assert_eq!(p.state(), ActionState::Sliding);
        assert_eq!(p.position.y, GROUND_Y - t.slide_drop);
        assert_eq!(p.animator.fading_out(), Some(Clip::Sliding));
        assert!(!p.slide(&t));

        let events = run_for(&mut p, &t, 0.75);
        assert!(events.is_empty());
        assert_eq!(p.state(), ActionState::Sliding);

        let events = run_for(&mut p, &t, 0.1);
        assert!(events.contains(&PlayerEvent::SlideRecovered));
        assert_eq!(p.state(), ActionState::Running);
        assert_eq!(p.position.y, GROUND_Y);
    }

    #[test]
    fn test_slide_mid_jump_cancels_arc() {
        let (mut p, t) = player();
        p.jump(&t);
        p.advance(0.2, &t);
        assert!(p.position.y > GROUND_Y);

        assert!(p.slide(&t));
        assert_eq!(p.state(), ActionState::Sliding);
        assert_eq!(p.position.y, GROUND_Y - t.slide_drop);

        // The cancelled arc never moves the player again
        let events = run_for(&mut p, &t, 0.5);
        assert!(!events.contains(&PlayerEvent::Landed));
        assert_eq!(p.position.y, GROUND_Y - t.slide_drop);
    }

    #[test]
    fn test_slide_then_jump_drops_pending_recovery() {
        let (mut p, t) = player();
        p.slide(&t);
        p.advance(0.5, &t);
        assert!(p.jump(&t));
        assert_eq!(p.state(), ActionState::Jumping);
        assert_eq!(p.position.y, GROUND_Y);

        // Past the point the slide would have recovered: still airborne
        p.advance(0.35, &t);
        assert_eq!(p.state(), ActionState::Jumping);
        assert!(p.position.y > GROUND_Y);

        let events = run_for(&mut p, &t, 1.0);
        assert!(!events.contains(&PlayerEvent::SlideRecovered));
        assert!(events.contains(&PlayerEvent::Landed));
        assert_eq!(p.position.y, GROUND_Y);
    }

    #[test]
    fn test_stumble_is_terminal_until_reset() {
        let (mut p, t) = player();
        p.jump(&t);
        p.advance(0.1, &t);
        assert!(p.stumble(&t));
        assert!(!p.stumble(&t));
        assert_eq!(p.position.y, GROUND_Y);
        assert_eq!(p.animator.current(), Clip::Stumbling);

        assert!(!p.jump(&t));
        assert!(!p.slide(&t));
        p.move_left(&t);
        assert_eq!(p.lane(), Lane::Center);
        run_for(&mut p, &t, 2.0);
        assert_eq!(p.state(), ActionState::Stumbling);

        p.visible = false;
        p.reset();
        assert_eq!(p.state(), ActionState::Running);
        assert_eq!(p.animator.current(), Clip::Running);
        assert!(p.visible);
        assert_eq!(p.position, Vec3::new(0.0, GROUND_Y, PLAYER_Z));
    }

    #[test]
    fn test_collider_follows_player() {
        let (mut p, t) = player();
        let standing = p.collider();
        assert_eq!(standing.min.y, GROUND_Y - 1.0);
        assert_eq!(standing.max.y, GROUND_Y + 19.0);

        p.slide(&t);
        assert!(p.collider().max.y < standing.max.y);
    }
}
