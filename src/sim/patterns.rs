//! Obstacle and coin pattern libraries
//!
//! A pattern is an immutable layout of shapes placed relative to one
//! container. Libraries are built once at load time and shared read-only;
//! slots refer to patterns by index and never mutate them.

use glam::Vec3;
use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_PICKUPS;

/// Source models that patterns instantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Tall carriage blocking a whole lane
    Train,
    /// Low log lying across a lane (jump over)
    Log,
    /// Low trunk, used by the moving pattern
    Trunk,
    /// Overhead barrier (slide under)
    Barrier,
    /// Collectible coin
    Coin,
}

impl ShapeKind {
    /// Half size of the unscaled model
    pub fn model_half_extents(self) -> Vec3 {
        match self {
            ShapeKind::Train => Vec3::new(175.0, 500.0, 500.0),
            ShapeKind::Log => Vec3::new(133.0, 66.0, 50.0),
            ShapeKind::Trunk => Vec3::new(90.0, 45.0, 35.0),
            ShapeKind::Barrier => Vec3::new(3000.0, 2000.0, 1500.0),
            ShapeKind::Coin => Vec3::new(100.0, 100.0, 30.0),
        }
    }
}

/// One shape placed inside a pattern container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeTemplate {
    pub kind: ShapeKind,
    /// Offset from the container origin
    pub offset: Vec3,
    /// Uniform model scale
    pub scale: f32,
}

impl ShapeTemplate {
    pub fn new(kind: ShapeKind, offset: Vec3, scale: f32) -> Self {
        Self {
            kind,
            offset,
            scale,
        }
    }

    /// World-space half size of the placed shape (before rotation)
    pub fn half_extents(&self) -> Vec3 {
        self.kind.model_half_extents() * self.scale
    }
}

/// What the player has to do to get past an obstacle pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Maneuver {
    Jump,
    Slide,
    Dodge,
}

/// Layout of hazards for one obstacle slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePattern {
    pub name: String,
    pub maneuver: Maneuver,
    /// Drifts sideways with a matching wobble while in a slot
    #[serde(default)]
    pub oscillates: bool,
    pub hazards: Vec<ShapeTemplate>,
}

/// Layout of pickups for the coin slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinPattern {
    pub name: String,
    pub pickups: Vec<ShapeTemplate>,
}

/// Shared behavior of the two pattern kinds
pub trait Pattern {
    /// Fewest patterns a usable library may hold
    const MIN_LIBRARY_LEN: usize;
    /// Most shapes one pattern may hold
    const MAX_SHAPES: usize;

    fn name(&self) -> &str;
    fn shapes(&self) -> &[ShapeTemplate];
}

impl Pattern for ObstaclePattern {
    // Two slots must always be able to hold different patterns
    const MIN_LIBRARY_LEN: usize = 2;
    const MAX_SHAPES: usize = 16;

    fn name(&self) -> &str {
        &self.name
    }

    fn shapes(&self) -> &[ShapeTemplate] {
        &self.hazards
    }
}

impl Pattern for CoinPattern {
    const MIN_LIBRARY_LEN: usize = 1;
    const MAX_SHAPES: usize = MAX_PICKUPS;

    fn name(&self) -> &str {
        &self.name
    }

    fn shapes(&self) -> &[ShapeTemplate] {
        &self.pickups
    }
}

/// Why a pattern library was rejected
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("pattern library has {found} patterns, needs at least {required}")]
    TooFewPatterns { found: usize, required: usize },
    #[error("pattern '{0}' has no shapes")]
    EmptyPattern(String),
    #[error("pattern '{pattern}' has {found} shapes, max is {max}")]
    TooManyShapes { pattern: String, found: usize, max: usize },
    #[error("pattern pack parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A validated, immutable catalog of patterns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternLibrary<P> {
    patterns: Vec<P>,
}

pub type ObstacleLibrary = PatternLibrary<ObstaclePattern>;
pub type CoinLibrary = PatternLibrary<CoinPattern>;

impl<P: Pattern> PatternLibrary<P> {
    /// Validate and freeze a set of patterns
    pub fn new(patterns: Vec<P>) -> Result<Self, LibraryError> {
        if patterns.len() < P::MIN_LIBRARY_LEN {
            return Err(LibraryError::TooFewPatterns {
                found: patterns.len(),
                required: P::MIN_LIBRARY_LEN,
            });
        }
        for pattern in &patterns {
            let count = pattern.shapes().len();
            if count == 0 {
                return Err(LibraryError::EmptyPattern(pattern.name().to_string()));
            }
            if count > P::MAX_SHAPES {
                return Err(LibraryError::TooManyShapes {
                    pattern: pattern.name().to_string(),
                    found: count,
                    max: P::MAX_SHAPES,
                });
            }
        }
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&P> {
        self.patterns.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.patterns.iter()
    }

    /// Index of the pattern with `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.patterns.iter().position(|p| p.name() == name)
    }

    /// Uniform pick over the whole library
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.patterns.len())
    }

    /// Uniform pick over the library minus `excluded`
    ///
    /// Samples the remaining set directly, so it always terminates. Returns
    /// `None` only if every pattern is excluded.
    pub fn pick_excluding<R: Rng + ?Sized>(&self, rng: &mut R, excluded: &[usize]) -> Option<usize> {
        (0..self.patterns.len())
            .filter(|i| !excluded.contains(i))
            .choose(rng)
    }
}

impl<P: Pattern + for<'de> Deserialize<'de>> PatternLibrary<P> {
    /// Load a pattern pack (a JSON array of patterns) and validate it
    pub fn from_json(json: &str) -> Result<Self, LibraryError> {
        let patterns: Vec<P> = serde_json::from_str(json)?;
        Self::new(patterns)
    }
}

const TRAIN_SCALE: f32 = 0.04;
const LOG_SCALE: f32 = 0.06;
const TRUNK_SCALE: f32 = 0.09;
const BARRIER_SCALE: f32 = 0.002;
const COIN_SCALE: f32 = 0.035;

fn train(x: f32) -> ShapeTemplate {
    ShapeTemplate::new(ShapeKind::Train, Vec3::new(x, -20.0, 0.0), TRAIN_SCALE)
}

fn log_across(x: f32) -> ShapeTemplate {
    ShapeTemplate::new(ShapeKind::Log, Vec3::new(x, -31.0, 0.0), LOG_SCALE)
}

fn barrier(x: f32) -> ShapeTemplate {
    ShapeTemplate::new(ShapeKind::Barrier, Vec3::new(x, -15.0, 3.0), BARRIER_SCALE)
}

fn obstacle(name: &str, maneuver: Maneuver, hazards: Vec<ShapeTemplate>) -> ObstaclePattern {
    ObstaclePattern {
        name: name.to_string(),
        maneuver,
        oscillates: false,
        hazards,
    }
}

/// The built-in obstacle catalog
///
/// Index 0 is the moving pattern; the rest cover jump-required,
/// slide-required and lane-blocking layouts for every lane.
pub fn standard_obstacles() -> Result<ObstacleLibrary, LibraryError> {
    let patterns = vec![
        ObstaclePattern {
            name: "moving_logs".to_string(),
            maneuver: Maneuver::Jump,
            oscillates: true,
            hazards: vec![
                ShapeTemplate::new(ShapeKind::Trunk, Vec3::new(42.0, -31.0, 0.0), TRUNK_SCALE),
                log_across(-8.0),
            ],
        },
        obstacle("left_jump", Maneuver::Jump, vec![log_across(-18.0), train(0.0), train(20.0)]),
        obstacle("center_jump", Maneuver::Jump, vec![train(-23.0), train(23.0), log_across(0.0)]),
        obstacle("right_jump", Maneuver::Jump, vec![train(-23.0), train(-1.0), log_across(23.0)]),
        obstacle("right_center_block", Maneuver::Dodge, vec![train(0.0), train(24.0)]),
        obstacle("left_slide", Maneuver::Slide, vec![train(23.0), train(0.0), barrier(-21.0)]),
        obstacle("left_center_block", Maneuver::Dodge, vec![train(-23.0), train(0.0)]),
        obstacle("left_right_block", Maneuver::Dodge, vec![train(-23.0), train(23.0)]),
        obstacle("center_slide", Maneuver::Slide, vec![train(-24.0), train(23.0), barrier(0.0)]),
        obstacle("right_slide", Maneuver::Slide, vec![train(-24.0), train(0.0), barrier(20.0)]),
    ];
    let library = PatternLibrary::new(patterns)?;
    log::info!("Obstacle library ready ({} patterns)", library.len());
    Ok(library)
}

const COIN_ROWS: usize = 5;
const COIN_ROW_SPACING: f32 = 20.0;

fn coin_rows(name: &str, lanes: &[f32]) -> CoinPattern {
    let mut pickups = Vec::with_capacity(COIN_ROWS * lanes.len());
    for row in 0..COIN_ROWS {
        for &x in lanes {
            pickups.push(ShapeTemplate::new(
                ShapeKind::Coin,
                Vec3::new(x, -12.0, -(row as f32) * COIN_ROW_SPACING),
                COIN_SCALE,
            ));
        }
    }
    CoinPattern {
        name: name.to_string(),
        pickups,
    }
}

/// The built-in coin catalog: five rows along one or more lanes
pub fn standard_coins() -> Result<CoinLibrary, LibraryError> {
    use crate::consts::LANE_OFFSET as L;

    let patterns = vec![
        coin_rows("all_lanes", &[-L, 0.0, L]),
        coin_rows("left", &[-L]),
        coin_rows("left_center", &[-L, 0.0]),
        coin_rows("center_right", &[0.0, L]),
        coin_rows("right", &[L]),
    ];
    let library = PatternLibrary::new(patterns)?;
    log::info!("Coin library ready ({} patterns)", library.len());
    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_standard_catalogs() {
        let obstacles = standard_obstacles().unwrap();
        let coins = standard_coins().unwrap();

        assert!(obstacles.len() >= 8);
        assert!(coins.len() >= 5);

        for maneuver in [Maneuver::Jump, Maneuver::Slide, Maneuver::Dodge] {
            assert!(obstacles.iter().any(|p| p.maneuver == maneuver));
        }
        // Only the first pattern moves
        assert!(obstacles.get(0).is_some_and(|p| p.oscillates));
        assert_eq!(obstacles.iter().filter(|p| p.oscillates).count(), 1);

        for pattern in coins.iter() {
            assert!((1..=MAX_PICKUPS).contains(&pattern.pickups.len()));
        }
        assert_eq!(coins.get(0).map(|p| p.pickups.len()), Some(15));
    }

    #[test]
    fn test_library_needs_two_obstacles() {
        let one = vec![obstacle("solo", Maneuver::Dodge, vec![train(0.0)])];
        let err = ObstacleLibrary::new(one).unwrap_err();
        assert!(matches!(
            err,
            LibraryError::TooFewPatterns {
                found: 1,
                required: 2
            }
        ));
        assert_eq!(err.to_string(), "pattern library has 1 patterns, needs at least 2");
    }

    #[test]
    fn test_library_rejects_empty_and_oversized() {
        let empty = vec![
            obstacle("a", Maneuver::Dodge, vec![train(0.0)]),
            obstacle("b", Maneuver::Dodge, vec![]),
        ];
        assert!(matches!(
            ObstacleLibrary::new(empty),
            Err(LibraryError::EmptyPattern(name)) if name == "b"
        ));

        let big = CoinPattern {
            name: "big".to_string(),
            pickups: vec![ShapeTemplate::new(ShapeKind::Coin, Vec3::ZERO, COIN_SCALE); 16],
        };
        let err = CoinLibrary::new(vec![big]).unwrap_err();
        assert!(matches!(err, LibraryError::TooManyShapes { found: 16, .. }));
        assert_eq!(err.to_string(), "pattern 'big' has 16 shapes, max is 15");
    }

    #[test]
    fn test_pick_excluding_never_returns_excluded() {
        let library = standard_obstacles().unwrap();
        let mut rng = Pcg32::seed_from_u64(7);
        for excluded in 0..library.len() {
            for _ in 0..200 {
                let pick = library.pick_excluding(&mut rng, &[excluded]).unwrap();
                assert_ne!(pick, excluded);
                assert!(pick < library.len());
            }
        }
    }

    #[test]
    fn test_pick_excluding_two_pattern_library_is_forced() {
        let library = ObstacleLibrary::new(vec![
            obstacle("a", Maneuver::Dodge, vec![train(0.0)]),
            obstacle("b", Maneuver::Dodge, vec![train(18.0)]),
        ])
        .unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(library.pick_excluding(&mut rng, &[0]), Some(1));
        }
        assert_eq!(library.pick_excluding(&mut rng, &[0, 1]), None);
    }

    #[test]
    fn test_json_pack_round_trip_validates() {
        let json = r#"[
            { "name": "a", "maneuver": "Dodge",
              "hazards": [ { "kind": "Train", "offset": [0.0, -20.0, 0.0], "scale": 0.04 } ] },
            { "name": "b", "maneuver": "Jump", "oscillates": true,
              "hazards": [ { "kind": "Log", "offset": [18.0, -31.0, 0.0], "scale": 0.06 } ] }
        ]"#;
        let library = ObstacleLibrary::from_json(json).expect("valid pack");
        assert_eq!(library.len(), 2);
        assert_eq!(library.position("b"), Some(1));
        assert!(library.get(1).is_some_and(|p| p.oscillates));

        let too_small = r#"[ { "name": "a", "maneuver": "Dodge",
              "hazards": [ { "kind": "Train", "offset": [0.0, 0.0, 0.0], "scale": 1.0 } ] } ]"#;
        assert!(ObstacleLibrary::from_json(too_small).is_err());
    }
}
