//! Transient visual feedback.
//!
//! Every effect kind is a list of [`LayerSpec`] descriptors. The spawner keeps
//! the live effects and [`EffectSpawner::sample`] interpolates each layer for
//! the current frame, so the renderer only has to draw circles.

use crate::geometry::Point;
use derive_more::{Display, From, Into};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub const RIPPLE_TTL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct EffectId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseOut,
    EaseInOut,
    EaseOutBack,
}

impl Easing {
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseOutBack => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Filled disc.
    Disc,
    /// Stroked circle outline.
    Ring,
    /// Outline drawn clockwise from 12 o'clock up to `progress`.
    ProgressRing,
}

/// The animatable properties of a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub scale: f64,
    pub opacity: f64,
    pub stroke: f64,
    pub progress: f64,
}

impl Visual {
    pub const fn new(scale: f64, opacity: f64) -> Self {
        Self {
            scale,
            opacity,
            stroke: 0.0,
            progress: 1.0,
        }
    }

    pub const fn stroke(self, stroke: f64) -> Self {
        Self { stroke, ..self }
    }

    pub const fn progress(self, progress: f64) -> Self {
        Self { progress, ..self }
    }

    fn lerp(&self, to: &Visual, t: f64) -> Visual {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Visual {
            scale: mix(self.scale, to.scale),
            opacity: mix(self.opacity, to.opacity),
            stroke: mix(self.stroke, to.stroke),
            progress: mix(self.progress, to.progress),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSpec {
    pub shape: Shape,
    pub diameter: f64,
    pub from: Visual,
    pub to: Visual,
    pub duration: Duration,
    pub easing: Easing,
}

impl LayerSpec {
    fn at(&self, elapsed: Duration) -> Visual {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        self.from.lerp(&self.to, self.easing.apply(t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Ripple,
    ChargeIndicator { duration: Duration },
    SuccessBurst,
}

impl EffectKind {
    pub fn layers(&self) -> Vec<LayerSpec> {
        use Easing::*;
        use Shape::*;

        let ms = Duration::from_millis;
        match *self {
            Self::Ripple => vec![
                LayerSpec {
                    shape: Ring,
                    diameter: 100.0,
                    from: Visual::new(0.0, 0.6).stroke(3.0),
                    to: Visual::new(4.0, 0.0),
                    duration: ms(1000),
                    easing: EaseOut,
                },
                LayerSpec {
                    shape: Disc,
                    diameter: 20.0,
                    from: Visual::new(0.0, 1.0),
                    to: Visual::new(2.0, 0.0),
                    duration: ms(600),
                    easing: EaseOut,
                },
            ],
            Self::ChargeIndicator { duration } => vec![
                LayerSpec {
                    shape: Disc,
                    diameter: 16.0,
                    from: Visual::new(0.0, 0.0),
                    to: Visual::new(1.0, 1.0),
                    duration: ms(300),
                    easing: EaseOut,
                },
                LayerSpec {
                    shape: Disc,
                    diameter: 80.0,
                    from: Visual::new(0.5, 0.0),
                    to: Visual::new(1.2, 0.4),
                    duration,
                    easing: EaseInOut,
                },
                LayerSpec {
                    shape: Ring,
                    diameter: 104.0,
                    from: Visual::new(1.0, 0.2).stroke(2.0),
                    to: Visual::new(1.0, 0.2).stroke(2.0),
                    duration: Duration::ZERO,
                    easing: Linear,
                },
                LayerSpec {
                    shape: ProgressRing,
                    diameter: 104.0,
                    from: Visual::new(1.0, 0.0).stroke(4.0).progress(0.0),
                    to: Visual::new(1.0, 1.0).stroke(4.0).progress(1.0),
                    duration,
                    easing: Linear,
                },
            ],
            Self::SuccessBurst => vec![
                LayerSpec {
                    shape: Ring,
                    diameter: 160.0,
                    from: Visual::new(0.0, 1.0).stroke(8.0),
                    to: Visual::new(4.0, 0.0),
                    duration: ms(800),
                    easing: EaseOut,
                },
                LayerSpec {
                    shape: Ring,
                    diameter: 160.0,
                    from: Visual::new(0.0, 0.8).stroke(1.0),
                    to: Visual::new(2.5, 0.0).stroke(1.0),
                    duration: ms(500),
                    easing: EaseOut,
                },
                LayerSpec {
                    shape: Disc,
                    diameter: 48.0,
                    from: Visual::new(0.0, 1.0),
                    to: Visual::new(1.5, 0.0),
                    duration: ms(400),
                    easing: EaseOut,
                },
            ],
        }
    }

    /// How long the effect stays alive. `None` means until cancelled.
    pub fn lifetime(&self) -> Option<Duration> {
        match self {
            Self::Ripple => Some(RIPPLE_TTL),
            Self::ChargeIndicator { .. } => None,
            Self::SuccessBurst => self.layers().iter().map(|l| l.duration).max(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Effect {
    pub id: EffectId,
    pub kind: EffectKind,
    pub position: Point,
    pub created_at: Instant,
}

impl Effect {
    fn expired(&self, now: Instant) -> bool {
        self.kind
            .lifetime()
            .is_some_and(|ttl| now.saturating_duration_since(self.created_at) >= ttl)
    }
}

/// A layer resolved for one frame, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledLayer {
    pub shape: Shape,
    pub center: Point,
    pub radius: f64,
    pub visual: Visual,
}

#[derive(Debug, Default)]
pub struct EffectSpawner {
    effects: BTreeMap<EffectId, Effect>,
    next_id: u64,
}

impl EffectSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn(&mut self, kind: EffectKind, position: Point, now: Instant) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        log::trace!("spawn effect {} {:?} at {:?}", id, kind, position);
        self.effects.insert(
            id,
            Effect {
                id,
                kind,
                position,
                created_at: now,
            },
        );
        id
    }

    pub fn spawn_ripple(&mut self, position: Point, now: Instant) -> EffectId {
        self.spawn(EffectKind::Ripple, position, now)
    }

    pub fn spawn_charge_indicator(
        &mut self,
        position: Point,
        duration: Duration,
        now: Instant,
    ) -> EffectId {
        self.spawn(EffectKind::ChargeIndicator { duration }, position, now)
    }

    pub fn spawn_success_burst(&mut self, position: Point, now: Instant) -> EffectId {
        self.spawn(EffectKind::SuccessBurst, position, now)
    }

    pub fn cancel(&mut self, id: EffectId) -> bool {
        self.effects.remove(&id).is_some()
    }

    /// Drops every effect whose lifetime is over. Returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.effects.len();
        self.effects.retain(|_, effect| !effect.expired(now));
        before - self.effects.len()
    }

    pub fn get(&self, id: EffectId) -> Option<&Effect> {
        self.effects.get(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn count(&self, pred: impl Fn(&EffectKind) -> bool) -> usize {
        self.effects.values().filter(|e| pred(&e.kind)).count()
    }

    pub fn sample(&self, now: Instant) -> Vec<SampledLayer> {
        self.effects
            .values()
            .flat_map(|effect| {
                let elapsed = now.saturating_duration_since(effect.created_at);
                effect.kind.layers().into_iter().map(move |layer| {
                    let visual = layer.at(elapsed);
                    SampledLayer {
                        shape: layer.shape,
                        center: effect.position,
                        radius: layer.diameter / 2.0 * visual.scale,
                        visual,
                    }
                })
            })
            .filter(|layer| layer.visual.opacity > 0.0 && layer.radius > 0.0)
            .collect()
    }
}
