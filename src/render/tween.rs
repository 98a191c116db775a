use glam::Vec2;

/// Overshoot leg of a hit reaction, in seconds.
pub const KNOCKBACK_OUT: f32 = 0.07;
/// Ease back to the authoritative position, in seconds.
pub const KNOCKBACK_BACK: f32 = 0.12;
/// How far a hit pushes the sprite, in pixels.
pub const KNOCKBACK_DISTANCE: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadOut,
}

impl Easing {
    fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// Interpolated movement between two pixel positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub start: Vec2,
    pub end: Vec2,
    pub elapsed: f32,
    pub duration: f32, // seconds
    pub easing: Easing,
}

impl Tween {
    pub fn new(start: Vec2, end: Vec2, duration: f32, easing: Easing) -> Self {
        Self {
            start,
            end,
            elapsed: 0.0,
            duration,
            easing,
        }
    }

    pub fn linear(start: Vec2, end: Vec2, duration: f32) -> Self {
        Self::new(start, end, duration, Easing::Linear)
    }

    /// Advances by `dt`, returning the sampled position and any time left
    /// over once the tween has finished.
    pub fn step(&mut self, dt: f32) -> (Vec2, Option<f32>) {
        self.elapsed += dt;
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            let overflow = (self.elapsed - self.duration.max(0.0)).max(0.0);
            return (self.end, Some(overflow));
        }
        let t = self.easing.apply((self.elapsed / self.duration).clamp(0.0, 1.0));
        (self.start.lerp(self.end, t), None)
    }
}

/// Two-phase hit reaction: a short push away from `impact`, then an ease back
/// to `rest`. The sequence always ends exactly on `rest`.
pub fn knockback(from: Vec2, impact: Vec2, rest: Vec2) -> [Tween; 2] {
    let away = (rest - impact).normalize_or_zero();
    let away = if away == Vec2::ZERO { Vec2::Y } else { away };
    let peak = rest + away * KNOCKBACK_DISTANCE;
    [
        Tween::linear(from, peak, KNOCKBACK_OUT),
        Tween::new(peak, rest, KNOCKBACK_BACK, Easing::QuadOut),
    ]
}
