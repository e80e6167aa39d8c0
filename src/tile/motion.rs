//! Keyframe tracks for tile lifecycle animations.
//!
//! Every function returns the keyframes plus the timing to start them with.
//! Offsets are surface pixels; `x` is always the tile's left edge in the
//! strip.

use crate::config::QueueConfig;
use crate::types::{Easing, Keyframe, Timing, Transform};

pub type Track = (Vec<Keyframe>, Timing);

/// Drop in from above and to the right, then slide left into place.
pub fn insert(x: f32, scale: f32, config: &QueueConfig) -> Track {
    let entry_x = x + config.insert_slide;
    let keyframes = vec![
        Keyframe::at(Transform::new(entry_x, -config.lift, scale)).with_easing(Easing::EaseOut),
        Keyframe::at(Transform::new(entry_x, 0.0, scale))
            .with_easing(Easing::EaseIn)
            .with_offset(0.3),
        Keyframe::at(Transform::new(x, 0.0, scale)),
    ];
    (keyframes, Timing::forwards(config.anim_duration))
}

/// Delay markers drop straight down in place, at half speed.
pub fn insert_delay_marker(x: f32, config: &QueueConfig) -> Track {
    let lifted = Transform::new(x, -config.lift, 1.0);
    let keyframes = vec![
        Keyframe::at(lifted),
        Keyframe::at(lifted).with_easing(Easing::EaseOut),
        Keyframe::at(Transform::new(x, 0.0, 1.0)),
    ];
    (keyframes, Timing::forwards(config.anim_duration * 2))
}

pub fn update(x: f32, scale: f32, config: &QueueConfig) -> Track {
    let keyframes = vec![Keyframe::at(Transform::new(x, 0.0, scale))];
    (keyframes, Timing::forwards(config.anim_duration))
}

/// Lift out of the strip.
pub fn delete(x: f32, config: &QueueConfig) -> Track {
    let keyframes = vec![Keyframe::at(Transform::new(x, -config.lift, 1.0))];
    (keyframes, Timing::forwards(config.anim_duration))
}

/// The active creature leaves through the left edge instead of lifting.
pub fn delete_active(width: f32, config: &QueueConfig) -> Track {
    let keyframes = vec![Keyframe::at(Transform::new(
        -width,
        0.0,
        config.active_scale,
    ))];
    (keyframes, Timing::forwards(config.anim_duration))
}

/// Slide left by `gap`, together with the rest of the strip.
pub fn delete_from_front(x: f32, gap: f32, scale: f32, config: &QueueConfig) -> Track {
    let keyframes = vec![Keyframe::at(Transform::new(x - gap, 0.0, scale))];
    (keyframes, Timing::forwards(config.anim_duration))
}

/// Decaying bounce: amplitude `height / (k + 1)^2` for bounce `k`.
pub fn bounce(x: f32, height: f32, scale: f32, config: &QueueConfig) -> Track {
    let resting = Keyframe::at(Transform::new(x, 0.0, scale));
    let mut keyframes = vec![resting];
    for k in 0..config.bounce_count {
        let amplitude = height * (1.0 / (k as f32 + 1.0)).powi(2);
        keyframes.push(Keyframe::at(Transform::new(x, amplitude, scale)));
        keyframes.push(resting);
    }
    (keyframes, Timing::once(config.bounce_duration()))
}
