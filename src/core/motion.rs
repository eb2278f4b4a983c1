/// Easing helpers shared by the reveal and particle animations.

/// Linear progress of an animation that starts after `delay` and runs for
/// `duration`, clamped to `[0, 1]`.
pub fn progress(elapsed: f32, delay: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return if elapsed >= delay { 1.0 } else { 0.0 };
    }
    ((elapsed - delay) / duration).clamp(0.0, 1.0)
}

/// Smoothstep ease-in-out.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Ease-out with an overshoot past 1.0 before settling, approximating a
/// spring. `bounce` of 0 is a plain cubic ease-out.
pub fn spring_out(t: f32, bounce: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let overshoot = bounce.max(0.0) * 5.0;
    let u = t - 1.0;
    1.0 + (overshoot + 1.0) * u * u * u + overshoot * u * u
}

/// Linear interpolation.
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Triangle keyframes `0 → 1 → 0` over `t` in `[0, 1]`.
pub fn pulse(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (2.0 * t - 1.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_clamps() {
        assert_eq!(progress(0.0, 1.0, 2.0), 0.0);
        assert_eq!(progress(2.0, 1.0, 2.0), 0.5);
        assert_eq!(progress(9.0, 1.0, 2.0), 1.0);
        assert_eq!(progress(1.0, 1.0, 0.0), 1.0);
    }

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((spring_out(0.0, 0.3)).abs() < 1e-6);
        assert!((spring_out(1.0, 0.3) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn spring_overshoots() {
        let peak = (1..100)
            .map(|i| spring_out(i as f32 / 100.0, 0.3))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn pulse_peaks_in_middle() {
        assert_eq!(pulse(0.0), 0.0);
        assert_eq!(pulse(0.5), 1.0);
        assert_eq!(pulse(1.0), 0.0);
    }
}
