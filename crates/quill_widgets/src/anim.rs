//! Time based 0..1 transitions

use quill_core::State;

/// Move `value` towards 1 while `on`, towards 0 otherwise
///
/// `speed` is in units per second. Another animation frame is requested
/// until the end is reached.
pub fn animate(state: &mut State, value: &mut f32, speed: f32, on: bool) {
    let step = state.animation_speed() * speed;
    if on {
        *value += step;
        if *value >= 1.0 {
            *value = 1.0;
        } else {
            state.request_animation();
        }
    } else {
        *value -= step;
        if *value <= 0.0 {
            *value = 0.0;
        } else {
            state.request_animation();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::BackendState;
    use std::time::{Duration, Instant};

    #[test]
    fn test_first_frame_requests_animation() {
        let mut s = BackendState::new();
        let mut v = 0.0;
        animate(&mut s, &mut v, 8.0, true);
        assert_eq!(v, 0.0);
        assert!(s.animation_requested());
    }

    #[test]
    fn test_value_saturates() {
        let mut s = BackendState::new();
        let t0 = Instant::now();
        s.reset_requests_at(t0);
        s.request_animation();
        s.reset_requests_at(t0 + Duration::from_millis(100));
        let mut v = 0.5;
        animate(&mut s, &mut v, 8.0, true);
        assert_eq!(v, 1.0);
        assert!(!s.animation_requested());

        let mut v = 0.5;
        animate(&mut s, &mut v, 8.0, false);
        assert_eq!(v, 0.0);
        assert!(!s.animation_requested());
    }

    #[test]
    fn test_at_rest_value_stays_quiet() {
        let mut s = BackendState::new();
        let mut v = 0.0;
        animate(&mut s, &mut v, 8.0, false);
        assert_eq!(v, 0.0);
        assert!(!s.animation_requested());
    }
}
