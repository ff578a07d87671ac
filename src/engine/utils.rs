use std::time::{SystemTime, UNIX_EPOCH};

pub(super) fn now_ms() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    now as u64
}

pub(super) fn offset_along(x: f32, y: f32, angle: f32, dist: f32) -> (f32, f32) {
    (x + angle.cos() * dist, y + angle.sin() * dist)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_follows_the_facing_angle() {
        let (x, y) = offset_along(10.0, 20.0, 0.0, 5.0);
        assert!((x - 15.0).abs() < 1e-5);
        assert!((y - 20.0).abs() < 1e-5);

        let (x, y) = offset_along(10.0, 20.0, std::f32::consts::FRAC_PI_2, 5.0);
        assert!((x - 10.0).abs() < 1e-5);
        assert!((y - 25.0).abs() < 1e-5);
    }
}
