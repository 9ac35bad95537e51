//! Pure, deterministic, side-effect-free functions over `Vec2`/`Ship`/`Sun`. No
//! function here consults wall-clock time, RNG, or any other impure source.

use super::vec2::Vec2;

/// Inverse-square attraction toward `sun_pos`, magnitude-clamped to `a_max`.
/// Returns zero when `mass` is zero or the ship is exactly on top of the sun
/// (both cases would otherwise divide by zero).
pub fn gravity_accel(ship_pos: Vec2, sun_pos: Vec2, mass: f64, g: f64, a_max: f64) -> Vec2 {
    let d = sun_pos.sub(ship_pos);
    let dist_sq = d.length_squared();
    if mass == 0.0 || dist_sq == 0.0 {
        return Vec2::ZERO;
    }
    let magnitude = (g * mass / dist_sq).min(a_max);
    d.normalize().scale(magnitude)
}

/// Semi-implicit (symplectic) Euler: velocity updates first, then position
/// uses the *new* velocity. Accepts any finite `dt`, including zero or
/// negative.
pub fn semi_implicit_euler(pos: Vec2, vel: Vec2, accel: Vec2, dt: f64) -> (Vec2, Vec2) {
    let new_vel = vel.add(accel.scale(dt));
    let new_pos = pos.add(new_vel.scale(dt));
    (new_pos, new_vel)
}

/// Inclusive-boundary squared-distance collision test, ship against the sun.
pub fn ship_sun_hit(ship_pos: Vec2, sun_pos: Vec2, sun_radius: f32) -> bool {
    ship_pos.sub(sun_pos).length_squared() <= (sun_radius as f64) * (sun_radius as f64)
}

/// Inclusive-boundary squared-distance collision test, ship against a pallet.
pub fn ship_pallet_hit(ship_pos: Vec2, pallet_pos: Vec2, pickup_radius: f64) -> bool {
    ship_pos.sub(pallet_pos).length_squared() <= pickup_radius * pickup_radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_is_zero_with_no_mass() {
        let a = gravity_accel(Vec2::new(10.0, 0.0), Vec2::ZERO, 0.0, 1.0, 100.0);
        assert_eq!(a, Vec2::ZERO);
    }

    #[test]
    fn gravity_is_zero_at_zero_distance() {
        let a = gravity_accel(Vec2::ZERO, Vec2::ZERO, 1000.0, 1.0, 100.0);
        assert_eq!(a, Vec2::ZERO);
    }

    #[test]
    fn gravity_points_toward_sun_and_is_clamped() {
        let ship = Vec2::new(1.0, 0.0);
        let sun = Vec2::ZERO;
        let a = gravity_accel(ship, sun, 1000.0, 1.0, 100.0);
        // Distance is 1, so unclamped magnitude would be 1000; aMax clamps to 100.
        assert!((a.length() - 100.0).abs() < 1e-9);
        let dir = sun.sub(ship).normalize();
        assert!((a.normalize().dot(dir) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn gravity_never_exceeds_a_max() {
        let a = gravity_accel(Vec2::new(0.001, 0.0), Vec2::ZERO, 1_000_000.0, 1.0, 100.0);
        assert!(a.length() <= 100.0 + 1e-9);
    }

    #[test]
    fn integration_updates_velocity_before_position() {
        let (pos, vel) = semi_implicit_euler(Vec2::ZERO, Vec2::ZERO, Vec2::new(30.0, 0.0), 1.0);
        assert_eq!(vel, Vec2::new(30.0, 0.0));
        // pos uses the *new* velocity, not the old one.
        assert_eq!(pos, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn integration_accepts_negative_and_zero_dt() {
        let (pos, vel) = semi_implicit_euler(Vec2::new(1.0, 1.0), Vec2::ZERO, Vec2::new(1.0, 1.0), 0.0);
        assert_eq!(vel, Vec2::ZERO);
        assert_eq!(pos, Vec2::new(1.0, 1.0));

        let (_, vel) = semi_implicit_euler(Vec2::ZERO, Vec2::ZERO, Vec2::new(1.0, 0.0), -1.0);
        assert_eq!(vel, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn collision_boundary_is_inclusive() {
        assert!(ship_sun_hit(Vec2::new(50.0, 0.0), Vec2::ZERO, 50.0));
        assert!(!ship_sun_hit(Vec2::new(50.0001, 0.0), Vec2::ZERO, 50.0));
        assert!(ship_pallet_hit(Vec2::new(1.2, 0.0), Vec2::ZERO, 1.2));
        assert!(!ship_pallet_hit(Vec2::new(1.2001, 0.0), Vec2::ZERO, 1.2));
    }
}
