//! Integer world geometry shared by the condition evaluator and handlers.

use glam::IVec3;

/// One full turn in engine angle units.
pub const ANGLE_360: i32 = 4096;
pub const ANGLE_0: i32 = 0;
pub const ANGLE_45: i32 = 512;
pub const ANGLE_90: i32 = 1024;
pub const ANGLE_180: i32 = 2048;
pub const ANGLE_270: i32 = 3072;
pub const ANGLE_315: i32 = 3584;
pub const ANGLE_334: i32 = 3804;

/// Sentinel reported for unreachable, dead or far-away targets.
pub const MAX_TARGET_ACTOR_DISTANCE: i32 = 0x7D00;

/// Vertical separation beyond which planar checks treat actors as unrelated.
pub const PLANAR_HEIGHT_CUTOFF: i32 = 1500;

pub fn clamp_angle(angle: i32) -> i32 {
    angle & (ANGLE_360 - 1)
}

/// Distance on the XZ plane.
pub fn distance_2d(from: IVec3, to: IVec3) -> i32 {
    let delta = (to - from).as_dvec3();
    (delta.x * delta.x + delta.z * delta.z).sqrt() as i32
}

pub fn distance_3d(from: IVec3, to: IVec3) -> i32 {
    (to - from).as_dvec3().length() as i32
}

/// Heading from `from` towards `to`; 0 faces +Z and `ANGLE_90` faces +X.
pub fn angle_towards(from: IVec3, to: IVec3) -> i32 {
    let delta = (to - from).as_dvec3();
    if delta.x == 0.0 && delta.z == 0.0 {
        return ANGLE_0;
    }
    let radians = delta.x.atan2(delta.z);
    let units = (radians * f64::from(ANGLE_180) / std::f64::consts::PI).round() as i32;
    clamp_angle(units)
}

pub fn clamp_distance(distance: i32) -> i32 {
    if distance.abs() > MAX_TARGET_ACTOR_DISTANCE {
        MAX_TARGET_ACTOR_DISTANCE
    } else {
        distance
    }
}

/// Linear interpolation from `start` to `end` after `delay` of `max` steps.
pub fn average_value(start: i32, end: i32, max: i32, delay: i32) -> i32 {
    if delay <= 0 {
        return start;
    }
    if delay >= max {
        return end;
    }
    (end - start) * delay / max + start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_distance_ignores_height() {
        let a = IVec3::new(0, 0, 0);
        let b = IVec3::new(300, 1200, 400);
        assert_eq!(distance_2d(a, b), 500);
        assert_eq!(distance_3d(a, IVec3::new(300, 0, 400)), 500);
    }

    #[test]
    fn headings_use_engine_units() {
        let origin = IVec3::ZERO;
        assert_eq!(angle_towards(origin, IVec3::new(0, 0, 100)), ANGLE_0);
        assert_eq!(angle_towards(origin, IVec3::new(100, 0, 0)), ANGLE_90);
        assert_eq!(angle_towards(origin, IVec3::new(0, 0, -100)), ANGLE_180);
        assert_eq!(angle_towards(origin, IVec3::new(-100, 0, 0)), ANGLE_270);
        assert_eq!(clamp_angle(ANGLE_360 + ANGLE_45), ANGLE_45);
    }

    #[test]
    fn average_value_interpolates_between_bounds() {
        assert_eq!(average_value(100, 200, 100, 0), 100);
        assert_eq!(average_value(100, 200, 100, 150), 200);
        assert_eq!(average_value(100, 200, 100, 25), 125);
        assert_eq!(clamp_distance(-40000), MAX_TARGET_ACTOR_DISTANCE);
    }
}
