use escape_common::CameraConfig;
use glam::{Mat4, Vec2, Vec3};

const DEFAULT_YAW: f32 = -90.0;
const DEFAULT_PITCH: f32 = 0.0;
const MAX_PITCH: f32 = 89.0;

/// Planar walking directions, relative to where the camera faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// First-person player camera.
///
/// Walking stays on the horizontal plane at a fixed eye height; only a jump
/// moves the eye vertically, and gravity always brings it back to that
/// height. Orientation is stored as yaw/pitch in degrees and the
/// `front`/`right`/`up` basis is re-derived on every change.
#[derive(Debug, Clone)]
pub struct FirstPersonCamera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,
    fov: f32,
    eye_height: f32,
    vertical_velocity: f32,
    jumping: bool,
    /// `None` until the first cursor sample after a reset.
    last_cursor: Option<Vec2>,
    tuning: CameraConfig,
}

impl FirstPersonCamera {
    /// Camera at `position` looking down -Z, with default tuning.
    pub fn new(position: Vec3, world_up: Vec3) -> Self {
        Self::with_orientation(position, world_up, DEFAULT_YAW, DEFAULT_PITCH, CameraConfig::default())
    }

    /// Camera at `position` looking down -Z, with the given tuning.
    pub fn from_config(position: Vec3, world_up: Vec3, tuning: CameraConfig) -> Self {
        Self::with_orientation(position, world_up, DEFAULT_YAW, DEFAULT_PITCH, tuning)
    }

    /// Fully specified constructor. The eye height is taken from `position.y`.
    pub fn with_orientation(
        position: Vec3,
        world_up: Vec3,
        yaw: f32,
        pitch: f32,
        tuning: CameraConfig,
    ) -> Self {
        let tuning = sanitize_tuning(tuning);
        let mut camera = Self {
            position,
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            world_up: world_up.try_normalize().unwrap_or(Vec3::Y),
            fov: tuning.fov.clamp(tuning.fov_min, tuning.fov_max),
            eye_height: position.y,
            vertical_velocity: 0.0,
            jumping: false,
            last_cursor: None,
            tuning,
        };
        camera.update_basis();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport the camera. A grounded camera keeps its eye height.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        if !self.jumping {
            self.position.y = self.eye_height;
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    /// Vertical field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn eye_height(&self) -> f32 {
        self.eye_height
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn tuning(&self) -> &CameraConfig {
        &self.tuning
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection using the configured clip planes.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        self.projection_matrix_with_planes(aspect, self.tuning.near_plane, self.tuning.far_plane)
    }

    pub fn projection_matrix_with_planes(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        Mat4::perspective_rh(self.fov.to_radians(), aspect, near, far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Walk along the ground plane. Speed does not depend on pitch.
    pub fn process_movement(&mut self, direction: CameraMovement, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        let velocity = self.tuning.movement_speed * dt;

        let step = match direction {
            CameraMovement::Forward => flatten(self.front),
            CameraMovement::Backward => -flatten(self.front),
            CameraMovement::Left => -flatten(self.right),
            CameraMovement::Right => flatten(self.right),
        };
        self.position += step * velocity;

        if !self.jumping {
            self.position.y = self.eye_height;
        }
    }

    /// Mouse look with the pitch kept inside +/-89 degrees.
    pub fn process_look(&mut self, x: f32, y: f32) {
        self.apply_look(x, y, true);
    }

    /// Mouse look without the pitch clamp.
    pub fn process_look_unconstrained(&mut self, x: f32, y: f32) {
        self.apply_look(x, y, false);
    }

    fn apply_look(&mut self, x: f32, y: f32, constrain_pitch: bool) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let cursor = Vec2::new(x, y);
        let Some(last) = self.last_cursor.replace(cursor) else {
            return;
        };

        // Screen Y grows downward.
        let x_offset = (cursor.x - last.x) * self.tuning.mouse_sensitivity;
        let y_offset = (last.y - cursor.y) * self.tuning.mouse_sensitivity;

        self.yaw += x_offset;
        self.pitch += y_offset;
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
        }

        self.update_basis();
    }

    /// Scroll zoom: positive offsets narrow the field of view.
    pub fn process_zoom(&mut self, scroll: f32) {
        if !scroll.is_finite() {
            return;
        }
        self.fov = (self.fov - scroll * self.tuning.scroll_sensitivity)
            .clamp(self.tuning.fov_min, self.tuning.fov_max);
    }

    /// Make the next look sample a baseline instead of a rotation.
    pub fn reset_look_baseline(&mut self) {
        self.last_cursor = None;
    }

    pub fn start_jump(&mut self) {
        if !self.jumping {
            self.vertical_velocity = self.tuning.jump_speed;
            self.jumping = true;
        }
    }

    /// Advance a jump by `dt`. Landing snaps to eye height with no bounce.
    pub fn integrate_vertical(&mut self, dt: f32) {
        if !self.jumping || !(dt.is_finite() && dt > 0.0) {
            return;
        }
        self.vertical_velocity += self.tuning.gravity * dt;
        self.position.y += self.vertical_velocity * dt;

        if self.position.y <= self.eye_height {
            self.position.y = self.eye_height;
            self.vertical_velocity = 0.0;
            self.jumping = false;
        }
    }

    fn update_basis(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        // front is parallel to world_up only at an unconstrained +/-90 pitch.
        self.right = self
            .front
            .cross(self.world_up)
            .try_normalize()
            .unwrap_or(self.right);
        self.up = self.right.cross(self.front).normalize();
    }
}

fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Order the fov bounds and replace non-finite tuning with the defaults, so
/// every later clamp sees a valid range.
fn sanitize_tuning(mut tuning: CameraConfig) -> CameraConfig {
    let defaults = CameraConfig::default();
    let finite_or = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };

    let a = finite_or(tuning.fov_min, defaults.fov_min);
    let b = finite_or(tuning.fov_max, defaults.fov_max);
    tuning.fov_min = a.min(b);
    tuning.fov_max = a.max(b);
    tuning.fov = finite_or(tuning.fov, defaults.fov);
    tuning.scroll_sensitivity = finite_or(tuning.scroll_sensitivity, defaults.scroll_sensitivity);
    tuning
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn start_camera() -> FirstPersonCamera {
        FirstPersonCamera::new(Vec3::new(0.0, 1.6, 8.0), Vec3::Y)
    }

    #[test]
    fn inverted_fov_range_is_reordered() {
        let tuning = CameraConfig {
            fov: 55.0,
            fov_min: 80.0,
            fov_max: 40.0,
            ..CameraConfig::default()
        };
        let mut cam = FirstPersonCamera::from_config(Vec3::new(0.0, 1.6, 8.0), Vec3::Y, tuning);
        assert_eq!(cam.tuning().fov_min, 40.0);
        assert_eq!(cam.tuning().fov_max, 80.0);
        assert_eq!(cam.fov(), 55.0);

        cam.process_zoom(100.0);
        assert_eq!(cam.fov(), 40.0);
        cam.process_zoom(-100.0);
        assert_eq!(cam.fov(), 80.0);
    }

    #[test]
    fn non_finite_fov_tuning_falls_back_to_defaults() {
        let defaults = CameraConfig::default();
        let tuning = CameraConfig {
            fov: f32::NAN,
            fov_min: f32::NAN,
            fov_max: f32::INFINITY,
            scroll_sensitivity: f32::NAN,
            ..CameraConfig::default()
        };
        let mut cam = FirstPersonCamera::from_config(Vec3::new(0.0, 1.6, 8.0), Vec3::Y, tuning);
        assert_eq!(cam.tuning().fov_min, defaults.fov_min);
        assert_eq!(cam.tuning().fov_max, defaults.fov_max);
        assert_eq!(cam.fov(), defaults.fov);

        cam.process_zoom(3.0);
        assert!(cam.fov().is_finite());
        assert!(cam.fov() >= defaults.fov_min && cam.fov() <= defaults.fov_max);
    }

    /// Deterministic pseudo-random offsets in [-range, range].
    fn offsets(seed: u64, count: usize, range: f32) -> Vec<f32> {
        let mut state = seed;
        (0..count)
            .map(|_| {
                state = state
                    .wrapping_mul(6_364_136_223_846_793_005)
                    .wrapping_add(1_442_695_040_888_963_407);
                let unit = (state >> 40) as f32 / (1u64 << 24) as f32;
                (unit * 2.0 - 1.0) * range
            })
            .collect()
    }

    fn assert_orthonormal(cam: &FirstPersonCamera) {
        assert!((cam.front().length() - 1.0).abs() < EPS);
        assert!((cam.right().length() - 1.0).abs() < EPS);
        assert!((cam.up().length() - 1.0).abs() < EPS);
        assert!(cam.front().dot(cam.right()).abs() < EPS);
        assert!(cam.front().dot(cam.up()).abs() < EPS);
        assert!(cam.right().dot(cam.up()).abs() < EPS);
    }

    #[test]
    fn initial_state() {
        let cam = start_camera();
        assert_eq!(cam.eye_height(), 1.6);
        assert_eq!(cam.vertical_velocity(), 0.0);
        assert!(!cam.is_jumping());
        assert_eq!(cam.fov(), 55.0);
        assert!((cam.front() - Vec3::NEG_Z).length() < EPS);
        assert!((cam.right() - Vec3::X).length() < EPS);
        assert_orthonormal(&cam);
    }

    #[test]
    fn forward_moves_along_front() {
        let mut cam = start_camera();
        cam.process_movement(CameraMovement::Forward, 1.0);
        assert!((cam.position() - Vec3::new(0.0, 1.6, 1.0)).length() < EPS);
        cam.process_movement(CameraMovement::Right, 0.5);
        assert!((cam.position().x - 3.5).abs() < EPS);
    }

    #[test]
    fn walking_pins_eye_height() {
        let mut cam = start_camera();
        let dirs = [
            CameraMovement::Forward,
            CameraMovement::Left,
            CameraMovement::Backward,
            CameraMovement::Right,
        ];
        for (i, dt) in offsets(7, 200, 0.05).into_iter().enumerate() {
            cam.process_movement(dirs[i % dirs.len()], dt.abs() + 0.001);
            assert_eq!(cam.position().y, cam.eye_height());
        }
    }

    #[test]
    fn walking_speed_ignores_pitch() {
        let mut level = start_camera();
        let mut tilted = start_camera();
        tilted.process_look(0.0, 0.0);
        tilted.process_look(0.0, -200.0); // look up 60 degrees
        assert!(tilted.pitch() > 50.0);

        level.process_movement(CameraMovement::Forward, 0.5);
        tilted.process_movement(CameraMovement::Forward, 0.5);

        let d_level = (level.position() - Vec3::new(0.0, 1.6, 8.0)).length();
        let d_tilted = (tilted.position() - Vec3::new(0.0, 1.6, 8.0)).length();
        assert!((d_level - d_tilted).abs() < EPS);
        assert!((d_level - 3.5).abs() < EPS);
    }

    #[test]
    fn first_look_sample_only_sets_baseline() {
        let mut cam = start_camera();
        cam.process_look(400.0, 300.0);
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);

        cam.process_look(410.0, 290.0);
        assert!((cam.yaw() - (-87.0)).abs() < EPS);
        // cursor moved up, so pitch increases
        assert!((cam.pitch() - 3.0).abs() < EPS);
    }

    #[test]
    fn reset_baseline_suppresses_jump() {
        let mut cam = start_camera();
        cam.process_look(0.0, 0.0);
        cam.process_look(10.0, 0.0);
        let yaw = cam.yaw();

        cam.reset_look_baseline();
        cam.process_look(5000.0, 5000.0);
        assert_eq!(cam.yaw(), yaw);

        cam.process_look(5010.0, 5000.0);
        assert!((cam.yaw() - (yaw + 3.0)).abs() < EPS);
    }

    #[test]
    fn pitch_stays_clamped() {
        let mut cam = start_camera();
        let mut x = 0.0;
        let mut y = 0.0;
        cam.process_look(x, y);
        for (dx, dy) in offsets(1, 500, 5000.0).into_iter().zip(offsets(2, 500, 5000.0)) {
            x += dx;
            y += dy;
            cam.process_look(x, y);
            assert!(cam.pitch() <= 89.0 && cam.pitch() >= -89.0);
            assert_orthonormal(&cam);
        }
    }

    #[test]
    fn unconstrained_look_can_exceed_clamp() {
        let mut cam = start_camera();
        cam.process_look_unconstrained(0.0, 0.0);
        cam.process_look_unconstrained(0.0, -400.0);
        assert!(cam.pitch() > 89.0);
        assert!(cam.front().is_finite());
        assert!(cam.right().is_finite());
    }

    #[test]
    fn zoom_stays_in_range() {
        let mut cam = start_camera();
        cam.process_zoom(1.0);
        assert_eq!(cam.fov(), 53.0);
        for scroll in offsets(3, 300, 40.0) {
            cam.process_zoom(scroll);
            assert!(cam.fov() >= 30.0 && cam.fov() <= 90.0);
        }
        cam.process_zoom(1000.0);
        assert_eq!(cam.fov(), 30.0);
        cam.process_zoom(-1000.0);
        assert_eq!(cam.fov(), 90.0);
    }

    #[test]
    fn jump_arc_lands_at_eye_height() {
        let mut cam = start_camera();
        cam.start_jump();
        assert!(cam.is_jumping());
        assert_eq!(cam.vertical_velocity(), 6.0);

        let mut peak = cam.position().y;
        for _ in 0..120 {
            cam.integrate_vertical(1.0 / 60.0);
            peak = peak.max(cam.position().y);
        }
        assert!(peak > 2.5);
        assert!(!cam.is_jumping());
        assert_eq!(cam.position().y, 1.6);
        assert_eq!(cam.vertical_velocity(), 0.0);
    }

    #[test]
    fn jump_while_airborne_is_noop() {
        let mut cam = start_camera();
        cam.start_jump();
        cam.integrate_vertical(0.1);
        let v = cam.vertical_velocity();
        assert!(v < 6.0);
        cam.start_jump();
        assert_eq!(cam.vertical_velocity(), v);
    }

    #[test]
    fn walking_mid_jump_keeps_height() {
        let mut cam = start_camera();
        cam.start_jump();
        cam.integrate_vertical(0.1);
        let y = cam.position().y;
        cam.process_movement(CameraMovement::Forward, 0.1);
        assert_eq!(cam.position().y, y);
    }

    #[test]
    fn non_positive_dt_is_noop() {
        let mut cam = start_camera();
        let start = cam.position();
        cam.process_movement(CameraMovement::Forward, 0.0);
        cam.process_movement(CameraMovement::Forward, -1.0);
        cam.process_movement(CameraMovement::Forward, f32::NAN);
        assert_eq!(cam.position(), start);

        cam.start_jump();
        cam.integrate_vertical(-0.5);
        cam.integrate_vertical(0.0);
        assert_eq!(cam.position(), start);
        assert_eq!(cam.vertical_velocity(), 6.0);
    }

    #[test]
    fn view_matrix_puts_eye_at_origin() {
        let cam = start_camera();
        let eye = cam.view_matrix().transform_point3(cam.position());
        assert!(eye.length() < EPS);
        let ahead = cam.view_matrix().transform_point3(cam.position() + cam.front());
        assert!((ahead - Vec3::NEG_Z).length() < EPS);
    }

    #[test]
    fn projection_follows_fov() {
        let mut cam = start_camera();
        let wide = cam.projection_matrix(4.0 / 3.0);
        cam.process_zoom(5.0);
        let narrow = cam.projection_matrix(4.0 / 3.0);
        // y scale is cot(fov / 2), larger for a narrower fov
        assert!(narrow.y_axis.y > wide.y_axis.y);
        let expected = 1.0 / (55.0_f32.to_radians() / 2.0).tan();
        assert!((wide.y_axis.y - expected).abs() < EPS);
    }

    #[test]
    fn degenerate_aspect_does_not_produce_nan() {
        let cam = start_camera();
        let m = cam.projection_matrix(0.0);
        assert!(m.is_finite());
    }
}
