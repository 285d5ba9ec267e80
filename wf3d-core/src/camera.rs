/// First-person perspective camera with yaw/pitch orientation
use crate::matrix::Mat4;
use crate::vector::Vec3;

const WORLD_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Pitch is clamped short of +-90 so `front` never collapses onto the
/// world up axis.
const PITCH_LIMIT: f32 = 89.9;

/// Direction for [`Camera::move_by`], relative to the camera's orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// A movable camera producing view and projection matrices for the
/// row-vector convention (`v_clip = v * view * projection`).
///
/// Yaw and pitch are in degrees. Yaw 0 looks down -Z and grows to the
/// right; pitch 0 looks at the horizon and grows upward.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    yaw: f32,
    pitch: f32,
    fovy: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    /// Creates a camera looking down -Z (yaw and pitch both 0).
    ///
    /// `fovy` is the vertical field of view in degrees. Fails if any
    /// parameter is out of range, naming the violated constraint.
    pub fn new(position: Vec3, fovy: f32, aspect: f32, near: f32, far: f32) -> Result<Self, String> {
        Self::with_orientation(position, 0.0, 0.0, fovy, aspect, near, far)
    }

    /// Creates a camera with an explicit initial yaw and pitch, in degrees
    pub fn with_orientation(
        position: Vec3,
        yaw: f32,
        pitch: f32,
        fovy: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, String> {
        if !(-PITCH_LIMIT..=PITCH_LIMIT).contains(&pitch) {
            return Err("Camera pitch must be between -89.9 and 89.9 degrees".to_string());
        }

        if fovy <= 0.0 || fovy >= 180.0 {
            return Err("Camera vertical FOV must be between 0 and 180 degrees".to_string());
        }

        if aspect <= 0.0 {
            return Err("Camera aspect ratio must be greater than 0".to_string());
        }

        if near <= 0.0 {
            return Err("Camera near plane must be greater than 0".to_string());
        }

        if far <= near {
            return Err("Camera far plane must be greater than near plane".to_string());
        }

        let mut camera = Self {
            position,
            front: Vec3::zero(),
            up: Vec3::zero(),
            right: Vec3::zero(),
            yaw,
            pitch,
            fovy,
            aspect,
            near,
            far,
        };
        camera.update_vectors();
        Ok(camera)
    }

    /// Builds the right-handed look-at matrix from the camera's orthonormal
    /// basis. World-space row vectors multiplied by it land in view space.
    pub fn view_matrix(&self) -> Mat4 {
        let mut mat = Mat4::zero();
        mat[0][0] = self.right.x();
        mat[0][1] = self.up.x();
        mat[0][2] = -self.front.x();
        mat[1][0] = self.right.y();
        mat[1][1] = self.up.y();
        mat[1][2] = -self.front.y();
        mat[2][0] = self.right.z();
        mat[2][1] = self.up.z();
        mat[2][2] = -self.front.z();
        mat[3][0] = -self.right.dot(self.position);
        mat[3][1] = -self.up.dot(self.position);
        mat[3][2] = self.front.dot(self.position);
        mat[3][3] = 1.0;
        mat
    }

    /// Finite perspective projection built from the vertical field of view,
    /// aspect ratio, and near/far planes. Clip-space w carries the negated
    /// view-space depth for the perspective divide.
    pub fn projection_matrix(&self) -> Mat4 {
        let f = 1.0 / (self.fovy.to_radians() / 2.0).tan();
        let mut mat = Mat4::zero();
        mat[0][0] = f / self.aspect;
        mat[1][1] = f;
        mat[2][2] = (-self.far - self.near) / (self.far - self.near);
        mat[2][3] = -1.0;
        mat[3][2] = (2.0 * self.far * self.near) / (self.far - self.near);
        mat
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

    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_aspect(&mut self, aspect: f32) -> Result<(), String> {
        if aspect <= 0.0 {
            return Err("Camera aspect ratio must be greater than 0".to_string());
        }

        self.aspect = aspect;
        Ok(())
    }

    /// Translates the position by `distance` along the given direction.
    ///
    /// Forward and backward move along the horizontal projection of `front`
    /// so looking up or down does not drift the camera vertically. Up and
    /// down follow the camera's own up vector, which tilts with pitch.
    pub fn move_by(&mut self, direction: Movement, distance: f32) {
        let horizontal_front = Vec3::new(self.front.x(), 0.0, self.front.z()).normalize();
        match direction {
            Movement::Forward => self.position += horizontal_front * distance,
            Movement::Backward => self.position -= horizontal_front * distance,
            Movement::Left => self.position -= self.right * distance,
            Movement::Right => self.position += self.right * distance,
            Movement::Up => self.position += self.up * distance,
            Movement::Down => self.position -= self.up * distance,
        }
    }

    /// Accumulates yaw and pitch deltas in degrees and rebuilds the basis
    /// vectors. Pitch is clamped to +-89.9; yaw wraps through the trig
    /// functions and needs no bound.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();

        self.front = Vec3::new(
            yaw.sin() * pitch.cos(),
            pitch.sin(),
            -yaw.cos() * pitch.cos(),
        )
        .normalize();

        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}
