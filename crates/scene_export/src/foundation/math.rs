//! Math utilities and types
//!
//! The exporter works in double precision because host matrices and
//! attribute values are written back out verbatim.

pub use nalgebra::{Matrix4, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f64>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f64>;

/// Convert a host world matrix into a column-vector transform.
///
/// Hosts store matrices row-major with row vectors (`p' = p * M`), so the
/// translation lives in elements 12..15. Transposing gives the usual
/// `p' = M * p` form with the translation in the last column.
pub fn mat4_from_host(values: &[f64; 16]) -> Mat4 {
    Mat4::from_row_slice(values).transpose()
}

/// Translation component of a host world matrix
pub fn host_translation(values: &[f64; 16]) -> Vec3 {
    Vec3::new(values[12], values[13], values[14])
}

/// Local +Z axis of a host world matrix (third row)
pub fn host_z_axis(values: &[f64; 16]) -> Vec3 {
    Vec3::new(values[8], values[9], values[10])
}

/// Decomposed frame of a planar light or card
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarFrame {
    /// World-space origin
    pub origin: Point3,
    /// Facing direction, normalized
    pub direction: Vec3,
    /// Unit U axis
    pub axis_u: Vec3,
    /// Length of the U axis before normalization
    pub size_u: f64,
    /// Unit V axis
    pub axis_v: Vec3,
    /// Length of the V axis before normalization
    pub size_v: f64,
}

impl PlanarFrame {
    /// Build the frame of a unit square facing -Z in local space
    pub fn from_transform(xform: &Mat4) -> Self {
        let origin = xform.transform_point(&Point3::origin());
        let direction = xform
            .transform_vector(&Vec3::new(0.0, 0.0, -1.0))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(|| Vec3::new(0.0, 0.0, -1.0));

        let u = xform.transform_vector(&Vec3::x());
        let v = xform.transform_vector(&Vec3::y());
        let size_u = u.norm();
        let size_v = v.norm();

        Self {
            origin,
            direction,
            axis_u: u.try_normalize(f64::EPSILON).unwrap_or_else(Vec3::x),
            size_u,
            axis_v: v.try_normalize(f64::EPSILON).unwrap_or_else(Vec3::y),
            size_v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const IDENTITY: [f64; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    #[test]
    fn test_host_translation_moves_origin() {
        let mut m = IDENTITY;
        m[12] = 1.0;
        m[13] = 2.0;
        m[14] = 3.0;

        let xform = mat4_from_host(&m);
        let p = xform.transform_point(&Point3::origin());
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.z, 3.0);
        assert_eq!(host_translation(&m), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_planar_frame_scaled() {
        let mut m = IDENTITY;
        m[0] = 2.0;
        m[5] = 3.0;

        let frame = PlanarFrame::from_transform(&mat4_from_host(&m));
        assert_relative_eq!(frame.size_u, 2.0);
        assert_relative_eq!(frame.size_v, 3.0);
        assert_relative_eq!(frame.axis_u.x, 1.0);
        assert_relative_eq!(frame.axis_v.y, 1.0);
        assert_relative_eq!(frame.direction.z, -1.0);
    }
}
