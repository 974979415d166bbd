// Copyright @yucwang 2026

use super::constants::{ Float, Vector3f };

/// Mirror an incoming direction `d` about `n`.
pub fn reflect(d: &Vector3f, n: &Vector3f) -> Vector3f {
    d - 2.0 * d.dot(n) * n
}

/// Refract incoming `d` through a surface whose normal `n` faces against `d`.
/// `eta` is n_incident / n_transmitted. Returns `None` on total internal reflection.
pub fn refract(d: &Vector3f, n: &Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_i = (-d.dot(n)).max(-1.0).min(1.0);
    let sin2_i = (1.0 - cos_i * cos_i).max(0.0);
    let sin2_t = eta * eta * sin2_i;
    if sin2_t >= 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some((eta * d + (eta * cos_i - cos_t) * n).normalize())
}

pub fn fresnel_dielectric(cos_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let cos_i = cos_i.abs().min(1.0);
    let sin2_i = (1.0 - cos_i * cos_i).max(0.0);
    let eta = eta_i / eta_t;
    let sin2_t = eta * eta * sin2_i;
    if sin2_t >= 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    let r_parl = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let r_perp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    0.5 * (r_parl * r_parl + r_perp * r_perp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_and_refract() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let d = Vector3f::new(1.0, 0.0, -1.0).normalize();
        let r = reflect(&d, &n);
        assert!((r - Vector3f::new(1.0, 0.0, 1.0).normalize()).norm() < 1e-6);

        let straight = refract(&Vector3f::new(0.0, 0.0, -1.0), &n, 1.0 / 1.5);
        assert!(straight.is_some());
        assert!((straight.unwrap() - Vector3f::new(0.0, 0.0, -1.0)).norm() < 1e-5);

        let grazing = Vector3f::new(1.0, 0.0, -0.1).normalize();
        assert!(refract(&grazing, &n, 1.5).is_none());
    }

    #[test]
    fn test_fresnel_normal_incidence() {
        let f = fresnel_dielectric(1.0, 1.0, 1.5);
        assert!((f - 0.04).abs() < 1e-3);
        assert_eq!(fresnel_dielectric(0.05, 1.5, 1.0), 1.0);
    }
}
