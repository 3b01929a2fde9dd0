//! Proximity lines between nearby particles.
//!
//! Every unordered pair closer than `max_distance` is linked by a line whose
//! alpha fades linearly to zero at `max_distance`. The scan is a plain
//! O(n²) pass over all pairs, which is why the low power tier cuts the
//! particle count.

use glam::Vec2;

use crate::particle::Particle;
use crate::surface::Surface;
use crate::visuals::VisualConfig;

/// A line to draw between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub from: Vec2,
    pub to: Vec2,
    pub alpha: f32,
}

/// Alpha of a link at `distance`, or `None` when the pair is not linked.
///
/// Returns `(1 - distance / max_distance) * connection_opacity` for
/// `distance < max_distance`. A non-positive `max_distance` links nothing.
pub fn connection_alpha(distance: f32, max_distance: f32, connection_opacity: f32) -> Option<f32> {
    if max_distance <= 0.0 || !(distance < max_distance) {
        return None;
    }
    Some((1.0 - distance / max_distance) * connection_opacity)
}

/// Visit every linked pair `i < j` in index order.
pub fn for_each_connection<F>(particles: &[Particle], max_distance: f32, connection_opacity: f32, mut visit: F)
where
    F: FnMut(Connection),
{
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let distance = a.position().distance(b.position());
            if let Some(alpha) = connection_alpha(distance, max_distance, connection_opacity) {
                visit(Connection {
                    from: a.position(),
                    to: b.position(),
                    alpha,
                });
            }
        }
    }
}

/// Collect every linked pair.
pub fn find_connections(particles: &[Particle], max_distance: f32, connection_opacity: f32) -> Vec<Connection> {
    let mut found = Vec::new();
    for_each_connection(particles, max_distance, connection_opacity, |c| found.push(c));
    found
}

/// Stroke every linked pair onto `surface`.
pub fn draw_connections<S: Surface + ?Sized>(
    surface: &mut S,
    particles: &[Particle],
    max_distance: f32,
    connection_opacity: f32,
    visuals: &VisualConfig,
) {
    for_each_connection(particles, max_distance, connection_opacity, |c| {
        surface.draw_line(c.from, c.to, visuals.line_color, c.alpha, visuals.line_width);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, 2.0, 1.0, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_alpha_zero_at_max_distance_and_absent_beyond() {
        assert_eq!(connection_alpha(120.0, 120.0, 0.15), None);
        assert_eq!(connection_alpha(121.0, 120.0, 0.15), None);
        let near_edge = connection_alpha(119.999, 120.0, 0.15).unwrap();
        assert!(near_edge >= 0.0 && near_edge < 1e-4);
    }

    #[test]
    fn test_alpha_is_monotone_decreasing() {
        let mut last = f32::INFINITY;
        for d in 0..120 {
            let alpha = connection_alpha(d as f32, 120.0, 0.15).unwrap();
            assert!(alpha < last);
            last = alpha;
        }
        assert_eq!(connection_alpha(0.0, 120.0, 0.15), Some(0.15));
    }

    #[test]
    fn test_degenerate_max_distance_links_nothing() {
        assert_eq!(connection_alpha(0.0, 0.0, 0.15), None);
        assert_eq!(connection_alpha(0.0, -5.0, 0.15), None);
        assert_eq!(connection_alpha(f32::NAN, 120.0, 0.15), None);
    }

    #[test]
    fn test_pairs_are_unordered_and_unique() {
        let particles = [at(0.0, 0.0), at(10.0, 0.0), at(20.0, 0.0)];
        let found = find_connections(&particles, 15.0, 1.0);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].from, Vec2::new(0.0, 0.0));
        assert_eq!(found[0].to, Vec2::new(10.0, 0.0));
        assert_eq!(found[1].from, Vec2::new(10.0, 0.0));
        assert_eq!(found[1].to, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_coincident_particles_link_at_full_opacity() {
        let particles = [at(5.0, 5.0), at(5.0, 5.0)];
        let found = find_connections(&particles, 120.0, 0.15);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].alpha, 0.15);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(find_connections(&[], 120.0, 0.15).is_empty());
        assert!(find_connections(&[at(1.0, 1.0)], 120.0, 0.15).is_empty());
    }
}
