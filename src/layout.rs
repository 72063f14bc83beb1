use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use charnet::util::stable_pair;

pub struct Spring {
    pub from: usize,
    pub to: usize,
    /// Preferred distance in world units.
    pub length: f32,
}

/// Static spring-embedder placement, seeded from character names so the same
/// data always lands in the same place.
pub fn force_layout(
    names: &[String],
    springs: &[Spring],
    node_radii: &[f32],
    iterations: usize,
) -> Vec<Vec2> {
    let n = names.len();
    if n == 0 {
        return Vec::new();
    }

    let base_radius = (n as f32).sqrt() * 120.0;
    let mut positions = names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let angle = (index as f32 / n as f32) * TAU;
            let (jx, jy) = stable_pair(name);
            vec2(angle.cos(), angle.sin()) * base_radius + vec2(jx * 60.0, jy * 60.0)
        })
        .collect::<Vec<_>>();

    if n == 1 {
        return positions;
    }

    let k = (base_radius * 2.0 / (n as f32).sqrt()).max(24.0);
    let mut temperature = (k * 2.5).max(80.0);

    for _ in 0..iterations {
        let mut disp = vec![Vec2::ZERO; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = positions[i] - positions[j];
                let distance = delta.length().max(0.5);
                let direction = delta / distance;

                let ri = node_radii.get(i).copied().unwrap_or(6.0);
                let rj = node_radii.get(j).copied().unwrap_or(6.0);
                let min_distance = (ri + rj) * 2.5;

                let force = (k * k) / distance;
                disp[i] += direction * force;
                disp[j] -= direction * force;

                if distance < min_distance {
                    let overlap_push = (min_distance - distance) * 2.0;
                    disp[i] += direction * overlap_push;
                    disp[j] -= direction * overlap_push;
                }
            }
        }

        for spring in springs {
            let (from, to) = (spring.from, spring.to);
            if from >= n || to >= n || from == to {
                continue;
            }

            let delta = positions[from] - positions[to];
            let distance = delta.length().max(0.5);
            let direction = delta / distance;
            let force = (distance - spring.length) * 0.2;

            disp[from] -= direction * force;
            disp[to] += direction * force;
        }

        for i in 0..n {
            disp[i] -= positions[i] * 0.002;
        }

        for i in 0..n {
            let d = disp[i];
            let length = d.length();
            if length > 0.0 {
                positions[i] += d / length * length.min(temperature) * 0.9;
            }
        }

        temperature *= 0.97;
        if temperature < 0.5 {
            break;
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn same_input_lands_in_same_place() {
        let names = names(&["Ann", "Bo", "Cy", "Dee"]);
        let springs = [
            Spring { from: 0, to: 1, length: 120.0 },
            Spring { from: 1, to: 2, length: 300.0 },
        ];
        let radii = [8.0; 4];

        let first = force_layout(&names, &springs, &radii, 200);
        let second = force_layout(&names, &springs, &radii, 200);
        assert_eq!(first, second);
        assert!(first.iter().all(|position| position.x.is_finite() && position.y.is_finite()));
    }

    #[test]
    fn short_springs_pull_closer_than_long_ones() {
        let names = names(&["Ann", "Bo", "Cy"]);
        let springs = [
            Spring { from: 0, to: 1, length: 60.0 },
            Spring { from: 0, to: 2, length: 900.0 },
        ];
        let positions = force_layout(&names, &springs, &[8.0; 3], 400);

        let near = (positions[0] - positions[1]).length();
        let far = (positions[0] - positions[2]).length();
        assert!(near < far);
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(force_layout(&[], &[], &[], 10).is_empty());
        assert_eq!(force_layout(&names(&["Solo"]), &[], &[8.0], 10).len(), 1);
    }
}
