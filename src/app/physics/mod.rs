mod forces;

use std::f32::consts::TAU;

use glam::Vec3;
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::LayoutConfig;
use crate::graph::{Graph, NodeId};

use forces::{centering, repulsion_between, spring_between};

/// Force-directed solver. Owns node positions and velocities; nothing else
/// writes them.
pub(in crate::app) struct LayoutEngine {
    config: LayoutConfig,
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    forces: Vec<Vec3>,
    anchor: Option<NodeId>,
    rng: StdRng,
    last_dt: f32,
    warned_non_finite: bool,
}

impl LayoutEngine {
    /// Scatters the nodes uniformly over a sphere of `spread_radius`.
    pub(in crate::app) fn new(graph: &Graph, config: LayoutConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let radius = config.spread_radius;
        let positions = (0..graph.len())
            .map(|_| {
                let theta = rng.r#gen::<f32>() * TAU;
                let phi = (2.0 * rng.r#gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
                Vec3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                    radius * phi.cos(),
                )
            })
            .collect::<Vec<_>>();

        Self::from_parts(positions, config, rng)
    }

    #[cfg(test)]
    pub(in crate::app) fn with_positions(
        positions: Vec<Vec3>,
        config: LayoutConfig,
        seed: u64,
    ) -> Self {
        Self::from_parts(positions, config, StdRng::seed_from_u64(seed))
    }

    fn from_parts(positions: Vec<Vec3>, config: LayoutConfig, rng: StdRng) -> Self {
        let count = positions.len();
        Self {
            config,
            positions,
            velocities: vec![Vec3::ZERO; count],
            forces: vec![Vec3::ZERO; count],
            anchor: None,
            rng,
            last_dt: 0.0,
            warned_non_finite: false,
        }
    }

    pub(in crate::app) fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub(in crate::app) fn config_mut(&mut self) -> &mut LayoutConfig {
        &mut self.config
    }

    pub(in crate::app) fn set_anchor(&mut self, anchor: Option<NodeId>) {
        self.anchor = anchor.filter(|id| id.index() < self.positions.len());
    }

    pub(in crate::app) fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    pub(in crate::app) fn position(&self, id: NodeId) -> Option<Vec3> {
        self.positions.get(id.index()).copied()
    }

    pub(in crate::app) fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Largest velocity magnitude, in units per second.
    pub(in crate::app) fn max_speed(&self) -> f32 {
        self.velocities
            .iter()
            .map(|velocity| velocity.length())
            .fold(0.0, f32::max)
    }

    /// Largest distance any node moved during the last tick.
    pub(in crate::app) fn max_step(&self) -> f32 {
        self.max_speed() * self.last_dt
    }

    fn jitter(&mut self) -> Vec3 {
        let amount = self.config.jitter.max(0.0);
        Vec3::new(
            self.rng.r#gen::<f32>() - 0.5,
            self.rng.r#gen::<f32>() - 0.5,
            self.rng.r#gen::<f32>() - 0.5,
        ) * amount
    }

    /// Advances every node by one timestep of `dt` seconds.
    pub(in crate::app) fn step(&mut self, graph: &Graph, dt: f32) {
        let node_count = graph.len().min(self.positions.len());
        self.last_dt = dt;
        if node_count == 0 || dt <= 0.0 {
            return;
        }

        let config = self.config;
        self.forces.clear();
        self.forces.resize(node_count, Vec3::ZERO);
        // Integration below only ever stores finite positions, so every force
        // term is computed from finite inputs.
        debug_assert!(self.positions.iter().all(|position| position.is_finite()));

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let mut separation = self.positions[i] - self.positions[j];
                let distance = separation.length();
                if distance < config.min_distance {
                    separation += self.jitter();
                }

                let push = repulsion_between(separation, distance, config.repulsion);
                self.forces[i] += push;
                self.forces[j] -= push;
            }
        }

        for (from, to) in graph.edges() {
            let (from, to) = (from.index(), to.index());
            if from >= node_count || to >= node_count {
                continue;
            }

            let pull = spring_between(self.positions[to] - self.positions[from], config.spring);
            self.forces[from] += pull;
            self.forces[to] -= pull;
        }

        for (force, position) in self.forces.iter_mut().zip(&self.positions) {
            *force += centering(*position, config.center_pull);
        }

        for index in 0..node_count {
            let velocity = (self.velocities[index] + self.forces[index] * dt) * config.damping;
            let position = self.positions[index] + velocity * dt;

            if velocity.is_finite() && position.is_finite() {
                self.velocities[index] = velocity;
                self.positions[index] = position;
            } else {
                if !self.warned_non_finite {
                    warn!("layout produced a non-finite position; holding node {index} in place");
                    self.warned_non_finite = true;
                }
                self.velocities[index] = Vec3::ZERO;
            }
        }

        if let Some(anchor) = self.anchor
            && anchor.index() < node_count
        {
            self.positions[anchor.index()].y = config.anchor_height;
            self.velocities[anchor.index()].y = 0.0;
        }
    }
}
