use glam::Vec3;

pub const CHARGE_STRENGTH: f32 = -120.0;
pub const LINK_DISTANCE: f32 = 30.0;
pub const ALPHA_MIN: f32 = 0.001;
pub const VELOCITY_DECAY: f32 = 0.4;
/// Ticks until alpha decays from 1 to [`ALPHA_MIN`]
pub const SETTLE_TICKS: u32 = 300;

const INITIAL_RADIUS: f32 = 10.0;
const DISTANCE_MIN_SQ: f32 = 1.0;
const JIGGLE: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceLink {
    pub source: usize,
    pub target: usize,
}

/// Layered layout direction for directed acyclic graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DagMode {
    TopDown,
    BottomUp,
    LeftRight,
    RightLeft,
    ZOut,
    ZIn,
}

impl DagMode {
    pub fn parse(text: &str) -> Option<DagMode> {
        match text {
            "td" => Some(DagMode::TopDown),
            "bu" => Some(DagMode::BottomUp),
            "lr" => Some(DagMode::LeftRight),
            "rl" => Some(DagMode::RightLeft),
            "zout" => Some(DagMode::ZOut),
            "zin" => Some(DagMode::ZIn),
            _ => None,
        }
    }

    /// Pins one coordinate of `position` to the layer of `depth`
    fn constrain(self, position: &mut Vec3, depth: f32, max_depth: f32, level_distance: f32) {
        let offset = (depth - max_depth / 2.0) * level_distance;
        match self {
            DagMode::TopDown => position.y = -offset,
            DagMode::BottomUp => position.y = offset,
            DagMode::LeftRight => position.x = offset,
            DagMode::RightLeft => position.x = -offset,
            DagMode::ZOut => position.z = offset,
            DagMode::ZIn => position.z = -offset,
        }
    }
}

#[derive(Debug, Clone)]
struct Dag {
    mode: DagMode,
    level_distance: f32,
    depths: Vec<u32>,
    max_depth: u32,
}

/// Velocity-Verlet force layout in three dimensions: many-body charge,
/// spring links, centering and an exponentially cooling alpha
#[derive(Debug, Clone)]
pub struct ForceSimulation {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    links: Vec<ForceLink>,
    link_strength: Vec<f32>,
    link_bias: Vec<f32>,
    charge: f32,
    alpha: f32,
    alpha_decay: f32,
    dag: Option<Dag>,
}

impl ForceSimulation {
    /// Seeds nodes on a phyllotaxis spiral; links pointing outside the node range are dropped
    pub fn new(node_count: usize, links: Vec<ForceLink>) -> Self {
        let roll_step = std::f32::consts::PI * (3.0 - 5f32.sqrt());
        let yaw_step = std::f32::consts::PI * 20.0 / (9.0 + 221f32.sqrt());
        let positions = (0..node_count)
            .map(|i| {
                let radius = INITIAL_RADIUS * (0.5 + i as f32).cbrt();
                let roll = i as f32 * roll_step;
                let yaw = i as f32 * yaw_step;
                Vec3::new(
                    radius * roll.sin() * yaw.cos(),
                    radius * roll.cos(),
                    radius * roll.sin() * yaw.sin(),
                )
            })
            .collect();

        let links: Vec<ForceLink> = links
            .into_iter()
            .filter(|l| l.source < node_count && l.target < node_count && l.source != l.target)
            .collect();
        let mut degree = vec![0u32; node_count];
        for link in &links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }
        let link_strength = links
            .iter()
            .map(|l| 1.0 / degree[l.source].min(degree[l.target]) as f32)
            .collect();
        let link_bias = links
            .iter()
            .map(|l| degree[l.source] as f32 / (degree[l.source] + degree[l.target]) as f32)
            .collect();

        Self {
            positions,
            velocities: vec![Vec3::ZERO; node_count],
            links,
            link_strength,
            link_bias,
            charge: CHARGE_STRENGTH,
            alpha: 1.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / SETTLE_TICKS as f32),
            dag: None,
        }
    }

    pub fn with_charge(mut self, strength: f32) -> Self {
        self.charge = strength;
        self
    }

    /// Pins every node to the layer of its longest path from a root. Cycles
    /// are tolerated; their depths saturate at the node count.
    pub fn with_dag(mut self, mode: DagMode, level_distance: f32) -> Self {
        let n = self.positions.len() as u32;
        let mut depths = vec![0u32; self.positions.len()];
        for _ in 0..n {
            let mut changed = false;
            for link in &self.links {
                let candidate = (depths[link.source] + 1).min(n);
                if candidate > depths[link.target] {
                    depths[link.target] = candidate;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        let max_depth = depths.iter().copied().max().unwrap_or(0);
        self.dag = Some(Dag {
            mode,
            level_distance,
            depths,
            max_depth,
        });
        self.apply_dag();
        self
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < ALPHA_MIN
    }

    pub fn links(&self) -> &[ForceLink] {
        &self.links
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    /// Reheats a settled layout
    pub fn reheat(&mut self) {
        self.alpha = 1.0;
    }

    /// Advances one step; returns false once the layout has cooled
    pub fn tick(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }
        self.alpha += (0.0 - self.alpha) * self.alpha_decay;

        self.apply_links();
        self.apply_charge();

        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *velocity *= 1.0 - VELOCITY_DECAY;
            *position += *velocity;
        }
        self.apply_center();
        self.apply_dag();
        true
    }

    fn apply_links(&mut self) {
        for (k, link) in self.links.iter().enumerate() {
            let (s, t) = (link.source, link.target);
            let mut d = self.positions[t] + self.velocities[t] - self.positions[s] - self.velocities[s];
            if d.length_squared() == 0.0 {
                d = Vec3::splat(JIGGLE);
            }
            let length = d.length();
            let l = (length - LINK_DISTANCE) / length * self.alpha * self.link_strength[k];
            let pull = d * l;
            self.velocities[t] -= pull * self.link_bias[k];
            self.velocities[s] += pull * (1.0 - self.link_bias[k]);
        }
    }

    fn apply_charge(&mut self) {
        let n = self.positions.len();
        for i in 0..n {
            let mut push = Vec3::ZERO;
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = self.positions[j] - self.positions[i];
                let l = d.length_squared();
                if l == 0.0 {
                    continue;
                }
                push += d * (self.charge * self.alpha / l.max(DISTANCE_MIN_SQ));
            }
            self.velocities[i] += push;
        }
    }

    fn apply_center(&mut self) {
        if self.positions.is_empty() {
            return;
        }
        let mean = self.positions.iter().copied().sum::<Vec3>() / self.positions.len() as f32;
        for position in self.positions.iter_mut() {
            *position -= mean;
        }
    }

    fn apply_dag(&mut self) {
        let Some(dag) = &self.dag else {
            return;
        };
        for (position, depth) in self.positions.iter_mut().zip(&dag.depths) {
            dag.mode
                .constrain(position, *depth as f32, dag.max_depth as f32, dag.level_distance);
        }
    }
}
