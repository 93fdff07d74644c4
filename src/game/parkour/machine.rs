use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::{
    avatar::{Driver, MotionState, PhysicsMode},
    physics::{PhysicsProbe, horizontal},
};

#[derive(Reflect, Clone, Debug, Serialize, Deserialize)]
pub struct ParkourSettings {
    pub gravity: f32,
    /// Height above the body origin of the forward wall probe.
    pub wall_probe_height: f32,
    pub wall_reach: f32,
    /// Height above the body origin where a ledge top can be grabbed.
    pub grab_height: f32,
    pub grab_tolerance: f32,
    /// How far past the wall face the ledge-top probe starts.
    pub ledge_inset: f32,
    /// Distance between the wall face and the body origin while hanging.
    pub hang_distance: f32,
    pub climb_duration: f32,
    pub climb_forward: f32,
    /// Body origin height above the ledge top once standing on it.
    pub stand_height: f32,
    pub jump_away_speed: f32,
    pub jump_away_lift: f32,
    pub shimmy_speed: f32,
    pub shimmy_probe_ahead: f32,
    pub regrab_cooldown: f32,
    pub wall_run_min_speed: f32,
    pub wall_run_probe_height: f32,
    pub wall_run_probe_distance: f32,
    /// Largest angle (degrees) between velocity and the wall tangent that still starts a run.
    pub wall_run_max_angle: f32,
    /// Fraction of normal gravity applied while running on a wall.
    pub wall_run_gravity: f32,
    pub wall_run_stick_speed: f32,
    pub wall_run_max_duration: f32,
    pub wall_run_max_fall_speed: f32,
    pub wall_jump_away: f32,
    pub wall_jump_up: f32,
    /// Share of the wall-run speed carried into a wall jump.
    pub wall_jump_momentum: f32,
    pub wall_jump_duration: f32,
    pub input_deadzone: f32,
}

impl Default for ParkourSettings {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            wall_probe_height: 1.2,
            wall_reach: 0.8,
            grab_height: 1.8,
            grab_tolerance: 0.3,
            ledge_inset: 0.2,
            hang_distance: 0.35,
            climb_duration: 0.8,
            climb_forward: 0.5,
            stand_height: 1.0,
            jump_away_speed: 4.5,
            jump_away_lift: 4.0,
            shimmy_speed: 1.5,
            shimmy_probe_ahead: 0.3,
            regrab_cooldown: 0.4,
            wall_run_min_speed: 4.0,
            wall_run_probe_height: 0.8,
            wall_run_probe_distance: 1.0,
            wall_run_max_angle: 25.0,
            wall_run_gravity: 0.25,
            wall_run_stick_speed: 0.5,
            wall_run_max_duration: 1.2,
            wall_run_max_fall_speed: 6.0,
            wall_jump_away: 6.0,
            wall_jump_up: 6.5,
            wall_jump_momentum: 0.5,
            wall_jump_duration: 0.35,
            input_deadzone: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ParkourState {
    #[default]
    None,
    LedgeGrab,
    LedgeClimb,
    LedgeShimmy,
    WallRun,
    WallJump,
}

/// A grabbable edge found by the probes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ledge {
    wall_point: Vec3,
    /// Flat wall normal, pointing away from the wall.
    normal: Vec3,
    top: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Maneuver {
    None,
    LedgeGrab {
        ledge: Ledge,
    },
    LedgeShimmy {
        ledge: Ledge,
    },
    LedgeClimb {
        start: Vec3,
        target: Vec3,
        elapsed: f32,
    },
    WallRun {
        normal: Vec3,
        direction: Vec3,
        speed: f32,
        elapsed: f32,
    },
    WallJump {
        elapsed: f32,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParkourInput {
    pub move_axis: Vec2,
    pub jump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParkourStep {
    pub state: ParkourState,
    /// The jump press was used by a maneuver and must not reach the Body controller.
    pub consumed_jump: bool,
}

/// Ledge and wall maneuvers layered over the Body controller.
#[derive(Component, Debug, Clone)]
pub struct ParkourMachine {
    pub settings: ParkourSettings,
    maneuver: Maneuver,
    cooldown: f32,
}

impl Default for ParkourMachine {
    fn default() -> Self {
        Self::new(ParkourSettings::default())
    }
}

const SURFACE_EPSILON: f32 = 1e-3;
const MAX_WALL_NORMAL_Y: f32 = 0.3;
const MIN_FLOOR_NORMAL_Y: f32 = 0.7;

fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

impl ParkourMachine {
    pub fn new(settings: ParkourSettings) -> Self {
        Self {
            settings,
            maneuver: Maneuver::None,
            cooldown: 0.0,
        }
    }

    pub fn state(&self) -> ParkourState {
        match self.maneuver {
            Maneuver::None => ParkourState::None,
            Maneuver::LedgeGrab { .. } => ParkourState::LedgeGrab,
            Maneuver::LedgeShimmy { .. } => ParkourState::LedgeShimmy,
            Maneuver::LedgeClimb { .. } => ParkourState::LedgeClimb,
            Maneuver::WallRun { .. } => ParkourState::WallRun,
            Maneuver::WallJump { .. } => ParkourState::WallJump,
        }
    }

    pub fn is_active(&self) -> bool {
        self.maneuver != Maneuver::None
    }

    /// One scaled-time step. Detection only runs when `allow_detection` is set and the Body
    /// is airborne and input-driven.
    pub fn update(
        &mut self,
        motion: &mut MotionState,
        probe: &impl PhysicsProbe,
        input: &ParkourInput,
        dt: f32,
        allow_detection: bool,
    ) -> ParkourStep {
        self.cooldown = (self.cooldown - dt).max(0.0);
        let consumed_jump = match self.maneuver {
            Maneuver::None => {
                if allow_detection && motion.enabled() && !motion.grounded && self.cooldown <= 0.0 {
                    self.detect(motion, probe);
                }
                false
            }
            Maneuver::LedgeGrab { ledge } => self.update_grab(motion, probe, input, ledge),
            Maneuver::LedgeShimmy { ledge } => self.update_shimmy(motion, probe, input, ledge, dt),
            Maneuver::LedgeClimb { .. } => {
                self.update_climb(motion, dt);
                false
            }
            Maneuver::WallRun { .. } => self.update_wall_run(motion, probe, input, dt),
            Maneuver::WallJump { .. } => {
                self.update_wall_jump(motion, dt);
                false
            }
        };
        ParkourStep {
            state: self.state(),
            consumed_jump,
        }
    }

    /// Drops whatever maneuver is running. The Body keeps its current driver; whoever forced the
    /// exit decides who drives next.
    pub fn force_exit(&mut self, motion: &mut MotionState) {
        if self.maneuver == Maneuver::None {
            return;
        }
        debug!("Parkour {:?} forcibly exited", self.state());
        motion.restore_physics();
        self.maneuver = Maneuver::None;
    }

    fn detect(&mut self, motion: &mut MotionState, probe: &impl PhysicsProbe) {
        let facing = horizontal(motion.rotation * Vec3::NEG_Z);
        if motion.velocity.y <= 0.0 {
            if let Some(ledge) = Dir3::new(facing).ok().and_then(|f| self.probe_ledge(probe, motion.position, f)) {
                info!("Ledge grab at {:.2}", ledge.top);
                motion.take_control(Driver::Parkour, PhysicsMode::KINEMATIC);
                self.snap_to_ledge(motion, &ledge);
                self.maneuver = Maneuver::LedgeGrab { ledge };
                return;
            }
        }

        let flat_velocity = horizontal(motion.velocity);
        let speed = flat_velocity.length();
        if speed <= self.settings.wall_run_min_speed {
            return;
        }
        let direction = flat_velocity / speed;
        let left = Vec3::Y.cross(direction);
        for side in [left, -left] {
            let Ok(side) = Dir3::new(side) else {
                continue;
            };
            let origin = motion.position + Vec3::Y * self.settings.wall_run_probe_height;
            let Some(hit) = probe.raycast(origin, side, self.settings.wall_run_probe_distance) else {
                continue;
            };
            if hit.distance <= SURFACE_EPSILON || hit.normal.y.abs() > MAX_WALL_NORMAL_Y {
                continue;
            }
            let normal = horizontal(hit.normal).normalize_or_zero();
            let mut tangent = normal.cross(Vec3::Y).normalize_or_zero();
            if tangent.dot(direction) < 0.0 {
                tangent = -tangent;
            }
            if tangent.angle_between(direction).to_degrees() > self.settings.wall_run_max_angle {
                continue;
            }
            info!("Wall run started, speed {speed:.2}");
            motion.take_control(Driver::Parkour, PhysicsMode::dynamic(0.0));
            motion.face(Driver::Parkour, tangent);
            self.maneuver = Maneuver::WallRun {
                normal,
                direction: tangent,
                speed,
                elapsed: 0.0,
            };
            return;
        }
    }

    /// Forward wall within reach, topped by a walkable surface near grab height.
    fn probe_ledge(&self, probe: &impl PhysicsProbe, position: Vec3, forward: Dir3) -> Option<Ledge> {
        let s = &self.settings;
        let origin = position + Vec3::Y * s.wall_probe_height;
        let wall = probe.raycast(origin, forward, s.wall_reach)?;
        if wall.distance <= SURFACE_EPSILON || wall.normal.y.abs() > MAX_WALL_NORMAL_Y {
            return None;
        }
        let normal = horizontal(wall.normal).try_normalize()?;

        let mut top_origin = wall.point - normal * s.ledge_inset;
        top_origin.y = position.y + s.grab_height + s.grab_tolerance;
        let top = probe.raycast(top_origin, Dir3::NEG_Y, s.grab_tolerance * 2.0)?;
        // A hit at the origin means the wall keeps going above grab height.
        if top.distance <= SURFACE_EPSILON || top.normal.y < MIN_FLOOR_NORMAL_Y {
            return None;
        }
        Some(Ledge {
            wall_point: wall.point,
            normal,
            top: top.point.y,
        })
    }

    fn snap_to_ledge(&self, motion: &mut MotionState, ledge: &Ledge) {
        let mut hang = ledge.wall_point + ledge.normal * self.settings.hang_distance;
        hang.y = ledge.top - self.settings.grab_height;
        motion.force_position(Driver::Parkour, hang);
        motion.face(Driver::Parkour, -ledge.normal);
        motion.set_velocity(Driver::Parkour, Vec3::ZERO);
    }

    fn release(&mut self, motion: &mut MotionState) {
        motion.release_control();
        self.maneuver = Maneuver::None;
    }

    fn lateral(&self, input: &ParkourInput, ledge: &Ledge) -> Option<Vec3> {
        if input.move_axis.x.abs() < self.settings.input_deadzone {
            return None;
        }
        let right = (-ledge.normal).cross(Vec3::Y);
        Some(right * input.move_axis.x.signum())
    }

    /// Climb, jump away, or start shimmying. Returns whether the jump was used.
    fn update_grab(
        &mut self,
        motion: &mut MotionState,
        probe: &impl PhysicsProbe,
        input: &ParkourInput,
        ledge: Ledge,
    ) -> bool {
        if input.jump {
            if input.move_axis.y > self.settings.input_deadzone {
                let mut target = ledge.wall_point - ledge.normal * self.settings.climb_forward;
                target.y = ledge.top + self.settings.stand_height;
                info!("Ledge climb");
                self.maneuver = Maneuver::LedgeClimb {
                    start: motion.position,
                    target,
                    elapsed: 0.0,
                };
            } else {
                info!("Jumped away from ledge");
                self.release(motion);
                motion.set_velocity(
                    Driver::Input,
                    ledge.normal * self.settings.jump_away_speed + Vec3::Y * self.settings.jump_away_lift,
                );
                self.cooldown = self.settings.regrab_cooldown;
            }
            return true;
        }

        if let Some(side) = self.lateral(input, &ledge) {
            let ahead = motion.position + side * self.settings.shimmy_probe_ahead;
            if let Ok(forward) = Dir3::new(-ledge.normal) {
                if self.probe_ledge(probe, ahead, forward).is_some() {
                    self.maneuver = Maneuver::LedgeShimmy { ledge };
                }
            }
        }
        motion.set_velocity(Driver::Parkour, Vec3::ZERO);
        false
    }

    fn update_shimmy(
        &mut self,
        motion: &mut MotionState,
        probe: &impl PhysicsProbe,
        input: &ParkourInput,
        ledge: Ledge,
        dt: f32,
    ) -> bool {
        let Some(side) = self.lateral(input, &ledge).filter(|_| !input.jump) else {
            self.maneuver = Maneuver::LedgeGrab { ledge };
            return self.update_grab(motion, probe, input, ledge);
        };

        let moved = motion.position + side * self.settings.shimmy_speed * dt;
        let found = Dir3::new(-ledge.normal).ok().and_then(|forward| {
            self.probe_ledge(probe, moved + side * self.settings.shimmy_probe_ahead, forward)?;
            self.probe_ledge(probe, moved, forward)
        });
        match found {
            Some(next) => {
                self.snap_to_ledge(motion, &next);
                self.maneuver = Maneuver::LedgeShimmy { ledge: next };
            }
            None => {
                info!("Ledge ran out, dropping");
                self.release(motion);
                self.cooldown = self.settings.regrab_cooldown;
            }
        }
        false
    }

    fn update_climb(&mut self, motion: &mut MotionState, dt: f32) {
        let Maneuver::LedgeClimb { start, target, elapsed } = &mut self.maneuver else {
            return;
        };
        *elapsed += dt;
        let t = (*elapsed / self.settings.climb_duration).min(1.0);
        // Rise first, then pull over the edge.
        let rise = smoothstep(t / 0.6);
        let pull = smoothstep((t - 0.4) / 0.6);
        let delta = *target - *start;
        let position = Vec3::new(
            start.x + delta.x * pull,
            start.y + delta.y * rise,
            start.z + delta.z * pull,
        );
        let (target, done) = (*target, t >= 1.0);
        if done {
            motion.force_position(Driver::Parkour, target);
            motion.set_velocity(Driver::Parkour, Vec3::ZERO);
            info!("Ledge climb finished");
            self.release(motion);
        } else {
            motion.force_position(Driver::Parkour, position);
        }
    }

    fn update_wall_run(
        &mut self,
        motion: &mut MotionState,
        probe: &impl PhysicsProbe,
        input: &ParkourInput,
        dt: f32,
    ) -> bool {
        let Maneuver::WallRun { normal, direction, speed, elapsed } = self.maneuver else {
            return false;
        };

        if input.jump {
            info!("Wall jump");
            let impulse = normal * self.settings.wall_jump_away
                + Vec3::Y * self.settings.wall_jump_up
                + direction * speed * self.settings.wall_jump_momentum;
            motion.restore_physics();
            motion.set_velocity(Driver::Parkour, impulse);
            motion.face(Driver::Parkour, horizontal(impulse));
            self.maneuver = Maneuver::WallJump { elapsed: 0.0 };
            return true;
        }

        let elapsed = elapsed + dt;
        if elapsed >= self.settings.wall_run_max_duration {
            info!("Wall run timed out after {elapsed:.2}s");
            self.end_wall_run(motion);
            return false;
        }

        let origin = motion.position + Vec3::Y * self.settings.wall_run_probe_height;
        let wall = Dir3::new(-normal)
            .ok()
            .and_then(|toward| probe.raycast(origin, toward, self.settings.wall_run_probe_distance))
            .filter(|hit| hit.normal.y.abs() <= MAX_WALL_NORMAL_Y);
        let Some(wall) = wall else {
            info!("Wall run lost the wall");
            self.end_wall_run(motion);
            return false;
        };
        let normal = horizontal(wall.normal).normalize_or(normal);

        let vertical = motion.velocity.y - self.settings.gravity * self.settings.wall_run_gravity * dt;
        if vertical < -self.settings.wall_run_max_fall_speed {
            info!("Wall run fell off");
            self.end_wall_run(motion);
            return false;
        }

        let velocity = direction * speed - normal * self.settings.wall_run_stick_speed + Vec3::Y * vertical;
        motion.set_velocity(Driver::Parkour, velocity);
        self.maneuver = Maneuver::WallRun {
            normal,
            direction,
            speed,
            elapsed,
        };
        false
    }

    fn end_wall_run(&mut self, motion: &mut MotionState) {
        self.release(motion);
        self.cooldown = self.settings.regrab_cooldown;
    }

    fn update_wall_jump(&mut self, motion: &mut MotionState, dt: f32) {
        let Maneuver::WallJump { elapsed } = &mut self.maneuver else {
            return;
        };
        *elapsed += dt;
        if *elapsed >= self.settings.wall_jump_duration {
            self.release(motion);
            self.cooldown = self.settings.regrab_cooldown;
        }
    }
}
