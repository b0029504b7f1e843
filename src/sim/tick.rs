//! Per-frame simulation step
//!
//! One call advances every shape by one frame. Order matters:
//! 1. each shape in turn moves, bounces off the arena edges, then tests the
//!    background regions (reversing and sounding on contact);
//! 2. once all shapes have moved, every overlapping pair reverses.
//!
//! The entity list is never restructured while stepping.

use super::collision::{overlapping_pairs, overlapping_regions};
use super::reflect::{invert_pair, reflect_edges};
use super::sound::map_sound;
use super::state::World;
use crate::audio::AudioSink;

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Shape/region contacts (one per overlapping region)
    pub region_hits: u32,
    /// Sound events delivered to a ready sink
    pub sounds_emitted: u32,
    /// Sound events skipped because the sink wasn't ready
    pub sounds_dropped: u32,
    /// Shapes that bounced off an arena edge
    pub edge_bounces: u32,
    /// Overlapping shape pairs
    pub pair_collisions: u32,
}

impl StepReport {
    /// Accumulate another frame's counts
    pub fn absorb(&mut self, other: &StepReport) {
        self.region_hits += other.region_hits;
        self.sounds_emitted += other.sounds_emitted;
        self.sounds_dropped += other.sounds_dropped;
        self.edge_bounces += other.edge_bounces;
        self.pair_collisions += other.pair_collisions;
    }
}

/// Advance the world by one frame, handing region strikes to `sink`
pub fn step<S: AudioSink + ?Sized>(world: &mut World, sink: &mut S) -> StepReport {
    let mut report = StepReport::default();
    let arena = world.arena();
    world.frame += 1;

    // Disjoint borrows: shapes mutate, regions stay read-only
    let (entities, regions) = world.parts_mut();

    for entity in entities.iter_mut() {
        entity.advance();
        if reflect_edges(entity, arena).any() {
            report.edge_bounces += 1;
        }

        let mut struck = false;
        for index in overlapping_regions(entity, regions) {
            struck = true;
            report.region_hits += 1;
            let event = map_sound(&regions[index], entity, arena);
            if sink.is_ready() {
                sink.trigger(&event);
                report.sounds_emitted += 1;
            } else {
                report.sounds_dropped += 1;
                log::trace!("sink not ready, dropped {:.1} Hz", event.frequency);
            }
        }
        if struck {
            entity.invert_velocity();
        }
    }

    for (i, j) in overlapping_pairs(entities) {
        invert_pair(entities, i, j);
        report.pair_collisions += 1;
    }

    if report.pair_collisions > 0 || report.region_hits > 0 {
        log::trace!("frame {}: {:?}", world.frame, report);
    }
    report
}

impl World {
    /// Advance one frame; see [`step`]
    pub fn step<S: AudioSink + ?Sized>(&mut self, sink: &mut S) -> StepReport {
        step(self, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{CaptureSink, NullSink};
    use crate::sim::{Region, ShapeKind, Waveform};
    use glam::Vec2;
    use proptest::prelude::*;

    fn world_with(regions: Vec<Region>) -> World {
        World::with_regions(800.0, 600.0, regions, 1)
    }

    /// Add a shape and pin its velocity
    fn add(world: &mut World, kind: ShapeKind, pos: Vec2, vel: Vec2, size: f32) -> u32 {
        let id = world.add_entity(kind, pos, size, 0.0);
        world.entity_mut(id).unwrap().vel = vel;
        id
    }

    #[test]
    fn test_identical_balls_opposite_velocities_both_negate() {
        let mut world = world_with(Vec::new());
        let a = add(&mut world, ShapeKind::Ball, Vec2::new(400.0, 300.0), Vec2::new(1.0, 0.5), 10.0);
        let b = add(&mut world, ShapeKind::Ball, Vec2::new(400.0, 300.0), Vec2::new(-1.0, -0.5), 10.0);

        let report = world.step(&mut NullSink);
        assert_eq!(report.pair_collisions, 1);
        // Not separated: each simply reverses
        assert_eq!(world.entity(a).unwrap().vel, Vec2::new(-1.0, -0.5));
        assert_eq!(world.entity(b).unwrap().vel, Vec2::new(1.0, 0.5));
    }

    #[test]
    fn test_pair_check_runs_after_all_moved() {
        let mut world = world_with(Vec::new());
        // Apart before the step, overlapping only once both have moved
        let a = add(&mut world, ShapeKind::Rect, Vec2::new(100.0, 100.0), Vec2::new(2.0, 0.0), 10.0);
        let b = add(&mut world, ShapeKind::Star, Vec2::new(113.0, 100.0), Vec2::new(-2.0, 0.0), 10.0);
        let report = world.step(&mut NullSink);
        assert_eq!(report.pair_collisions, 1);
        assert_eq!(world.entity(a).unwrap().vel, Vec2::new(-2.0, 0.0));
        assert_eq!(world.entity(b).unwrap().vel, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_region_hit_inverts_once_and_sounds_per_region() {
        let regions = vec![
            Region::new(100.0, 100.0, 40.0, 40.0, 0.0),
            Region::new(110.0, 110.0, 40.0, 40.0, 255.0),
        ];
        let mut world = world_with(regions);
        let id = add(&mut world, ShapeKind::Triangle, Vec2::new(119.0, 119.0), Vec2::new(1.0, 1.0), 10.0);
        let mut sink = CaptureSink::new();
        let report = world.step(&mut sink);

        assert_eq!(report.region_hits, 2);
        assert_eq!(sink.events.len(), 2);
        assert!(sink.events.iter().all(|e| e.waveform == Waveform::Triangle));
        // Events come in region order
        assert!(sink.events[0].harmonicity < sink.events[1].harmonicity);
        // Single inversion of the whole vector
        assert_eq!(world.entity(id).unwrap().vel, Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_event_waveform_follows_striking_shape() {
        let mut world = world_with(vec![Region::new(100.0, 100.0, 40.0, 40.0, 0.0)]);
        add(&mut world, ShapeKind::Ball, Vec2::new(120.0, 120.0), Vec2::ZERO, 10.0);
        let mut sink = CaptureSink::new();
        world.select_kind(ShapeKind::Star, &mut sink);
        world.step(&mut sink);
        assert_eq!(sink.waveform, Some(Waveform::Sawtooth));
        assert_eq!(sink.events.len(), 1);
        assert_eq!(sink.events[0].waveform, Waveform::Sine);
    }

    #[test]
    fn test_unready_sink_drops_but_world_still_reacts() {
        let mut world = world_with(vec![Region::new(100.0, 100.0, 40.0, 40.0, 0.0)]);
        let id = add(&mut world, ShapeKind::Ball, Vec2::new(96.0, 120.0), Vec2::new(1.0, 0.0), 10.0);
        let mut sink = CaptureSink::offline();
        let report = world.step(&mut sink);
        assert_eq!(report.sounds_dropped, 1);
        assert_eq!(report.sounds_emitted, 0);
        assert!(sink.events.is_empty());
        assert_eq!(world.entity(id).unwrap().vel, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_region_sound_parameters_follow_mapping() {
        let mut world = world_with(vec![Region::new(0.0, 0.0, 50.0, 50.0, 0.0)]);
        add(&mut world, ShapeKind::Ball, Vec2::new(30.0, 30.0), Vec2::new(0.0, 0.0), 10.0);
        let mut sink = CaptureSink::new();
        world.step(&mut sink);
        assert_eq!(sink.events.len(), 1);
        assert_eq!(sink.events[0].frequency, 60.0);
        assert!((sink.events[0].harmonicity - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_edge_bounce_counts() {
        let mut world = world_with(Vec::new());
        let id = add(&mut world, ShapeKind::Ball, Vec2::new(5.5, 300.0), Vec2::new(-1.0, 0.0), 10.0);
        let report = world.step(&mut NullSink);
        assert_eq!(report.edge_bounces, 1);
        let e = world.entity(id).unwrap();
        assert_eq!(e.pos.x, 5.0);
        assert_eq!(e.vel.x, 1.0);
    }

    #[test]
    fn test_frame_counter_and_report_absorb() {
        let mut world = world_with(Vec::new());
        let mut total = StepReport::default();
        for _ in 0..3 {
            total.absorb(&world.step(&mut NullSink));
        }
        assert_eq!(world.frame(), 3);
        assert_eq!(total, StepReport::default());
    }

    proptest! {
        #[test]
        fn prop_positions_stay_in_bounds(seed in 0u64..500, steps in 1usize..60) {
            let mut world = World::new(640.0, 480.0, seed);
            let mut sink = NullSink;
            for _ in 0..12 {
                world.add_random_shape(&mut sink);
            }
            for _ in 0..steps {
                world.step(&mut sink);
                let arena = world.arena();
                for e in world.entities() {
                    let r = e.bounding_radius();
                    prop_assert!(e.pos.x >= r && e.pos.x <= arena.x - r);
                    prop_assert!(e.pos.y >= r && e.pos.y <= arena.y - r);
                }
            }
        }

        #[test]
        fn prop_step_is_deterministic(seed in 0u64..200) {
            let build = || {
                let mut world = World::new(800.0, 600.0, seed);
                for _ in 0..8 {
                    world.add_random_shape(&mut NullSink);
                }
                world
            };
            let mut a = build();
            let mut b = build();
            let mut sa = CaptureSink::new();
            let mut sb = CaptureSink::new();
            for _ in 0..30 {
                prop_assert_eq!(a.step(&mut sa), b.step(&mut sb));
            }
            prop_assert_eq!(a.entities(), b.entities());
            prop_assert_eq!(sa.events, sb.events);
        }
    }
}
