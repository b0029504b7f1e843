//! World state and user-facing operations
//!
//! The World is a single owned value: the frame driver holds it and input
//! handlers borrow it mutably between frames. Nothing here is global.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{square_inside_any, topmost_at};
use super::reflect::clamp_into;
use super::region::{Region, generate_regions, uniform};
use super::shape::{Entity, EntityId, RenderHint, ShapeKind};
use crate::audio::AudioSink;
use crate::consts::*;
use crate::interaction::{InteractionKind, InteractionLog, RecordTarget};

/// Defaults applied to newly created shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub kind: ShapeKind,
    /// Shape size, [5, 25]
    pub size: f32,
    /// Hue in degrees, [0, 360)
    pub hue: f32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Ball,
            size: DEFAULT_SIZE,
            hue: DEFAULT_HUE,
        }
    }
}

/// Result of a placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    /// Candidates examined, including the accepted one
    pub attempts: u32,
    /// False when every attempt landed inside a region and the last one was kept
    pub clear: bool,
}

/// What a pointer press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    Removed(EntityId),
    Added(EntityId),
    /// Click landed fully inside a region; nothing was placed
    Blocked,
}

/// Capture toggles (the capture itself is external)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingState {
    pub video: bool,
    pub audio: bool,
}

/// The simulation arena
#[derive(Debug, Clone)]
pub struct World {
    /// Arena extent; the arena spans [0, w] x [0, h]
    arena: Vec2,
    /// Shapes in insertion order (also draw order)
    pub(crate) entities: Vec<Entity>,
    /// Background regions for the current generation
    regions: Vec<Region>,
    selection: Selection,
    recording: RecordingState,
    log: InteractionLog,
    rng: Pcg32,
    /// Frames stepped since creation
    pub(crate) frame: u64,
    next_id: EntityId,
}

impl World {
    /// Create a world with a freshly generated background
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        let mut world = Self::with_regions(width, height, Vec::new(), seed);
        world.regions = generate_regions(world.arena, &mut world.rng);
        log::info!(
            "World {}x{} created with {} regions (seed {seed})",
            width,
            height,
            world.regions.len()
        );
        world
    }

    /// Create a world with a fixed background
    pub fn with_regions(width: f32, height: f32, regions: Vec<Region>, seed: u64) -> Self {
        Self {
            arena: Vec2::new(width, height),
            entities: Vec::new(),
            regions,
            selection: Selection::default(),
            recording: RecordingState::default(),
            log: InteractionLog::new(),
            rng: Pcg32::seed_from_u64(seed),
            frame: 0,
            next_id: 1,
        }
    }

    // === Accessors ===

    pub fn arena(&self) -> Vec2 {
        self.arena
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn recording(&self) -> RecordingState {
        self.recording
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn interaction_log(&self) -> &InteractionLog {
        &self.log
    }

    /// Take the interaction log for export, leaving an empty one behind
    pub fn take_interaction_log(&mut self) -> InteractionLog {
        std::mem::take(&mut self.log)
    }

    /// Draw list for the render collaborator, in z-order
    pub fn render_hints(&self) -> Vec<RenderHint> {
        self.entities.iter().map(Entity::render_hint).collect()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Mutable access for drivers and tests that script motion directly
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Shapes (mutable) alongside the read-only background, for the stepper
    pub(crate) fn parts_mut(&mut self) -> (&mut Vec<Entity>, &[Region]) {
        (&mut self.entities, &self.regions)
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn record(&mut self, kind: InteractionKind) {
        let Selection { kind: shape, size, hue } = self.selection;
        self.log.record(kind, shape, size, hue);
    }

    // === Entity operations ===

    fn push_entity(&mut self, kind: ShapeKind, pos: Vec2, size: f32, hue: f32) -> EntityId {
        let id = self.next_entity_id();
        let entity = Entity::spawn(id, kind, pos, size, hue, &mut self.rng);
        log::debug!(
            "spawn #{id} {} at ({:.1}, {:.1}) size {size:.1} vel ({:.3}, {:.3})",
            kind.as_str(),
            pos.x,
            pos.y,
            entity.vel.x,
            entity.vel.y
        );
        self.entities.push(entity);
        id
    }

    /// Create a shape at `pos` and append it on top
    pub fn add_entity(&mut self, kind: ShapeKind, pos: Vec2, size: f32, hue: f32) -> EntityId {
        let id = self.push_entity(kind, pos, size, hue);
        self.record(InteractionKind::Added { x: pos.x, y: pos.y });
        id
    }

    /// Remove the topmost shape whose bounding circle contains `point`
    pub fn remove_entity_at(&mut self, point: Vec2) -> bool {
        self.remove_topmost(point).is_some()
    }

    fn remove_topmost(&mut self, point: Vec2) -> Option<EntityId> {
        let index = topmost_at(&self.entities, point)?;
        // `remove` keeps the relative order of the remaining shapes
        let removed = self.entities.remove(index);
        self.record(InteractionKind::Removed {
            x: point.x,
            y: point.y,
        });
        log::debug!("removed #{} ({})", removed.id, removed.kind.as_str());
        Some(removed.id)
    }

    /// Random candidate with the shape fully inside the arena
    fn random_candidate(&mut self, size: f32) -> Vec2 {
        let x = uniform(&mut self.rng, size, self.arena.x - size);
        let y = uniform(&mut self.rng, size, self.arena.y - size);
        Vec2::new(x, y)
    }

    /// Search for a position whose bounding square isn't buried in a region.
    ///
    /// Starts from `candidate` and retries with random positions, examining at
    /// most `MAX_PLACEMENT_ATTEMPTS` candidates. If none is clear the last one is
    /// returned anyway. Regions are never touched.
    pub fn find_placement(&mut self, candidate: Vec2, size: f32) -> Placement {
        let mut pos = candidate;
        let mut attempts = 1;
        loop {
            if !square_inside_any(pos, size, &self.regions) {
                return Placement {
                    pos,
                    attempts,
                    clear: true,
                };
            }
            if attempts >= MAX_PLACEMENT_ATTEMPTS {
                log::debug!("no clear spot after {attempts} attempts, keeping last candidate");
                return Placement {
                    pos,
                    attempts,
                    clear: false,
                };
            }
            pos = self.random_candidate(size);
            attempts += 1;
        }
    }

    /// Place a new shape near `candidate`, avoiding region interiors. Never fails.
    pub fn place_entity(
        &mut self,
        kind: ShapeKind,
        candidate: Vec2,
        size: f32,
        hue: f32,
    ) -> EntityId {
        let placement = self.find_placement(candidate, size);
        self.add_entity(kind, placement.pos, size, hue)
    }

    /// Random kind, size and hue at a random clear spot. The selection adopts
    /// the drawn values.
    pub fn add_random_shape<S: AudioSink + ?Sized>(&mut self, sink: &mut S) -> EntityId {
        let (id, pos) = self.spawn_random(sink);
        self.record(InteractionKind::RandomAdded { x: pos.x, y: pos.y });
        id
    }

    /// Drop in `count` random shapes as part of setup. Unlike
    /// [`World::add_random_shape`] nothing is logged and the selection is
    /// left alone.
    pub fn seed_random_shapes<S: AudioSink + ?Sized>(&mut self, count: u32, sink: &mut S) {
        let selection = self.selection;
        for _ in 0..count {
            self.spawn_random(sink);
        }
        self.apply_selection(selection, sink);
    }

    fn spawn_random<S: AudioSink + ?Sized>(&mut self, sink: &mut S) -> (EntityId, Vec2) {
        let kind = ShapeKind::ALL[self.rng.random_range(0..ShapeKind::ALL.len())];
        let size = uniform(&mut self.rng, SIZE_MIN, SIZE_MAX);
        let hue = uniform(&mut self.rng, 0.0, HUE_MAX);
        self.apply_selection(Selection { kind, size, hue }, sink);

        let candidate = self.random_candidate(size);
        let placement = self.find_placement(candidate, size);
        (self.push_entity(kind, placement.pos, size, hue), placement.pos)
    }

    /// Input surface: pick the topmost shape under the pointer, or drop a new
    /// one using the current selection.
    pub fn pointer_down(&mut self, point: Vec2) -> PointerOutcome {
        let outcome = if let Some(id) = self.remove_topmost(point) {
            PointerOutcome::Removed(id)
        } else {
            let Selection { kind, size, hue } = self.selection;
            if square_inside_any(point, size, &self.regions) {
                log::debug!("click at ({:.1}, {:.1}) inside a region, ignored", point.x, point.y);
                PointerOutcome::Blocked
            } else {
                PointerOutcome::Added(self.add_entity(kind, point, size, hue))
            }
        };
        self.record(InteractionKind::PointerDown {
            x: point.x,
            y: point.y,
        });
        outcome
    }

    // === Selection ===

    /// Change the default kind for new shapes and re-voice the sink
    pub fn select_kind<S: AudioSink + ?Sized>(&mut self, kind: ShapeKind, sink: &mut S) {
        self.apply_selection(Selection { kind, ..self.selection }, sink);
        self.record(InteractionKind::ShapeSelected);
    }

    /// Install a whole selection without logging it (configuration, random
    /// draws). A ready sink is re-voiced for the kind.
    pub fn apply_selection<S: AudioSink + ?Sized>(&mut self, selection: Selection, sink: &mut S) {
        self.selection = selection;
        if sink.is_ready() {
            sink.set_default_waveform(selection.kind.waveform());
        }
    }

    /// Size slider
    pub fn set_size(&mut self, size: f32) {
        self.selection.size = size;
        self.record(InteractionKind::SliderChanged);
    }

    /// Hue slider
    pub fn set_hue(&mut self, hue: f32) {
        self.selection.hue = hue;
        self.record(InteractionKind::SliderChanged);
    }

    // === Background and arena ===

    /// Replace the whole region set with a new random layout
    pub fn regenerate_regions(&mut self) {
        self.regions = generate_regions(self.arena, &mut self.rng);
        log::info!("Regenerated {} regions", self.regions.len());
        self.record(InteractionKind::RegionsRegenerated {
            count: self.regions.len(),
        });
    }

    /// New arena bounds: fresh regions, shapes clamped (never removed).
    /// Window-driven, so it is not an interaction record.
    pub fn resize(&mut self, width: f32, height: f32) {
        log::info!(
            "Arena resize {}x{} -> {}x{}",
            self.arena.x,
            self.arena.y,
            width,
            height
        );
        self.arena = Vec2::new(width, height);
        self.regions = generate_regions(self.arena, &mut self.rng);
        for entity in &mut self.entities {
            clamp_into(entity, self.arena);
        }
    }

    /// Clear all shapes, keep the background
    pub fn reset(&mut self) {
        log::info!("Reset: cleared {} shapes", self.entities.len());
        self.entities.clear();
        self.record(InteractionKind::Reset);
    }

    /// Clear all shapes and draw a new background
    pub fn update_sketch(&mut self) {
        self.entities.clear();
        self.regions = generate_regions(self.arena, &mut self.rng);
        log::info!("Sketch updated: {} regions", self.regions.len());
        self.record(InteractionKind::SketchUpdated);
    }

    /// Flip a capture toggle; returns the new state
    pub fn toggle_recording(&mut self, target: RecordTarget) -> bool {
        let flag = match target {
            RecordTarget::Video => &mut self.recording.video,
            RecordTarget::Audio => &mut self.recording.audio,
        };
        *flag = !*flag;
        let on = *flag;
        self.record(if on {
            InteractionKind::RecordingStarted(target)
        } else {
            InteractionKind::RecordingStopped(target)
        });
        on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CaptureSink;
    use crate::sim::Waveform;

    fn empty_world() -> World {
        World::with_regions(800.0, 600.0, Vec::new(), 1)
    }

    #[test]
    fn test_new_world_has_regions() {
        let world = World::new(800.0, 600.0, 5);
        assert!(matches!(world.regions().len(), 5 | 10 | 15 | 20));
        assert!(world.entities().is_empty());
    }

    #[test]
    fn test_add_entity_appends_and_logs() {
        let mut world = empty_world();
        let a = world.add_entity(ShapeKind::Ball, Vec2::new(10.0, 10.0), 10.0, 0.0);
        let b = world.add_entity(ShapeKind::Star, Vec2::new(20.0, 20.0), 10.0, 0.0);
        assert_ne!(a, b);
        assert_eq!(world.entities().last().map(|e| e.id), Some(b));
        assert_eq!(
            world
                .interaction_log()
                .count_of(&InteractionKind::Added { x: 0.0, y: 0.0 }),
            2
        );
    }

    #[test]
    fn test_remove_exactly_one_preserves_order() {
        let mut world = empty_world();
        let ids: Vec<_> = [100.0, 200.0, 300.0, 400.0]
            .iter()
            .map(|&x| world.add_entity(ShapeKind::Rect, Vec2::new(x, 100.0), 20.0, 0.0))
            .collect();

        assert!(world.remove_entity_at(Vec2::new(201.0, 99.0)));
        let remaining: Vec<_> = world.entities().iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn test_remove_misses() {
        let mut world = empty_world();
        world.add_entity(ShapeKind::Ball, Vec2::new(100.0, 100.0), 10.0, 0.0);
        assert!(!world.remove_entity_at(Vec2::new(300.0, 300.0)));
        assert_eq!(world.entities().len(), 1);
    }

    #[test]
    fn test_remove_takes_topmost() {
        let mut world = empty_world();
        let bottom = world.add_entity(ShapeKind::Ball, Vec2::new(100.0, 100.0), 20.0, 0.0);
        world.add_entity(ShapeKind::Ball, Vec2::new(102.0, 100.0), 20.0, 0.0);
        assert!(world.remove_entity_at(Vec2::new(101.0, 100.0)));
        assert_eq!(world.entities().len(), 1);
        assert_eq!(world.entities()[0].id, bottom);
    }

    #[test]
    fn test_placement_accepts_clear_candidate() {
        let mut world = World::with_regions(
            800.0,
            600.0,
            vec![Region::new(0.0, 0.0, 50.0, 50.0, 0.0)],
            3,
        );
        let p = world.find_placement(Vec2::new(400.0, 300.0), 10.0);
        assert!(p.clear);
        assert_eq!(p.attempts, 1);
        assert_eq!(p.pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_placement_retries_out_of_region() {
        let mut world = World::with_regions(
            800.0,
            600.0,
            vec![Region::new(0.0, 0.0, 50.0, 50.0, 0.0)],
            3,
        );
        let p = world.find_placement(Vec2::new(25.0, 25.0), 10.0);
        assert!(p.clear);
        assert!(p.attempts > 1);
        assert_ne!(p.pos, Vec2::new(25.0, 25.0));
    }

    #[test]
    fn test_placement_bounded_when_arena_is_covered() {
        // One region engulfs the whole arena: no candidate can ever be clear
        let regions = vec![Region::new(-10.0, -10.0, 1000.0, 1000.0, 128.0)];
        let mut world = World::with_regions(800.0, 600.0, regions.clone(), 11);
        for _ in 0..100 {
            let p = world.find_placement(Vec2::new(400.0, 300.0), 10.0);
            assert!(!p.clear);
            assert_eq!(p.attempts, MAX_PLACEMENT_ATTEMPTS);
            world.place_entity(ShapeKind::Triangle, Vec2::new(400.0, 300.0), 10.0, 0.0);
        }
        assert_eq!(world.entities().len(), 100);
        assert_eq!(world.regions(), regions.as_slice());
    }

    #[test]
    fn test_pointer_down_removes_then_adds() {
        let mut world = empty_world();
        world.set_size(10.0);
        let added = world.pointer_down(Vec2::new(50.0, 50.0));
        let PointerOutcome::Added(id) = added else {
            panic!("expected add, got {added:?}");
        };
        assert_eq!(world.pointer_down(Vec2::new(51.0, 50.0)), PointerOutcome::Removed(id));
        assert!(world.entities().is_empty());
    }

    #[test]
    fn test_pointer_down_uses_selection() {
        let mut world = empty_world();
        let mut sink = CaptureSink::new();
        world.select_kind(ShapeKind::Star, &mut sink);
        world.set_size(8.0);
        world.set_hue(270.0);
        world.pointer_down(Vec2::new(300.0, 300.0));
        let e = &world.entities()[0];
        assert_eq!((e.kind, e.size, e.hue), (ShapeKind::Star, 8.0, 270.0));
    }

    #[test]
    fn test_pointer_down_inside_region_blocked() {
        let mut world = World::with_regions(
            800.0,
            600.0,
            vec![Region::new(100.0, 100.0, 50.0, 50.0, 0.0)],
            2,
        );
        world.set_size(10.0);
        assert_eq!(world.pointer_down(Vec2::new(125.0, 125.0)), PointerOutcome::Blocked);
        assert!(world.entities().is_empty());
    }

    #[test]
    fn test_select_kind_notifies_ready_sink_only() {
        let mut world = empty_world();
        let mut ready = CaptureSink::new();
        world.select_kind(ShapeKind::Triangle, &mut ready);
        assert_eq!(ready.waveform, Some(Waveform::Triangle));
        assert_eq!(world.selection().kind, ShapeKind::Triangle);

        let mut offline = CaptureSink::offline();
        world.select_kind(ShapeKind::Rect, &mut offline);
        assert_eq!(offline.waveform, None);
        assert_eq!(world.selection().kind, ShapeKind::Rect);
    }

    #[test]
    fn test_select_kind_leaves_existing_entities() {
        let mut world = empty_world();
        world.add_entity(ShapeKind::Ball, Vec2::new(100.0, 100.0), 10.0, 0.0);
        world.select_kind(ShapeKind::Star, &mut CaptureSink::new());
        assert_eq!(world.entities()[0].kind, ShapeKind::Ball);
    }

    #[test]
    fn test_random_shape_updates_selection() {
        let mut world = World::new(800.0, 600.0, 77);
        let mut sink = CaptureSink::new();
        let id = world.add_random_shape(&mut sink);
        let e = world.entity(id).unwrap().clone();
        let sel = world.selection();
        assert_eq!((sel.kind, sel.size, sel.hue), (e.kind, e.size, e.hue));
        assert!(e.size >= SIZE_MIN && e.size < SIZE_MAX);
        assert!(e.hue >= 0.0 && e.hue < HUE_MAX);
        assert_eq!(sink.waveform, Some(e.kind.waveform()));
    }

    #[test]
    fn test_random_shape_logs_single_record() {
        let mut world = World::new(800.0, 600.0, 77);
        world.add_random_shape(&mut CaptureSink::new());
        let log = world.interaction_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().map(|r| r.kind.label()), Some("Random shape added"));
    }

    #[test]
    fn test_seed_random_shapes_is_silent() {
        let mut world = World::new(800.0, 600.0, 5);
        let mut sink = CaptureSink::new();
        let configured = Selection {
            kind: ShapeKind::Star,
            size: 9.0,
            hue: 42.0,
        };
        world.apply_selection(configured, &mut sink);
        world.seed_random_shapes(4, &mut sink);
        assert_eq!(world.entities().len(), 4);
        assert!(world.interaction_log().is_empty());
        assert_eq!(world.selection(), configured);
        assert_eq!(sink.waveform, Some(Waveform::Sawtooth));
    }

    #[test]
    fn test_resize_is_not_logged() {
        let mut world = World::new(800.0, 600.0, 8);
        world.resize(640.0, 480.0);
        assert!(world.interaction_log().is_empty());
    }

    #[test]
    fn test_resize_clamps_and_keeps_entities() {
        let mut world = World::new(800.0, 600.0, 4);
        world.add_entity(ShapeKind::Ball, Vec2::new(700.0, 500.0), 20.0, 0.0);
        world.add_entity(ShapeKind::Rect, Vec2::new(100.0, 100.0), 20.0, 0.0);
        world.resize(400.0, 300.0);
        assert_eq!(world.arena(), Vec2::new(400.0, 300.0));
        assert_eq!(world.entities().len(), 2);
        assert_eq!(world.entities()[0].pos, Vec2::new(390.0, 290.0));
        assert_eq!(world.entities()[1].pos, Vec2::new(100.0, 100.0));
        for r in world.regions() {
            assert!(r.x < 400.0 && r.y < 300.0);
        }
    }

    #[test]
    fn test_reset_keeps_regions_update_replaces() {
        let mut world = World::new(800.0, 600.0, 21);
        world.add_entity(ShapeKind::Ball, Vec2::new(100.0, 100.0), 10.0, 0.0);
        let before = world.regions().to_vec();
        world.reset();
        assert!(world.entities().is_empty());
        assert_eq!(world.regions(), before.as_slice());

        world.add_entity(ShapeKind::Ball, Vec2::new(100.0, 100.0), 10.0, 0.0);
        world.update_sketch();
        assert!(world.entities().is_empty());
        assert_eq!(world.interaction_log().count_of(&InteractionKind::SketchUpdated), 1);
    }

    #[test]
    fn test_toggle_recording_logs_start_stop() {
        let mut world = empty_world();
        assert!(world.toggle_recording(RecordTarget::Video));
        assert!(world.recording().video);
        assert!(!world.recording().audio);
        assert!(!world.toggle_recording(RecordTarget::Video));
        let log = world.interaction_log();
        assert_eq!(
            log.entries[0].kind,
            InteractionKind::RecordingStarted(RecordTarget::Video)
        );
        assert_eq!(
            log.entries[1].kind,
            InteractionKind::RecordingStopped(RecordTarget::Video)
        );
    }

    #[test]
    fn test_regenerate_logs_count() {
        let mut world = empty_world();
        world.regenerate_regions();
        let n = world.regions().len();
        assert_eq!(
            world.interaction_log().last().map(|r| r.kind.clone()),
            Some(InteractionKind::RegionsRegenerated { count: n })
        );
    }
}
