//! Interactive quadtree viewer.

use egui::{Align2, Color32, FontId, Key, Pos2, Stroke};
use quadview::{Circle, Point, QuadTree, QueryStats, Rect, Region};
use rand::Rng;
use tracing::{debug, info};

use crate::config::{Config, SelectConfig, SpawnConfig};

const BACKGROUND: Color32 = Color32::from_rgb(30, 30, 30);
const QUAD_COLOR: Color32 = Color32::from_rgb(217, 217, 217);
const SELECTED_COLOR: Color32 = Color32::from_rgb(0, 255, 127);
const SELECT_STROKE: Color32 = Color32::from_rgb(0, 120, 215);
const SELECT_FILL: Color32 = Color32::from_rgba_premultiplied(0, 24, 43, 50);

const POINT_RADIUS: f32 = 3.0;
const SELECTED_RADIUS: f32 = 3.5;

const HANDLED_KEYS: [Key; 7] = [Key::F1, Key::F2, Key::F3, Key::F5, Key::F6, Key::F7, Key::F8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Rectangle dragged out with the left button.
    SelectBox,
    BoxAroundCursor,
    CircleAroundCursor,
}

impl SelectMode {
    fn label(self) -> &'static str {
        match self {
            SelectMode::SelectBox => "SelectBox",
            SelectMode::BoxAroundCursor => "BoxAroundCursor",
            SelectMode::CircleAroundCursor => "CircleAroundCursor",
        }
    }
}

/// Query region for `mode`, or `None` when there is nothing to select.
fn selection_region(
    mode: SelectMode,
    cursor: (f32, f32),
    drag_start: Option<(f32, f32)>,
    radius: f32,
) -> Option<Region> {
    match mode {
        SelectMode::SelectBox => drag_start
            .and_then(|start| Rect::from_corners(start, cursor).ok())
            .map(Region::from),
        SelectMode::BoxAroundCursor => Rect::around(cursor.0, cursor.1, radius)
            .ok()
            .map(Region::from),
        SelectMode::CircleAroundCursor => Circle::new(cursor.0, cursor.1, radius)
            .ok()
            .map(Region::from),
    }
}

fn adjust_radius(radius: f32, notches: f32, select: &SelectConfig) -> f32 {
    (radius + notches * select.step).clamp(select.min_radius, select.max_radius)
}

/// The tree plus the id counter used as point payload.
#[derive(Debug)]
struct Scene {
    tree: QuadTree<u32>,
    next_id: u32,
}

impl Scene {
    fn new(config: &Config) -> anyhow::Result<Self> {
        let boundary = Rect::new(0.0, 0.0, config.window.width, config.window.height)?;
        let tree = QuadTree::with_capacity(boundary, config.tree.capacity)?
            .with_max_depth(config.tree.max_depth);
        Ok(Self { tree, next_id: 0 })
    }

    fn insert(&mut self, x: f32, y: f32) -> bool {
        let accepted = self.tree.insert(Point::with_data(x, y, self.next_id));
        if accepted {
            self.next_id = self.next_id.wrapping_add(1);
        }
        accepted
    }

    /// Adds `count` points uniformly distributed over the tree boundary.
    fn spawn_random<R: Rng>(&mut self, rng: &mut R, count: usize) -> usize {
        let bounds = *self.tree.boundary();
        let mut accepted = 0;
        for _ in 0..count {
            let x = rng.gen_range(bounds.x()..=bounds.right());
            let y = rng.gen_range(bounds.y()..=bounds.bottom());
            if self.insert(x, y) {
                accepted += 1;
            }
        }
        debug!(requested = count, accepted, total = self.tree.len(), "spawned random points");
        accepted
    }

    fn spawn_near<R: Rng>(&mut self, rng: &mut R, x: f32, y: f32, jitter: f32) -> bool {
        let x = x + rng.gen_range(-jitter..=jitter);
        let y = y + rng.gen_range(-jitter..=jitter);
        self.insert(x, y)
    }

    fn clear(&mut self) {
        self.tree.clear();
    }
}

struct FrameInput {
    cursor: Option<Pos2>,
    primary_down: bool,
    secondary_down: bool,
    scroll: f32,
    dt: f32,
    pressed: Vec<Key>,
    spawn_held: bool,
}

impl FrameInput {
    fn read(ctx: &egui::Context) -> Self {
        ctx.input(|i| FrameInput {
            cursor: i.pointer.latest_pos(),
            primary_down: i.pointer.primary_down(),
            secondary_down: i.pointer.secondary_down(),
            scroll: i.raw_scroll_delta.y,
            dt: i.unstable_dt,
            pressed: HANDLED_KEYS
                .into_iter()
                .filter(|key| i.key_pressed(*key))
                .collect(),
            spawn_held: i.key_down(Key::F4),
        })
    }
}

pub struct Viewer {
    scene: Scene,
    spawn: SpawnConfig,
    select: SelectConfig,
    mode: SelectMode,
    radius: f32,
    cursor: (f32, f32),
    drag_start: Option<(f32, f32)>,
    primary_was_down: bool,
    show_quads: bool,
    show_points: bool,
    show_selected: bool,
}

impl Viewer {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut scene = Scene::new(config)?;
        let accepted = scene.spawn_random(&mut rand::thread_rng(), config.spawn.count);
        info!(
            points = accepted,
            capacity = config.tree.capacity,
            max_depth = config.tree.max_depth,
            "viewer ready"
        );

        Ok(Self {
            scene,
            spawn: config.spawn.clone(),
            select: config.select.clone(),
            mode: SelectMode::SelectBox,
            radius: config
                .select
                .radius
                .clamp(config.select.min_radius, config.select.max_radius),
            cursor: (0.0, 0.0),
            drag_start: None,
            primary_was_down: false,
            show_quads: true,
            show_points: true,
            show_selected: true,
        })
    }

    fn set_mode(&mut self, mode: SelectMode) {
        if self.mode != mode {
            debug!(mode = mode.label(), "selection mode changed");
            self.mode = mode;
        }
    }

    fn handle_key(&mut self, key: Key) {
        match key {
            Key::F1 => self.set_mode(SelectMode::SelectBox),
            Key::F2 => self.set_mode(SelectMode::BoxAroundCursor),
            Key::F3 => self.set_mode(SelectMode::CircleAroundCursor),
            Key::F5 => self.scene.clear(),
            Key::F6 => self.show_quads = !self.show_quads,
            Key::F7 => self.show_points = !self.show_points,
            Key::F8 => self.show_selected = !self.show_selected,
            _ => {}
        }
    }

    fn apply_input(&mut self, input: &FrameInput) {
        for &key in &input.pressed {
            self.handle_key(key);
        }

        if input.scroll != 0.0 {
            self.radius = adjust_radius(self.radius, input.scroll.signum(), &self.select);
        }

        if let Some(pos) = input.cursor {
            self.cursor = (pos.x, pos.y);
        }

        let mut rng = rand::thread_rng();
        if input.spawn_held {
            self.scene.spawn_random(&mut rng, self.spawn.count);
        }

        if input.primary_down && !self.primary_was_down {
            self.drag_start = Some(self.cursor);
        } else if !input.primary_down {
            self.drag_start = None;
        }
        self.primary_was_down = input.primary_down;

        if input.secondary_down {
            let (x, y) = self.cursor;
            self.scene.spawn_near(&mut rng, x, y, self.spawn.jitter);
        }
    }

    fn region(&self) -> Option<Region> {
        selection_region(self.mode, self.cursor, self.drag_start, self.radius)
    }

    fn overlay_text(&self, stats: &QueryStats) -> String {
        format!(
            "selectMode: {}\npointCount: {}\ncheckCount: {}\nselectedCount: {}",
            self.mode.label(),
            self.scene.tree.len(),
            stats.checks,
            stats.matches
        )
    }
}

fn to_egui_rect(rect: &Rect) -> egui::Rect {
    egui::Rect::from_min_max(
        egui::pos2(rect.x(), rect.y()),
        egui::pos2(rect.right(), rect.bottom()),
    )
}

fn draw_region(painter: &egui::Painter, region: &Region) {
    let stroke = Stroke::new(1.0, SELECT_STROKE);
    match region {
        Region::Rect(rect) => painter.rect(to_egui_rect(rect), 0.0, SELECT_FILL, stroke),
        Region::Circle(circle) => painter.circle(
            egui::pos2(circle.x(), circle.y()),
            circle.radius(),
            SELECT_FILL,
            stroke,
        ),
    };
}

impl eframe::App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let input = FrameInput::read(ctx);
        if input.dt > 0.0 {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
                "quadtree ({:.2} fps / {:.2} ms)",
                1.0 / input.dt,
                input.dt * 1000.0
            )));
        }
        self.apply_input(&input);

        let region = self.region();
        let mut selected = Vec::new();
        let stats = region
            .map(|region| self.scene.tree.query_into(region, &mut selected))
            .unwrap_or_default();

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| {
                let painter = ui.painter();
                let tree = &self.scene.tree;

                if self.show_quads {
                    for node in tree.nodes() {
                        painter.rect_stroke(
                            to_egui_rect(node.boundary()),
                            0.0,
                            Stroke::new(1.0, QUAD_COLOR),
                        );
                    }
                }
                if self.show_points {
                    for point in tree.points() {
                        painter.circle_filled(egui::pos2(point.x, point.y), POINT_RADIUS, QUAD_COLOR);
                    }
                }
                if let Some(region) = &region {
                    draw_region(painter, region);
                }
                if self.show_selected {
                    for point in &selected {
                        painter.circle_filled(
                            egui::pos2(point.x, point.y),
                            SELECTED_RADIUS,
                            SELECTED_COLOR,
                        );
                    }
                }

                painter.text(
                    egui::pos2(10.0, 12.0),
                    Align2::LEFT_TOP,
                    self.overlay_text(&stats),
                    FontId::proportional(16.0),
                    Color32::WHITE,
                );
            });
        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_select_box_needs_drag() {
        assert_eq!(
            selection_region(SelectMode::SelectBox, (40.0, 40.0), None, 100.0),
            None
        );

        let region = selection_region(SelectMode::SelectBox, (10.0, 50.0), Some((30.0, 20.0)), 100.0);
        assert_eq!(
            region,
            Some(Region::Rect(Rect::new(10.0, 20.0, 20.0, 30.0).unwrap()))
        );
    }

    #[test]
    fn test_cursor_regions() {
        let boxed = selection_region(SelectMode::BoxAroundCursor, (200.0, 300.0), None, 50.0);
        assert_eq!(
            boxed,
            Some(Region::Rect(Rect::new(150.0, 250.0, 100.0, 100.0).unwrap()))
        );

        let round = selection_region(SelectMode::CircleAroundCursor, (200.0, 300.0), Some((0.0, 0.0)), 50.0);
        assert_eq!(
            round,
            Some(Region::Circle(Circle::new(200.0, 300.0, 50.0).unwrap()))
        );
    }

    #[test]
    fn test_radius_is_clamped() {
        let select = SelectConfig::default();
        assert_eq!(adjust_radius(100.0, 1.0, &select), 110.0);
        assert_eq!(adjust_radius(100.0, -1.0, &select), 90.0);
        assert_eq!(adjust_radius(195.0, 1.0, &select), 200.0);
        assert_eq!(adjust_radius(55.0, -1.0, &select), 50.0);
    }

    #[test]
    fn test_spawn_random_stays_inside() {
        let mut scene = Scene::new(&Config::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(scene.spawn_random(&mut rng, 300), 300);
        assert_eq!(scene.tree.len(), 300);
        assert_eq!(scene.next_id, 300);

        let mut ids: Vec<u32> = scene.tree.points().map(|p| p.data).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..300).collect::<Vec<_>>());
    }

    #[test]
    fn test_spawn_near_outside_window_is_dropped() {
        let mut scene = Scene::new(&Config::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        assert!(!scene.spawn_near(&mut rng, -50.0, -50.0, 10.0));
        assert!(scene.tree.is_empty());
        assert_eq!(scene.next_id, 0);

        assert!(scene.spawn_near(&mut rng, 400.0, 400.0, 10.0));
        let point = scene.tree.points().next().unwrap();
        assert!((point.x - 400.0).abs() <= 10.0 && (point.y - 400.0).abs() <= 10.0);
    }

    #[test]
    fn test_keys_switch_modes_and_toggles() {
        let mut viewer = Viewer::new(&Config::default()).unwrap();
        assert_eq!(viewer.scene.tree.len(), 90);

        viewer.handle_key(Key::F3);
        assert_eq!(viewer.mode, SelectMode::CircleAroundCursor);
        viewer.handle_key(Key::F2);
        assert_eq!(viewer.mode, SelectMode::BoxAroundCursor);

        viewer.handle_key(Key::F6);
        viewer.handle_key(Key::F7);
        viewer.handle_key(Key::F8);
        assert!(!viewer.show_quads && !viewer.show_points && !viewer.show_selected);

        viewer.handle_key(Key::F5);
        assert!(viewer.scene.tree.is_empty());
        assert_eq!(viewer.scene.tree.node_count(), 1);
    }

    #[test]
    fn test_drag_starts_on_press_and_ends_on_release() {
        let mut viewer = Viewer::new(&Config::default()).unwrap();
        let frame = |pos: (f32, f32), primary_down: bool| FrameInput {
            cursor: Some(egui::pos2(pos.0, pos.1)),
            primary_down,
            secondary_down: false,
            scroll: 0.0,
            dt: 0.016,
            pressed: Vec::new(),
            spawn_held: false,
        };

        viewer.apply_input(&frame((10.0, 10.0), true));
        viewer.apply_input(&frame((60.0, 40.0), true));
        assert_eq!(viewer.drag_start, Some((10.0, 10.0)));

        let (selected, stats) = viewer.scene.tree.query_with_stats(viewer.region().unwrap());
        assert_eq!(stats.matches, selected.len());
        assert!(selected.iter().all(|p| (10.0..=60.0).contains(&p.x) && (10.0..=40.0).contains(&p.y)));

        viewer.apply_input(&frame((60.0, 40.0), false));
        assert_eq!(viewer.drag_start, None);
        assert_eq!(viewer.region(), None);
    }

    #[test]
    fn test_overlay_reports_counts() {
        let mut viewer = Viewer::new(&Config::default()).unwrap();
        viewer.handle_key(Key::F5);
        let stats = QueryStats {
            checks: 7,
            nodes_visited: 2,
            matches: 3,
        };
        assert_eq!(
            viewer.overlay_text(&stats),
            "selectMode: SelectBox\npointCount: 0\ncheckCount: 7\nselectedCount: 3"
        );
    }
}
