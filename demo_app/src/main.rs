//! Stage demo application
//!
//! Runs a short scripted camera sequence headlessly: the camera letterboxes,
//! flies to a beacon, pulses it, then picks up an orbiting ship and follows it
//! inside the level limits before fading out. Draw output goes to a
//! `RecordingContext` and is summarised in the log.
//!
//! Usage: `stage_demo [config.toml|config.ron]` (`RUST_LOG` sets verbosity)

use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use stage_engine::foundation::logging;
use stage_engine::foundation::time::Timer;
use stage_engine::prelude::*;
use stage_engine::scene::DrawCommand;

const FRAME_TIME: f32 = 1.0 / 60.0;
const FRAMES: u32 = 600;
const SURFACE: (f32, f32) = (1280.0, 720.0);

/// Orbits its node around a fixed point
struct Orbit {
    center: Point2,
    radius: f32,
    speed: f32,
    angle: f32,
}

impl NodeBehavior for Orbit {
    fn update(&mut self, tree: &mut SceneTree, id: NodeId, dt: f32) {
        self.angle += self.speed * dt;
        if let Some(mut node) = tree.node_mut(id) {
            node.move_to(
                self.center.x + self.radius * self.angle.cos(),
                self.center.y + self.radius * self.angle.sin(),
            )
            .set_rotation(self.angle);
        }
    }

    fn draw(&self, node: &SceneNode, ctx: &mut dyn DrawContext) {
        ctx.fill_rect(Rect::new(0.0, 0.0, node.width(), node.height()), Color::new(0.3, 0.8, 1.0, 1.0));
    }
}

/// Solid colored box
struct Swatch(Color);

impl NodeBehavior for Swatch {
    fn draw(&self, node: &SceneNode, ctx: &mut dyn DrawContext) {
        ctx.fill_rect(Rect::new(0.0, 0.0, node.width(), node.height()), self.0);
    }
}

struct World {
    tree: SceneTree,
    stage: Stage,
}

struct Actors {
    beacon: NodeId,
    ship: NodeId,
}

fn build_world(config: &StageConfig) -> Result<(World, Actors), SceneError> {
    let mut tree = SceneTree::new();
    let stage = Stage::new(&mut tree, config);

    let level = tree.create_node(NodeOptions::default().with_size(2000.0, 1200.0).with_layer(-1));
    tree.append_child(stage.root(), level)?;
    tree.set_behavior(level, Swatch(Color::new(0.05, 0.05, 0.1, 1.0)))?;

    let beacon = tree.create_node(
        NodeOptions::default()
            .with_position(1400.0, 300.0)
            .with_size(40.0, 40.0)
            .with_anchor(Anchor::Center),
    );
    tree.append_child(level, beacon)?;
    tree.set_behavior(beacon, Swatch(Color::new(1.0, 0.8, 0.2, 1.0)))?;

    let ship = tree.create_node(
        NodeOptions::default()
            .with_size(24.0, 12.0)
            .with_anchor(Anchor::Center),
    );
    tree.append_child(level, ship)?;
    tree.set_behavior(
        ship,
        Orbit {
            center: Point2::new(300.0, 600.0),
            radius: 250.0,
            speed: 0.8,
            angle: 0.0,
        },
    )?;

    Ok((World { tree, stage }, Actors { beacon, ship }))
}

async fn cutscene(world: Rc<RefCell<World>>, actors: Actors) {
    let arrived = {
        let mut world = world.borrow_mut();
        let camera = world.stage.camera_mut();
        camera.set_limits(Some(Rect::new(0.0, 0.0, 2000.0, 1200.0)));
        camera.cinematic_bars().show();
        camera.focus(actors.beacon, FocusOptions::default().with_duration(2.0).with_scale(1.5))
    };
    if !arrived.await {
        log::warn!("Focus on the beacon was interrupted");
        return;
    }
    log::info!("Camera reached the beacon");

    let pulsed = {
        let pulse = SequentialAnimations::new(Vec::new())
            .then(Animator::new(
                move |tree: &mut SceneTree, t| {
                    if let Some(mut node) = tree.node_mut(actors.beacon) {
                        node.set_scale(1.0 + t, 1.0 + t);
                    }
                },
                AnimatorOptions::with_duration(0.4).easing(Easing::EaseOutQuad),
            ))
            .then(Animator::new(
                move |tree: &mut SceneTree, t| {
                    if let Some(mut node) = tree.node_mut(actors.beacon) {
                        node.set_scale(2.0 - t, 2.0 - t);
                    }
                },
                AnimatorOptions::with_duration(0.4).easing(Easing::EaseInQuad),
            ));
        world.borrow_mut().tree.add_animation(actors.beacon, pulse)
    };
    match pulsed {
        Ok(pulsed) => {
            pulsed.await;
        }
        Err(err) => log::error!("Could not pulse the beacon: {err}"),
    }

    let following = {
        let mut world = world.borrow_mut();
        let camera = world.stage.camera_mut();
        camera.cinematic_bars().hide();
        camera.focus(
            actors.ship,
            FocusOptions::default()
                .with_duration(1.5)
                .with_scale(1.0)
                .with_follow(true),
        )
    };
    if following.await {
        log::info!("Following the ship");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default_filter("info");
    log::info!("Starting stage demo");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading stage config from {path}");
            StageConfig::load_from_file(&path)?
        }
        None => StageConfig::default(),
    };

    let (world, actors) = build_world(&config)?;
    let world = Rc::new(RefCell::new(world));

    let mut pool = LocalPool::new();
    pool.spawner().spawn_local(cutscene(Rc::clone(&world), actors))?;

    let mut timer = Timer::new();
    let mut ctx = RecordingContext::new();
    let mut drawn_frames = 0u32;

    for frame in 0..FRAMES {
        let dt = timer.advance(FRAME_TIME);
        {
            let mut world = world.borrow_mut();
            let World { tree, stage } = &mut *world;
            stage.update(tree, dt);
        }
        pool.run_until_stalled();

        if frame == FRAMES - 90 {
            world.borrow_mut().stage.camera_mut().fade().fade_out();
        }

        let mut world = world.borrow_mut();
        let World { tree, stage } = &mut *world;
        if !stage.needs_redraw(tree) {
            continue;
        }
        ctx.clear();
        stage.draw(tree, &mut ctx, SURFACE.0, SURFACE.1);
        drawn_frames += 1;

        if frame % 60 == 0 {
            let view = stage.camera().view();
            let fills = ctx
                .commands()
                .iter()
                .filter(|command| matches!(command, DrawCommand::FillRect { alpha, .. } if *alpha > 0.0))
                .count();
            log::info!(
                "t={:.1}s camera=({:.0}, {:.0}) zoom={:.2} visible fills={}",
                timer.total_time(),
                view.x,
                view.y,
                view.zoom,
                fills
            );
        }
    }

    let world = world.borrow();
    log::info!(
        "Simulated {:.1}s in {} frames ({} drawn), camera settled at ({:.0}, {:.0})",
        timer.total_time(),
        timer.frame_count(),
        drawn_frames,
        world.stage.camera().position().x,
        world.stage.camera().position().y
    );
    Ok(())
}
