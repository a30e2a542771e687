//! Car showroom demo application
//!
//! This demonstrates the engine's pick-to-zoom interaction headlessly: a
//! ground platform with two cars parked on it, a camera that zooms onto each
//! car in turn, and a deliberate miss that resets the view onto the platform.
//! Pointer input is simulated by projecting each car's center to normalized
//! device coordinates.

use scene_engine::prelude::*;
use std::time::Duration;

/// Frame period for the simulated ~60 FPS loop
const FRAME_PERIOD: Duration = Duration::from_millis(16);

pub struct ShowroomApp {
    scene: SceneGraph,
    camera: Camera,
    driver: FrameDriver,
    timer: Timer,
    cars: Vec<NodeKey>,
}

impl ShowroomApp {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        log::info!("Creating showroom demo application...");

        let mut scene = SceneGraph::new();

        // Ground platform, the fallback subject when a pick misses.
        scene.spawn(
            scene.root(),
            Node::new()
                .with_name("platform")
                .with_tag("ground")
                .with_extent(Aabb::from_center_extents(
                    Point3::new(0.0, -0.1, 0.0),
                    Vec3::new(6.0, 0.1, 4.0),
                )),
        )?;

        // Two cars side by side, offset symmetrically around the origin.
        let mut cars = Vec::new();
        for (index, name) in ["car_left", "car_right"].iter().enumerate() {
            let tx = (index as f32 - 0.5) * 4.0;
            let car = scene.spawn(
                scene.root(),
                Node::new()
                    .with_name(*name)
                    .with_tag("car")
                    .with_transform(Transform::from_position(Vec3::new(tx, 0.0, 0.0))),
            )?;
            scene.spawn(
                car,
                Node::new().with_name("body").with_extent(Aabb::from_center_extents(
                    Point3::new(0.0, 0.3, 0.0),
                    Vec3::new(0.9, 0.3, 0.4),
                )),
            )?;
            scene.spawn(
                car,
                Node::new().with_name("cabin").with_extent(Aabb::from_center_extents(
                    Point3::new(-0.1, 0.75, 0.0),
                    Vec3::new(0.5, 0.15, 0.35),
                )),
            )?;
            cars.push(car);
        }

        log::info!("Scene graph:\n{}", scene.dump_tree(scene.root()));

        let camera = Camera::perspective(Point3::new(0.0, 2.0, 8.0), 75.0, 16.0 / 9.0, 0.1, 100.0);
        let driver = FrameDriver::new(DriverConfig::default(), &camera);

        Ok(Self {
            scene,
            camera,
            driver,
            timer: Timer::new(),
            cars,
        })
    }

    /// Project a world-space point to normalized device coordinates
    fn project_to_ndc(&self, point: Point3) -> (f32, f32) {
        let clip = self.camera.view_projection_matrix() * point.to_homogeneous();
        (clip.x / clip.w, clip.y / clip.w)
    }

    /// Submit one pick event and run frames until the camera settles
    fn run_interaction(&mut self, event: PickEvent) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.submit_pick(event);
        loop {
            std::thread::sleep(FRAME_PERIOD);
            self.timer.update();
            self.driver
                .tick(&mut self.scene, &mut self.camera, self.timer.delta_time())?;
            if self.driver.is_settled() {
                break;
            }
        }
        let pose = self.camera.pose();
        log::info!(
            "Camera settled at {:?} looking at {:?} after frame {}",
            pose.position,
            pose.look_at,
            self.timer.frame_count()
        );
        Ok(())
    }

    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Click each car's center in turn.
        for index in 0..self.cars.len() {
            let car = self.cars[index];
            let center = self.scene.world_bounds(car)?.center();
            let (ndc_x, ndc_y) = self.project_to_ndc(center);
            log::info!("Simulating click on car {index} at NDC ({ndc_x:.3}, {ndc_y:.3})");
            self.run_interaction(PickEvent { ndc_x, ndc_y })?;
        }

        // A click into empty space resets the view onto the platform.
        log::info!("Simulating a miss near the top of the viewport");
        self.run_interaction(PickEvent { ndc_x: 0.0, ndc_y: 0.95 })?;

        log::info!("Showroom demo finished");
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut app = ShowroomApp::new()?;
    app.run()
}
