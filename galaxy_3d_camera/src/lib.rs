/*!
# Galaxy 3D Camera

Scene camera core for the Galaxy 3D engine: lazily cached view and
projection matrices, frustum extraction, and world/screen coordinate
mapping (project, unproject, pick rays).

## Architecture

- **Node**: positions a camera; owns a local transform inside a hierarchy
  and notifies transform listeners when its world matrix changes
- **Camera**: perspective or orthographic parameters plus cached derived
  matrices, invalidated through dirty bits
- **Frustum**: six inward-facing planes extracted from the view-projection
- **Engine**: global configuration (default viewport) and logging hub

## Example

```no_run
use galaxy_3d_camera::galaxy3d::{Engine, Viewport};
use galaxy_3d_camera::galaxy3d::camera::Camera;
use galaxy_3d_camera::galaxy3d::scene::{Node, Transform};
use galaxy_3d_camera::glam::Vec3;

Engine::initialize()?;

let camera = Camera::create_perspective(45.0, 4.0 / 3.0, 1.0, 100.0)?;
let node = Node::with_transform(
    "player_camera",
    Transform::looking_at(Vec3::new(0.0, 2.0, 10.0), Vec3::ZERO, Vec3::Y),
);
node.set_camera(Some(camera.clone()));

let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
let ray = camera.borrow().pick_ray(Some(&viewport), 400.0, 300.0);
println!("picking along {:?}", ray.direction);
# Ok::<(), galaxy_3d_camera::galaxy3d::Error>(())
```
*/

// Internal modules
mod error;
mod engine;
mod config;
mod viewport;
pub mod log;
pub mod math;
pub mod camera;
pub mod scene;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton and its configuration
    pub use crate::engine::Engine;
    pub use crate::config::EngineConfig;
    pub use crate::viewport::Viewport;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Math sub-module
    pub mod math {
        pub use crate::math::*;
    }
}

// Re-export math library at crate root
pub use glam;
