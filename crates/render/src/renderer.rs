use crate::snapshot::{DrawKind, FrameSnapshot};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads a frame snapshot and produces output. It never touches
/// the live session, so game truth cannot be changed from the render pass.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &FrameSnapshot) -> Self::Output;
}

/// Produces a human-readable dump of a frame. Used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Include every wall and the floor, not just interactive entities.
    pub include_static: bool,
}

impl DebugTextRenderer {
    /// Dump interactive entities only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dump walls and the floor as well.
    pub fn with_static_geometry() -> Self {
        Self {
            include_static: true,
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameSnapshot) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Frame {} ===\n", frame.frame));
        out.push_str(&format!("{}\n", frame.status));
        let p = frame.camera_position;
        out.push_str(&format!(
            "Camera: pos=({:.2}, {:.2}, {:.2}) fov={:.0}\n",
            p.x, p.y, p.z, frame.fov_degrees
        ));
        if let Some(prompt) = &frame.prompt {
            out.push_str(&format!("Prompt: {prompt}\n"));
        }

        for item in &frame.items {
            let label = match item.kind {
                DrawKind::Button => "button",
                DrawKind::Door => "door",
                DrawKind::Wall if self.include_static => "wall",
                DrawKind::Floor if self.include_static => "floor",
                DrawKind::Wall | DrawKind::Floor => continue,
            };
            let t = item.transform.position;
            out.push_str(&format!(
                "  {label:<6} pos=({:.2}, {:.2}, {:.2}) color=({:.2}, {:.2}, {:.2}) glow={:.2}\n",
                t.x,
                t.y,
                t.z,
                item.color.x,
                item.color.y,
                item.color.z,
                item.emissive_strength
            ));
        }
        out.push_str(&format!("Lights: {}\n", frame.lights.len()));

        out
    }
}
