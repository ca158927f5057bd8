use std::time::Duration;

use anyhow::{ensure, Result};
use nightwatch_rendering::{FrameInput, Presentation, RenderingBackend, Scene};
use tracing::{debug, info};

use crate::pilot::ScriptedPilot;

/// Backend that steps the scene a fixed number of frames without a window.
#[derive(Debug)]
pub(crate) struct HeadlessBackend {
    frames: u32,
    frame_time: Duration,
    pilot: ScriptedPilot,
}

impl HeadlessBackend {
    /// Creates a backend that runs `frames` frames at `fps` frames per second.
    pub(crate) fn new(frames: u32, fps: u32, pilot: ScriptedPilot) -> Result<Self> {
        ensure!(fps > 0, "fps must be positive");
        Ok(Self {
            frames,
            frame_time: Duration::from_secs(1) / fps,
            pilot,
        })
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            frames,
            frame_time,
            mut pilot,
        } = self;
        let Presentation {
            window_title,
            mut scene,
            ..
        } = presentation;

        info!(title = %window_title, frames, "starting headless run");
        for frame in 0..frames {
            let input = FrameInput {
                heading: pilot.next_heading(),
            };
            update_scene(frame_time, input, &mut scene);
            debug!(frame, score = %scene.score_text(), "frame presented");
        }
        info!(score = %scene.score_text(), "headless run finished");
        Ok(())
    }
}
