//! Scripted session replay

use std::time::Duration;

use sift_core::events::KeyCode;

use crate::config::ScriptStep;
use crate::error::{AppError, Result};
use crate::host::Host;

/// Replay `steps` against `host` in order
///
/// Stops at the first step that cannot be carried out.
pub fn run_script(host: &mut Host, steps: &[ScriptStep]) -> Result<()> {
    for (index, step) in steps.iter().enumerate() {
        tracing::debug!(index, ?step, "script step");
        run_step(host, step).map_err(|err| match err {
            AppError::Script { .. } => err,
            other => AppError::Script {
                index,
                message: other.to_string(),
            },
        })?;
    }
    Ok(())
}

fn run_step(host: &mut Host, step: &ScriptStep) -> Result<()> {
    match step {
        ScriptStep::Move { x, y } => host.mouse_move(*x, *y),
        ScriptStep::Click { target: Some(key), .. } => {
            host.click_element(key)?;
        }
        ScriptStep::Click {
            target: None,
            x: Some(x),
            y: Some(y),
        } => {
            host.click(*x, *y);
        }
        ScriptStep::Click { .. } => {
            return Err(AppError::ConfigValue {
                field: "script.click",
                reason: "needs a target or both x and y".to_string(),
            });
        }
        ScriptStep::Type { text } => host.text_input(text),
        ScriptStep::Key { key } => {
            if !host.key_down(KeyCode::from(*key)) {
                tracing::warn!(?key, "key pressed with nothing focused");
            }
        }
        ScriptStep::Wait { ms } => {
            host.advance_by(Duration::from_millis(*ms));
        }
    }
    Ok(())
}
