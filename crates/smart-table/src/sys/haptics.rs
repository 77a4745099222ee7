//! Vibration pulses, delegated to a user supplied shell command.

use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::process::{Command, Stdio};
use std::time::Duration;
use thiserror::Error;

pub const PULSE_ENV: &str = "SMART_TABLE_PULSE_MS";

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ShellCommand(String);

crate::impl_string_newtype!(ShellCommand);

#[derive(Debug, Error)]
pub enum HapticsError {
    #[error("No haptic command configured")]
    NotConfigured,
    #[error("Failed to spawn haptic command: {0}")]
    Spawn(#[from] std::io::Error),
}

fn command_for(duration: Duration, command: &ShellCommand) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command.as_str())
        .env(PULSE_ENV, duration.as_millis().to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

/// Fires a pulse without waiting for the command to finish.
pub fn pulse(duration: Duration, command: Option<&ShellCommand>) -> Result<(), HapticsError> {
    let command = command
        .filter(|c| !c.is_blank())
        .ok_or(HapticsError::NotConfigured)?;
    log::debug!("Haptic pulse {:?} via `{}`", duration, command);
    command_for(duration, command).spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_command_is_reported() {
        let err = pulse(Duration::from_millis(50), None).unwrap_err();
        assert!(matches!(err, HapticsError::NotConfigured));

        let blank = ShellCommand::from(" ");
        let err = pulse(Duration::from_millis(50), Some(&blank)).unwrap_err();
        assert!(matches!(err, HapticsError::NotConfigured));
    }

    #[test]
    fn test_duration_is_exported_in_milliseconds() {
        let cmd = command_for(Duration::from_millis(50), &ShellCommand::new("true"));
        let value = cmd
            .get_envs()
            .find(|(k, _)| k.to_str() == Some(PULSE_ENV))
            .and_then(|(_, v)| v)
            .map(|v| v.to_string_lossy().into_owned());
        assert_eq!(value.as_deref(), Some("50"));
        assert_eq!(cmd.get_program().to_str(), Some("sh"));
    }
}
