use crate::traits::power::PowerControl;
use xshell::Cmd;

pub const DEFAULT_POWER_OFF: &[&str] = &["sudo", "poweroff"];

/// Powers the host off by running an OS command.
pub struct SystemPower {
    program: String,
    args: Vec<String>,
}

impl SystemPower {
    /// Returns `None` for an empty command line.
    pub fn new<S: AsRef<str>>(command: &[S]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.as_ref().to_string(),
            args: args.iter().map(|a| a.as_ref().to_string()).collect(),
        })
    }

    pub fn command(&self) -> String {
        core::iter::once(&self.program)
            .chain(self.args.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for SystemPower {
    fn default() -> Self {
        Self {
            program: DEFAULT_POWER_OFF[0].to_string(),
            args: DEFAULT_POWER_OFF[1..].iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl PowerControl for SystemPower {
    fn power_off(&mut self) {
        log::info!("Powering off with `{}`", self.command());
        let result = Cmd::new(&self.program)
            .args(&self.args)
            .echo_cmd(false)
            .run();
        if let Err(e) = result {
            log::warn!("Power-off command failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        assert_eq!("sudo poweroff", SystemPower::default().command());
    }

    #[test]
    fn test_empty_command_rejected() {
        let empty: [&str; 0] = [];
        assert!(SystemPower::new(&empty).is_none());
    }

    #[test]
    fn test_failure_is_swallowed() {
        let mut power = SystemPower::new(&["false"]).unwrap();
        power.power_off();

        let mut missing = SystemPower::new(&["/nonexistent/poweroff", "now"]).unwrap();
        missing.power_off();
    }
}
