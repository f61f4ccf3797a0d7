//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a vaulttool command isolated to this environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test project directory
    /// - Colors and inherited logging/pre-commit settings cleared
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("vaulttool").expect("failed to find vaulttool binary");
        cmd.env("HOME", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("VAULTTOOL_LOG");
        cmd.env_remove("VAULTTOOL_PRECOMMIT");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run `vaulttool` with the given arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run vaulttool")
    }

    /// Shortcut for `vaulttool encrypt`.
    pub fn encrypt(&self) -> Output {
        self.run(&["encrypt"])
    }

    /// Shortcut for `vaulttool refresh`.
    pub fn refresh(&self) -> Output {
        self.run(&["refresh"])
    }

    /// Shortcut for `vaulttool remove`.
    pub fn remove(&self) -> Output {
        self.run(&["remove"])
    }

    /// Shortcut for `vaulttool check-ignore`.
    pub fn check_ignore(&self) -> Output {
        self.run(&["check-ignore"])
    }

    /// Shortcut for `vaulttool sync`.
    pub fn sync(&self) -> Output {
        self.run(&["sync"])
    }
}
