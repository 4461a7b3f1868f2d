use std::process::ExitStatus;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Status reported when a program could not be found.
pub const EXIT_NOT_FOUND: ExitCode = 127;

/// Status reported when a program was found but could not be executed.
pub const EXIT_NOT_EXECUTABLE: ExitCode = 126;

/// Outcome of one builtin or one spawned process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: ExitCode,
    pub terminated_by_signal: bool,
}

impl ProcessResult {
    pub fn exited(exit_code: ExitCode) -> Self {
        Self {
            exit_code,
            terminated_by_signal: false,
        }
    }

    pub fn success() -> Self {
        Self::exited(0)
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0 && !self.terminated_by_signal
    }
}

impl From<ExitStatus> for ProcessResult {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ProcessResult::exited(code),
            None => ProcessResult {
                exit_code: terminated_by_signal(status),
                terminated_by_signal: true,
            },
        }
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}
