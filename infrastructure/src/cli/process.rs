//! Child process construction shared by probing and invocation.

use std::path::Path;
use tokio::process::Command;

/// Create a [`Command`] whose child never outlives the bridge.
///
/// The child is killed when its handle is dropped. On Linux the kernel also
/// sends it SIGTERM if the bridge itself dies (SIGKILL, OOM kill), which
/// `Drop` cannot cover.
pub(crate) fn guarded_command(program: &Path) -> Command {
    let mut cmd = Command::new(program);
    cmd.kill_on_drop(true);

    #[cfg(target_os = "linux")]
    unsafe {
        cmd.pre_exec(|| {
            libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
            Ok(())
        });
    }

    cmd
}
