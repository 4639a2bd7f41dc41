//! External tool wrappers
//!
//! Each wrapper turns a domain operation into an `Invocation` and runs it
//! through a `CommandRunner`:
//! - Package installer (npm, pnpm, yarn)
//! - Framework updater (ng update)
//! - Git

mod git;
mod installer;
mod updater;

pub use git::Git;
pub use installer::PackageInstaller;
pub use updater::FrameworkUpdater;
