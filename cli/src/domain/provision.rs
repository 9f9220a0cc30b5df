//! Guest shell fragments run while provisioning a new environment.
//!
//! Each fragment is passed as the single argument of `bash -lc` and runs as
//! root inside the guest. Every interpolated value is single-quoted.

use crate::domain::paths::shell_quote;

/// Owner of drvfs-mounted files inside the guest (the first regular user).
const MOUNT_UID: u32 = 1000;

/// Profile script exporting the mounted working directory.
pub const PROFILE_SCRIPT_PATH: &str = "/etc/profile.d/apx-wkdir.sh";

/// Environment variable interactive shells see the mount point under.
pub const WORKDIR_ENV_VAR: &str = "WKDIR";

/// Create the default user unless it already exists.
#[must_use]
pub fn ensure_user_script(user: &str) -> String {
    let user = shell_quote(user);
    format!("id -u {user} >/dev/null 2>&1 || useradd -m -s /bin/bash {user}")
}

/// Write `/etc/wsl.conf` making `user` the default and enabling automount.
#[must_use]
pub fn wsl_conf_script(user: &str) -> String {
    format!(
        "printf '[user]\\ndefault=%s\\n\\n[automount]\\nenabled=true\\nmountFsTab=true\\noptions=\"metadata\"\\n' {} > /etc/wsl.conf",
        shell_quote(user)
    )
}

/// One `/etc/fstab` line mounting `descriptor` on `mount_point` via drvfs.
#[must_use]
pub fn fstab_line(descriptor: &str, mount_point: &str) -> String {
    format!(
        "{descriptor} {mount_point} drvfs metadata,uid={MOUNT_UID},gid={MOUNT_UID},umask=022 0 0"
    )
}

/// Create the guest mount point and append the fstab entry once.
#[must_use]
pub fn fstab_script(descriptor: &str, mount_point: &str) -> String {
    let line = fstab_line(descriptor, mount_point);
    let marker = format!(" {mount_point} drvfs ");
    format!(
        "mkdir -p {mp} && (grep -qsF {marker} /etc/fstab || printf '%s\\n' {line} >> /etc/fstab)",
        mp = shell_quote(mount_point),
        marker = shell_quote(&marker),
        line = shell_quote(&line),
    )
}

/// Write the profile script exporting the mount point for interactive shells.
#[must_use]
pub fn profile_script(mount_point: &str) -> String {
    let export = format!("export {WORKDIR_ENV_VAR}={}", shell_quote(mount_point));
    format!(
        "printf '%s\\n' {export} > {path} && chmod 644 {path}",
        export = shell_quote(&export),
        path = PROFILE_SCRIPT_PATH,
    )
}

/// Link `~user/wkdir` to the mount point.
#[must_use]
pub fn home_link_script(user: &str, mount_point: &str) -> String {
    let link = format!("/home/{user}/wkdir");
    format!(
        "ln -sfn {target} {link} && chown -h {owner} {link}",
        target = shell_quote(mount_point),
        link = shell_quote(&link),
        owner = shell_quote(&format!("{user}:{user}")),
    )
}

/// Start an interactive login shell in `dir` (used when `--cd` is unavailable).
#[must_use]
pub fn cd_shell_script(dir: &str) -> String {
    format!("cd {} && exec bash -l", shell_quote(dir))
}
