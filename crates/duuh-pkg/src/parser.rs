//! Line filters for package manager output
//!
//! Matching lines are kept verbatim as upgrade descriptors.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::DistroFamily;

/// Repository sections that mark a `yum check-update` line as an upgrade
pub const CENTOS_SECTIONS: &[&str] = &["updates", "base"];

/// `apk list -u` and `apt list --upgradable` entries
static UPGRADABLE_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*) \[upgradable from: (.*)$").expect("upgradable pattern is valid")
});

/// `yum check-update` entries: `<name.arch> <version> <section>`
static SECTION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    let sections = CENTOS_SECTIONS
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("^(.*) ({sections})$")).expect("section pattern is valid")
});

/// Pattern used for a family's output
#[must_use]
pub fn pattern_for(family: DistroFamily) -> &'static Regex {
    match family {
        DistroFamily::Alpine | DistroFamily::Debian => &UPGRADABLE_FROM,
        DistroFamily::Centos => &SECTION_SUFFIX,
    }
}

/// Whether `line` is a genuine upgrade entry for `family`
#[must_use]
pub fn is_upgrade_line(family: DistroFamily, line: &str) -> bool {
    pattern_for(family).is_match(line)
}

/// Keep the upgrade entries of a tool's stdout, in order
#[must_use]
pub fn filter_upgrades(family: DistroFamily, output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| is_upgrade_line(family, line))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpine_scenario() {
        let output = "libssl1.1 [upgradable from: 1.1.1-1]\nlibc6 (stable)\n";

        assert_eq!(
            filter_upgrades(DistroFamily::Alpine, output),
            vec!["libssl1.1 [upgradable from: 1.1.1-1]"]
        );
    }

    #[test]
    fn test_apt_output_drops_headers() {
        let output = r"
WARNING: apt does not have a stable CLI interface. Use with caution in scripts.

Listing...
vim/now 2:8.2.2434-3+deb11u1 amd64 [upgradable from: 2:8.2.2434-3]
curl/stable 7.74.0-1.3+deb11u14 amd64 [upgradable from: 7.74.0-1.3+deb11u7]";

        let upgrades = filter_upgrades(DistroFamily::Debian, output);

        assert_eq!(
            upgrades,
            vec![
                "vim/now 2:8.2.2434-3+deb11u1 amd64 [upgradable from: 2:8.2.2434-3]",
                "curl/stable 7.74.0-1.3+deb11u14 amd64 [upgradable from: 7.74.0-1.3+deb11u7]",
            ]
        );
    }

    #[test]
    fn test_upgradable_marker_needs_leading_text() {
        assert!(!is_upgrade_line(DistroFamily::Alpine, "[upgradable from: 1.0]"));
        assert!(is_upgrade_line(
            DistroFamily::Alpine,
            "musl-1.2.4-r2 x86_64 {musl} (MIT) [upgradable from: musl-1.2.4-r1]"
        ));
    }

    #[test]
    fn test_yum_sections() {
        let output = "\
Loaded plugins: fastestmirror, ovl
Determining fastest mirrors
 * base: mirror.example.org

bind-license.noarch                      32:9.11.4-26.P2.el7_9.15         updates
openssl-libs.x86_64                      1:1.0.2k-26.el7_9                base
epel-release.noarch                      7-14                             epel
";

        assert_eq!(
            filter_upgrades(DistroFamily::Centos, output),
            vec![
                "bind-license.noarch                      32:9.11.4-26.P2.el7_9.15         updates",
                "openssl-libs.x86_64                      1:1.0.2k-26.el7_9                base",
            ]
        );
    }

    #[test]
    fn test_yum_package_name_alone_is_not_an_upgrade() {
        assert!(!is_upgrade_line(DistroFamily::Centos, "openssl-libs.x86_64"));
        assert!(!is_upgrade_line(
            DistroFamily::Centos,
            "openssl-libs.x86_64 1:1.0.2k-26.el7_9 updates-testing"
        ));
        assert!(!is_upgrade_line(DistroFamily::Centos, ""));
    }

    #[test]
    fn test_families_use_distinct_patterns() {
        let apt_line = "vim/now 2:8.2 amd64 [upgradable from: 2:8.1]";
        assert!(is_upgrade_line(DistroFamily::Debian, apt_line));
        assert!(!is_upgrade_line(DistroFamily::Centos, apt_line));
        assert!(!is_upgrade_line(DistroFamily::Debian, "vim.x86_64 2:8.2 updates"));
    }
}
