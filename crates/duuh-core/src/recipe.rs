//! Dockerfile generation for upgraded images

use std::fmt::Write as _;

use duuh_pkg::DistroFamily;

/// Upgrade command run in the build for `family`
#[must_use]
pub const fn upgrade_command(family: DistroFamily) -> &'static str {
    match family {
        DistroFamily::Alpine => "apk --no-cache upgrade",
        DistroFamily::Debian => {
            "apt-get update && apt-get -y dist-upgrade && rm -rf /var/lib/apt/lists/*"
        }
        DistroFamily::Centos => "yum -y update",
    }
}

/// Whether an image `Config.User` value already means root
///
/// Empty means the runtime default, which is root.
#[must_use]
pub fn is_root_user(user: &str) -> bool {
    let name = user.trim().split(':').next().unwrap_or_default();
    matches!(name, "" | "root" | "0")
}

/// Label value listing the upgrades, one per Dockerfile continuation line
#[must_use]
pub fn upgrade_label(upgrades: &[String]) -> String {
    upgrades
        .iter()
        .map(|u| u.replace('\\', "\\\\").replace('"', "\\\""))
        .collect::<Vec<_>>()
        .join("\\\n")
}

/// Instructions that re-tag an image with its pending upgrades applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRecipe {
    image: String,
    family: DistroFamily,
    label_key: String,
    label: String,
    /// Non-root user to switch back to after upgrading
    restore_user: Option<String>,
}

impl BuildRecipe {
    /// Recipe applying `family`'s upgrade command on top of `image`
    pub fn new(image: impl Into<String>, family: DistroFamily, upgrades: &[String]) -> Self {
        Self {
            image: image.into(),
            family,
            label_key: "duuh.upgrades".to_string(),
            label: upgrade_label(upgrades),
            restore_user: None,
        }
    }

    /// Use a different label key
    #[must_use]
    pub fn with_label_key(mut self, key: impl Into<String>) -> Self {
        self.label_key = key.into();
        self
    }

    /// Account for the image's configured user
    ///
    /// A non-root user gets the upgrade bracketed by `USER root` and a
    /// switch back to that user.
    #[must_use]
    pub fn with_image_user(mut self, user: &str) -> Self {
        let user = user.trim();
        self.restore_user = (!is_root_user(user)).then(|| user.to_string());
        self
    }

    /// Dockerfile text
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "FROM {}", self.image);
        let _ = writeln!(out, "LABEL {}=\"{}\"", self.label_key, self.label);
        if self.restore_user.is_some() {
            out.push_str("USER root\n");
        }
        let _ = writeln!(out, "RUN {}", upgrade_command(self.family));
        if let Some(user) = &self.restore_user {
            let _ = writeln!(out, "USER {user}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_users() {
        assert!(is_root_user(""));
        assert!(is_root_user("root"));
        assert!(is_root_user("0"));
        assert!(is_root_user("0:0"));
        assert!(is_root_user("root:wheel"));
        assert!(!is_root_user("app"));
        assert!(!is_root_user("1000:1000"));
    }

    #[test]
    fn test_alpine_recipe_for_root_image() {
        let upgrades = vec!["libssl1.1 [upgradable from: 1.1.1-1]".to_string()];
        let recipe = BuildRecipe::new("alpine:3.12", DistroFamily::Alpine, &upgrades)
            .with_image_user("");

        assert_eq!(
            recipe.render(),
            "FROM alpine:3.12\n\
             LABEL duuh.upgrades=\"libssl1.1 [upgradable from: 1.1.1-1]\"\n\
             RUN apk --no-cache upgrade\n"
        );
    }

    #[test]
    fn test_centos_recipe_switches_user() {
        let upgrades = vec!["tzdata.noarch 2024a-1.el7 updates".to_string()];
        let recipe = BuildRecipe::new("registry.local/app:1", DistroFamily::Centos, &upgrades)
            .with_image_user("app\n");

        let rendered = recipe.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(
            &lines[2..],
            ["USER root", "RUN yum -y update", "USER app"]
        );
    }

    #[test]
    fn test_label_spans_continuation_lines() {
        let upgrades = vec![
            "a/stable 2 amd64 [upgradable from: 1]".to_string(),
            "b/stable \"2\" amd64 [upgradable from: 1]".to_string(),
        ];
        let recipe = BuildRecipe::new("debian:12", DistroFamily::Debian, &upgrades)
            .with_label_key("org.example.upgrades");

        let rendered = recipe.render();

        assert!(rendered.contains(
            "LABEL org.example.upgrades=\"a/stable 2 amd64 [upgradable from: 1]\\\n\
             b/stable \\\"2\\\" amd64 [upgradable from: 1]\"\n"
        ));
        assert!(rendered.ends_with(
            "RUN apt-get update && apt-get -y dist-upgrade && rm -rf /var/lib/apt/lists/*\n"
        ));
    }
}
