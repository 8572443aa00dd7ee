//! Input validation primitives.
//!
//! Provides ergonomic helpers for common validation patterns:
//! - Validating non-empty strings and collections
//! - Checking names against the container engine's grammar

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None))
    } else {
        Ok(trimmed)
    }
}

/// Require a non-empty value that is already trimmed.
///
/// Values passed verbatim to a process (program names, paths) must not carry
/// stray whitespace, so padding is rejected instead of silently stripped.
pub fn require_trimmed<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = require_non_empty(value, field, message)?;
    if trimmed.len() != value.len() {
        return Err(Error::validation_invalid_argument(
            field,
            "must not have leading or trailing whitespace",
            Some(value.to_string()),
        ));
    }
    Ok(value)
}

/// Require a collection to be non-empty.
pub fn require_non_empty_vec<'a, T>(vec: &'a [T], field: &str, message: &str) -> Result<&'a [T]> {
    if vec.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None))
    } else {
        Ok(vec)
    }
}

fn container_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]*$").expect("valid regex"))
}

fn image_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^[a-z0-9]+(?:[._-][a-z0-9]+)*(?:/[a-z0-9]+(?:[._-][a-z0-9]+)*)*(?::[A-Za-z0-9_][A-Za-z0-9_.-]{0,127})?$",
        )
        .expect("valid regex")
    })
}

fn build_arg_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"))
}

/// Require a container name the engine will accept.
pub fn require_container_name(value: &str, field: &str) -> Result<()> {
    if container_name_re().is_match(value) {
        Ok(())
    } else {
        Err(Error::validation_invalid_argument(
            field,
            "must match [a-zA-Z0-9][a-zA-Z0-9_.-]*",
            Some(value.to_string()),
        ))
    }
}

/// Require an image reference (`repo/path[:tag]`, lowercase repository).
pub fn require_image_ref(value: &str, field: &str) -> Result<()> {
    if image_ref_re().is_match(value) {
        Ok(())
    } else {
        Err(Error::validation_invalid_argument(
            field,
            "must be a lowercase image reference like 'name' or 'repo/name:tag'",
            Some(value.to_string()),
        ))
    }
}

/// Require a build-arg name usable as an `ARG` in a Dockerfile.
pub fn require_build_arg_name(value: &str, field: &str) -> Result<()> {
    if build_arg_re().is_match(value) {
        Ok(())
    } else {
        Err(Error::validation_invalid_argument(
            field,
            "must match [A-Za-z_][A-Za-z0-9_]*",
            Some(value.to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_non_empty_trims_whitespace() {
        let result = require_non_empty("  docker  ", "engine", "msg");
        assert_eq!(result.unwrap(), "docker");
    }

    #[test]
    fn require_non_empty_fails_for_whitespace_only() {
        let result = require_non_empty("   ", "engine", "Cannot be empty");
        assert!(result.is_err());
    }

    #[test]
    fn require_trimmed_rejects_padding() {
        assert_eq!(require_trimmed("docker", "engine", "msg").unwrap(), "docker");
        let err = require_trimmed(" docker", "engine", "msg").unwrap_err();
        assert_eq!(err.details["value"], " docker");
        assert!(require_trimmed("podman\n", "engine", "msg").is_err());
        assert!(require_trimmed("  ", "engine", "msg").is_err());
    }

    #[test]
    fn require_non_empty_vec_fails_for_empty() {
        let vec: Vec<String> = vec![];
        let result = require_non_empty_vec(&vec, "keepalive_command", "Cannot be empty");
        assert!(result.is_err());
    }

    #[test]
    fn container_names() {
        assert!(require_container_name("rpmbox-build", "container").is_ok());
        assert!(require_container_name("Build_1.x", "container").is_ok());
        assert!(require_container_name("-leading", "container").is_err());
        assert!(require_container_name("has space", "container").is_err());
        assert!(require_container_name("", "container").is_err());
    }

    #[test]
    fn image_refs() {
        assert!(require_image_ref("rpmbox-build", "image").is_ok());
        assert!(require_image_ref("acme/rpm-builder:el8", "image").is_ok());
        assert!(require_image_ref("Upper", "image").is_err());
        assert!(require_image_ref("name:", "image").is_err());
        assert!(require_image_ref("a//b", "image").is_err());
    }

    #[test]
    fn build_arg_names() {
        assert!(require_build_arg_name("REBUILD_STUFF", "cache_bust_arg").is_ok());
        assert!(require_build_arg_name("_x1", "cache_bust_arg").is_ok());
        assert!(require_build_arg_name("1ABC", "cache_bust_arg").is_err());
        assert!(require_build_arg_name("A-B", "cache_bust_arg").is_err());
    }

    #[test]
    fn invalid_name_reports_value() {
        let err = require_container_name("bad name", "container").unwrap_err();
        assert_eq!(err.details["value"], "bad name");
        assert_eq!(err.details["field"], "container");
    }
}
