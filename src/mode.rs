//! Choosing between the cheap development passthrough and full icon generation.

use serde::{Deserialize, Serialize};

/// Kind of build the loader runs under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildEnvironment {
  /// Iterative development build.
  #[default]
  Development,
  /// Release (production) build.
  Release,
}

impl BuildEnvironment {
  /// Interpret the value of a `NODE_ENV` / `PROFILE` style environment variable.
  ///
  /// `production` and `release` (any case) select [`BuildEnvironment::Release`]; everything
  /// else, including an unset variable, is a development build.
  pub fn from_env_value(value: Option<&str>) -> Self {
    match value.map(str::trim) {
      Some(value)
        if value.eq_ignore_ascii_case("production") || value.eq_ignore_ascii_case("release") =>
      {
        Self::Release
      }
      _ => Self::Development,
    }
  }
}

/// How the manifest import is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
  /// Emit only the source image under a content-hashed name.
  Dev,
  /// Run the external generator and emit the complete icon set.
  Full,
}

impl GenerationMode {
  /// Full generation runs for release builds or when explicitly forced.
  pub fn select(environment: BuildEnvironment, force_emit: bool) -> Self {
    if environment == BuildEnvironment::Release || force_emit {
      Self::Full
    } else {
      Self::Dev
    }
  }

  /// Returns `true` for [`GenerationMode::Full`].
  pub fn is_full(self) -> bool {
    self == Self::Full
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn selects_full_generation_for_release_or_force() {
    let cases = [
      (BuildEnvironment::Development, false, GenerationMode::Dev),
      (BuildEnvironment::Development, true, GenerationMode::Full),
      (BuildEnvironment::Release, false, GenerationMode::Full),
      (BuildEnvironment::Release, true, GenerationMode::Full),
    ];

    for (environment, force_emit, expected) in cases {
      assert_eq!(
        GenerationMode::select(environment, force_emit),
        expected,
        "{environment:?} force_emit={force_emit}"
      );
    }
  }

  #[test]
  fn reads_environment_values() {
    assert_eq!(
      BuildEnvironment::from_env_value(Some("production")),
      BuildEnvironment::Release
    );
    assert_eq!(
      BuildEnvironment::from_env_value(Some("Release")),
      BuildEnvironment::Release
    );
    assert_eq!(
      BuildEnvironment::from_env_value(Some("development")),
      BuildEnvironment::Development
    );
    assert_eq!(BuildEnvironment::from_env_value(None), BuildEnvironment::Development);
  }

  #[test]
  fn only_full_mode_reports_full() {
    assert!(GenerationMode::Full.is_full());
    assert!(!GenerationMode::Dev.is_full());
  }
}
