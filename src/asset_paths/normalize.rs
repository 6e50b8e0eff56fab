use std::path::{Component, Path, PathBuf};

/// Produce the canonical, forward-slash form of a filesystem path.
///
/// Backslashes become forward slashes, runs of separators collapse into one and a trailing
/// separator is dropped, so emitted metadata looks the same regardless of the platform the
/// build ran on. Windows extended-length (`\\?\`) and device (`\\.\`) prefixes keep their
/// leading double slash.
pub fn normalize_path(path: &str) -> String {
  if path == "\\" || path == "/" {
    return "/".to_string();
  }

  if path.len() <= 1 {
    return path.to_string();
  }

  let (prefix, rest) = if path.len() > 4 && (path.starts_with(r"\\?\") || path.starts_with(r"\\.\"))
  {
    ("//", &path[2..])
  } else {
    ("", path)
  };

  let segments: Vec<&str> = rest
    .split(['/', '\\'])
    .enumerate()
    .filter(|(index, segment)| *index == 0 || !segment.is_empty())
    .map(|(_, segment)| segment)
    .collect();

  format!("{prefix}{}", segments.join("/"))
}

/// Fold `.` and `..` components out of `path` without touching the filesystem.
///
/// `..` removes the preceding normal component. At the root it is dropped; at the start of a
/// relative path it is kept.
pub fn resolve_lexically(path: &Path) -> PathBuf {
  let mut resolved = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match resolved.components().next_back() {
        Some(Component::Normal(_)) => {
          resolved.pop();
        }
        Some(Component::RootDir | Component::Prefix(_)) => {}
        _ => resolved.push(".."),
      },
      other => resolved.push(other.as_os_str()),
    }
  }
  resolved
}

/// Express `path` relative to the project `root` in normalised form.
///
/// Both paths are resolved lexically first. Paths outside the root climb out with `..`
/// segments. When the two paths share no common prefix at all (different drives, one relative
/// and one absolute) the resolved path is returned.
pub fn relative_source_path(root: &Path, path: &Path) -> String {
  let root = resolve_lexically(root);
  let path = resolve_lexically(path);
  if let Ok(relative) = path.strip_prefix(&root) {
    return normalize_path(&relative.to_string_lossy());
  }

  let root_components: Vec<Component> = root.components().collect();
  let path_components: Vec<Component> = path.components().collect();
  let shared = root_components
    .iter()
    .zip(&path_components)
    .take_while(|(left, right)| left == right)
    .count();

  if shared == 0 {
    return normalize_path(&path.to_string_lossy());
  }

  let mut segments: Vec<String> = root_components[shared..]
    .iter()
    .map(|_| "..".to_string())
    .collect();
  segments.extend(
    path_components[shared..]
      .iter()
      .map(|component| component.as_os_str().to_string_lossy().into_owned()),
  );

  normalize_path(&segments.join("/"))
}

/// Join an output directory and an asset name into the name handed to the asset sink.
///
/// `.` and `..` segments are resolved, so `static/../icons/logo.png` becomes `icons/logo.png`.
pub fn join_asset_path(base: &str, name: &str) -> String {
  let base = base.trim_end_matches(['/', '\\']);
  if base.is_empty() {
    return resolve_dot_segments(&normalize_path(name.trim_start_matches(['/', '\\'])));
  }

  resolve_dot_segments(&normalize_path(&format!("{base}/{name}")))
}

fn resolve_dot_segments(path: &str) -> String {
  let rest = path.trim_start_matches('/');
  let prefix = &path[..path.len() - rest.len()];

  let mut segments: Vec<&str> = Vec::new();
  for segment in rest.split('/') {
    match segment {
      "" | "." => {}
      ".." => match segments.last() {
        Some(&last) if last != ".." => {
          segments.pop();
        }
        _ if prefix.is_empty() => segments.push(".."),
        _ => {}
      },
      _ => segments.push(segment),
    }
  }

  if prefix.is_empty() && segments.is_empty() {
    return ".".to_string();
  }
  format!("{prefix}{}", segments.join("/"))
}
