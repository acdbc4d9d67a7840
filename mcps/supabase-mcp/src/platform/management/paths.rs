//! POSIX path helpers for edge function sources
//!
//! Function bodies come back with absolute paths under the deployment root
//! (`/tmp/user_fn_{project}_{function}_{version}/`). Callers see paths relative
//! to that root. Everything here is string manipulation with `/` separators,
//! so results do not depend on the host OS.

/// Deployment root of a specific function version
pub fn deployment_prefix(project_id: &str, function_id: &str, version: i64) -> String {
    format!("/tmp/user_fn_{}_{}_{}/", project_id, function_id, version)
}

pub fn strip_file_scheme(path: &str) -> &str {
    path.strip_prefix("file://").unwrap_or(path)
}

/// Express `target` relative to `root`
///
/// `.` and `..` are resolved first. A target outside `root` gets leading
/// `..` segments. Targets that are already relative are only cleaned up.
pub fn relative_path(root: &str, target: &str) -> String {
    let target = strip_file_scheme(target);
    if !target.starts_with('/') {
        return target.trim_start_matches("./").to_string();
    }

    let from = normalize(root);
    let to = normalize(target);
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts = vec![".."; from.len() - common];
    parts.extend_from_slice(&to[common..]);
    parts.join("/")
}

fn normalize(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments
}
