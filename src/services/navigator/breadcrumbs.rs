use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub name: String,
    pub path: String,
}

/// Split a path into clickable ancestors, root first.
///
/// Handles `/`-rooted paths and drive-prefixed `\` paths (`C:\Users`).
pub fn breadcrumbs_for(path: &str) -> Vec<Breadcrumb> {
    let sep = if path.contains('\\') && !path.contains('/') {
        '\\'
    } else {
        '/'
    };

    let mut crumbs = Vec::new();
    let mut acc = String::new();
    for (i, part) in path.split(sep).enumerate() {
        if part.is_empty() {
            if i == 0 {
                acc.push(sep);
                crumbs.push(Breadcrumb {
                    name: sep.to_string(),
                    path: acc.clone(),
                });
            }
            continue;
        }
        if !acc.is_empty() && !acc.ends_with(sep) {
            acc.push(sep);
        }
        acc.push_str(part);

        // A bare drive ("C:") means the drive's cwd; the crumb targets its root.
        let crumb_path = if crumbs.is_empty() && part.ends_with(':') {
            format!("{acc}{sep}")
        } else {
            acc.clone()
        };
        crumbs.push(Breadcrumb {
            name: part.to_string(),
            path: crumb_path,
        });
    }
    crumbs
}

#[cfg(test)]
#[path = "tests/breadcrumbs_tests.rs"]
mod tests;
