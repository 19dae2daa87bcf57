use crate::vfs::Entry;
use colored::Colorize;
use std::{fmt::Write, path::Path};

/// Draws `entries` as an ASCII tree hanging off `destination`.
pub fn render_tree(entries: &[Entry], destination: &Path) -> String {
    let root_name = destination
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| destination.display().to_string());

    let mut out = String::new();
    let _ = writeln!(out, "{}", root_name.blue());

    render_children(entries, "", &mut out);

    out
}

fn render_children(entries: &[Entry], prefix: &str, out: &mut String) {
    let len = entries.len();

    for (i, entry) in entries.iter().enumerate() {
        let is_last = i == len - 1;

        let connector = if is_last {
            "└── ".yellow()
        } else {
            "├── ".yellow()
        };

        let label = entry.path().display().to_string();
        let name = match entry {
            Entry::File { bytes, .. } => format!("{} ({} bytes)", label.green(), bytes.len()),
            Entry::Directory { .. } => label.blue().to_string(),
        };

        let _ = writeln!(out, "{}{}{}", prefix.yellow(), connector, name);

        if let Entry::Directory { children, .. } = entry {
            let child_prefix = if is_last {
                format!("{}    ", prefix)
            } else {
                format!("{}│   ", prefix)
            };
            render_children(children, &child_prefix, out);
        }
    }
}

/// Prints the tree `apply` would create, with a legend and totals.
pub fn preview_as_tree(entries: &[Entry], destination: &Path) {
    let (files, directories) = entries.iter().fold((0, 0), |(f, d), entry| {
        let (ef, ed) = entry.count();
        (f + ef, d + ed)
    });

    println!(
        "Legend: {} = (directory), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    let fancy_prompt = format!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Preview".bold().bright_blue(),
    );

    println!("{}", fancy_prompt);

    print!("{}", render_tree(entries, destination));

    println!(
        "\n{} {} directories, {} files",
        "└─".bold().bright_blue(),
        directories,
        files
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_tree_with_connectors() {
        colored::control::set_override(false);

        let entries = vec![
            Entry::Directory {
                path: "src".into(),
                children: vec![
                    Entry::File {
                        path: "Main.java".into(),
                        bytes: b"class Main {}".to_vec(),
                    },
                    Entry::Directory {
                        path: "res".into(),
                        children: vec![],
                    },
                ],
            },
            Entry::File {
                path: "README.md".into(),
                bytes: vec![],
            },
        ];

        let rendered = render_tree(&entries, Path::new("/tmp/files"));

        assert_eq!(
            rendered,
            "files\n\
             ├── src\n\
             │   ├── Main.java (13 bytes)\n\
             │   └── res\n\
             └── README.md (0 bytes)\n"
        );
    }

    #[test]
    fn empty_manifest_renders_only_the_root() {
        colored::control::set_override(false);

        assert_eq!(render_tree(&[], Path::new("out")), "out\n");
    }
}
