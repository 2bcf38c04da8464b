//! `MockFs`: an in-memory tree standing in for `/proc` and `/sys`.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::collector::traits::FileSystem;

#[derive(Debug, Clone)]
enum Node {
    File(String),
    Dir,
}

/// In-memory filesystem for collector tests.
///
/// Adding a file creates its parent directories, so a scenario only lists
/// the files it cares about.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    nodes: BTreeMap<PathBuf, Node>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref();
        self.add_ancestors(path);
        self.nodes
            .insert(path.to_path_buf(), Node::File(content.into()));
    }

    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.add_ancestors(path);
        self.nodes.entry(path.to_path_buf()).or_insert(Node::Dir);
    }

    /// Removes a file, e.g. to simulate a sensor that disappeared.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if matches!(self.nodes.get(path), Some(Node::File(_))) {
            self.nodes.remove(path);
        }
    }

    /// Adds `/sys/class/hwmon/hwmon{index}` with a `name` file and one
    /// `tempN_label`/`tempN_input` pair per sensor, numbered from 1.
    ///
    /// With `legacy` set, files are placed under `device/` as pre-3.15
    /// kernels did.
    pub fn add_hwmon_chip(&mut self, index: u32, name: &str, sensors: &[(&str, i32)], legacy: bool) {
        let mut base = PathBuf::from(format!("/sys/class/hwmon/hwmon{index}"));
        self.add_dir(&base);
        if legacy {
            base.push("device");
        }
        self.add_file(base.join("name"), format!("{name}\n"));
        for (n, (label, millicelsius)) in (1..).zip(sensors) {
            self.add_file(base.join(format!("temp{n}_label")), format!("{label}\n"));
            self.add_file(base.join(format!("temp{n}_input")), format!("{millicelsius}\n"));
        }
    }

    fn add_ancestors(&mut self, path: &Path) {
        for dir in path.ancestors().skip(1) {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.nodes.entry(dir.to_path_buf()).or_insert(Node::Dir);
        }
    }
}

fn not_found(what: &str, path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{what} not found: {}", path.display()),
    )
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        match self.nodes.get(path) {
            Some(Node::File(content)) => Ok(content.clone()),
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("is a directory: {}", path.display()),
            )),
            None => Err(not_found("file", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        match self.nodes.get(path) {
            Some(Node::Dir) => Ok(self
                .nodes
                .keys()
                .filter(|p| p.parent() == Some(path))
                .cloned()
                .collect()),
            _ => Err(not_found("directory", path)),
        }
    }
}
