use crate::model::FALLBACK_ICON;
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const EXTENSIONS: [&str; 2] = ["png", "svg"];

const THEME_SUBDIRS: [&str; 7] = [
    "hicolor/48x48/apps",
    "hicolor/scalable/apps",
    "hicolor/32x32/apps",
    "hicolor/64x64/apps",
    "Adwaita/48x48/apps",
    "Adwaita/scalable/apps",
    "",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IconHandle {
    /// An image file that was opened and measured.
    Image { path: PathBuf, width: u32, height: u32 },
    /// Generic icon name for the host to draw from its own theme.
    Fallback { name: String },
}

impl IconHandle {
    fn fallback() -> Self {
        IconHandle::Fallback { name: FALLBACK_ICON.to_string() }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, IconHandle::Fallback { .. })
    }
}

pub struct IconResolver {
    icons_dir: PathBuf,
    theme_paths: Vec<PathBuf>,
}

impl IconResolver {
    pub fn new(icons_dir: PathBuf) -> Self {
        let mut paths = Vec::new();
        if let Some(home) = directories::BaseDirs::new() {
            paths.push(home.data_dir().join("icons"));
        }
        paths.push(PathBuf::from("/usr/share/icons"));
        paths.push(PathBuf::from("/usr/share/pixmaps"));
        Self::with_theme_paths(icons_dir, paths)
    }

    pub fn with_theme_paths(icons_dir: PathBuf, theme_paths: Vec<PathBuf>) -> Self {
        Self { icons_dir, theme_paths }
    }

    /// Never fails: anything that cannot be found and opened becomes the
    /// generic fallback.
    pub fn resolve(&self, icon_name: Option<&str>) -> IconHandle {
        let Some(icon_name) = icon_name.map(str::trim).filter(|n| !n.is_empty()) else {
            return IconHandle::fallback();
        };

        match self.find(icon_name) {
            Some(handle) => handle,
            None => {
                debug!("Icon not found: {}", icon_name);
                IconHandle::fallback()
            }
        }
    }

    fn find(&self, icon_name: &str) -> Option<IconHandle> {
        let path = Path::new(icon_name);
        if path.is_absolute() {
            return probe(path);
        }

        let candidates = candidate_file_names(icon_name);

        if self.icons_dir.exists() {
            let found = WalkDir::new(&self.icons_dir)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .filter(|e| candidates.iter().any(|c| e.file_name().to_str() == Some(c.as_str())))
                .find_map(|e| probe(e.path()));
            if found.is_some() {
                return found;
            }
        }

        for root in &self.theme_paths {
            if !root.exists() { continue; }

            for sub in THEME_SUBDIRS {
                let dir = root.join(sub);
                if !dir.exists() { continue; }

                for file_name in &candidates {
                    let file_path = dir.join(file_name);
                    if file_path.is_file() {
                        if let Some(handle) = probe(&file_path) {
                            return Some(handle);
                        }
                    }
                }
            }
        }
        None
    }
}

fn candidate_file_names(icon_name: &str) -> Vec<String> {
    let mut names = Vec::new();
    let has_image_ext = Path::new(icon_name)
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext));
    if has_image_ext {
        names.push(icon_name.to_string());
    }
    names.extend(EXTENSIONS.iter().map(|ext| format!("{}.{}", icon_name, ext)));
    names
}

/// Opens the file far enough to know it is a usable image.
fn probe(path: &Path) -> Option<IconHandle> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    let (width, height) = match ext {
        "svg" => probe_svg(path)?,
        _ => image::image_dimensions(path).ok()?,
    };
    Some(IconHandle::Image { path: path.to_path_buf(), width, height })
}

fn probe_svg(path: &Path) -> Option<(u32, u32)> {
    let opt = resvg::usvg::Options::default();
    let svg_data = fs::read(path).ok()?;
    let tree = resvg::usvg::Tree::from_data(&svg_data, &opt).ok()?;
    let size = tree.size();
    Some((size.width().ceil() as u32, size.height().ceil() as u32))
}
