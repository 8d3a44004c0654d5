use std::path::{Path, PathBuf};

/// Multi-select file picker over the PDFs in one directory.
#[derive(Debug, Clone, Default)]
pub struct FilePicker {
    pub dir: PathBuf,
    pub entries: Vec<PathBuf>,
    /// Indices into `entries`, in the order they were picked.
    pub chosen: Vec<usize>,
    pub cursor: usize,
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

impl FilePicker {
    /// Scan `dir` for PDF files, sorted by name.
    pub fn scan(dir: &Path) -> std::io::Result<Self> {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_pdf(p))
            .collect();
        entries.sort();
        Ok(Self {
            dir: dir.to_path_buf(),
            entries,
            chosen: Vec::new(),
            cursor: 0,
        })
    }

    /// Re-read the directory, keeping chosen files that still exist.
    pub fn rescan(&mut self) -> std::io::Result<()> {
        let chosen = self.chosen_paths();
        let mut fresh = Self::scan(&self.dir)?;
        fresh.chosen = chosen
            .iter()
            .filter_map(|p| fresh.entries.iter().position(|e| e == p))
            .collect();
        fresh.cursor = self.cursor.min(fresh.entries.len().saturating_sub(1));
        *self = fresh;
        Ok(())
    }

    /// Add files given explicitly (e.g. on the command line), choosing them.
    pub fn preselect(&mut self, paths: &[PathBuf]) {
        for path in paths {
            let idx = match self.entries.iter().position(|e| e == path) {
                Some(idx) => idx,
                None => {
                    self.entries.push(path.clone());
                    self.entries.len() - 1
                }
            };
            if !self.chosen.contains(&idx) {
                self.chosen.push(idx);
            }
        }
    }

    pub fn toggle_current(&mut self) {
        if self.cursor >= self.entries.len() {
            return;
        }
        if let Some(pos) = self.chosen.iter().position(|&i| i == self.cursor) {
            self.chosen.remove(pos);
        } else {
            self.chosen.push(self.cursor);
        }
    }

    pub fn is_chosen(&self, idx: usize) -> bool {
        self.chosen.contains(&idx)
    }

    pub fn chosen_paths(&self) -> Vec<PathBuf> {
        self.chosen
            .iter()
            .filter_map(|&i| self.entries.get(i).cloned())
            .collect()
    }

    pub fn chosen_names(&self) -> Vec<String> {
        self.chosen_paths().iter().map(|p| display_name(p)).collect()
    }

    pub fn clear_chosen(&mut self) {
        self.chosen.clear();
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_keeps_only_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.pdf")).unwrap();

        let picker = FilePicker::scan(dir.path()).unwrap();
        let names: Vec<String> = picker.entries.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn toggle_keeps_pick_order() {
        let mut picker = FilePicker {
            entries: vec!["x.pdf".into(), "y.pdf".into(), "z.pdf".into()],
            ..Default::default()
        };
        picker.cursor = 2;
        picker.toggle_current();
        picker.cursor = 0;
        picker.toggle_current();
        assert_eq!(picker.chosen_names(), vec!["z.pdf", "x.pdf"]);
        picker.toggle_current();
        assert_eq!(picker.chosen_names(), vec!["z.pdf"]);
    }

    #[test]
    fn preselect_appends_unknown_paths() {
        let mut picker = FilePicker {
            entries: vec!["x.pdf".into()],
            ..Default::default()
        };
        picker.preselect(&["elsewhere/q.pdf".into(), "x.pdf".into()]);
        assert_eq!(picker.entries.len(), 2);
        assert_eq!(picker.chosen, vec![1, 0]);
    }
}
