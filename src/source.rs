//! Document acquisition: turn a source archive or a directory of markdown
//! files into a batch of documents ready for [`Index::build`].
//!
//! Every document carries three fields:
//!
//! - `filename`: path relative to the source root, `/`-separated
//! - `title`: first `# ` heading, or the file stem
//! - `content`: the file text, with any invalid UTF-8 sequences dropped
//!
//! [`Index::build`]: crate::Index::build

use std::{
    fs::File,
    io::{Read, Seek},
    path::{Component, Path, PathBuf},
};

use flate2::read::GzDecoder;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    document::Document,
    error::{Error, Result},
    text_util::extract_title,
    walker::{discover_files, markdown_matcher},
};

pub const FILENAME_FIELD: &str = "filename";
pub const TITLE_FIELD: &str = "title";
pub const CONTENT_FIELD: &str = "content";

/// Environment variable naming the default source (archive or directory).
pub const SOURCE_ENV: &str = "MDSEARCH_SOURCE";

/// Local file header signature that opens every non-empty zip archive.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Where documents are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A `.zip` or `.tar.gz` archive whose top-level folder is stripped.
    Archive(PathBuf),
    /// A directory tree walked recursively.
    Directory(PathBuf),
}

impl Source {
    /// Resolve the source from, in order of priority:
    /// 1. An explicit `--archive` path
    /// 2. An explicit `--dir` path
    /// 3. The MDSEARCH_SOURCE environment variable (archive or directory)
    /// 4. The XDG data directory (~/.local/share/mdsearch/docs/)
    pub fn resolve(archive: Option<&Path>, dir: Option<&Path>) -> Result<Self> {
        if let Some(path) = archive {
            return Ok(Self::Archive(path.to_path_buf()));
        }
        if let Some(path) = dir {
            return Ok(Self::Directory(path.to_path_buf()));
        }
        if let Ok(val) = std::env::var(SOURCE_ENV) {
            let path = PathBuf::from(val);
            return Ok(if path.is_dir() {
                Self::Directory(path)
            } else {
                Self::Archive(path)
            });
        }

        let data_home = xdg::BaseDirectories::with_prefix("mdsearch")
            .get_data_home()
            .ok_or_else(|| {
                Error::Config(
                    "could not determine XDG data home directory".into(),
                )
            })?;
        let docs = data_home.join("docs");
        if !docs.is_dir() {
            return Err(Error::Config(format!(
                "no document source: pass --archive or --dir, \
                 set {SOURCE_ENV}, or populate {}",
                docs.display()
            )));
        }
        Ok(Self::Directory(docs))
    }

    pub fn load(&self) -> Result<Vec<Document>> {
        match self {
            Self::Archive(path) => load_archive(path),
            Self::Directory(path) => load_directory(path),
        }
    }
}

/// Build the document for a markdown file at `relative_path`.
pub fn markdown_document(relative_path: &Path, bytes: &[u8]) -> Document {
    let content = decode_utf8(bytes);
    let title = extract_title(&content, relative_path);
    Document::new()
        .with(FILENAME_FIELD, slash_path(relative_path.components()))
        .with(TITLE_FIELD, title)
        .with(CONTENT_FIELD, content)
}

/// Decode `bytes` as UTF-8, dropping invalid sequences.
fn decode_utf8(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Read every markdown file from a source archive.
///
/// Zip archives are recognized by a `.zip` extension or by their magic
/// bytes; anything else is read as a gzip-compressed tar. Entry paths
/// lose their first component (the `project-main/` folder of a source
/// archive) unless that would leave nothing. Directory entries and
/// non-markdown files are skipped.
pub fn load_archive(path: &Path) -> Result<Vec<Document>> {
    let mut file = File::open(path)?;
    let documents = if is_zip(path, &mut file)? {
        load_zip(file)?
    } else {
        load_tar_gz(file)?
    };

    info!(
        archive = %path.display(),
        documents = documents.len(),
        "loaded archive"
    );
    Ok(documents)
}

fn is_zip(path: &Path, file: &mut File) -> Result<bool> {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    {
        return Ok(true);
    }

    let mut magic = Vec::with_capacity(ZIP_MAGIC.len());
    file.by_ref()
        .take(ZIP_MAGIC.len() as u64)
        .read_to_end(&mut magic)?;
    file.rewind()?;
    Ok(magic == ZIP_MAGIC)
}

fn load_zip(file: File) -> Result<Vec<Document>> {
    let matcher = markdown_matcher()?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut documents = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let Some(entry_path) = entry.enclosed_name() else {
            warn!(name = entry.name(), "skipping unsafe zip entry path");
            continue;
        };
        if !matcher.is_match(&entry_path) {
            continue;
        }
        let relative = strip_top_level(&entry_path);

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        debug!(
            path = %relative.display(),
            bytes = bytes.len(),
            "read zip entry"
        );
        documents.push(markdown_document(&relative, &bytes));
    }
    Ok(documents)
}

fn load_tar_gz(file: File) -> Result<Vec<Document>> {
    let matcher = markdown_matcher()?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let mut documents = Vec::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let entry_path = entry.path()?.into_owned();
        if !matcher.is_match(&entry_path) {
            continue;
        }
        let relative = strip_top_level(&entry_path);

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        debug!(
            path = %relative.display(),
            bytes = bytes.len(),
            "read tar entry"
        );
        documents.push(markdown_document(&relative, &bytes));
    }
    Ok(documents)
}

/// Read every markdown file below `root`, in relative-path order.
///
/// Files that disappear or fail to read between discovery and loading are
/// logged and skipped.
pub fn load_directory(root: &Path) -> Result<Vec<Document>> {
    let files = discover_files(root)?;

    let documents: Vec<Document> = files
        .par_iter()
        .filter_map(|file| match std::fs::read(&file.absolute_path) {
            Ok(bytes) => Some(markdown_document(&file.relative_path, &bytes)),
            Err(e) => {
                warn!(
                    path = %file.absolute_path.display(),
                    error = %e,
                    "skipping unreadable file"
                );
                None
            }
        })
        .collect();

    info!(
        dir = %root.display(),
        documents = documents.len(),
        "loaded directory"
    );
    Ok(documents)
}

fn strip_top_level(path: &Path) -> PathBuf {
    let components: Vec<Component<'_>> = path
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    if components.len() > 1 {
        components[1..].iter().collect()
    } else {
        components.iter().collect()
    }
}

fn slash_path<'a>(components: impl Iterator<Item = Component<'a>>) -> String {
    components
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::{Compression, write::GzEncoder};
    use zip::write::SimpleFileOptions;

    use super::*;

    fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut builder =
            tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn write_zip(path: &Path, dirs: &[&str], entries: &[(&str, &[u8])]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        for dir in dirs {
            writer.add_directory(*dir, options).unwrap();
        }
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    fn filenames(docs: &[Document]) -> Vec<&str> {
        docs.iter().filter_map(|d| d.get(FILENAME_FIELD)).collect()
    }

    #[test]
    fn archive_strips_top_level_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("fastmcp-main.tar.gz");
        write_archive(
            &archive,
            &[
                ("fastmcp-main/README.md", b"# FastMCP\n\nServers.".as_slice()),
                ("fastmcp-main/docs/clients.mdx", b"Client docs".as_slice()),
                ("fastmcp-main/src/server.py", b"print('hi')".as_slice()),
                ("fastmcp-main/docs/UPPER.MD", b"Upper case".as_slice()),
            ],
        );

        let docs = load_archive(&archive).unwrap();
        assert_eq!(
            filenames(&docs),
            vec!["README.md", "docs/clients.mdx", "docs/UPPER.MD"]
        );
        assert_eq!(docs[0].get(TITLE_FIELD), Some("FastMCP"));
        assert_eq!(docs[1].get(TITLE_FIELD), Some("clients"));
        assert_eq!(docs[1].get(CONTENT_FIELD), Some("Client docs"));
    }

    #[test]
    fn zip_archive_loads_like_tarball() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("fastmcp-main.zip");
        write_zip(
            &archive,
            &["fastmcp-main/", "fastmcp-main/docs/"],
            &[
                ("fastmcp-main/README.md", b"# FastMCP\n\nServers.".as_slice()),
                ("fastmcp-main/docs/clients.mdx", b"Client docs".as_slice()),
                ("fastmcp-main/src/server.py", b"print('hi')".as_slice()),
                ("fastmcp-main/docs/UPPER.MD", b"Upper case".as_slice()),
            ],
        );

        let docs = load_archive(&archive).unwrap();
        assert_eq!(
            filenames(&docs),
            vec!["README.md", "docs/clients.mdx", "docs/UPPER.MD"]
        );
        assert_eq!(docs[0].get(TITLE_FIELD), Some("FastMCP"));
        assert_eq!(docs[1].get(CONTENT_FIELD), Some("Client docs"));
    }

    #[test]
    fn zip_archive_detected_by_magic_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("download");
        write_zip(&archive, &[], &[("repo/notes.md", b"notes".as_slice())]);

        let docs = load_archive(&archive).unwrap();
        assert_eq!(filenames(&docs), vec!["notes.md"]);
    }

    #[test]
    fn archive_keeps_single_component_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("flat.tar.gz");
        write_archive(&archive, &[("notes.md", b"flat".as_slice())]);

        let docs = load_archive(&archive).unwrap();
        assert_eq!(filenames(&docs), vec!["notes.md"]);
    }

    #[test]
    fn archive_drops_invalid_utf8() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("bad.tar.gz");
        write_archive(
            &archive,
            &[("repo/bad.md", b"ok \xff\xfe text".as_slice())],
        );

        let docs = load_archive(&archive).unwrap();
        assert_eq!(docs[0].get(CONTENT_FIELD), Some("ok  text"));
    }

    #[test]
    fn invalid_utf8_does_not_split_words() {
        let doc = markdown_document(Path::new("a.md"), b"fast\xffmcp");
        assert_eq!(doc.get(CONTENT_FIELD), Some("fastmcp"));

        let index =
            crate::Index::build([doc], crate::IndexConfig::markdown()).unwrap();
        let hits = index.search(&crate::SearchParams::new("fastmcp")).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn missing_archive_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_archive(&tmp.path().join("nope.tar.gz")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn directory_loads_markdown_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("docs")).unwrap();
        std::fs::write(tmp.path().join("docs/b.md"), "# Beta\nbody").unwrap();
        std::fs::write(tmp.path().join("a.md"), "alpha").unwrap();
        std::fs::write(tmp.path().join("skip.txt"), "not markdown").unwrap();

        let docs = load_directory(tmp.path()).unwrap();
        assert_eq!(filenames(&docs), vec!["a.md", "docs/b.md"]);
        assert_eq!(docs[1].get(TITLE_FIELD), Some("Beta"));
        assert_eq!(docs[0].get(TITLE_FIELD), Some("a"));
    }

    #[test]
    fn resolve_prefers_explicit_paths() {
        let archive = Path::new("/tmp/a.tar.gz");
        let dir = Path::new("/tmp/docs");
        assert_eq!(
            Source::resolve(Some(archive), Some(dir)).unwrap(),
            Source::Archive(archive.to_path_buf())
        );
        assert_eq!(
            Source::resolve(None, Some(dir)).unwrap(),
            Source::Directory(dir.to_path_buf())
        );
    }

    #[test]
    fn source_load_dispatches() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("x.md"), "x").unwrap();
        let docs = Source::Directory(tmp.path().to_path_buf()).load().unwrap();
        assert_eq!(filenames(&docs), vec!["x.md"]);
    }
}
