use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::source::SourceError;

/// A readable line stream produced by an opener
pub type LineSource = Box<dyn BufRead + Send>;

/// Resolves a trace source to a readable line stream.
///
/// An opener is invoked once per playback pass and must produce a
/// fresh stream positioned at the start of the trace each time.
/// Closures returning a [`LineSource`] implement this trait directly,
/// so an opener function can be handed to the engine in place of an
/// identifier.
pub trait TraceOpener: Send {
    fn open(&self) -> Result<LineSource, SourceError>;
}

impl<F> TraceOpener for F
where
    F: Fn() -> Result<LineSource, SourceError> + Send,
{
    fn open(&self) -> Result<LineSource, SourceError> {
        self()
    }
}

/// Provider of application-bundled raw resources, addressed by numeric
/// id. External collaborator; the engine only ever asks it for a
/// readable byte stream.
pub trait ResourceBundle: Send + Sync {
    fn open_raw(&self, id: u32) -> io::Result<Box<dyn io::Read + Send>>;
}

/// A parsed source identifier.
///
/// Two schemes are understood: `resource://<numeric-id>` for bundled
/// resources, and a plain path or `file://` URI for regular files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceId {
    Resource(u32),
    File(PathBuf),
}

impl SourceId {
    /// Parse an identifier string. Anything with an unrecognized scheme
    /// or an empty/garbled form is a configuration error.
    pub fn parse(uri: &str) -> Result<SourceId, SourceError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(SourceError::Configuration(
                "no filename specified for the trace source".to_string(),
            ));
        }

        if let Some(id) = uri.strip_prefix("resource://") {
            let id = id.parse::<u32>().map_err(|_| {
                SourceError::Configuration(format!("bad resource id in {uri}"))
            })?;
            Ok(SourceId::Resource(id))
        } else if let Some(path) = uri.strip_prefix("file://") {
            Ok(SourceId::File(PathBuf::from(path)))
        } else if uri.contains("://") {
            Err(SourceError::Configuration(format!(
                "unsupported scheme in {uri}"
            )))
        } else {
            Ok(SourceId::File(PathBuf::from(uri)))
        }
    }
}

/// Pick an opener for a parsed identifier.
///
/// Resource identifiers need a bundle to resolve against; without one
/// they are rejected up front as a configuration error.
pub fn opener_for(
    id: &SourceId,
    bundle: Option<&Arc<dyn ResourceBundle>>,
) -> Result<Box<dyn TraceOpener>, SourceError> {
    match id {
        SourceId::File(path) => Ok(Box::new(FileOpener::new(path.clone()))),
        SourceId::Resource(resource_id) => match bundle {
            Some(bundle) => Ok(Box::new(ResourceOpener::new(bundle.clone(), *resource_id))),
            None => Err(SourceError::Configuration(format!(
                "resource id {resource_id} requires a resource bundle"
            ))),
        },
    }
}

/// Opens plain trace files from the filesystem
pub struct FileOpener {
    path: PathBuf,
}

impl FileOpener {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TraceOpener for FileOpener {
    fn open(&self) -> Result<LineSource, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::Open {
            uri: self.path.display().to_string(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Opens bundled raw resources through a [`ResourceBundle`].
///
/// An id the bundle cannot find resolves to an empty stream rather
/// than an open failure; bundled resource ids are fixed at build time,
/// so a miss only means an empty trace.
pub struct ResourceOpener {
    bundle: Arc<dyn ResourceBundle>,
    id: u32,
}

impl ResourceOpener {
    pub fn new(bundle: Arc<dyn ResourceBundle>, id: u32) -> Self {
        Self { bundle, id }
    }
}

impl TraceOpener for ResourceOpener {
    fn open(&self) -> Result<LineSource, SourceError> {
        match self.bundle.open_raw(self.id) {
            Ok(stream) => Ok(Box::new(BufReader::new(stream))),
            Err(e) => {
                warn!("unable to find trace resource {}: {}", self.id, e);
                Ok(Box::new(Cursor::new(Vec::new())))
            }
        }
    }
}
