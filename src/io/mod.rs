//! Reading and writing meshes from and to files.
//!
//! Each supported format lives in its own submodule ([`duff`], [`stl`],
//! [`obj`]). The items in this module tie them together: the [`FileFormat`]
//! tag, the error type shared by all codecs, the [`MeshWriter`] seam and a
//! small registry to dispatch on a format tag at runtime ([`read_file`],
//! [`write_file`]).

use std::{
    fmt,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Cursor, Read, Write},
    path::Path,
};

use failure::{Backtrace, Fail};

use crate::{
    mesh::MeshError,
    report::Reporter,
    Mesh,
};


pub mod batch;
pub mod duff;
pub mod obj;
pub(crate) mod parse;
pub mod stl;
pub mod stream;

#[cfg(test)]
mod tests;


// ===========================================================================
// ===== Formats and encodings
// ===========================================================================

/// Represents one of the supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Duff,
    Obj,
    Stl,
}

impl FileFormat {
    /// Tries to guess the file format from the file extension (ignoring
    /// case).
    ///
    /// Returns `None` if:
    /// - the path/file has no extension in its name, or
    /// - the extension is no valid UTF8, or
    /// - the file extension is not known.
    pub fn from_extension(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| {
                match &*ext.to_ascii_lowercase() {
                    "dfs" | "duff" => Some(FileFormat::Duff),
                    "obj" => Some(FileFormat::Obj),
                    "stl" => Some(FileFormat::Stl),
                    _ => None,
                }
            })
    }

    /// Tries to guess the file format from the first few bytes of a file.
    ///
    /// Only formats with some kind of signature can be detected: Duff files
    /// (magic bytes), ASCII STL (`solid`) and OBJ files that start with a
    /// comment or vertex line. Binary STL files have no signature at all.
    pub fn from_file_start(data: &[u8]) -> Option<Self> {
        if duff::is_file_start(data) {
            return Some(FileFormat::Duff);
        }
        if data.starts_with(b"solid") && data.iter().all(|b| b.is_ascii()) {
            return Some(FileFormat::Stl);
        }
        if data.is_ascii() {
            let first_line = data.split(|&b| b == b'\n')
                .map(|line| String::from_utf8_lossy(line).trim().to_string())
                .find(|line| !line.is_empty())?;
            if first_line.starts_with('#') || first_line.starts_with("v ") {
                return Some(FileFormat::Obj);
            }
        }

        None
    }

    /// The canonical file extension of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Duff => "dfs",
            FileFormat::Obj => "obj",
            FileFormat::Stl => "stl",
        }
    }

    /// Returns `true` if a reader for this format exists.
    pub fn can_read(&self) -> bool {
        codec(*self).read.is_some()
    }

    /// Returns `true` if a writer for this format exists.
    pub fn can_write(&self) -> bool {
        codec(*self).writer.is_some()
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FileFormat::Duff => "Duff",
            FileFormat::Obj => "OBJ",
            FileFormat::Stl => "STL",
        }.fmt(f)
    }
}

/// Describes the encoding of the main data of a mesh file.
///
/// Not every format supports all of these encodings: OBJ is always ASCII,
/// binary STL is always little endian and Duff is always binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEncoding {
    /// Everything is stored as an ASCII string.
    Ascii,

    /// Binary encoding where all numeric types are stored in big endian
    /// layout.
    BinaryBigEndian,

    /// Binary encoding where all numeric types are stored in little endian
    /// layout.
    BinaryLittleEndian,
}

impl FileEncoding {
    pub fn binary_native() -> Self {
        #[cfg(target_endian = "big")]
        { FileEncoding::BinaryBigEndian }

        #[cfg(target_endian = "little")]
        { FileEncoding::BinaryLittleEndian }
    }
}

impl fmt::Display for FileEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FileEncoding::Ascii => "ASCII",
            FileEncoding::BinaryBigEndian => "big endian binary",
            FileEncoding::BinaryLittleEndian => "little endian binary",
        }.fmt(f)
    }
}


// ===========================================================================
// ===== Errors
// ===========================================================================

/// The kinds of errors that can occur while reading or writing a mesh.
#[derive(Debug, Fail)]
pub enum ErrorKind {
    /// An underlying I/O operation failed.
    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] io::Error),

    /// The data ended in the middle of a record.
    #[fail(display = "unexpected end of data")]
    UnexpectedEof,

    /// A file writer was given an empty path.
    #[fail(display = "no output file specified")]
    MissingPath,

    /// The magic bytes at the start of the file are not the expected ones.
    #[fail(display = "invalid magic bytes {:?}", _0)]
    InvalidMagic([u8; 8]),

    /// A fixed-size header contains values that make no sense.
    #[fail(display = "invalid header: {}", _0)]
    InvalidHeader(String),

    /// A record in the body of a binary file holds an impossible value.
    #[fail(display = "invalid data: {}", _0)]
    InvalidData(String),

    /// A text format could not be parsed.
    #[fail(display = "{} (line {})", msg, line)]
    Parse {
        msg: String,
        line: usize,
    },

    /// The mesh read or about to be written violates the face index
    /// invariant.
    #[fail(display = "invalid mesh: {}", _0)]
    InvalidMesh(#[cause] MeshError),

    /// The format does not support the requested encoding.
    #[fail(display = "{} encoding is not supported", _0)]
    UnsupportedEncoding(FileEncoding),

    /// The file format could not be determined or has no suitable codec.
    #[fail(display = "unknown or unsupported file format: {}", _0)]
    UnknownFormat(String),

    /// The reporter requested cancellation.
    #[fail(display = "operation cancelled by user")]
    Cancelled,
}

/// Error returned by all codecs: an [`ErrorKind`] plus the format the error
/// occurred in (if known).
///
/// The `Display` output is a single message of the form `"<format>: <reason>"`
/// meant to be shown to users. Use [`Error::kind`] to react to specific
/// failures programmatically.
#[derive(Debug)]
pub struct Error {
    format: Option<FileFormat>,
    kind: ErrorKind,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { format: None, kind }
    }

    pub(crate) fn parse(msg: impl Into<String>, line: usize) -> Self {
        ErrorKind::Parse { msg: msg.into(), line }.into()
    }

    pub(crate) fn invalid_header(msg: impl Into<String>) -> Self {
        ErrorKind::InvalidHeader(msg.into()).into()
    }

    pub(crate) fn invalid_data(msg: impl Into<String>) -> Self {
        ErrorKind::InvalidData(msg.into()).into()
    }

    /// Attaches a format to this error, unless it already has one.
    pub fn in_format(mut self, format: FileFormat) -> Self {
        self.format = self.format.or(Some(format));
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn format(&self) -> Option<FileFormat> {
        self.format
    }

    pub fn is_cancelled(&self) -> bool {
        match self.kind {
            ErrorKind::Cancelled => true,
            _ => false,
        }
    }

    /// Returns `true` for errors of the underlying medium, including data
    /// that ended too early.
    pub fn is_io(&self) -> bool {
        match self.kind {
            ErrorKind::Io(_) | ErrorKind::UnexpectedEof | ErrorKind::MissingPath => true,
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.format {
            Some(format) => write!(f, "{}: {}", format, self.kind),
            None => self.kind.fmt(f),
        }
    }
}

impl Fail for Error {
    fn cause(&self) -> Option<&dyn Fail> {
        self.kind.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.kind.backtrace()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<io::Error> for Error {
    fn from(src: io::Error) -> Self {
        if src.kind() == io::ErrorKind::UnexpectedEof {
            ErrorKind::UnexpectedEof.into()
        } else {
            ErrorKind::Io(src).into()
        }
    }
}

impl From<MeshError> for Error {
    fn from(src: MeshError) -> Self {
        ErrorKind::InvalidMesh(src).into()
    }
}

/// Tags the error of `result` with `format` and logs it through the
/// reporter. Cancellation is logged as a warning, everything else as error.
///
/// Every public codec entry point that receives a reporter passes its result
/// through this function.
pub(crate) fn finish<T>(
    result: Result<T, Error>,
    format: FileFormat,
    reporter: &mut dyn Reporter,
) -> Result<T, Error> {
    result.map_err(|e| {
        let e = e.in_format(format);
        if e.is_cancelled() {
            reporter.warn(&e.to_string());
        } else {
            reporter.error(&e.to_string());
        }
        e
    })
}

/// Returns `Err(Cancelled)` if the reporter asks for cancellation.
pub(crate) fn check_cancelled(reporter: &dyn Reporter) -> Result<(), Error> {
    if reporter.is_cancelled() {
        Err(ErrorKind::Cancelled.into())
    } else {
        Ok(())
    }
}


// ===========================================================================
// ===== Writer seam
// ===========================================================================

/// Types that can serialize a [`Mesh`] in a specific format. This is usually
/// implemented by the `Config` type of a format module.
///
/// The main method of this trait is `write_to` which writes the mesh to a
/// given `io::Write` destination. The provided methods write to a file or to
/// memory.
pub trait MeshWriter {
    fn format(&self) -> FileFormat;

    /// Writes the mesh into the given `Write` instance.
    ///
    /// The mesh is validated before the first byte is written. The writer
    /// polls `reporter` for cancellation between records.
    fn write_to(
        &self,
        mesh: &Mesh,
        writer: &mut dyn Write,
        reporter: &mut dyn Reporter,
    ) -> Result<(), Error>;

    /// Writes the mesh to the file at `path`.
    ///
    /// An existing file is removed first. If writing fails or is cancelled,
    /// the partially written file is removed again, so a file at `path` only
    /// exists after a successful write. Every failure is logged through
    /// `reporter` as well as returned.
    fn write_to_file(
        &self,
        mesh: &Mesh,
        path: &Path,
        reporter: &mut dyn Reporter,
    ) -> Result<(), Error> {
        let result = (|| -> Result<(), Error> {
            if path.as_os_str().is_empty() {
                return Err(Error::new(ErrorKind::MissingPath));
            }
            if path.exists() {
                fs::remove_file(path)?;
            }

            let mut file = BufWriter::new(File::create(path)?);
            let result = self.write_to(mesh, &mut file, &mut *reporter)
                .and_then(|_| file.flush().map_err(Error::from));

            if result.is_err() {
                drop(file);
                if let Err(e) = fs::remove_file(path) {
                    tracing::debug!("could not remove partial file {}: {}", path.display(), e);
                }
            }

            result
        })();

        finish(result, self.format(), reporter)
    }

    /// Writes the mesh into a `Vec<u8>` which is returned on success.
    fn write_to_memory(&self, mesh: &Mesh, reporter: &mut dyn Reporter) -> Result<Vec<u8>, Error> {
        let mut w = Cursor::new(Vec::new());
        let result = self.write_to(mesh, &mut w, &mut *reporter).map(|_| w.into_inner());
        finish(result, self.format(), reporter)
    }
}


// ===========================================================================
// ===== Format registry
// ===========================================================================

type ReadFn = fn(&mut dyn Read, &mut dyn Reporter) -> Result<Mesh, Error>;
type WriterFn = fn(FileEncoding, &str) -> Result<Box<dyn MeshWriter>, Error>;

/// The codecs available for one format.
struct Codec {
    format: FileFormat,
    read: Option<ReadFn>,
    writer: Option<WriterFn>,
}

const CODECS: &[Codec] = &[
    Codec {
        format: FileFormat::Duff,
        read: Some(duff::read),
        writer: Some(duff::writer_for),
    },
    Codec {
        format: FileFormat::Obj,
        read: Some(obj::read),
        writer: Some(obj::writer_for),
    },
    Codec {
        format: FileFormat::Stl,
        read: None,
        writer: Some(stl::writer_for),
    },
];

fn codec(format: FileFormat) -> &'static Codec {
    CODECS.iter()
        .find(|c| c.format == format)
        .expect("bug: every file format has a registry entry")
}

/// Determines the format of the file at `path`: `format` if given,
/// otherwise the file extension, otherwise the first bytes of the file.
pub fn detect_format(path: &Path, format: Option<FileFormat>) -> Result<FileFormat, Error> {
    if let Some(format) = format.or_else(|| FileFormat::from_extension(path)) {
        return Ok(format);
    }

    let mut start = Vec::new();
    File::open(path)?.take(1024).read_to_end(&mut start)?;
    FileFormat::from_file_start(&start).ok_or_else(|| {
        ErrorKind::UnknownFormat(path.display().to_string()).into()
    })
}

/// Reads a mesh from the file at `path`. The format is detected via
/// [`detect_format`].
pub fn read_file(
    path: impl AsRef<Path>,
    format: Option<FileFormat>,
    reporter: &mut dyn Reporter,
) -> Result<Mesh, Error> {
    let path = path.as_ref();
    let format = match detect_format(path, format) {
        Ok(format) => format,
        Err(e) => {
            reporter.error(&e.to_string());
            return Err(e);
        }
    };

    let read = match codec(format).read {
        Some(read) => read,
        None => {
            let e = Error::new(ErrorKind::UnknownFormat(format!("no reader for {}", format)));
            return finish(Err(e), format, reporter);
        }
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return finish(Err(e.into()), format, reporter),
    };
    tracing::debug!("reading {} file '{}'", format, path.display());

    // The format specific read functions already log their errors.
    read(&mut BufReader::new(file), reporter)
}

/// Returns a writer for the given format and encoding. `name` is used as
/// solid name for STL files and ignored otherwise.
pub fn writer_for(
    format: FileFormat,
    encoding: FileEncoding,
    name: &str,
) -> Result<Box<dyn MeshWriter>, Error> {
    let make = codec(format).writer.ok_or_else(|| {
        Error::new(ErrorKind::UnknownFormat(format!("no writer for {}", format)))
    })?;

    make(encoding, name).map_err(|e| e.in_format(format))
}

/// Writes `mesh` to the file at `path`. The format is `format` if given and
/// is guessed from the extension otherwise. STL solid names are taken from
/// the file stem.
pub fn write_file(
    mesh: &Mesh,
    path: impl AsRef<Path>,
    format: Option<FileFormat>,
    encoding: FileEncoding,
    reporter: &mut dyn Reporter,
) -> Result<(), Error> {
    let path = path.as_ref();
    let writer = format
        .or_else(|| FileFormat::from_extension(path))
        .ok_or_else(|| Error::new(ErrorKind::UnknownFormat(path.display().to_string())))
        .and_then(|format| {
            let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or(stl::DEFAULT_SOLID_NAME);
            writer_for(format, encoding, name)
        });

    match writer {
        Ok(writer) => writer.write_to_file(mesh, path, reporter),
        Err(e) => {
            reporter.error(&e.to_string());
            Err(e)
        }
    }
}
