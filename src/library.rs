//! Library module: the file picker and the playlist entries built from it.
//!
//! `scan` expands a selection of files and folders into `SourceFile`s,
//! `naming` derives artist/name from a file name and `urls` owns the
//! session-scoped playable URLs every `Track` carries.

mod media_type;
mod model;
mod naming;
mod scan;
mod urls;

pub use media_type::media_type_for;
pub use model::{SourceFile, Track};
pub use naming::{TrackName, UNKNOWN_ARTIST, parse_file_name};
pub use scan::scan_selection;
pub use urls::{PlayableUrl, UrlRegistry};

#[cfg(test)]
mod tests;
