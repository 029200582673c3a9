//! Catalog wire-format parsing
//!
//! Turns the device's listing responses into typed folder listings. Two
//! wire formats exist in the supported families:
//!
//! - **Ricoh/Pentax JSON**: `GET /v1/photos` returns
//!   `{"dirs":[{"name":"102_1026","files":["_AMP9018.JPG", ...]}, ...]}`
//!   with folders in device order, newest last.
//! - **FluCard plain text**: `GET /cgi-bin/photolist` returns one photo
//!   URL per line, `<br>`-suffixed, in capture order; folders are derived
//!   from each URL's parent path segment.
//!
//! Any body that cannot be parsed maps to [`CameraError::Malformed`],
//! which the engine treats as a transient protocol error (firmware
//! quirks are assumed possible).

use serde::Deserialize;

use shutterlink_core::domain::newtypes::{FolderId, PhotoName, RemoteRef};
use shutterlink_core::domain::photo::PhotoEntry;

use crate::CameraError;

/// One device folder with its files, in device-reported order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderListing {
    /// The storage folder
    pub folder: FolderId,
    /// Files in the folder, capture order, refs ready to fetch
    pub entries: Vec<PhotoEntry>,
}

// ============================================================================
// Ricoh/Pentax JSON format
// ============================================================================

/// Raw response from the Ricoh-style photo listing endpoint
#[derive(Debug, Deserialize)]
struct RicohPhotoList {
    #[serde(default)]
    dirs: Vec<RicohDir>,
}

/// One directory entry in the Ricoh listing
#[derive(Debug, Deserialize)]
struct RicohDir {
    name: String,
    #[serde(default)]
    files: Vec<String>,
}

/// Parses a Ricoh-style JSON photo listing.
///
/// Folder order and per-folder file order are preserved exactly as the
/// device reported them. The content ref for each file is the
/// `folder/name` pair the `/v1/photos/{dir}/{file}` endpoint expects.
pub fn parse_ricoh(body: &str) -> Result<Vec<FolderListing>, CameraError> {
    let raw: RicohPhotoList =
        serde_json::from_str(body).map_err(|e| CameraError::Malformed(e.to_string()))?;

    let mut listings = Vec::with_capacity(raw.dirs.len());
    for dir in raw.dirs {
        let folder = FolderId::new(dir.name.clone())
            .map_err(|e| CameraError::Malformed(e.to_string()))?;

        let mut entries = Vec::with_capacity(dir.files.len());
        for file in dir.files {
            let name =
                PhotoName::new(file.clone()).map_err(|e| CameraError::Malformed(e.to_string()))?;
            let remote_ref = RemoteRef::new(format!("{}/{}", dir.name, file))
                .map_err(|e| CameraError::Malformed(e.to_string()))?;
            entries.push(PhotoEntry {
                folder: folder.clone(),
                name,
                remote_ref,
                size: None,
            });
        }
        listings.push(FolderListing { folder, entries });
    }
    Ok(listings)
}

// ============================================================================
// FluCard plain-text format
// ============================================================================

/// Fallback folder id when a FluCard URL has no parent segment
const FLUCARD_ROOT_FOLDER: &str = "DCIM";

/// Parses a FluCard plain-text photo list.
///
/// Each non-empty line (after stripping the `<br>` the firmware appends)
/// is a fetchable photo URL. Folders are grouped in order of first
/// appearance, which matches device recency because the list itself is
/// capture-ordered.
pub fn parse_flucard(body: &str) -> Result<Vec<FolderListing>, CameraError> {
    let mut listings: Vec<FolderListing> = Vec::new();

    for raw_line in body.lines() {
        let line = raw_line.replace("<br>", "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (folder_name, file_name) = split_photo_url(line)
            .ok_or_else(|| CameraError::Malformed(format!("unparseable photo line: {line}")))?;

        let folder = FolderId::new(folder_name)
            .map_err(|e| CameraError::Malformed(e.to_string()))?;
        let name =
            PhotoName::new(file_name).map_err(|e| CameraError::Malformed(e.to_string()))?;
        let remote_ref =
            RemoteRef::new(line.to_string()).map_err(|e| CameraError::Malformed(e.to_string()))?;

        let entry = PhotoEntry {
            folder: folder.clone(),
            name,
            remote_ref,
            size: None,
        };

        match listings.iter_mut().find(|l| l.folder == folder) {
            Some(listing) => listing.entries.push(entry),
            None => listings.push(FolderListing {
                folder,
                entries: vec![entry],
            }),
        }
    }
    Ok(listings)
}

/// Splits a photo URL or path into `(parent folder, file name)`.
///
/// `http://192.168.1.1/DCIM/100__07/ABCD1234.jpg` -> `(100__07, ABCD1234.jpg)`
/// `/ABCD1234.jpg` -> `(DCIM, ABCD1234.jpg)`
fn split_photo_url(line: &str) -> Option<(String, String)> {
    // Strip scheme and host if present.
    let path = match line.find("://") {
        Some(idx) => {
            let rest = &line[idx + 3..];
            let slash = rest.find('/')?;
            &rest[slash..]
        }
        None => line,
    };

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let mut prev: Option<&str> = None;
    let mut last: Option<&str> = None;
    for segment in segments.by_ref() {
        prev = last;
        last = Some(segment);
    }

    let name = last?.to_string();
    let folder = prev.unwrap_or(FLUCARD_ROOT_FOLDER).to_string();
    Some((folder, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ricoh_listing() {
        let body = r#"{
            "dirs": [
                {"name": "101_0412", "files": ["IMGP0001.JPG", "IMGP0002.JPG"]},
                {"name": "102_1026", "files": ["_AMP9018.JPG"]}
            ]
        }"#;

        let listings = parse_ricoh(body).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].folder.as_str(), "101_0412");
        assert_eq!(listings[0].entries.len(), 2);
        assert_eq!(listings[0].entries[0].name.as_str(), "IMGP0001.JPG");
        assert_eq!(
            listings[0].entries[0].remote_ref.as_str(),
            "101_0412/IMGP0001.JPG"
        );
        // Newest folder listed last, as the device reports it.
        assert_eq!(listings[1].folder.as_str(), "102_1026");
    }

    #[test]
    fn test_parse_ricoh_empty_dirs() {
        let listings = parse_ricoh(r#"{"dirs": []}"#).unwrap();
        assert!(listings.is_empty());
    }

    #[test]
    fn test_parse_ricoh_missing_dirs_key() {
        // Firmware omits the key entirely when the card is empty.
        let listings = parse_ricoh("{}").unwrap();
        assert!(listings.is_empty());
    }

    #[test]
    fn test_parse_ricoh_garbage_is_malformed() {
        let err = parse_ricoh("<html>busy</html>").unwrap_err();
        assert!(matches!(err, CameraError::Malformed(_)));
    }

    #[test]
    fn test_parse_ricoh_preserves_file_order() {
        let body = r#"{"dirs": [{"name": "101_0412", "files": ["C.JPG", "A.JPG", "B.JPG"]}]}"#;
        let listings = parse_ricoh(body).unwrap();
        let names: Vec<&str> = listings[0]
            .entries
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["C.JPG", "A.JPG", "B.JPG"]);
    }

    #[test]
    fn test_parse_flucard_listing() {
        let body = "http://192.168.1.1/DCIM/100__07/ABCD1234.jpg<br>\n\
                    http://192.168.1.1/DCIM/100__07/ABCD1235.jpg<br>\n\
                    http://192.168.1.1/DCIM/101__07/ABCD0001.jpg<br>\n";

        let listings = parse_flucard(body).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].folder.as_str(), "100__07");
        assert_eq!(listings[0].entries.len(), 2);
        assert_eq!(listings[1].folder.as_str(), "101__07");
        assert_eq!(
            listings[0].entries[0].remote_ref.as_str(),
            "http://192.168.1.1/DCIM/100__07/ABCD1234.jpg"
        );
    }

    #[test]
    fn test_parse_flucard_blank_lines_skipped() {
        let body = "\n\nhttp://192.168.1.1/DCIM/100__07/A.jpg<br>\n\n";
        let listings = parse_flucard(body).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].entries.len(), 1);
    }

    #[test]
    fn test_parse_flucard_empty_body() {
        let listings = parse_flucard("").unwrap();
        assert!(listings.is_empty());
    }

    #[test]
    fn test_parse_flucard_bare_path_gets_root_folder() {
        let listings = parse_flucard("/ABCD1234.jpg<br>\n").unwrap();
        assert_eq!(listings[0].folder.as_str(), "DCIM");
        assert_eq!(listings[0].entries[0].name.as_str(), "ABCD1234.jpg");
    }

    #[test]
    fn test_split_photo_url_variants() {
        assert_eq!(
            split_photo_url("http://192.168.1.1/DCIM/100__07/A.jpg"),
            Some(("100__07".to_string(), "A.jpg".to_string()))
        );
        assert_eq!(
            split_photo_url("/DCIM/100__07/A.jpg"),
            Some(("100__07".to_string(), "A.jpg".to_string()))
        );
        assert_eq!(
            split_photo_url("/A.jpg"),
            Some(("DCIM".to_string(), "A.jpg".to_string()))
        );
        assert_eq!(split_photo_url("http://192.168.1.1"), None);
    }
}
