//! Parsers for the two artifacts.
//!
//! - catalog: CSV with a header naming at least `movie_id` and `title`
//! - similarity (text): dense CSV, `<label>,<col id>,...` then
//!   `<row id>,<score>,...` per row
//! - similarity (binary): bincode-encoded [`SimilarityArtifact`], chosen by
//!   the `.bin` extension
//!
//! The `*_str` functions take file contents directly so they can be tested
//! without touching the filesystem.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// On-disk layout of the binary similarity artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityArtifact {
    pub row_ids: Vec<MovieId>,
    pub column_ids: Vec<MovieId>,
    /// Row-major, `row_ids.len() * column_ids.len()` values
    pub scores: Vec<Score>,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a whole text file.
///
/// UTF-8 is tried first; anything else is decoded as ISO-8859-1, where each
/// byte maps directly to a code point.
fn read_text(path: &Path) -> Result<String> {
    let mut bytes = Vec::new();
    open(path)?.read_to_end(&mut bytes)?;

    let content = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    };

    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Split one CSV record into fields.
///
/// Handles quoted fields and doubled quotes inside them. Fields spanning
/// several lines are not supported.
fn split_record(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
        } else {
            match c {
                ',' => fields.push(std::mem::take(&mut field)),
                '"' if field.is_empty() => in_quotes = true,
                _ => field.push(c),
            }
        }
    }

    if in_quotes {
        return Err("Unterminated quoted field".to_string());
    }
    fields.push(field);
    Ok(fields)
}

/// Non-blank lines with their 1-based line numbers
fn records(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

fn parse_movie_id(raw: &str, file: &str, line: usize) -> Result<MovieId> {
    raw.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid movie_id '{}': {}", raw, e),
    })
}

/// Parse the catalog file
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = read_text(path)?;
    parse_catalog_str(&content, &file_label(path))
}

/// Parse catalog CSV contents.
///
/// `file` is only used in error messages.
pub fn parse_catalog_str(content: &str, file: &str) -> Result<Catalog> {
    let mut lines = records(content);

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| DataLoadError::ValidationError(format!("{} is empty", file)))?;
    let header = split_record(header).map_err(|reason| DataLoadError::ParseError {
        file: file.to_string(),
        line: header_line,
        reason,
    })?;

    let column = |name: &str| {
        header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| DataLoadError::MissingColumn {
                file: file.to_string(),
                column: name.to_string(),
            })
    };
    let id_col = column("movie_id")?;
    let title_col = column("title")?;

    let mut catalog = Catalog::new();
    for (line_no, line) in lines {
        let fields = split_record(line).map_err(|reason| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason,
        })?;

        if fields.len() != header.len() {
            return Err(DataLoadError::FieldCountMismatch {
                file: file.to_string(),
                expected: header.len(),
                found: fields.len(),
                line: line_no,
            });
        }

        catalog.insert(CatalogEntry {
            movie_id: parse_movie_id(&fields[id_col], file, line_no)?,
            title: fields[title_col].clone(),
        })?;
    }

    Ok(catalog)
}

/// Parse the similarity artifact, picking the format from the extension
pub fn parse_similarity(path: &Path) -> Result<SimilarityTable> {
    let is_binary = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"));

    if is_binary {
        parse_similarity_bin(path)
    } else {
        let content = read_text(path)?;
        parse_similarity_str(&content, &file_label(path))
    }
}

/// Decode a bincode [`SimilarityArtifact`]
pub fn parse_similarity_bin(path: &Path) -> Result<SimilarityTable> {
    let reader = BufReader::new(open(path)?);
    let artifact: SimilarityArtifact = bincode::deserialize_from(reader)?;
    SimilarityTable::new(artifact.row_ids, artifact.column_ids, artifact.scores)
}

/// Parse dense similarity CSV contents
pub fn parse_similarity_str(content: &str, file: &str) -> Result<SimilarityTable> {
    let mut lines = records(content);

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| DataLoadError::ValidationError(format!("{} is empty", file)))?;

    // First header cell is the index label (often empty), the rest are column ids
    let column_ids = header
        .split(',')
        .skip(1)
        .map(|raw| parse_movie_id(raw, file, header_line))
        .collect::<Result<Vec<MovieId>>>()?;

    let width = column_ids.len();
    let mut row_ids = Vec::new();
    let mut scores = Vec::new();

    for (line_no, line) in lines {
        let mut parts = line.split(',');

        let row_id = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: "Missing row movie_id".to_string(),
        })?;
        row_ids.push(parse_movie_id(row_id, file, line_no)?);

        let before = scores.len();
        for raw in parts {
            let score: Score = raw.trim().parse().map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid score '{}': {}", raw, e),
            })?;
            scores.push(score);
        }

        let found = scores.len() - before;
        if found != width {
            return Err(DataLoadError::FieldCountMismatch {
                file: file.to_string(),
                expected: width + 1,
                found: found + 1,
                line: line_no,
            });
        }
    }

    SimilarityTable::new(row_ids, column_ids, scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_record_plain_and_quoted() {
        assert_eq!(split_record("1,Up").unwrap(), vec!["1", "Up"]);
        assert_eq!(
            split_record(r#"2,"Good, the Bad and the Ugly, The""#).unwrap(),
            vec!["2", "Good, the Bad and the Ugly, The"]
        );
        assert_eq!(
            split_record(r#"3,"The ""Quoted"" One""#).unwrap(),
            vec!["3", r#"The "Quoted" One"#]
        );
        assert_eq!(split_record("4,").unwrap(), vec!["4", ""]);
    }

    #[test]
    fn test_split_record_unterminated_quote() {
        assert!(split_record(r#"1,"Broken"#).is_err());
    }

    #[test]
    fn test_parse_catalog() {
        let content = "movie_id,title\n1,Toy Story (1995)\n\n2,\"Usual Suspects, The (1995)\"\r\n";
        let catalog = parse_catalog_str(content, "movies_list.csv").unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.title(1), Some("Toy Story (1995)"));
        assert_eq!(catalog.title(2), Some("Usual Suspects, The (1995)"));
    }

    #[test]
    fn test_parse_catalog_ignores_extra_columns_and_order() {
        let content = ",title,genres,movie_id\n0,Heat (1995),Action,6\n1,Casino (1995),Drama,16\n";
        let catalog = parse_catalog_str(content, "movies_list.csv").unwrap();

        assert_eq!(catalog.entries()[0].movie_id, 6);
        assert_eq!(catalog.title(16), Some("Casino (1995)"));
    }

    #[test]
    fn test_parse_catalog_missing_title_column() {
        let err = parse_catalog_str("movie_id,name\n1,Up\n", "movies_list.csv").unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::MissingColumn { ref column, .. } if column == "title"
        ));
    }

    #[test]
    fn test_parse_catalog_bad_id_reports_line() {
        let err =
            parse_catalog_str("movie_id,title\n1,Up\nx,Cars\n", "movies_list.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 3, .. }));
    }

    #[test]
    fn test_parse_catalog_duplicate_id() {
        let err =
            parse_catalog_str("movie_id,title\n1,Up\n1,Cars\n", "movies_list.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::DuplicateId { id: 1, .. }));
    }

    #[test]
    fn test_parse_similarity_csv() {
        let content = "movie_id,1,2,3\n1,1.0,0.8,0.3\n2,0.8,1.0,0.5\n3,0.3,0.5,1.0\n";
        let table = parse_similarity_str(content, "movie_similarity.csv").unwrap();

        assert_eq!(table.shape(), (3, 3));
        assert_eq!(table.column_ids(), &[1, 2, 3]);
        let column: Vec<_> = table.column(1).unwrap().collect();
        assert_eq!(column, vec![(1, 1.0), (2, 0.8), (3, 0.3)]);
    }

    #[test]
    fn test_parse_similarity_csv_ragged_row() {
        let content = ",1,2\n1,1.0,0.5\n2,0.5\n";
        let err = parse_similarity_str(content, "movie_similarity.csv").unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::FieldCountMismatch { expected: 3, found: 2, line: 3, .. }
        ));
    }

    #[test]
    fn test_parse_similarity_csv_bad_score() {
        let err = parse_similarity_str(",1\n1,high\n", "movie_similarity.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 2, .. }));
    }

    fn write_temp(name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "data-loader-parser-{}-{}",
            std::process::id(),
            name
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_catalog_latin1_file() {
        let path = write_temp("latin1-movies.csv", b"movie_id,title\n1,Am\xe9lie (2001)\n");
        let catalog = parse_catalog(&path).unwrap();
        assert_eq!(catalog.title(1), Some("Am\u{e9}lie (2001)"));
    }

    #[test]
    fn test_parse_catalog_strips_bom() {
        let path = write_temp("bom-movies.csv", b"\xef\xbb\xbfmovie_id,title\n2,Up\n");
        let catalog = parse_catalog(&path).unwrap();
        assert_eq!(catalog.title(2), Some("Up"));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_catalog(Path::new("/definitely/not/here/movies_list.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
