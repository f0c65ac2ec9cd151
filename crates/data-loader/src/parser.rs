//! Parsers for MovieLens data files.
//!
//! Two on-disk layouts are supported:
//! - CSV ("ml-latest" releases, UTF-8, with header row):
//!   - movies.csv: movieId,title,genres
//!   - ratings.csv: userId,movieId,rating,timestamp
//! - DAT ("ml-1m" release, ISO-8859-1, `::` separated):
//!   - movies.dat: movieId::title::genres
//!   - ratings.dat: userId::movieId::rating::timestamp
//!
//! Genres and timestamps are read past and dropped; titles are normalized
//! through [`Movie::new`].

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// On-disk layout of a dataset directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Dat,
}

impl DatasetFormat {
    /// Detect the layout of `data_dir` by the catalog file it contains.
    ///
    /// CSV wins when both are present.
    pub fn detect(data_dir: &Path) -> Result<Self> {
        if data_dir.join("movies.csv").is_file() {
            Ok(DatasetFormat::Csv)
        } else if data_dir.join("movies.dat").is_file() {
            Ok(DatasetFormat::Dat)
        } else {
            Err(DataLoadError::FileNotFound {
                path: data_dir.join("movies.csv").display().to_string(),
            })
        }
    }

    pub fn movies_file(self) -> &'static str {
        match self {
            DatasetFormat::Csv => "movies.csv",
            DatasetFormat::Dat => "movies.dat",
        }
    }

    pub fn ratings_file(self) -> &'static str {
        match self {
            DatasetFormat::Csv => "ratings.csv",
            DatasetFormat::Dat => "ratings.dat",
        }
    }

    /// Parse the catalog file of this format
    pub fn parse_movies(self, path: &Path) -> Result<Vec<Movie>> {
        match self {
            DatasetFormat::Csv => parse_movies_csv(path),
            DatasetFormat::Dat => parse_movies_dat(path),
        }
    }

    /// Parse the ratings file of this format
    pub fn parse_ratings(self, path: &Path) -> Result<Vec<Rating>> {
        match self {
            DatasetFormat::Csv => parse_ratings_csv(path),
            DatasetFormat::Dat => parse_ratings_dat(path),
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

// =============================================================================
// CSV
// =============================================================================

#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f32,
}

/// Parse a movies.csv file
pub fn parse_movies_csv(path: &Path) -> Result<Vec<Movie>> {
    read_movies_csv(open(path)?, &file_label(path))
}

/// Parse a ratings.csv file
pub fn parse_ratings_csv(path: &Path) -> Result<Vec<Rating>> {
    read_ratings_csv(open(path)?, &file_label(path))
}

pub(crate) fn read_movies_csv<R: Read>(reader: R, file: &str) -> Result<Vec<Movie>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut movies = Vec::new();
    for record in csv_reader.deserialize::<MovieRecord>() {
        let record = record.map_err(|source| DataLoadError::Csv {
            file: file.to_string(),
            source,
        })?;
        movies.push(Movie::new(record.movie_id, &record.title));
    }
    Ok(movies)
}

pub(crate) fn read_ratings_csv<R: Read>(reader: R, file: &str) -> Result<Vec<Rating>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut ratings = Vec::new();
    for record in csv_reader.deserialize::<RatingRecord>() {
        let record = record.map_err(|source| DataLoadError::Csv {
            file: file.to_string(),
            source,
        })?;
        ratings.push(Rating {
            user_id: record.user_id,
            movie_id: record.movie_id,
            rating: record.rating,
        });
    }
    Ok(ratings)
}

// =============================================================================
// DAT
// =============================================================================

/// Helper function to read a file with ISO-8859-1 encoding (Latin-1)
///
/// Each byte maps directly to the Unicode code point of the same value.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(decode_latin1_lines(&bytes))
}

fn decode_latin1_lines(bytes: &[u8]) -> Vec<String> {
    let content: String = bytes.iter().map(|&b| b as char).collect();
    content.lines().map(|s| s.to_string()).collect()
}

/// Pulls `::` separated fields off one line, reporting the missing field by name.
struct DatFields<'a> {
    parts: std::str::Split<'a, &'static str>,
    file: &'a str,
    line: usize,
}

impl<'a> DatFields<'a> {
    fn new(line_text: &'a str, file: &'a str, line: usize) -> Self {
        Self {
            parts: line_text.split("::"),
            file,
            line,
        }
    }

    fn next(&mut self, name: &str) -> Result<&'a str> {
        self.parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: self.file.to_string(),
            line: self.line,
            reason: format!("Missing {}", name),
        })
    }

    fn parse<T>(&mut self, name: &str) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.next(name)?;
        raw.parse().map_err(|e| DataLoadError::ParseError {
            file: self.file.to_string(),
            line: self.line,
            reason: format!("Invalid {}: {}", name, e),
        })
    }
}

/// Parse the movies.dat file
///
/// The title includes the year in parentheses: "Toy Story (1995)"
pub fn parse_movies_dat(path: &Path) -> Result<Vec<Movie>> {
    let lines = read_lines_latin1(path)?;
    parse_movie_lines(&lines, &file_label(path))
}

/// Parse the ratings.dat file
pub fn parse_ratings_dat(path: &Path) -> Result<Vec<Rating>> {
    let lines = read_lines_latin1(path)?;
    parse_rating_lines(&lines, &file_label(path))
}

fn parse_movie_lines(lines: &[String], file: &str) -> Result<Vec<Movie>> {
    let mut movies = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        let mut fields = DatFields::new(line_trimmed, file, idx + 1);
        let movie_id: MovieId = fields.parse("movieId")?;
        let title = fields.next("title")?;
        // Genres must be present even though they are not kept
        fields.next("genres")?;
        movies.push(Movie::new(movie_id, title));
    }
    Ok(movies)
}

fn parse_rating_lines(lines: &[String], file: &str) -> Result<Vec<Rating>> {
    let mut ratings = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        let mut fields = DatFields::new(line_trimmed, file, idx + 1);
        let rating = Rating {
            user_id: fields.parse("userId")?,
            movie_id: fields.parse("movieId")?,
            rating: fields.parse("rating")?,
        };
        let _timestamp: i64 = fields.parse("timestamp")?;
        ratings.push(rating);
    }
    Ok(ratings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_read_movies_csv_normalizes_titles() {
        let data = "movieId,title,genres\n\
                    1,Toy Story (1995),Adventure|Animation\n\
                    2,\"American President, The (1995)\",Comedy|Drama\n";
        let movies = read_movies_csv(data.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "Toy Story");
        assert_eq!(movies[0].year, Some(1995));
        assert_eq!(movies[1].title, "American President, The");
    }

    #[test]
    fn test_read_ratings_csv_drops_timestamp() {
        let data = "userId,movieId,rating,timestamp\n1,1,4.0,964982703\n1,3,4.5,964981247\n";
        let ratings = read_ratings_csv(data.as_bytes(), "ratings.csv").unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(
            ratings[1],
            Rating {
                user_id: 1,
                movie_id: 3,
                rating: 4.5
            }
        );
    }

    #[test]
    fn test_read_ratings_csv_rejects_bad_number() {
        let data = "userId,movieId,rating,timestamp\n1,abc,4.0,0\n";
        let err = read_ratings_csv(data.as_bytes(), "ratings.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::Csv { .. }));
    }

    #[test]
    fn test_parse_movie_lines() {
        let movies = parse_movie_lines(
            &lines("1::Toy Story (1995)::Animation|Children's|Comedy\n\n2::Jumanji (1995)::Adventure"),
            "movies.dat",
        )
        .unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[1].id, 2);
        assert_eq!(movies[1].title, "Jumanji");
    }

    #[test]
    fn test_parse_movie_lines_missing_genres() {
        let err = parse_movie_lines(&lines("1::Toy Story (1995)"), "movies.dat").unwrap_err();
        match err {
            DataLoadError::ParseError { line, reason, .. } => {
                assert_eq!(line, 1);
                assert_eq!(reason, "Missing genres");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rating_lines_reports_line_number() {
        let err = parse_rating_lines(&lines("1::1193::5::978300760\n1::x::3::978302109"), "ratings.dat")
            .unwrap_err();
        match err {
            DataLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, "ratings.dat");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_latin1_decoding() {
        let decoded = decode_latin1_lines(b"1::Cit\xe9 des enfants perdus, La (1995)::Sci-Fi");
        assert_eq!(decoded[0], "1::Cité des enfants perdus, La (1995)::Sci-Fi");
    }
}
