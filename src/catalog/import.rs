use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::csv::{CsvError, CsvReader};
use crate::catalog::genres::parse_genres;
use crate::catalog::title::parse_title;
use crate::db::{DbError, Movie, MovieRepo};

/// Rows are committed to the store in transactions of this size. This
/// bounds transaction size for large sources; the final table contents are
/// the same as a single-transaction import.
pub const BATCH_SIZE: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Missing source file: {0}. Download MovieLens first.")]
    MissingSource(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Line {line}: malformed movie id {value:?}")]
    MalformedId { line: usize, value: String },
    #[error("Line {line}: {reason}")]
    Csv { line: usize, reason: String },
    #[error("Source has no {0:?} column")]
    MissingColumn(&'static str),
    #[error(transparent)]
    Db(#[from] DbError),
}

struct Columns {
    id: usize,
    title: usize,
    genres: usize,
}

fn locate_columns(header: &[String]) -> Result<Columns, ImportError> {
    let find = |name: &'static str| {
        header
            .iter()
            .position(|h| h == name)
            .ok_or(ImportError::MissingColumn(name))
    };
    Ok(Columns {
        id: find("movieId")?,
        title: find("title")?,
        genres: find("genres")?,
    })
}

fn field<'a>(record: &'a [String], index: usize, line: usize) -> Result<&'a str, ImportError> {
    record
        .get(index)
        .map(|s| s.as_str())
        .ok_or_else(|| ImportError::Csv {
            line,
            reason: format!("expected at least {} fields, got {}", index + 1, record.len()),
        })
}

/// Full replace of the movie catalog from a MovieLens `movies.csv` file.
///
/// All existing rows are deleted first, then the source is streamed row by
/// row and inserted in batches of [`BATCH_SIZE`]. A row whose id does not
/// parse as an integer aborts the whole run; batches committed before the
/// failure stay committed, and the recovery path is to rerun the import.
/// Returns the number of movies imported.
pub async fn import_movies(repo: &dyn MovieRepo, source: &Path) -> Result<u64, ImportError> {
    if !source.exists() {
        return Err(ImportError::MissingSource(source.to_path_buf()));
    }

    let file = File::open(source).map_err(|e| ImportError::Io {
        path: source.to_path_buf(),
        source: e,
    })?;
    let mut reader = CsvReader::new(BufReader::new(file));

    let map_csv = |e: CsvError| match e {
        CsvError::Io(e) => ImportError::Io {
            path: source.to_path_buf(),
            source: e,
        },
        CsvError::UnterminatedQuote { line } => ImportError::Csv {
            line,
            reason: "unterminated quoted field".to_string(),
        },
    };

    let header = reader
        .next_record()
        .map_err(map_csv)?
        .ok_or(ImportError::MissingColumn("movieId"))?;
    let columns = locate_columns(&header)?;

    info!("Importing movies from {}", source.display());
    repo.clear_movies().await?;

    let mut batch: Vec<Movie> = Vec::with_capacity(BATCH_SIZE);
    let mut total: u64 = 0;

    while let Some(record) = reader.next_record().map_err(map_csv)? {
        let line = reader.record_line();

        let raw_id = field(&record, columns.id, line)?;
        let id = raw_id
            .trim()
            .parse::<i64>()
            .map_err(|_| ImportError::MalformedId {
                line,
                value: raw_id.to_string(),
            })?;

        let (title, year) = parse_title(field(&record, columns.title, line)?);
        let genres = parse_genres(field(&record, columns.genres, line)?);

        batch.push(Movie {
            id,
            title,
            year,
            genres: Some(genres),
            overview: None,
            popularity: 0.0,
            poster_file: None,
            embedding: None,
        });

        if batch.len() == BATCH_SIZE {
            repo.insert_movies(&batch).await?;
            total += batch.len() as u64;
            batch.clear();
            info!("Inserted {} movies...", total);
        }
    }

    if !batch.is_empty() {
        repo.insert_movies(&batch).await?;
        total += batch.len() as u64;
    }

    info!("Done. Inserted {} movies.", total);
    Ok(total)
}
